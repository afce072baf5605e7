//! Dependency descriptors and their mapping to repository identifiers.

use std::fmt;

use serde::Deserialize;

/// Descriptor `type` tag for dependencies hosted as GitHub releases.
pub const GITHUB_RELEASE_TYPE: &str = "github_release";

/// Identifies a versioned dependency to fetch.
///
/// Two shapes resolve to a repository identifier: the release-hosted form
/// (`type = "github_release"` with `organization` and `repository` set) and
/// the git-path form (a `path` like `git@github.com:org/repo.git`).
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Release tag to fetch.
    pub version: String,
}

impl Descriptor {
    /// Derive the `organization/repository` identifier this descriptor
    /// refers to, or `None` if neither form applies.
    pub fn repo_identifier(&self) -> Option<String> {
        if self.kind == GITHUB_RELEASE_TYPE {
            // Let's be safe...
            match (&self.organization, &self.repository) {
                (Some(org), Some(repo)) => Some(format!("{org}/{repo}")),
                _ => None,
            }
        } else if let Some(path) = &self.path {
            path.strip_prefix("git@github.com:")
                .and_then(|rest| rest.strip_suffix(".git"))
                .map(str::to_string)
        } else {
            None
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repo_identifier() {
            Some(ident) => write!(f, "{}:{}@{}", self.kind, ident, self.version),
            None => write!(f, "{}:?@{}", self.kind, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_descriptor(org: Option<&str>, repo: Option<&str>) -> Descriptor {
        Descriptor {
            kind: GITHUB_RELEASE_TYPE.to_string(),
            organization: org.map(str::to_string),
            repository: repo.map(str::to_string),
            path: None,
            version: "v1.2.3".to_string(),
        }
    }

    #[test]
    fn release_form_builds_identifier() {
        let desc = release_descriptor(Some("ue4plugins"), Some("tk-framework-unrealqt"));
        assert_eq!(
            desc.repo_identifier().as_deref(),
            Some("ue4plugins/tk-framework-unrealqt")
        );
    }

    #[test]
    fn release_form_without_organization_or_repository_resolves_to_none() {
        assert_eq!(release_descriptor(None, Some("repo")).repo_identifier(), None);
        assert_eq!(release_descriptor(Some("org"), None).repo_identifier(), None);
    }

    #[test]
    fn git_path_form_builds_identifier() {
        let desc = Descriptor {
            kind: "git".to_string(),
            organization: None,
            repository: None,
            path: Some("git@github.com:GPLgithub/tk-framework-unrealqt.git".to_string()),
            version: "v1.2.3".to_string(),
        };
        assert_eq!(
            desc.repo_identifier().as_deref(),
            Some("GPLgithub/tk-framework-unrealqt")
        );
    }

    #[test]
    fn non_github_paths_resolve_to_none() {
        let desc = Descriptor {
            kind: "git".to_string(),
            organization: None,
            repository: None,
            path: Some("git@gitlab.com:org/repo.git".to_string()),
            version: "v1.2.3".to_string(),
        };
        assert_eq!(desc.repo_identifier(), None);
    }
}
