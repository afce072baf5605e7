use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "bundle cache populator")]
pub struct Args {
    /// Path to a TOML file listing registered sources
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub sub: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Report whether a descriptor can be cached (Exit 0 = yes, 1 = no)
    Check {
        #[command(flatten)]
        descriptor: DescriptorArgs,
    },
    /// Populate a cache entry with the descriptor's release assets
    Populate {
        /// Directory to extract the assets into
        #[arg(long, short = 'd')]
        destination: String,

        #[command(flatten)]
        descriptor: DescriptorArgs,
    },
}

/// Descriptor fields; give either organization + repository, or a git path
/// like git@github.com:org/repo.git.
#[derive(ClapArgs, Debug)]
pub struct DescriptorArgs {
    /// Release organization
    #[arg(long, requires = "repository", conflicts_with = "path")]
    pub organization: Option<String>,

    /// Release repository
    #[arg(long, requires = "organization")]
    pub repository: Option<String>,

    /// Git descriptor path
    #[arg(long, conflicts_with = "repository")]
    pub path: Option<String>,

    /// Release tag
    #[arg(long, short = 'v')]
    pub version: String,
}
