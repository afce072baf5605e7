mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use bundle_cache::{CacheConfig, Descriptor, Populator};
use bundle_cache::descriptor::GITHUB_RELEASE_TYPE;

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(real_main()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn real_main() -> Result<ExitCode> {
    let args = cli::Args::parse();

    let config = match &args.config {
        Some(path) => CacheConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => CacheConfig::default(),
    };
    let populator = Populator::new(config)?;

    match args.sub {
        cli::Cmd::Check { descriptor } => {
            let descriptor = build_descriptor(descriptor);
            if populator.can_populate(&descriptor) {
                println!("{descriptor}: can populate");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{descriptor}: no registered source");
                Ok(ExitCode::FAILURE)
            }
        }
        cli::Cmd::Populate {
            destination,
            descriptor,
        } => {
            let descriptor = build_descriptor(descriptor);
            populator
                .populate(&PathBuf::from(destination), &descriptor)
                .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_descriptor(args: cli::DescriptorArgs) -> Descriptor {
    let kind = if args.path.is_some() {
        "git".to_string()
    } else {
        GITHUB_RELEASE_TYPE.to_string()
    };
    Descriptor {
        kind,
        organization: args.organization,
        repository: args.repository,
        path: args.path,
        version: args.version,
    }
}
