use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;

use version_actions::cli::orchestration::{self, NextVersionArgs, NEXT_VERSION_KEY, TAG_SOURCE_KEY};
use version_actions::git::{self, TagBackend};
use version_actions::{actions, config, logging};

#[derive(clap::Parser)]
#[command(
    name = "next-version",
    version,
    about = "Compute the next unique version from the current version and existing git tags"
)]
struct Args {
    #[arg(long, help = "Current version, e.g. 1.2.3-beta [default: current-version input]")]
    current_version: Option<String>,

    #[arg(long, help = "Label printed before new revision numbers, e.g. r")]
    revision_prefix: Option<String>,

    #[arg(long, help = "Stage that replaces the one in the current version")]
    override_stage: Option<String>,

    #[arg(long, value_enum, help = "How existing tags are listed")]
    tag_source: Option<TagBackend>,

    #[arg(long, default_value = ".", help = "Path inside the git repository")]
    repo: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            actions::report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn tag_backend(flag: Option<TagBackend>, fallback: TagBackend) -> Result<TagBackend> {
    if let Some(backend) = flag {
        return Ok(backend);
    }

    match actions::get_input(TAG_SOURCE_KEY) {
        Some(name) => TagBackend::from_str(&name, true)
            .map_err(|e| anyhow!("Invalid {} input '{}': {}", TAG_SOURCE_KEY, name, e)),
        None => Ok(fallback),
    }
}

fn run(args: Args) -> Result<()> {
    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let workflow_args = NextVersionArgs::resolve(
        args.current_version,
        args.revision_prefix,
        args.override_stage,
        &config.version,
    )?;

    let backend = tag_backend(args.tag_source, config.version.tag_source)?;
    debug!(?backend, "Tag source");

    let source = git::open_tag_source(backend, &args.repo)
        .with_context(|| format!("Failed to open repository at '{}'", args.repo.display()))?;

    let result = orchestration::run_next_version(&workflow_args, &*source)?;
    let next_version = result.next.to_string();

    if !result.next.is_strict_semver() {
        actions::warning(&format!(
            "Next version '{}' is not a strict semantic version",
            next_version
        ));
    }

    actions::set_output(NEXT_VERSION_KEY, &next_version)
        .with_context(|| format!("Failed to set {} output", NEXT_VERSION_KEY))?;

    Ok(())
}
