use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use version_actions::comment::{self, CommentInputs, GitHubClient, Outcome, WorkflowContext};
use version_actions::{actions, config, logging, ActionError};

#[derive(clap::Parser)]
#[command(
    name = "pr-merge-comment",
    about = "Comment the merge build result on the pull request of the built commit"
)]
struct Args {
    #[arg(long, help = "Version produced by the build [default: version input]")]
    version: Option<String>,

    #[arg(long, help = "Commit to look up [default: sha input, then workflow run head]")]
    sha: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
        .and_then(|runtime| runtime.block_on(run(args)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            actions::report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn github_token() -> Result<String, ActionError> {
    actions::get_input("github-token")
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
        .ok_or_else(|| ActionError::missing_input("github-token"))
}

async fn run(args: Args) -> Result<()> {
    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let inputs = CommentInputs {
        version: args.version.or_else(|| actions::get_input("version")),
        sha: args.sha.or_else(|| actions::get_input("sha")),
    };

    let context = WorkflowContext::from_env().context("Failed to read workflow context")?;
    let api_url = context
        .api_url
        .clone()
        .unwrap_or_else(|| config.comment.api_url.clone());
    let client = GitHubClient::new(&api_url, &github_token()?)?;

    let outcome = comment::post_merge_comment(
        &client,
        &context,
        &inputs,
        &config.comment.release_branch,
    )
    .await
    .context("Failed to post merge comment")?;

    match outcome {
        Outcome::Skipped(reason) => info!("{}, skipping.", reason),
        Outcome::Commented { pull_request, .. } => info!("Commented on PR #{}", pull_request),
    }

    Ok(())
}
