//! Post-merge build result comments on pull requests
//!
//! After a merge build, the commit that was built is mapped back to its pull
//! request and a comment with the build result and version is posted there.
//! Deciding whether and what to post ([plan_comment]) is pure; only
//! [post_merge_comment] talks to the API.

pub mod client;
pub mod context;

pub use client::{GitHubClient, PullRequest, PullRequestApi};
pub use context::{EventPayload, WorkflowContext, WorkflowRun};

use crate::error::Result;
use std::fmt;
use tracing::{debug, info};

const WORKFLOW_DISPATCH: &str = "workflow_dispatch";
const FALLBACK_RUN_LABEL: &str = "test";

/// Action inputs for the commenter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentInputs {
    pub version: Option<String>,
    /// Commit to look up; defaults to the workflow run head
    pub sha: Option<String>,
}

/// Why no comment was posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoVersion,
    NoSha,
    NotReleaseBuild,
    NoPullRequest,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoVersion => write!(f, "No version found"),
            SkipReason::NoSha => write!(f, "No Git SHA found"),
            SkipReason::NotReleaseBuild => {
                write!(f, "Not a workflow dispatch or workflow run push to the release branch")
            }
            SkipReason::NoPullRequest => write!(f, "No PR found"),
        }
    }
}

/// Link to the workflow run that produced the build
#[derive(Debug, Clone, PartialEq)]
pub struct RunLink {
    pub name: String,
    pub url: String,
}

/// Everything needed to post a comment once the PR is known
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPlan {
    pub version: String,
    pub sha: String,
    pub success: bool,
    pub run: Option<RunLink>,
}

impl CommentPlan {
    pub fn body(&self) -> String {
        let (emoji, text) = if self.success {
            ("✅", "was successful")
        } else {
            ("❌", "has failed")
        };

        let mut body = format!(
            "{} Merge build {}.\nVersion: `{}`",
            emoji, text, self.version
        );
        if let Some(run) = &self.run {
            body.push_str(&format!("\nRun: [{}]({})", run.name, run.url));
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Skip(SkipReason),
    Comment(CommentPlan),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Skipped(SkipReason),
    Commented { pull_request: u64, body: String },
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Decide whether the current run should produce a PR comment.
///
/// Comments are only made for manual dispatches and for workflow runs that
/// were triggered by a push to a branch starting with `release_branch`.
pub fn plan_comment(
    inputs: &CommentInputs,
    context: &WorkflowContext,
    release_branch: &str,
) -> Decision {
    let Some(version) = non_empty(inputs.version.as_deref()) else {
        return Decision::Skip(SkipReason::NoVersion);
    };
    debug!("Version: {}", version);

    let run = context.workflow_run();
    let sha = non_empty(inputs.sha.as_deref())
        .or_else(|| run.and_then(|r| non_empty(r.head_sha.as_deref())));
    let Some(sha) = sha else {
        return Decision::Skip(SkipReason::NoSha);
    };
    debug!("SHA: {}", sha);

    let on_release_branch = run
        .and_then(|r| r.head_branch.as_deref())
        .is_some_and(|branch| branch.starts_with(release_branch));
    let push_to_release = run.and_then(|r| r.event.as_deref()) == Some("push") && on_release_branch;

    if context.event_name != WORKFLOW_DISPATCH && !push_to_release {
        return Decision::Skip(SkipReason::NotReleaseBuild);
    }

    let run_id = run
        .and_then(|r| r.id)
        .or(context.run_id)
        .filter(|id| *id != 0);
    let run_name = run
        .and_then(|r| non_empty(r.name.as_deref()))
        .unwrap_or(FALLBACK_RUN_LABEL);
    let conclusion = run
        .and_then(|r| non_empty(r.conclusion.as_deref()))
        .unwrap_or(FALLBACK_RUN_LABEL);

    let run_link = match run_id {
        Some(id) => {
            debug!("Appending result and URL for run ID: {}", id);
            Some(RunLink {
                name: run_name.to_string(),
                url: format!("{}/actions/runs/{}", context.repo_url(), id),
            })
        }
        None => {
            debug!("No run ID found, skipping run result and URL.");
            None
        }
    };

    Decision::Comment(CommentPlan {
        version: version.to_string(),
        sha: sha.to_string(),
        success: conclusion == "success",
        run: run_link,
    })
}

/// Post the build result on the first pull request associated with the commit.
pub async fn post_merge_comment<A: PullRequestApi + ?Sized>(
    api: &A,
    context: &WorkflowContext,
    inputs: &CommentInputs,
    release_branch: &str,
) -> Result<Outcome> {
    debug!(?context, "Workflow context");

    let plan = match plan_comment(inputs, context, release_branch) {
        Decision::Skip(reason) => return Ok(Outcome::Skipped(reason)),
        Decision::Comment(plan) => plan,
    };

    let pull_requests = api
        .list_pull_requests_for_commit(&context.owner, &context.repo, &plan.sha)
        .await?;
    let Some(first) = pull_requests.first() else {
        return Ok(Outcome::Skipped(SkipReason::NoPullRequest));
    };
    info!("Found {} PR(s).", pull_requests.len());

    let body = plan.body();
    info!("Commenting on first PR: {}", first.number);
    api.create_comment(&context.owner, &context.repo, first.number, &body)
        .await?;

    Ok(Outcome::Commented {
        pull_request: first.number,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_run(branch: &str) -> WorkflowRun {
        WorkflowRun {
            id: Some(42),
            name: Some("Build".to_string()),
            conclusion: Some("success".to_string()),
            head_sha: Some("abc123".to_string()),
            head_branch: Some(branch.to_string()),
            event: Some("push".to_string()),
        }
    }

    fn context(event_name: &str, run: Option<WorkflowRun>) -> WorkflowContext {
        let payload = EventPayload {
            workflow_run: run,
            repository: None,
        };
        WorkflowContext::new(event_name, "octo/widgets", payload).unwrap()
    }

    fn inputs(version: &str) -> CommentInputs {
        CommentInputs {
            version: Some(version.to_string()),
            sha: None,
        }
    }

    #[test]
    fn test_skip_without_version() {
        let ctx = context("workflow_run", Some(push_run("master")));
        assert_eq!(
            plan_comment(&CommentInputs::default(), &ctx, "master"),
            Decision::Skip(SkipReason::NoVersion)
        );
        assert_eq!(
            plan_comment(&inputs(""), &ctx, "master"),
            Decision::Skip(SkipReason::NoVersion)
        );
    }

    #[test]
    fn test_skip_without_sha() {
        let ctx = context("workflow_dispatch", None);
        assert_eq!(
            plan_comment(&inputs("1.2.3+r1"), &ctx, "master"),
            Decision::Skip(SkipReason::NoSha)
        );
    }

    #[test]
    fn test_skip_push_to_other_branch() {
        let ctx = context("workflow_run", Some(push_run("feature/x")));
        assert_eq!(
            plan_comment(&inputs("1.2.3+r1"), &ctx, "master"),
            Decision::Skip(SkipReason::NotReleaseBuild)
        );
    }

    #[test]
    fn test_skip_pull_request_run() {
        let mut run = push_run("master");
        run.event = Some("pull_request".to_string());
        let ctx = context("workflow_run", Some(run));
        assert_eq!(
            plan_comment(&inputs("1.2.3+r1"), &ctx, "master"),
            Decision::Skip(SkipReason::NotReleaseBuild)
        );
    }

    #[test]
    fn test_plan_for_release_push() {
        let ctx = context("workflow_run", Some(push_run("master")));
        let Decision::Comment(plan) = plan_comment(&inputs("1.2.3+r1"), &ctx, "master") else {
            panic!("expected a comment plan");
        };

        assert_eq!(plan.sha, "abc123");
        assert!(plan.success);
        assert_eq!(
            plan.body(),
            "✅ Merge build was successful.\nVersion: `1.2.3+r1`\n\
             Run: [Build](https://github.com/octo/widgets/actions/runs/42)"
        );
    }

    #[test]
    fn test_plan_for_failed_build() {
        let mut run = push_run("master-2024");
        run.conclusion = Some("failure".to_string());
        let ctx = context("workflow_run", Some(run));

        let Decision::Comment(plan) = plan_comment(&inputs("2.0.0"), &ctx, "master") else {
            panic!("expected a comment plan");
        };
        assert!(!plan.success);
        assert!(plan.body().starts_with("❌ Merge build has failed.\nVersion: `2.0.0`"));
    }

    #[test]
    fn test_plan_for_dispatch_uses_input_sha_and_run_id() {
        let mut ctx = context("workflow_dispatch", None);
        ctx.run_id = Some(99);
        let inputs = CommentInputs {
            version: Some("1.0.0".to_string()),
            sha: Some("def456".to_string()),
        };

        let Decision::Comment(plan) = plan_comment(&inputs, &ctx, "master") else {
            panic!("expected a comment plan");
        };
        assert_eq!(plan.sha, "def456");
        assert!(!plan.success);
        assert_eq!(
            plan.run,
            Some(RunLink {
                name: "test".to_string(),
                url: "https://github.com/octo/widgets/actions/runs/99".to_string(),
            })
        );
    }

    #[test]
    fn test_plan_without_run_id_has_no_link() {
        let ctx = context("workflow_dispatch", None);
        let inputs = CommentInputs {
            version: Some("1.0.0".to_string()),
            sha: Some("def456".to_string()),
        };

        let Decision::Comment(plan) = plan_comment(&inputs, &ctx, "master") else {
            panic!("expected a comment plan");
        };
        assert_eq!(plan.run, None);
        assert!(!plan.body().contains("Run:"));
    }

    #[test]
    fn test_custom_release_branch() {
        let ctx = context("workflow_run", Some(push_run("main")));
        assert!(matches!(
            plan_comment(&inputs("1.0.0"), &ctx, "main"),
            Decision::Comment(_)
        ));
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(SkipReason::NoVersion.to_string(), "No version found");
        assert_eq!(SkipReason::NoPullRequest.to_string(), "No PR found");
    }
}
