use crate::error::{ActionError, Result};
use serde::Deserialize;
use std::env;
use std::fs;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// The `workflow_run` object of a workflow_run event payload
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WorkflowRun {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    /// Event that triggered the watched run, e.g. `push`
    #[serde(default)]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub html_url: Option<String>,
}

/// The parts of the event payload the commenter reads
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EventPayload {
    #[serde(default)]
    pub workflow_run: Option<WorkflowRun>,
    #[serde(default)]
    pub repository: Option<RepositoryInfo>,
}

impl EventPayload {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Runner-provided description of the current workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowContext {
    pub event_name: String,
    pub run_id: Option<u64>,
    pub owner: String,
    pub repo: String,
    pub server_url: String,
    pub api_url: Option<String>,
    pub payload: EventPayload,
}

/// Split `owner/repo`
pub fn parse_repository(full_name: &str) -> Result<(String, String)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ActionError::context(format!(
            "Invalid repository '{}', expected owner/repo",
            full_name
        ))),
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl WorkflowContext {
    pub fn new(
        event_name: impl Into<String>,
        repository: &str,
        payload: EventPayload,
    ) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;

        Ok(WorkflowContext {
            event_name: event_name.into(),
            run_id: None,
            owner,
            repo,
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_url: None,
            payload,
        })
    }

    /// Build the context from the `GITHUB_*` variables the runner exports.
    pub fn from_env() -> Result<Self> {
        let repository = env_non_empty("GITHUB_REPOSITORY")
            .ok_or_else(|| ActionError::context("GITHUB_REPOSITORY is not set"))?;

        let payload = match env_non_empty("GITHUB_EVENT_PATH") {
            Some(path) => {
                let text = fs::read_to_string(&path).map_err(|e| {
                    ActionError::context(format!("Cannot read event payload '{}': {}", path, e))
                })?;
                EventPayload::from_json(&text)?
            }
            None => EventPayload::default(),
        };

        let mut context = WorkflowContext::new(
            env_non_empty("GITHUB_EVENT_NAME").unwrap_or_default(),
            &repository,
            payload,
        )?;
        context.run_id = env_non_empty("GITHUB_RUN_ID").and_then(|id| id.parse().ok());
        if let Some(server_url) = env_non_empty("GITHUB_SERVER_URL") {
            context.server_url = server_url;
        }
        context.api_url = env_non_empty("GITHUB_API_URL");

        Ok(context)
    }

    pub fn workflow_run(&self) -> Option<&WorkflowRun> {
        self.payload.workflow_run.as_ref()
    }

    /// Repository web URL, from the payload when present
    pub fn repo_url(&self) -> String {
        self.payload
            .repository
            .as_ref()
            .and_then(|r| r.html_url.clone())
            .unwrap_or_else(|| format!("{}/{}/{}", self.server_url, self.owner, self.repo))
    }
}
