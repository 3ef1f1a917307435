//! next-version workflow
//!
//! Resolves the action inputs, parses the current version and assigns a
//! revision that no existing tag uses. Kept apart from `main.rs` so it can be
//! driven with any [TagSource].

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::actions;
use crate::config::VersionConfig;
use crate::domain::{next_revision, Version};
use crate::git::TagSource;

pub const CURRENT_VERSION_KEY: &str = "current-version";
pub const REVISION_PREFIX_KEY: &str = "revision-prefix";
pub const OVERRIDE_STAGE_KEY: &str = "override-stage";
pub const TAG_SOURCE_KEY: &str = "tag-source";
pub const NEXT_VERSION_KEY: &str = "next-version";

/// Inputs for the next-version workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NextVersionArgs {
    /// Version to start from, e.g. `1.2.3-beta`
    pub current_version: String,

    /// Revision label used when the current version carries none
    pub revision_prefix: Option<String>,

    /// Stage that replaces the parsed one
    pub override_stage: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl NextVersionArgs {
    /// Merge explicit values, action inputs and config, in that order.
    pub fn resolve(
        current_version: Option<String>,
        revision_prefix: Option<String>,
        override_stage: Option<String>,
        config: &VersionConfig,
    ) -> Result<Self> {
        let current_version = match non_empty(current_version) {
            Some(value) => value,
            None => actions::get_required_input(CURRENT_VERSION_KEY)?,
        };
        debug!("{}: {}", CURRENT_VERSION_KEY, current_version);

        let revision_prefix = non_empty(revision_prefix)
            .or_else(|| actions::get_input(REVISION_PREFIX_KEY))
            .or_else(|| non_empty(config.revision_prefix.clone()));
        debug!("{}: {:?}", REVISION_PREFIX_KEY, revision_prefix);

        let override_stage = non_empty(override_stage)
            .or_else(|| actions::get_input(OVERRIDE_STAGE_KEY))
            .or_else(|| non_empty(config.override_stage.clone()));
        debug!("{}: {:?}", OVERRIDE_STAGE_KEY, override_stage);

        Ok(NextVersionArgs {
            current_version,
            revision_prefix,
            override_stage,
        })
    }
}

/// Outcome of a successful next-version run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The input version as given
    pub current: String,

    /// The computed version with a unique revision
    pub next: Version,
}

/// Compute the next version against the tags supplied by `source`.
pub fn run_next_version<T: TagSource + ?Sized>(
    args: &NextVersionArgs,
    source: &T,
) -> Result<WorkflowResult> {
    let prefix = args.revision_prefix.as_deref();

    let version = Version::parse_with(
        &args.current_version,
        prefix,
        args.override_stage.as_deref(),
    )
    .with_context(|| format!("Failed to parse current version '{}'", args.current_version))?;

    let next = next_revision(&version, source, prefix)
        .with_context(|| format!("Failed to compute next version for '{}'", version))?;

    info!("{}: {}", NEXT_VERSION_KEY, next);

    Ok(WorkflowResult {
        current: args.current_version.clone(),
        next,
    })
}
