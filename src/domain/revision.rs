//! Revision assignment: picks the lowest revision at or above the current one
//! whose rendered version is not already taken by an existing tag.

use crate::domain::version::Version;
use crate::error::{ActionError, Result};
use crate::git::TagSource;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Revision given to a version that has none yet
pub const FIRST_REVISION: u64 = 1;

/// Upper bound on candidates checked before giving up
pub const MAX_ATTEMPTS: usize = 1000;

/// Parse tags into canonical version strings, skipping tags that are not versions.
///
/// Tags without build metadata pick up `default_prefix` as their label, the same
/// way the current version does, so both sides render identically.
pub fn existing_versions<S: AsRef<str>>(
    tags: &[S],
    default_prefix: Option<&str>,
) -> HashSet<String> {
    tags.iter()
        .filter_map(|tag| {
            let tag: &str = tag.as_ref();
            match Version::parse_with(tag, default_prefix, None) {
                Ok(version) => Some(version.to_string()),
                Err(e) => {
                    warn!(tag, error = %e, "Ignoring invalid tag");
                    None
                }
            }
        })
        .collect()
}

/// Find the first revision whose rendered version is not in `existing`.
///
/// Returns a new version; `version` itself is left untouched. An unset
/// revision starts at [`FIRST_REVISION`], and a colliding revision of 0 moves
/// to the floor rather than to 1 by increment.
///
/// # Errors
/// `ResolutionExhausted` when [`MAX_ATTEMPTS`] consecutive candidates collide,
/// or earlier when the revision would overflow. `attempts` is the number of
/// candidates actually checked.
pub fn resolve_revision(version: &Version, existing: &HashSet<String>) -> Result<Version> {
    let mut candidate = version.clone();
    let mut revision = candidate.revision.unwrap_or(FIRST_REVISION);
    let mut attempts = 0;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;
        candidate.revision = Some(revision);
        let rendered = candidate.to_string();
        if !existing.contains(&rendered) {
            debug!(version = %rendered, "Resolved unique revision");
            return Ok(candidate);
        }

        revision = match revision {
            0 => FIRST_REVISION,
            n => match n.checked_add(1) {
                Some(next) => next,
                None => break,
            },
        };
    }

    Err(ActionError::ResolutionExhausted {
        version: version.to_string(),
        attempts,
    })
}

/// Fetch the repository tags once and resolve a unique revision against them.
pub fn next_revision<T: TagSource + ?Sized>(
    version: &Version,
    source: &T,
    default_prefix: Option<&str>,
) -> Result<Version> {
    let tags = source.list_tags()?;
    debug!(count = tags.len(), "Fetched existing tags");

    let existing = existing_versions(&tags, default_prefix);
    resolve_revision(version, &existing)
}
