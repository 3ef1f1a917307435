//! Tag listing abstraction
//!
//! Revision resolution only needs the names of the tags that already exist.
//! The [TagSource] trait hides where they come from:
//!
//! - [repository::Git2TagSource]: reads tags through libgit2
//! - [command::GitCommandTagSource]: runs the `git` binary
//! - [mock::StaticTagSource]: a fixed list, for tests
//!
//! ```rust
//! # use version_actions::git::{StaticTagSource, TagSource};
//! let source = StaticTagSource::new(["1.2.3+r1"]);
//! assert_eq!(source.list_tags().unwrap(), vec!["1.2.3+r1".to_string()]);
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCommandTagSource;
pub use mock::StaticTagSource;
pub use repository::Git2TagSource;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supplies the tag names already present in a repository.
///
/// Implementations report I/O failures as [crate::error::ActionError::TagFetch].
/// Order is not significant.
pub trait TagSource {
    fn list_tags(&self) -> Result<Vec<String>>;
}

impl<T: TagSource + ?Sized> TagSource for Box<T> {
    fn list_tags(&self) -> Result<Vec<String>> {
        (**self).list_tags()
    }
}

/// Which tag source implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TagBackend {
    /// libgit2 via the `git2` crate
    #[default]
    Libgit2,
    /// The `git` executable on `PATH`
    GitCli,
}

/// Build the tag source for a backend, rooted at `path`.
pub fn open_tag_source(backend: TagBackend, path: &Path) -> Result<Box<dyn TagSource>> {
    Ok(match backend {
        TagBackend::Libgit2 => Box::new(Git2TagSource::open(path)?),
        TagBackend::GitCli => Box::new(GitCommandTagSource::new(path)),
    })
}
