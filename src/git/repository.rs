use crate::error::{ActionError, Result};
use crate::git::TagSource;
use git2::Repository as Git2Repo;
use std::path::Path;
use tracing::debug;

/// Lists tags of a repository opened through libgit2
pub struct Git2TagSource {
    repo: Git2Repo,
}

impl Git2TagSource {
    /// Open or discover a git repository at or above `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(ActionError::tag_fetch)?;
        debug!(path = %repo.path().display(), "Opened git repository");

        Ok(Git2TagSource { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2TagSource { repo }
    }
}

impl TagSource for Git2TagSource {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None).map_err(ActionError::tag_fetch)?;
        let tags: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        debug!(tags = ?tags, "Git tags");

        Ok(tags)
    }
}
