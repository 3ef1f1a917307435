use crate::error::{ActionError, Result};
use crate::git::TagSource;

/// In-memory tag source for testing without a repository
#[derive(Debug, Clone, Default)]
pub struct StaticTagSource {
    tags: Vec<String>,
    failure: Option<String>,
}

impl StaticTagSource {
    /// Create a source that returns the given tags
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticTagSource {
            tags: tags.into_iter().map(Into::into).collect(),
            failure: None,
        }
    }

    /// Create a source whose listing always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        StaticTagSource {
            tags: Vec::new(),
            failure: Some(message.into()),
        }
    }

    /// Add a tag to the source
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }
}

impl TagSource for StaticTagSource {
    fn list_tags(&self) -> Result<Vec<String>> {
        match &self.failure {
            Some(message) => Err(ActionError::tag_fetch(message.clone())),
            None => Ok(self.tags.clone()),
        }
    }
}
