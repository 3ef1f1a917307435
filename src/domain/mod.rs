//! Domain logic - version parsing, formatting and revision assignment

pub mod revision;
pub mod version;

pub use revision::{
    existing_versions, next_revision, resolve_revision, FIRST_REVISION, MAX_ATTEMPTS,
};
pub use version::Version;
