use crate::error::{ActionError, Result};
use crate::git::TagSource;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Lists tags by running the `git` executable
pub struct GitCommandTagSource {
    work_dir: PathBuf,
}

impl GitCommandTagSource {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        GitCommandTagSource {
            work_dir: work_dir.into(),
        }
    }

    /// Top level directory of the repository containing the work dir
    pub fn top_level_dir(&self) -> Result<PathBuf> {
        let output = run_git(&self.work_dir, &["rev-parse", "--show-toplevel"])?;
        let top_level = PathBuf::from(output.trim());
        debug!(path = %top_level.display(), "Git repo top level");

        Ok(top_level)
    }
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<String> {
    debug!("Running: 'git {}'", args.join(" "));

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(ActionError::tag_fetch)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ActionError::tag_fetch(format!(
            "git {} failed with exit code {}: {}",
            args.join(" "),
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split `git tag -l` output into tag names, dropping blank lines
pub fn parse_tag_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl TagSource for GitCommandTagSource {
    fn list_tags(&self) -> Result<Vec<String>> {
        let top_level = self.top_level_dir()?;
        let output = run_git(&top_level, &["tag", "-l"])?;
        debug!("Git tags:\n{}", output);

        Ok(parse_tag_listing(&output))
    }
}
