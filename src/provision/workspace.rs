//! Scoped temporary directory on the target host

use crate::error::Result;
use crate::utils::exec::CommandOperator;
use crate::utils::string::{random_suffix, shell_escape};

const SUFFIX_LEN: usize = 6;

/// Temporary directory created on the target for one workflow run.
///
/// `rm -rf` is issued exactly once when the workspace is dropped, on every
/// exit path including panics. Removal failures are logged, never returned.
pub struct Workspace<'a> {
    op: &'a dyn CommandOperator,
    dir: String,
}

impl<'a> Workspace<'a> {
    /// Create `/tmp/<prefix>.<random>` together with the given subdirectories.
    ///
    /// If `mkdir` fails nothing is scheduled for removal.
    pub fn create(op: &'a dyn CommandOperator, prefix: &str, subdirs: &[&str]) -> Result<Self> {
        let dir = format!("/tmp/{}.{}", prefix, random_suffix(SUFFIX_LEN));

        let mut command = String::from("mkdir -p");
        if subdirs.is_empty() {
            command.push(' ');
            command.push_str(&shell_escape(&dir));
        }
        for sub in subdirs {
            command.push(' ');
            command.push_str(&shell_escape(&format!("{}/{}", dir, sub)));
        }

        op.execute(&command)?;
        tracing::debug!(dir = %dir, "workspace created");
        Ok(Self { op, dir })
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Absolute path of `relative` inside the workspace
    pub fn path(&self, relative: &str) -> String {
        format!("{}/{}", self.dir, relative.trim_start_matches('/'))
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        let command = format!("rm -rf {}", shell_escape(&self.dir));
        match self.op.execute(&command) {
            Ok(_) => tracing::debug!(dir = %self.dir, "workspace removed"),
            Err(e) => tracing::warn!(dir = %self.dir, error = %e, "failed to remove workspace"),
        }
    }
}
