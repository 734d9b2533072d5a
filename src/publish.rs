//! Git publishing: `add .`, `commit`, `push`
//!
//! Steps run in order and stop at the first failure. The caller logs the
//! error and carries on; nothing is rolled back.

use crate::error::{Error, Result};
use crate::utils::truncate_chars;
use std::path::PathBuf;
use std::process::Command;

/// Characters of the paper title kept in the commit message
const COMMIT_TITLE_CHARS: usize = 30;

pub trait Publisher {
    fn publish(&self, title: &str) -> Result<()>;
}

pub fn commit_message(title: &str) -> String {
    format!("Added notes for: {}...", truncate_chars(title, COMMIT_TITLE_CHARS))
}

pub struct GitPublisher {
    repo_dir: PathBuf,
    push: bool,
}

impl GitPublisher {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            push: true,
        }
    }

    /// Commit locally but never push
    pub fn without_push(mut self) -> Self {
        self.push = false;
        self
    }

    fn git(&self, step: &'static str, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| Error::Git {
                command: step,
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git {
                command: step,
                detail: format!("{} ({})", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, title: &str) -> Result<()> {
        self.git("add", &["add", "."])?;
        self.git("commit", &["commit", "-m", &commit_message(title)])?;
        if self.push {
            self.git("push", &["push"])?;
            tracing::info!("Git push successful.");
        } else {
            tracing::info!("committed, push disabled");
        }
        Ok(())
    }
}
