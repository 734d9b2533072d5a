//! Append-only run log
//!
//! One line per processed paper: `[YYYY-MM-DD HH:MM:SS] <message>`. The only
//! thing ever read back is the date of the last line, which feeds the
//! decision engine. Skipped runs never write here.

use crate::error::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(\d{4}-\d{2}-\d{2})").expect("static regex"))
}

#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Date of the most recent entry, if the log exists and its last line
    /// starts with a bracketed date
    pub fn last_run_date(&self) -> Option<NaiveDate> {
        let content = fs::read_to_string(&self.path).ok()?;
        parse_entry_date(content.lines().last()?)
    }

    /// Append an entry stamped with the current local time
    pub fn append(&self, message: &str) -> Result<()> {
        self.append_at(Local::now().naive_local(), message)
    }

    pub fn append_at(&self, at: NaiveDateTime, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message)?;
        Ok(())
    }
}

fn parse_entry_date(line: &str) -> Option<NaiveDate> {
    let caps = date_pattern().captures(line)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}
