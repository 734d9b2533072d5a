//! One invocation: decide, then work through the day's papers.
//!
//! Each unit of work fetches a listing, writes a note, appends to the run
//! log and publishes. A failed unit is reported and counted, never retried.
//! Between successful units (but not after the last) the run pauses for a
//! random interval so commits don't land back to back.

use crate::decision::{decide, Decision};
use crate::notes::NoteBuilder;
use crate::publish::Publisher;
use crate::run_log::RunLog;
use crate::settings::{Config, CATEGORIES};
use chrono::NaiveDate;
use rand::{Rng, RngCore};
use std::time::Duration;

/// What a run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub decision: Decision,
    /// Notes written (and logged) this run
    pub produced: Vec<String>,
    /// Units that found nothing or failed
    pub failed: u32,
}

impl RunReport {
    pub fn skipped(&self) -> bool {
        self.decision.work_units() == 0
    }
}

pub struct Agenda<'a> {
    config: &'a Config,
    builder: NoteBuilder<'a>,
    publisher: &'a dyn Publisher,
    run_log: RunLog,
    sleep: Box<dyn FnMut(Duration) + 'a>,
}

impl<'a> Agenda<'a> {
    pub fn new(config: &'a Config, builder: NoteBuilder<'a>, publisher: &'a dyn Publisher) -> Self {
        Self {
            config,
            builder,
            publisher,
            run_log: RunLog::new(config.run_log_path()),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the pause between papers (tests record instead of sleeping)
    pub fn with_sleep(mut self, sleep: impl FnMut(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn run(&mut self, today: NaiveDate, rng: &mut dyn RngCore) -> RunReport {
        let decision = decide(self.run_log.last_run_date(), today, rng);
        tracing::info!("{}", decision);

        let mut report = RunReport {
            decision,
            produced: Vec::new(),
            failed: 0,
        };

        let target = decision.work_units();
        if target == 0 {
            // no log entry on purpose: the next run must still see the gap
            tracing::info!("Skipped run (Decision Engine).");
            return report;
        }

        tracing::info!("Starting work... Target: {} papers.", target);
        for i in 0..target {
            match self.work_once(rng) {
                Some(title) => {
                    report.produced.push(title);
                    tracing::info!("Commit {}/{} done.", i + 1, target);
                    if i + 1 < target {
                        self.pause(rng);
                    }
                }
                None => {
                    report.failed += 1;
                    tracing::warn!("Could not find new paper or error occurred.");
                }
            }
        }
        report
    }

    /// Build one note, log it, publish it. Returns the paper title.
    fn work_once(&self, rng: &mut dyn RngCore) -> Option<String> {
        let categories: Vec<&str> = CATEGORIES.iter().map(|(code, _)| *code).collect();

        let note = match self.builder.build_next(&categories, rng) {
            Ok(Some(note)) => note,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("failed to write note: {}", e);
                return None;
            }
        };

        let title = note.candidate.title;
        if let Err(e) = self.run_log.append(&format!("Processed: {}", title)) {
            tracing::error!(path = %self.run_log.path().display(), "failed to append run log: {}", e);
        }
        if let Err(e) = self.publisher.publish(&title) {
            tracing::error!("Git Error: {}", e);
        }
        Some(title)
    }

    fn pause(&mut self, rng: &mut dyn RngCore) {
        let secs = rng.gen_range(self.config.pause_secs.clone());
        tracing::info!("Thinking for {} seconds...", secs);
        (self.sleep)(Duration::from_secs(secs));
    }
}
