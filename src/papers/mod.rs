//! Paper listing and document text
//!
//! This module provides:
//! - `Candidate`: one listing entry considered for a note
//! - `PaperSource`: where listings and document text come from (arXiv in
//!   production, fakes in tests)
//! - `fetch_candidates`: random category, shuffled listing, never fails

pub mod arxiv;
pub mod pdf_extractor;

use crate::error::Result;
use rand::seq::SliceRandom;
use rand::RngCore;

/// Placeholder text used when a document could not be downloaded or read
pub const EXTRACTION_FAILED: &str = "PDF Extraction failed.";

/// A single listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Single-line title
    pub title: String,
    /// Publication date, `YYYY-MM-DD`
    pub published: String,
    /// Abstract page URL (the Atom `id`)
    pub link: String,
    /// Category code the listing was queried with
    pub category: String,
}

impl Candidate {
    /// PDF URL derived from the abstract link
    pub fn pdf_url(&self) -> String {
        self.link.replace("/abs/", "/pdf/") + ".pdf"
    }
}

/// Outcome of pulling text out of a candidate's document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Failed(String),
}

impl Extraction {
    /// Text as fed to summarization; failures read as the placeholder
    pub fn text(&self) -> &str {
        match self {
            Extraction::Text(text) => text,
            Extraction::Failed(_) => EXTRACTION_FAILED,
        }
    }
}

pub trait PaperSource {
    /// Most recent entries for a category, newest first
    fn list_recent(&self, category: &str) -> Result<Vec<Candidate>>;

    /// Text of the first `max_pages` pages of the candidate's document
    fn document_text(&self, candidate: &Candidate, max_pages: usize) -> Extraction;
}

/// Pick a category, list it, shuffle.
///
/// Any listing error is logged and comes back as an empty list, which the
/// caller treats the same as "nothing new".
pub fn fetch_candidates(
    source: &dyn PaperSource,
    categories: &[&str],
    rng: &mut dyn RngCore,
) -> Vec<Candidate> {
    let Some(category) = categories.choose(rng) else {
        tracing::warn!("no categories configured");
        return Vec::new();
    };

    match source.list_recent(category) {
        Ok(mut candidates) => {
            tracing::debug!(category = *category, count = candidates.len(), "listing fetched");
            candidates.shuffle(rng);
            candidates
        }
        Err(e) => {
            tracing::warn!(category = *category, "ArXiv Error: {}", e);
            Vec::new()
        }
    }
}
