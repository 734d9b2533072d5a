//! Markdown reading notes
//!
//! One note per paper, named `<date>_<sanitized title>.md`. The file's
//! existence is the only record that a paper was handled, so building is
//! idempotent: a candidate whose note exists is skipped without downloading
//! or summarizing anything.

use crate::ai_client::{summarize_paper, Summarizer, Summary};
use crate::error::Result;
use crate::papers::{fetch_candidates, Candidate, Extraction, PaperSource};
use crate::settings::{category_label, Config};
use rand::RngCore;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Sanitized titles are cut to this many characters
pub const MAX_TITLE_CHARS: usize = 40;

fn unsafe_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\-_\. ]").expect("static regex"))
}

/// Filesystem-safe title: only word chars, `-`, `_`, `.` and spaces survive,
/// spaces become underscores, at most 40 characters
pub fn sanitize_title(title: &str) -> String {
    unsafe_chars()
        .replace_all(title, "")
        .replace(' ', "_")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// `<dir>/<date>_<sanitized title>.md`
pub fn note_path(dir: &Path, candidate: &Candidate) -> PathBuf {
    dir.join(format!(
        "{}_{}.md",
        candidate.published,
        sanitize_title(&candidate.title)
    ))
}

/// Note body
pub fn render_note(candidate: &Candidate, summary: &Summary) -> String {
    format!(
        "# {}\n\n- **Category:** {}\n- **Date:** {}\n- **Link:** {}\n\n---\n{}",
        candidate.title,
        category_label(&candidate.category),
        candidate.published,
        candidate.link,
        summary.render()
    )
}

/// A note written during this run
#[derive(Debug, Clone)]
pub struct Note {
    pub candidate: Candidate,
    pub path: PathBuf,
    pub extraction: Extraction,
    pub summary: Summary,
}

pub struct NoteBuilder<'a> {
    config: &'a Config,
    source: &'a dyn PaperSource,
    summarizer: Option<&'a dyn Summarizer>,
}

impl<'a> NoteBuilder<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn PaperSource,
        summarizer: Option<&'a dyn Summarizer>,
    ) -> Self {
        Self {
            config,
            source,
            summarizer,
        }
    }

    /// Fetch a shuffled listing and write a note for the first paper that
    /// doesn't have one yet.
    ///
    /// `Ok(None)` covers both "listing failed" and "every paper already has
    /// a note"; callers can't and needn't tell them apart.
    pub fn build_next(&self, categories: &[&str], rng: &mut dyn RngCore) -> Result<Option<Note>> {
        let notes_dir = self.config.notes_path();

        for candidate in fetch_candidates(self.source, categories, rng) {
            let path = note_path(&notes_dir, &candidate);
            if path.exists() {
                tracing::debug!(path = %path.display(), "note exists, skipping");
                continue;
            }
            return self.write_note(candidate, path).map(Some);
        }

        Ok(None)
    }

    fn write_note(&self, candidate: Candidate, path: PathBuf) -> Result<Note> {
        tracing::info!(title = %candidate.title, "reading paper");

        let extraction = self.source.document_text(&candidate, self.config.max_pages);
        let summary = summarize_paper(
            self.summarizer,
            extraction.text(),
            self.config.min_text_chars,
            self.config.max_prompt_chars,
        );

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, render_note(&candidate, &summary))?;
        tracing::info!(path = %path.display(), "note written");

        Ok(Note {
            candidate,
            path,
            extraction,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    fn candidate(title: &str, published: &str) -> Candidate {
        Candidate {
            title: title.to_string(),
            published: published.to_string(),
            link: "http://arxiv.org/abs/2501.04001v1".to_string(),
            category: "cs.LG".to_string(),
        }
    }

    struct FakeSource {
        candidates: Vec<Candidate>,
        text: Extraction,
        downloads: Cell<usize>,
    }

    impl FakeSource {
        fn new(candidates: Vec<Candidate>, text: Extraction) -> Self {
            Self { candidates, text, downloads: Cell::new(0) }
        }
    }

    impl PaperSource for FakeSource {
        fn list_recent(&self, _category: &str) -> Result<Vec<Candidate>> {
            if self.candidates.is_empty() {
                return Err(Error::Feed("offline".into()));
            }
            Ok(self.candidates.clone())
        }

        fn document_text(&self, _: &Candidate, _: usize) -> Extraction {
            self.downloads.set(self.downloads.get() + 1);
            self.text.clone()
        }
    }

    #[derive(Default)]
    struct CountingSummarizer {
        calls: RefCell<Vec<String>>,
    }

    impl Summarizer for CountingSummarizer {
        fn summarize(&self, prompt: &str) -> Result<String> {
            self.calls.borrow_mut().push(prompt.to_string());
            Ok("## Problem\nP\n## Method\nM\n## Impact\nI".to_string())
        }
    }

    fn config_in(dir: &TempDir) -> Config {
        Config {
            repo_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Deep Learning: A Survey!"), "Deep_Learning_A_Survey");
        assert_eq!(sanitize_title("a/b\\c?d*e"), "abcde");
        assert_eq!(sanitize_title("keep-these_too.v2"), "keep-these_too.v2");
        assert_eq!(sanitize_title("Über Größe"), "Über_Größe");
    }

    #[test]
    fn test_sanitize_title_truncates_after_stripping() {
        let title = "A Very Long Title That Keeps Going: With a Subtitle, Too";
        let safe = sanitize_title(title);
        assert_eq!(safe.chars().count(), 40);
        assert_eq!(safe, "A_Very_Long_Title_That_Keeps_Going_With_");
    }

    #[test]
    fn test_note_path_example() {
        let path = note_path(Path::new("papers"), &candidate("Deep Learning: A Survey!", "2025-01-09"));
        assert_eq!(path, PathBuf::from("papers/2025-01-09_Deep_Learning_A_Survey.md"));
    }

    #[test]
    fn test_render_note() {
        let note = render_note(
            &candidate("Deep Learning: A Survey!", "2025-01-09"),
            &Summary::Unavailable,
        );
        assert_eq!(
            note,
            "# Deep Learning: A Survey!\n\n- **Category:** Machine Learning\n- **Date:** 2025-01-09\n- **Link:** http://arxiv.org/abs/2501.04001v1\n\n---\nAI Summary Unavailable."
        );
    }

    #[test]
    fn test_builds_first_missing_note() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let source = FakeSource::new(
            vec![candidate("Graph Nets", "2025-01-08")],
            Extraction::Text("t".repeat(800)),
        );
        let summarizer = CountingSummarizer::default();
        let builder = NoteBuilder::new(&config, &source, Some(&summarizer));
        let mut rng = StdRng::seed_from_u64(9);

        let note = builder.build_next(&["cs.LG"], &mut rng).unwrap().unwrap();
        assert_eq!(note.path, dir.path().join("papers/2025-01-08_Graph_Nets.md"));
        assert!(matches!(note.summary, Summary::Generated(_)));
        assert_eq!(summarizer.calls.borrow().len(), 1);

        let written = fs::read_to_string(&note.path).unwrap();
        assert!(written.starts_with("# Graph Nets\n"));
        assert!(written.ends_with("## Impact\nI"));
    }

    #[test]
    fn test_existing_notes_are_never_rebuilt() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let candidates = vec![candidate("First", "2025-01-08"), candidate("Second", "2025-01-09")];
        let notes_dir = config.notes_path();
        fs::create_dir_all(&notes_dir).unwrap();
        for c in &candidates {
            fs::write(note_path(&notes_dir, c), "hand edited").unwrap();
        }

        let source = FakeSource::new(candidates.clone(), Extraction::Text("t".repeat(800)));
        let summarizer = CountingSummarizer::default();
        let builder = NoteBuilder::new(&config, &source, Some(&summarizer));
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..2 {
            assert!(builder.build_next(&["cs.LG"], &mut rng).unwrap().is_none());
        }
        assert_eq!(source.downloads.get(), 0);
        assert!(summarizer.calls.borrow().is_empty());
        for c in &candidates {
            assert_eq!(fs::read_to_string(note_path(&notes_dir, c)).unwrap(), "hand edited");
        }
    }

    #[test]
    fn test_second_build_picks_the_other_paper() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let source = FakeSource::new(
            vec![candidate("First", "2025-01-08"), candidate("Second", "2025-01-09")],
            Extraction::Failed("timeout".into()),
        );
        let builder = NoteBuilder::new(&config, &source, None);
        let mut rng = StdRng::seed_from_u64(4);

        let a = builder.build_next(&["cs.LG"], &mut rng).unwrap().unwrap();
        let b = builder.build_next(&["cs.LG"], &mut rng).unwrap().unwrap();
        assert_ne!(a.path, b.path);
        assert!(builder.build_next(&["cs.LG"], &mut rng).unwrap().is_none());
        assert_eq!(source.downloads.get(), 2);
    }

    #[test]
    fn test_short_text_gets_placeholder() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let source = FakeSource::new(vec![candidate("Tiny", "2025-01-09")], Extraction::Text("s".repeat(500)));
        let summarizer = CountingSummarizer::default();
        let builder = NoteBuilder::new(&config, &source, Some(&summarizer));
        let mut rng = StdRng::seed_from_u64(1);

        let note = builder.build_next(&["cs.LG"], &mut rng).unwrap().unwrap();
        assert_eq!(note.summary, Summary::Unavailable);
        assert!(summarizer.calls.borrow().is_empty());
        assert!(fs::read_to_string(&note.path).unwrap().ends_with("AI Summary Unavailable."));
    }

    #[test]
    fn test_failed_extraction_skips_summary() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let source = FakeSource::new(vec![candidate("Scanned", "2025-01-09")], Extraction::Failed("image-only".into()));
        let summarizer = CountingSummarizer::default();
        let builder = NoteBuilder::new(&config, &source, Some(&summarizer));
        let mut rng = StdRng::seed_from_u64(1);

        let note = builder.build_next(&["cs.LG"], &mut rng).unwrap().unwrap();
        assert_eq!(note.extraction, Extraction::Failed("image-only".into()));
        assert_eq!(note.summary, Summary::Unavailable);
        assert!(summarizer.calls.borrow().is_empty());
    }

    #[test]
    fn test_listing_failure_builds_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let source = FakeSource::new(Vec::new(), Extraction::Text(String::new()));
        let builder = NoteBuilder::new(&config, &source, None);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(builder.build_next(&["cs.LG"], &mut rng).unwrap().is_none());
        assert!(!config.notes_path().exists());
    }
}
