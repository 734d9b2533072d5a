//! Run configuration
//!
//! Built once at process start and handed to every collaborator. There is no
//! config file: defaults cover everything except the Gemini credential, which
//! comes from the environment (or the CLI).

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// arXiv categories a run may draw from, with the label written into notes
pub const CATEGORIES: &[(&str, &str)] = &[
    ("cs.CV", "Computer Vision"),
    ("cs.AI", "Artificial Intelligence"),
    ("cs.LG", "Machine Learning"),
    ("cs.CL", "NLP"),
    ("cs.RO", "Robotics"),
    ("cs.CR", "Cryptography"),
    ("cs.SE", "Software Engineering"),
];

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Display label for a category code; unknown codes label as themselves
pub fn category_label(code: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Gemini credentials. Its absence from [`Config`] disables summarization.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name (default: "gemini-2.5-flash")
    pub model: String,
    /// API base URL, overridable for testing against a local server
    pub endpoint: String,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: default_gemini_model(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Git working tree everything else is relative to (default: ".")
    pub repo_dir: PathBuf,
    /// Notes directory, relative to `repo_dir` (default: "papers")
    pub notes_dir: PathBuf,
    /// Append-only run log, relative to `repo_dir` (default: "run_log.txt")
    pub run_log: PathBuf,
    /// `None` = summarization disabled
    pub gemini: Option<GeminiConfig>,
    /// arXiv listing endpoint
    pub arxiv_endpoint: String,
    /// Entries requested per listing (default: 50)
    pub max_results: u32,
    /// PDF pages fed to extraction (default: 6)
    pub max_pages: usize,
    /// Extracted text must be longer than this to be summarized (default: 500)
    pub min_text_chars: usize,
    /// Characters of extracted text sent to the model (default: 40000)
    pub max_prompt_chars: usize,
    /// Seconds to pause between papers in a burst (default: 120..=600)
    pub pause_secs: RangeInclusive<u64>,
    /// User-Agent for PDF downloads (default: "Mozilla/5.0")
    pub user_agent: String,
    /// Fixed RNG seed; `None` uses the thread RNG
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            notes_dir: PathBuf::from("papers"),
            run_log: PathBuf::from("run_log.txt"),
            gemini: None,
            arxiv_endpoint: "http://export.arxiv.org/api/query".to_string(),
            max_results: 50,
            max_pages: 6,
            min_text_chars: 500,
            max_prompt_chars: 40_000,
            pause_secs: 120..=600,
            user_agent: "Mozilla/5.0".to_string(),
            seed: None,
        }
    }
}

impl Config {
    /// Defaults plus whatever the environment provides.
    ///
    /// Optional:
    /// - `GEMINI_API_KEY`: enables summarization (empty counts as unset)
    /// - `GEMINI_MODEL`: overrides the model name
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.gemini = gemini_from_parts(
            std::env::var(GEMINI_API_KEY_ENV).ok(),
            std::env::var(GEMINI_MODEL_ENV).ok(),
        );
        config
    }

    pub fn notes_path(&self) -> PathBuf {
        self.repo_dir.join(&self.notes_dir)
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.repo_dir.join(&self.run_log)
    }

    pub fn summarization_enabled(&self) -> bool {
        self.gemini.is_some()
    }
}

/// Assemble Gemini settings from an optional key and model override
pub fn gemini_from_parts(api_key: Option<String>, model: Option<String>) -> Option<GeminiConfig> {
    let key = api_key.filter(|k| !k.trim().is_empty())?;
    let mut gemini = GeminiConfig::new(key);
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        gemini.model = model;
    }
    Some(gemini)
}
