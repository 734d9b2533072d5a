//! Error type shared by every component.
//!
//! Nothing here is fatal to a run: the fetcher, note builder and publisher
//! each catch these at their boundary and degrade to a logged outcome.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse Atom feed: {0}")]
    Feed(String),

    #[error("not a PDF: {0}")]
    NotPdf(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("{0}")]
    Summarize(String),

    #[error("git {command} failed: {detail}")]
    Git { command: &'static str, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
