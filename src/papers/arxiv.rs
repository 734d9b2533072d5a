//! arXiv listing and PDF download
//!
//! Listing: Atom feed from the export API, newest submissions first.
//! PDFs: `/abs/` link rewritten to `/pdf/...pdf`, fetched with a browser UA.
//! No API key required.

use super::pdf_extractor::extract_text_from_pdf;
use super::{Candidate, Extraction, PaperSource};
use crate::error::{Error, Result};
use crate::settings::Config;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;
use std::time::Duration;

/// Largest PDF we are willing to parse (20MB)
const MAX_PDF_BYTES: usize = 20 * 1024 * 1024;

pub struct ArxivClient {
    client: Client,
    endpoint: String,
    max_results: u32,
    user_agent: String,
}

impl ArxivClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.arxiv_endpoint.clone(),
            max_results: config.max_results,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Download PDF bytes for a candidate
    pub fn download_pdf(&self, candidate: &Candidate) -> Result<Vec<u8>> {
        let url = candidate.pdf_url();
        tracing::debug!(%url, "downloading PDF");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Status {
                service: "arXiv",
                status: response.status(),
            });
        }

        let bytes = response.bytes()?.to_vec();
        validate_pdf(&bytes)?;
        Ok(bytes)
    }
}

impl PaperSource for ArxivClient {
    fn list_recent(&self, category: &str) -> Result<Vec<Candidate>> {
        let search_query = format!("cat:{}", category);
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Status {
                service: "arXiv",
                status: response.status(),
            });
        }

        parse_feed(&response.text()?, category)
    }

    fn document_text(&self, candidate: &Candidate, max_pages: usize) -> Extraction {
        match self
            .download_pdf(candidate)
            .and_then(|bytes| extract_text_from_pdf(&bytes, max_pages))
        {
            Ok(text) => Extraction::Text(text),
            Err(e) => {
                tracing::warn!(title = %candidate.title, "{}", e);
                Extraction::Failed(e.to_string())
            }
        }
    }
}

/// Check magic bytes and size limit
fn validate_pdf(bytes: &[u8]) -> Result<()> {
    if !bytes.starts_with(b"%PDF") {
        return Err(Error::NotPdf("response is not a valid PDF".to_string()));
    }
    if bytes.len() > MAX_PDF_BYTES {
        return Err(Error::NotPdf(format!(
            "PDF too large: {} MB",
            bytes.len() / 1024 / 1024
        )));
    }
    Ok(())
}

/// Fields of the `<entry>` currently being read
#[derive(Default)]
struct EntryFields {
    title: Option<String>,
    published: Option<String>,
    id: Option<String>,
}

impl EntryFields {
    fn into_candidate(self, category: &str) -> Option<Candidate> {
        let title = self.title?.replace('\n', " ").trim().to_string();
        let published: String = self.published?.trim().chars().take(10).collect();
        let link = self.id?.trim().to_string();
        if title.is_empty() || link.is_empty() {
            return None;
        }
        Some(Candidate {
            title,
            published,
            link,
            category: category.to_string(),
        })
    }
}

/// Parse an arXiv Atom feed into candidates tagged with `category`.
///
/// Entries lacking a title, published date or id are dropped. Feed-level
/// `<title>`/`<id>` elements are ignored.
pub fn parse_feed(body: &str, category: &str) -> Result<Vec<Candidate>> {
    let mut reader = Reader::from_str(body);
    let mut candidates = Vec::new();
    let mut entry: Option<EntryFields> = None;
    let mut field: Option<&'static str> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => entry = Some(EntryFields::default()),
                b"title" if entry.is_some() => field = Some("title"),
                b"published" if entry.is_some() => field = Some("published"),
                b"id" if entry.is_some() => field = Some("id"),
                _ => {}
            },
            Ok(Event::Text(t)) if field.is_some() => {
                let unescaped = t.unescape().map_err(|e| Error::Feed(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(c)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"entry" {
                    if let Some(fields) = entry.take() {
                        candidates.extend(fields.into_candidate(category));
                    }
                } else if let (Some(current), Some(fields)) = (field, entry.as_mut()) {
                    if name.as_ref() == current.as_bytes() {
                        let value = std::mem::take(&mut text);
                        match current {
                            "title" => fields.title = Some(value),
                            "published" => fields.published = Some(value),
                            _ => fields.id = Some(value),
                        }
                        field = None;
                    }
                }
            }
            Err(e) => {
                return Err(Error::Feed(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(candidates)
}
