//! paperdrip - sporadic arXiv reading notes
//!
//! Usage: paperdrip [OPTIONS]
//!
//! Meant to run once a day from a scheduler inside a git checkout. With no
//! options it rolls for today's workload, writes notes under `papers/`,
//! appends to `run_log.txt` and pushes each note. Set `GEMINI_API_KEY` to
//! get summaries.

use chrono::Local;
use clap::Parser;
use paperdrip_lib::ai_client::{GeminiClient, Summarizer};
use paperdrip_lib::notes::NoteBuilder;
use paperdrip_lib::papers::arxiv::ArxivClient;
use paperdrip_lib::publish::GitPublisher;
use paperdrip_lib::{logging, Agenda, Config};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "paperdrip", version, about = "Sporadic arXiv reading notes, summarized and pushed to git")]
struct Cli {
    /// Git checkout to write notes into
    #[arg(long, default_value = ".")]
    repo_dir: PathBuf,

    /// Seed the RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Don't wait between papers on burst days
    #[arg(long)]
    no_pause: bool,

    /// Commit but don't push
    #[arg(long)]
    no_push: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer the flags over `config`; absent flags leave it untouched
    fn apply(&self, mut config: Config) -> Config {
        config.repo_dir = self.repo_dir.clone();
        config.seed = self.seed;
        if self.no_pause {
            config.pause_secs = 0..=0;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = cli.apply(Config::from_env());

    tracing::debug!(
        repo_dir = %config.repo_dir.display(),
        summaries = config.summarization_enabled(),
        seed = ?config.seed,
        "configuration loaded"
    );

    let arxiv = match ArxivClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to create HTTP client, nothing done today: {}", e);
            return;
        }
    };

    let gemini = config.gemini.clone().and_then(|gemini| match GeminiClient::new(gemini) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("summaries disabled: {}", e);
            None
        }
    });
    let summarizer = gemini.as_ref().map(|client| client as &dyn Summarizer);

    let mut publisher = GitPublisher::new(&config.repo_dir);
    if cli.no_push {
        publisher = publisher.without_push();
    }

    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let builder = NoteBuilder::new(&config, &arxiv, summarizer);
    let mut agenda = Agenda::new(&config, builder, &publisher);
    let report = agenda.run(Local::now().date_naive(), rng.as_mut());

    if !report.skipped() {
        tracing::info!(
            produced = report.produced.len(),
            failed = report.failed,
            "run finished"
        );
    }
}
