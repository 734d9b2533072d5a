pub mod agenda;
pub mod ai_client;
pub mod decision;
pub mod error;
pub mod logging;
pub mod notes;
pub mod papers;
pub mod publish;
pub mod run_log;
pub mod settings;
pub mod utils;

pub use agenda::{Agenda, RunReport};
pub use error::{Error, Result};
pub use settings::Config;
