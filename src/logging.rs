//! Diagnostic logging
//!
//! Everything goes to stderr through `tracing`. `RUST_LOG` overrides the
//! level; the default is `info` for this crate and `warn` for dependencies.
//! The run log in the repository is separate (see `run_log`).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,paperdrip=info,paperdrip_lib=info";

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,paperdrip=debug,paperdrip_lib=debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
