mod app;
mod effects;
mod logging;
mod persistence;
mod ui;

use std::path::PathBuf;

use clap::Parser;

pub use app::run_app;
pub use logging::LogDestination;

/// Terminal client for the letters service.
#[derive(Debug, Parser)]
#[command(name = "letters", version, about)]
pub struct Args {
    /// Base URL of the letters API.
    #[arg(long, env = "LETTERS_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// Where the login session is kept between runs.
    #[arg(long, default_value = "./.letters_session.ron")]
    pub session_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Log at debug level.
    #[arg(long)]
    pub verbose: bool,
}
