pub mod config;
pub mod error;
pub mod fs;
pub mod stock;
pub(crate) mod tui;

pub use config::Config;
pub use error::Error;

/// Shortcut for required HTTP elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
}

/// Format the time elapsed since `time`, for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
