use clap::{Args, Parser, Subcommand, ValueEnum};
use psx_spider::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without one, progress bars are shown instead of logs.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the raw PSX listing down to ordinary equities (no ETFs, debt or GEM securities).
    Tickers {
        #[command(flatten)]
        paths: Paths,
    },

    /// Fetch and save the company page of every ticker.
    Crawl {
        #[command(flatten)]
        paths: Paths,

        /// Fetch every ticker again, even those with a saved page.
        #[arg(long)]
        no_skip: bool,
    },

    /// Extract financials from the saved company pages.
    Extract {
        #[command(flatten)]
        paths: Paths,
    },

    /// Compute EPS & Sales CAGR per company and write the ranked table.
    Analyze {
        #[command(flatten)]
        paths: Paths,

        /// Number of leading companies to log.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Extract, then analyze.
    Run {
        #[command(flatten)]
        paths: Paths,

        /// Number of leading companies to log.
        #[arg(long)]
        top: Option<usize>,
    },
}

/// File locations; anything not given falls back to the environment, then the defaults.
#[derive(Args, Debug)]
pub struct Paths {
    /// Raw exchange listing.
    #[arg(long)]
    pub listing: Option<PathBuf>,

    /// Ticker universe.
    #[arg(long)]
    pub tickers: Option<PathBuf>,

    /// Directory of saved company pages.
    #[arg(long)]
    pub html_dir: Option<PathBuf>,

    /// Extracted financial records.
    #[arg(long)]
    pub scraped: Option<PathBuf>,

    /// CAGR table.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Paths {
    /// Override `config` with whichever paths were given.
    pub fn apply(self, config: &mut Config) {
        if let Some(path) = self.listing {
            config.listing_path = path;
        }
        if let Some(path) = self.tickers {
            config.tickers_path = path;
        }
        if let Some(path) = self.html_dir {
            config.html_dir = path;
        }
        if let Some(path) = self.scraped {
            config.scraped_path = path;
        }
        if let Some(path) = self.output {
            config.output_path = path;
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
