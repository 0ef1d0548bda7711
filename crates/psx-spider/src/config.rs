use dotenv::var;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Company pages live under this URL, suffixed by the ticker symbol.
pub const PSX_COMPANY_URL: &str = "https://dps.psx.com.pk/company/";

/// Paths and crawler settings shared by every stage of the pipeline.
///
/// Defaults mirror the on-disk layout the scraper has always used; each field can be
/// overridden from the environment (or a `.env` file) with [`Config::from_env`]:
///
/// | variable           | field          |
/// |--------------------|----------------|
/// | `PSX_LISTING`      | `listing_path` |
/// | `PSX_TICKERS`      | `tickers_path` |
/// | `PSX_HTML_DIR`     | `html_dir`     |
/// | `PSX_SCRAPED`      | `scraped_path` |
/// | `PSX_OUTPUT`       | `output_path`  |
/// | `PSX_BASE_URL`     | `base_url`     |
/// | `USER_AGENT`       | `user_agent`   |
/// | `PSX_TIMEOUT_SECS` | `timeout`      |
#[derive(Clone, Debug)]
pub struct Config {
    /// Raw exchange listing, every security the exchange publishes.
    pub listing_path: PathBuf,

    /// Filtered ticker universe.
    pub tickers_path: PathBuf,

    /// Directory of saved company pages, one `<SYMBOL>.html` per ticker.
    pub html_dir: PathBuf,

    /// Extracted financial records.
    pub scraped_path: PathBuf,

    /// Ranked CAGR table.
    pub output_path: PathBuf,

    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,

    /// Leave tickers that already have a saved page alone when crawling.
    pub skip_duplicates: bool,

    /// Number of leading companies to log after ranking.
    pub top: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_path: PathBuf::from("scrape_psx/tickers/psx.json"),
            tickers_path: PathBuf::from("scrape_psx/tickers/tickers.json"),
            html_dir: PathBuf::from("output/scraped_tickers"),
            scraped_path: PathBuf::from("analysis/scraped_data.json"),
            output_path: PathBuf::from("analysis/cagr_analysis.csv"),
            base_url: PSX_COMPANY_URL.to_string(),
            user_agent: format!("psx-spider/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(10),
            skip_duplicates: true,
            top: 10,
        }
    }
}

impl Config {
    /// Build the default config, then apply any overrides found in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Build the default config, then apply any overrides `lookup` yields by variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("PSX_LISTING") {
            config.listing_path = path.into();
        }
        if let Some(path) = lookup("PSX_TICKERS") {
            config.tickers_path = path.into();
        }
        if let Some(path) = lookup("PSX_HTML_DIR") {
            config.html_dir = path.into();
        }
        if let Some(path) = lookup("PSX_SCRAPED") {
            config.scraped_path = path.into();
        }
        if let Some(path) = lookup("PSX_OUTPUT") {
            config.output_path = path.into();
        }
        if let Some(url) = lookup("PSX_BASE_URL") {
            config.base_url = url;
        }
        if let Some(user_agent) = lookup("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = lookup("PSX_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(err) => warn!("ignoring PSX_TIMEOUT_SECS={secs:?}, error({err})"),
            }
        }

        config
    }

    /// URL of the company page for `symbol`.
    pub fn company_url(&self, symbol: &str) -> String {
        format!("{}{symbol}", self.base_url)
    }
}
