use super::selectors::{FINANCIAL_TAB, TABLE, TAB_PANEL_SELECTED};
use super::tickers::{load_tickers, TickerMeta};
use crate::config::Config;
use crate::error::Error;
use crate::http::*;
use select::document::Document;
use select::predicate::{Attr, Class, Name, Predicate};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};

// scrape
// ----------------------------------------------------------------------------

/// Outcome of one crawl over the ticker universe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub saved: usize,
    pub failed: usize,

    /// Tickers left alone because a page was already saved.
    pub skipped: usize,
}

/// Fetch the company page of every ticker in `config.tickers_path` and save it under
/// `config.html_dir`, one ticker at a time.
///
/// A ticker whose fetch fails, or whose page carries no financials table, is logged and left
/// without a file. Nothing is retried.
pub async fn scrape(config: &Config, tui: bool) -> anyhow::Result<CrawlSummary> {
    let time = std::time::Instant::now();

    let tickers = load_tickers(&config.tickers_path).await?;
    let pending = pending(&tickers, &config.html_dir, config.skip_duplicates);
    let mut summary = CrawlSummary {
        skipped: tickers.len() - pending.len(),
        ..Default::default()
    };
    debug!(
        "{} tickers to fetch, {} already saved",
        pending.len(),
        summary.skipped
    );

    let http_client = build_client(config)?;
    let pb = crate::tui::ticker_progress(pending.len(), "fetching company pages ...", tui)?;

    for ticker in pending {
        pb.inc(1);
        let url = config.company_url(&ticker.symbol);

        // fetch raw http response
        trace!("fetching [{}] {} from {url}", ticker.symbol, ticker.name);
        let html = match fetch_page(&http_client, &url).await {
            Ok(html) => html,
            Err(err) => {
                error!(
                    "failed to fetch page for [{}] {}, error({err})",
                    ticker.symbol, ticker.name
                );
                summary.failed += 1;
                continue;
            }
        };

        match save_page(&config.html_dir, &ticker.symbol, &html).await {
            Ok(Some(path)) => {
                trace!("saved [{}] {} to {}", ticker.symbol, ticker.name, path.display());
                summary.saved += 1;
            }
            Ok(None) => {
                error!(
                    "no financials table in page for [{}] {} at {url}",
                    ticker.symbol, ticker.name
                );
                summary.failed += 1;
            }
            Err(err) => {
                error!("failed to save page for [{}] {}, {err}", ticker.symbol, ticker.name);
                summary.failed += 1;
            }
        }
    }

    pb.finish_and_clear();
    if tui {
        println!("fetching company pages ... done");
    }

    info!(
        "{} pages saved, {} failed, {} skipped. {}",
        summary.saved,
        summary.failed,
        summary.skipped,
        crate::time_elapsed(time)
    );

    Ok(summary)
}

/// Tickers still to fetch. With `skip_duplicates`, those with a saved page in `html_dir` are
/// left out.
pub fn pending<'a>(
    tickers: &'a [TickerMeta],
    html_dir: impl AsRef<Path>,
    skip_duplicates: bool,
) -> Vec<&'a TickerMeta> {
    let html_dir = html_dir.as_ref();
    tickers
        .iter()
        .filter(|ticker| {
            !skip_duplicates || !crate::fs::html_path(html_dir, &ticker.symbol).exists()
        })
        .collect()
}

/// Save a fetched page as `<html_dir>/<SYMBOL>.html` if it carries a financials table,
/// returning the path written. A page without one is not written and yields `None`.
pub async fn save_page(
    html_dir: impl AsRef<Path>,
    symbol: &str,
    html: &str,
) -> Result<Option<PathBuf>, Error> {
    if !has_financial_table(html) {
        return Ok(None);
    }
    crate::fs::write_html(html_dir, symbol, html).await.map(Some)
}

/// Whether the page has rendered its selected financials table; saving a page without one
/// would only leave the extractor with nothing to read.
pub fn has_financial_table(html: &str) -> bool {
    let document = Document::from(html);
    document
        .find(Name("div").and(Attr("id", FINANCIAL_TAB)))
        .flat_map(|tab| tab.find(Class(TAB_PANEL_SELECTED)))
        .any(|panel| panel.find(Name("table").and(Class(TABLE))).next().is_some())
}

fn build_client(config: &Config) -> anyhow::Result<HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

async fn fetch_page(http_client: &HttpClient, url: &str) -> anyhow::Result<String> {
    let response = http_client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
