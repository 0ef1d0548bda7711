use super::record::{FinancialRecord, Financials};
use super::selectors::*;
use super::tickers::{load_tickers, TickerMeta};
use crate::config::Config;
use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Class, Name, Predicate};
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

// extract
// ----------------------------------------------------------------------------

/// Extract the [`Financials`] from one saved company page.
///
/// The page is expected to carry three sections: the annual financials table, the equity
/// stats panel and the closing quote. Any of them may be missing, in which case the fields
/// it would have filled are simply left empty.
pub fn extract_financials(html: &str) -> Financials {
    let document = Document::from(html);

    let mut financials = Financials::default();
    annual_statements(&document, &mut financials);
    equity_stats(&document, &mut financials);
    financials.price = closing_price(&document);

    financials
}

/// Extract every ticker in `config.tickers_path` that has a saved page under
/// `config.html_dir`, and write the records to `config.scraped_path`.
pub async fn extract(config: &Config, tui: bool) -> anyhow::Result<Vec<FinancialRecord>> {
    let time = std::time::Instant::now();

    let tickers = load_tickers(&config.tickers_path).await?;
    let records = extract_all(&tickers, &config.html_dir, tui).await?;

    crate::fs::write_json(&config.scraped_path, &records).await?;
    info!(
        "{} of {} tickers extracted to {}. {}",
        records.len(),
        tickers.len(),
        config.scraped_path.display(),
        crate::time_elapsed(time)
    );

    Ok(records)
}

/// Extract a record for each ticker with a saved page in `html_dir`, in ticker order.
///
/// Tickers without a page are skipped; so are pages that cannot be read.
pub async fn extract_all(
    tickers: &[TickerMeta],
    html_dir: impl AsRef<Path>,
    tui: bool,
) -> anyhow::Result<Vec<FinancialRecord>> {
    let html_dir = html_dir.as_ref();
    let pb = crate::tui::ticker_progress(tickers.len(), "extracting financials ...", tui)?;

    let mut records = Vec::new();
    for ticker in tickers {
        pb.inc(1);

        let path = crate::fs::html_path(html_dir, &ticker.symbol);
        if !crate::fs::is_saved(&path).await {
            debug!("no saved page for [{}] {}, skipping", ticker.symbol, ticker.name);
            continue;
        }

        let html = match crate::fs::read_html(&path).await {
            Ok(html) => html,
            Err(err) => {
                error!("failed to read page for [{}] {}, {err}", ticker.symbol, ticker.name);
                continue;
            }
        };

        trace!("extracting financials for [{}] {}", ticker.symbol, ticker.name);
        records.push(FinancialRecord {
            symbol: ticker.symbol.clone(),
            name: ticker.name.clone(),
            sector: ticker.sector.clone(),
            financials: extract_financials(&html),
        });
    }

    pb.finish_and_clear();
    if tui {
        println!("extracting financials ... done");
    }

    Ok(records)
}

// financials table
// ----------------------------------------------------------------------------

/// Order of the year columns in the annual table, judged from its header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnOrder {
    NewestFirst,
    OldestFirst,
    Unknown,
}

fn annual_panel<'a>(document: &'a Document) -> Option<Node<'a>> {
    let tab = document
        .find(Name("div").and(Attr("id", FINANCIAL_TAB)))
        .next()?;

    tab.find(
        Name("div")
            .and(Class(TAB_PANEL))
            .and(Class(TAB_PANEL_SELECTED))
            .and(Attr("data-name", ANNUAL)),
    )
    .next()
}

fn annual_statements(document: &Document, financials: &mut Financials) {
    let Some(panel) = annual_panel(document) else {
        trace!("no annual financials panel found");
        return;
    };

    for row in panel.find(Name("tr")) {
        let cells: Vec<String> = row.find(Name("td")).map(|td| td.text()).collect();
        let Some((label, values)) = cells.split_first() else {
            continue;
        };

        match label.trim() {
            SALES_ROW => financials.sales = Some(strip_separators(values)),
            EPS_ROW => financials.eps = Some(strip_separators(values)),
            _ => {}
        }
    }

    // keep the series most recent first, whatever order the page used
    if column_order(panel) == ColumnOrder::OldestFirst {
        debug!("annual columns run oldest first; reversing year series");
        for series in [&mut financials.sales, &mut financials.eps].into_iter().flatten() {
            series.reverse();
        }
    }
}

fn strip_separators(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().replace(',', ""))
        .collect()
}

fn column_order(panel: Node<'_>) -> ColumnOrder {
    let Some(header) = panel
        .find(Name("tr"))
        .find(|row| row.find(Name("th")).next().is_some())
    else {
        return ColumnOrder::Unknown;
    };

    // first header cell labels the rows
    let years: Option<Vec<u32>> = header
        .find(Name("th"))
        .skip(1)
        .map(|th| YEAR.find(&th.text()).and_then(|m| m.as_str().parse().ok()))
        .collect();

    match years {
        Some(years) if years.len() >= 2 => {
            if years.windows(2).all(|w| w[0] > w[1]) {
                ColumnOrder::NewestFirst
            } else if years.windows(2).all(|w| w[0] < w[1]) {
                ColumnOrder::OldestFirst
            } else {
                warn!("annual column years are not monotonic: {years:?}");
                ColumnOrder::Unknown
            }
        }
        _ => ColumnOrder::Unknown,
    }
}

// equity panel
// ----------------------------------------------------------------------------

fn equity_stats(document: &Document, financials: &mut Financials) {
    let Some(equity) = document.find(Name("div").and(Attr("id", EQUITY))).next() else {
        trace!("no equity panel found");
        return;
    };

    for item in equity.find(Name("div").and(Class(STATS_ITEM))) {
        let label = item.find(Name("div").and(Class(STATS_LABEL))).next();
        let value = item.find(Name("div").and(Class(STATS_VALUE))).next();
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };

        let value = value.text().trim().replace(',', "");
        match label.text().trim() {
            MARKET_CAP_LABEL => match value.parse::<f64>() {
                Ok(thousands) => {
                    financials.market_cap = Some(format!("{:?}", thousands * 1000.0))
                }
                Err(err) => warn!("unreadable market cap {value:?}, error({err})"),
            },
            SHARES_LABEL => financials.shares = Some(value),
            _ => {}
        }
    }
}

// quote
// ----------------------------------------------------------------------------

fn closing_price(document: &Document) -> Option<String> {
    let quote = document
        .find(Name("div").and(Class(QUOTE_CLOSE)))
        .next()?;

    PRICE
        .find(&quote.text())
        .map(|price| price.as_str().to_string())
}
