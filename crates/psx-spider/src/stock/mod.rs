mod selectors;

/// Company-page extraction; turns saved PSX pages into [`record::FinancialRecord`]s.
pub mod extract;

/// EPS & Sales growth (CAGR) per company, ranked and written as CSV.
pub mod analysis;

/// Fetches and saves the [PSX data portal] company page for every ticker.
///
/// [PSX data portal]: https://dps.psx.com.pk/
pub mod crawl;

/// Financial records, as written by [`extract`] and read back by [`analysis`].
pub mod record;

/// The ticker universe: raw exchange listing in, filtered `{symbol, name, sector}` list out.
pub mod tickers;
