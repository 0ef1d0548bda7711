use crate::config::Config;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, trace};

/// A company in the ticker universe.
///
/// The sector is stored as `sectorName` on disk (the exchange's own key); `sector` is
/// accepted when reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMeta {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "sectorName", alias = "sector")]
    pub sector: String,
}

/// One security from the raw exchange listing.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector_name: String,
    #[serde(default, rename = "isETF")]
    pub is_etf: bool,
    #[serde(default)]
    pub is_debt: bool,
    #[serde(default, rename = "isGEM")]
    pub is_gem: bool,
}

impl Listing {
    /// Ordinary equity: not an ETF, not a debt security, not on the GEM board.
    pub fn is_equity(&self) -> bool {
        !self.is_etf && !self.is_debt && !self.is_gem
    }
}

impl From<Listing> for TickerMeta {
    fn from(listing: Listing) -> Self {
        Self {
            symbol: listing.symbol,
            name: listing.name,
            sector: listing.sector_name,
        }
    }
}

/// Keep ordinary equities only, in listing order.
pub fn filter_listings(listings: Vec<Listing>) -> Vec<TickerMeta> {
    listings
        .into_iter()
        .filter(|listing| {
            let keep = listing.is_equity();
            if !keep {
                trace!("dropping [{}] from the ticker universe", listing.symbol);
            }
            keep
        })
        .map(TickerMeta::from)
        .collect()
}

/// Read the ticker universe.
pub async fn load_tickers(path: impl AsRef<Path>) -> Result<Vec<TickerMeta>, Error> {
    let tickers: Vec<TickerMeta> = crate::fs::read_json(path).await?;
    debug!("{} tickers loaded", tickers.len());
    Ok(tickers)
}

/// Filter the raw listing at `config.listing_path` and write the ticker universe to
/// `config.tickers_path`.
pub async fn filter(config: &Config) -> anyhow::Result<Vec<TickerMeta>> {
    let time = std::time::Instant::now();

    let listings: Vec<Listing> = crate::fs::read_json(&config.listing_path).await?;
    let total = listings.len();
    let tickers = filter_listings(listings);

    crate::fs::write_json(&config.tickers_path, &tickers).await?;
    info!(
        "{} of {total} listings kept, written to {}. {}",
        tickers.len(),
        config.tickers_path.display(),
        crate::time_elapsed(time)
    );

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(symbol: &str, is_etf: bool, is_debt: bool, is_gem: bool) -> Listing {
        Listing {
            symbol: symbol.to_string(),
            name: format!("{symbol} Limited"),
            sector_name: "CEMENT".to_string(),
            is_etf,
            is_debt,
            is_gem,
        }
    }

    #[test]
    fn filter_keeps_equities_in_order() {
        let tickers = filter_listings(vec![
            listing("LUCK", false, false, false),
            listing("MZNPETF", true, false, false),
            listing("TFC1", false, true, false),
            listing("GEMX", false, false, true),
            listing("DGKC", false, false, false),
        ]);

        let symbols: Vec<&str> = tickers.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["LUCK", "DGKC"]);
        assert_eq!(tickers[0].sector, "CEMENT");
    }

    #[test]
    fn listing_flags_default_to_false() {
        let listing: Listing =
            serde_json::from_str(r#"{"symbol": "OGDC", "name": "Oil & Gas", "sectorName": "OIL"}"#)
                .unwrap();
        assert!(listing.is_equity());
    }

    #[test]
    fn listing_reads_exchange_keys() {
        let listing: Listing = serde_json::from_str(
            r#"{"symbol": "X", "name": "X", "sectorName": "S", "isETF": true, "isDebt": false, "isGEM": false}"#,
        )
        .unwrap();
        assert!(listing.is_etf);
        assert!(!listing.is_equity());
    }

    #[test]
    fn ticker_meta_accepts_either_sector_key() {
        let a: TickerMeta =
            serde_json::from_str(r#"{"symbol": "HBL", "name": "Habib Bank", "sectorName": "BANKS"}"#)
                .unwrap();
        let b: TickerMeta =
            serde_json::from_str(r#"{"symbol": "HBL", "name": "Habib Bank", "sector": "BANKS"}"#)
                .unwrap();
        assert_eq!(a, b);

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["sectorName"], "BANKS");
    }
}
