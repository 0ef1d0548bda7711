use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Everything extracted from one company page. A section missing from the page leaves its
/// fields as `None`, and `None` fields are left out of the JSON entirely.
///
/// Year series (`Sales`, `EPS`) are kept as the page presents them: most recent period
/// first, text with thousands separators removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financials {
    #[serde(rename = "Sales", default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<Vec<String>>,

    #[serde(rename = "EPS", default, skip_serializing_if = "Option::is_none")]
    pub eps: Option<Vec<String>>,

    /// Full units, already scaled up from the page's thousands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// A company and its [`Financials`], one entry of `scraped_data.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub financials: Financials,
}

impl FinancialRecord {
    /// Project a loosely-shaped JSON object onto a record.
    ///
    /// Financial fields are looked up under a nested `financials` object first, then at the
    /// top level. Scalars may be strings or numbers; year series must be arrays, anything else
    /// reads as `None`. Returns `None` for a non-object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let nested = object.get("financials").and_then(Value::as_object);

        let field = |key: &str| {
            nested
                .and_then(|financials| financials.get(key))
                .filter(|value| !value.is_null())
                .or_else(|| object.get(key))
        };

        Some(Self {
            symbol: text(object.get("symbol")).unwrap_or_default(),
            name: text(object.get("name")).unwrap_or_default(),
            sector: text(object.get("sector").or_else(|| object.get("sectorName")))
                .unwrap_or_default(),
            financials: Financials {
                sales: series(field("Sales")),
                eps: series(field("EPS")),
                market_cap: text(field("market_cap")),
                shares: text(field("shares")),
                price: text(field("price")),
            },
        })
    }
}

// a string, or a number re-encoded as one
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// elements that are neither strings nor numbers become "" and so parse to zero downstream
fn series(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| text(Some(item)).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    }
}

/// Read `scraped_data.json`, tolerating flat or nested records and odd field shapes.
pub async fn load_records(path: impl AsRef<Path>) -> Result<Vec<FinancialRecord>, Error> {
    let values: Vec<Value> = crate::fs::read_json(path).await?;

    let records: Vec<FinancialRecord> = values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let record = FinancialRecord::from_value(value);
            if record.is_none() {
                warn!("skipping entry {i}: expected a JSON object, found {value}");
            }
            record
        })
        .collect();

    debug!("{} financial records loaded", records.len());
    Ok(records)
}
