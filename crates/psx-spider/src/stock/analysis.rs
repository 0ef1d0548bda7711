use super::record::{load_records, FinancialRecord};
use crate::config::Config;
use crate::error::Error;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, trace};

/// Convert a scraped value to a float.
///
/// Accounting negatives, `(12.3)`, read as `-12.3`. Missing, empty or unparseable values all
/// read as `0.0`; scraped tables are noisy and one bad cell should not sink a company.
pub fn parse_value(value: Option<&str>) -> f64 {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return 0.0;
    };

    value
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .parse()
        .unwrap_or(0.0)
}

/// Compounded annual growth rate of a chronological (oldest first) series.
///
/// Zeros are dropped as missing periods. With fewer than two values left, or a negative value
/// at either end, growth is reported as `0.0`; negative values in between are kept. Otherwise
/// the rate is `(last / first)^(1 / n) - 1` over `n = len - 1` periods, with a non-finite
/// result also reported as `0.0`.
pub fn calculate_cagr(values: &[f64]) -> f64 {
    let values: Vec<f64> = values.iter().copied().filter(|v| *v != 0.0).collect();

    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return 0.0;
    };
    if values.len() < 2 || first < 0.0 || last < 0.0 {
        return 0.0;
    }

    let periods = (values.len() - 1) as f64;
    let cagr = (last / first).powf(1.0 / periods) - 1.0;

    if cagr.is_finite() {
        cagr
    } else {
        0.0
    }
}

/// CAGR of a scraped year series, which is stored most recent first.
pub fn series_cagr(series: &[String]) -> f64 {
    let chronological: Vec<f64> = series
        .iter()
        .rev()
        .map(|value| parse_value(Some(value)))
        .collect();

    calculate_cagr(&chronological)
}

/// A [`FinancialRecord`] flattened, with its growth figures attached.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzedRecord {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub market_cap: Option<String>,
    pub shares: Option<String>,
    pub price: Option<String>,
    pub eps: Vec<String>,
    pub sales: Vec<String>,
    pub current_eps: f64,
    pub eps_cagr: f64,
    pub sales_cagr: f64,
}

impl From<FinancialRecord> for AnalyzedRecord {
    fn from(record: FinancialRecord) -> Self {
        let financials = record.financials;

        // anything that did not load as a series counts as an empty one
        let eps = financials.eps.unwrap_or_default();
        let sales = financials.sales.unwrap_or_default();

        let current_eps = parse_value(eps.first().map(String::as_str));
        let eps_cagr = series_cagr(&eps);
        let sales_cagr = series_cagr(&sales);
        trace!("[{}] EPS CAGR {eps_cagr}, Sales CAGR {sales_cagr}", record.symbol);

        Self {
            symbol: record.symbol,
            name: record.name,
            sector: record.sector,
            market_cap: financials.market_cap,
            shares: financials.shares,
            price: financials.price,
            eps,
            sales,
            current_eps,
            eps_cagr,
            sales_cagr,
        }
    }
}

/// Highest EPS growth first. The sort is stable, so ties keep their input order.
pub fn rank(records: &mut [AnalyzedRecord]) {
    records.sort_by(|a, b| b.eps_cagr.total_cmp(&a.eps_cagr));
}

/// Enrich every record, then [`rank`] them.
pub fn analyze_records(records: Vec<FinancialRecord>) -> Vec<AnalyzedRecord> {
    let mut analyzed: Vec<AnalyzedRecord> =
        records.into_iter().map(AnalyzedRecord::from).collect();
    rank(&mut analyzed);
    analyzed
}

// csv
// ----------------------------------------------------------------------------

#[derive(Serialize)]
struct Row<'a> {
    symbol: &'a str,
    name: &'a str,
    sector: &'a str,
    market_cap: Option<&'a str>,
    shares: Option<&'a str>,
    price: Option<&'a str>,
    #[serde(rename = "EPS")]
    eps: String,
    #[serde(rename = "Sales")]
    sales: String,
    current_eps: f64,
    #[serde(rename = "EPS_CAGR")]
    eps_cagr: f64,
    #[serde(rename = "Sales_CAGR")]
    sales_cagr: f64,
}

impl<'a> Row<'a> {
    fn new(record: &'a AnalyzedRecord) -> Result<Self, serde_json::Error> {
        Ok(Self {
            symbol: &record.symbol,
            name: &record.name,
            sector: &record.sector,
            market_cap: record.market_cap.as_deref(),
            shares: record.shares.as_deref(),
            price: record.price.as_deref(),
            eps: serde_json::to_string(&record.eps)?,
            sales: serde_json::to_string(&record.sales)?,
            current_eps: record.current_eps,
            eps_cagr: record.eps_cagr,
            sales_cagr: record.sales_cagr,
        })
    }
}

/// Write the records as CSV, one row per company, replacing any previous file.
///
/// Absent scalars are empty cells. The `EPS` & `Sales` cells hold the series as a JSON array of
/// strings, e.g. `["12.0","10.0"]`. Readers expecting a single-quoted list such as
/// `['12.0', '10.0']` need to parse the cell as JSON instead.
pub async fn write_csv(
    path: impl AsRef<Path>,
    records: &[AnalyzedRecord],
) -> Result<(), Error> {
    let path = path.as_ref();
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());

    // serialize() only emits a header once it sees a row
    if records.is_empty() {
        writer.write_record(HEADER).map_err(csv_err)?;
    }
    for record in records {
        let row = Row::new(record).map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        writer.serialize(row).map_err(csv_err)?;
    }

    let buf = writer.into_inner().map_err(|err| Error::Write {
        path: path.to_path_buf(),
        source: err.into_error(),
    })?;
    crate::fs::write_bytes(path, &buf).await
}

/// Column names of the output table.
pub const HEADER: [&str; 11] = [
    "symbol",
    "name",
    "sector",
    "market_cap",
    "shares",
    "price",
    "EPS",
    "Sales",
    "current_eps",
    "EPS_CAGR",
    "Sales_CAGR",
];

// analyze
// ----------------------------------------------------------------------------

/// Load `config.scraped_path`, compute growth per company, rank, and write the table to
/// `config.output_path`.
pub async fn analyze(config: &Config) -> anyhow::Result<Vec<AnalyzedRecord>> {
    let time = std::time::Instant::now();

    let records = load_records(&config.scraped_path).await?;
    let analyzed = analyze_records(records);
    debug!("{} companies analyzed", analyzed.len());

    write_csv(&config.output_path, &analyzed).await?;
    info!(
        "CAGR table written to {}. {}",
        config.output_path.display(),
        crate::time_elapsed(time)
    );

    for (i, record) in analyzed.iter().take(config.top).enumerate() {
        info!(
            "#{:<3} [{}] {}: EPS CAGR {:.2}%, Sales CAGR {:.2}%, current EPS {}",
            i + 1,
            record.symbol,
            record.name,
            record.eps_cagr * 100.0,
            record.sales_cagr * 100.0,
            record.current_eps
        );
    }

    Ok(analyzed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::record::Financials;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn record(symbol: &str, eps: &[&str]) -> FinancialRecord {
        FinancialRecord {
            symbol: symbol.to_string(),
            name: format!("{symbol} Limited"),
            sector: "TEXTILE COMPOSITE".to_string(),
            financials: Financials {
                eps: Some(eps.iter().map(|v| v.to_string()).collect()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn parse_value_defaults_to_zero() {
        assert_eq!(parse_value(None), 0.0);
        assert_eq!(parse_value(Some("")), 0.0);
        assert_eq!(parse_value(Some("abc")), 0.0);
        assert_eq!(parse_value(Some("-")), 0.0);
    }

    #[test]
    fn parse_value_reads_accounting_negatives() {
        assert_eq!(parse_value(Some("(12.5)")), -12.5);
        assert_eq!(parse_value(Some("12.5")), 12.5);
        assert_eq!(parse_value(Some(" 7 ")), 7.0);
    }

    #[test]
    fn cagr_needs_two_points() {
        assert_eq!(calculate_cagr(&[]), 0.0);
        assert_eq!(calculate_cagr(&[5.0]), 0.0);
        assert_eq!(calculate_cagr(&[0.0, 5.0, 0.0]), 0.0);
    }

    #[test]
    fn cagr_rejects_negative_endpoints() {
        assert_eq!(calculate_cagr(&[-1.0, 4.0]), 0.0);
        assert_eq!(calculate_cagr(&[1.0, -4.0]), 0.0);
    }

    #[test]
    fn cagr_keeps_negative_midpoints() {
        // (4 / 1)^(1/2) - 1
        assert!(approx(calculate_cagr(&[1.0, -3.0, 4.0]), 1.0));
    }

    #[test]
    fn cagr_over_one_period() {
        assert!(approx(calculate_cagr(&[2.0, 4.0]), 1.0));
        assert!(approx(calculate_cagr(&[2.0, 8.0]), 3.0));
    }

    #[test]
    fn cagr_drops_zero_periods() {
        assert!(approx(calculate_cagr(&[1.0, 0.0, 4.0]), 3.0));
    }

    #[test]
    fn cagr_of_overflowing_ratio_is_zero() {
        assert_eq!(calculate_cagr(&[f64::MIN_POSITIVE, f64::MAX]), 0.0);
    }

    #[test]
    fn series_is_reversed_before_growth() {
        let series: Vec<String> = ["12.0", "10.0", "8.0"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        // (12 / 8)^(1/2) - 1
        assert!(approx(series_cagr(&series), 1.5f64.sqrt() - 1.0));
    }

    #[test]
    fn analyzed_record_derives_current_eps_and_growth() {
        let analyzed = AnalyzedRecord::from(record("NML", &["12.0", "10.0", "8.0"]));
        assert_eq!(analyzed.current_eps, 12.0);
        assert!((analyzed.eps_cagr - 0.2247).abs() < 1e-4);
        assert_eq!(analyzed.sales, Vec::<String>::new());
        assert_eq!(analyzed.sales_cagr, 0.0);
    }

    #[test]
    fn missing_series_is_empty() {
        let mut raw = record("GATM", &[]);
        raw.financials.eps = None;

        let analyzed = AnalyzedRecord::from(raw);
        assert!(analyzed.eps.is_empty());
        assert_eq!(analyzed.current_eps, 0.0);
        assert_eq!(analyzed.eps_cagr, 0.0);
    }

    #[test]
    fn ranking_is_by_eps_growth_descending() {
        let mut records: Vec<AnalyzedRecord> = ["A", "B", "C"]
            .iter()
            .map(|s| AnalyzedRecord::from(record(s, &[])))
            .collect();
        records[0].eps_cagr = 0.1;
        records[1].eps_cagr = -0.2;
        records[2].eps_cagr = 0.5;

        rank(&mut records);
        let order: Vec<f64> = records.iter().map(|r| r.eps_cagr).collect();
        assert_eq!(order, vec![0.5, 0.1, -0.2]);
    }

    #[test]
    fn ranking_ties_keep_input_order() {
        let analyzed = analyze_records(vec![
            record("FIRST", &["1.0"]),
            record("SECOND", &["2.0"]),
            record("TOP", &["4.0", "1.0"]),
        ]);

        let symbols: Vec<&str> = analyzed.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TOP", "FIRST", "SECOND"]);
    }

    #[tokio::test]
    async fn csv_has_header_and_series_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis/cagr_analysis.csv");

        let mut raw = record("NML", &["12.0", "(1.0)"]);
        raw.financials.price = Some("98.50".to_string());
        write_csv(&path, &analyze_records(vec![raw])).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "NML");
        assert_eq!(&row[3], "");
        assert_eq!(&row[5], "98.50");
        assert_eq!(&row[6], r#"["12.0","(1.0)"]"#);
        assert_eq!(&row[7], "[]");
        assert_eq!(row[8].parse::<f64>().unwrap(), 12.0);
        assert_eq!(row[9].parse::<f64>().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn csv_of_no_records_is_just_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&path, &[]).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), HEADER.join(","));
    }
}
