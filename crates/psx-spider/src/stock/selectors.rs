use regex::Regex;

//////////////////////////////////////////////////////////////////
// financials
//////////////////////////////////////////////////////////////////

/// `div#financialTab` wraps the Annual & Quarterly statement tabs.
pub(crate) const FINANCIAL_TAB: &str = "financialTab";

/// Both classes are present on the currently selected tab panel.
pub(crate) const TAB_PANEL: &str = "tabs__panel";
pub(crate) const TAB_PANEL_SELECTED: &str = "tabs__panel--selected";

/// `data-name` of the annual panel.
pub(crate) const ANNUAL: &str = "Annual";

/// Class of the statement table inside a panel.
pub(crate) const TABLE: &str = "tbl";

/// Row labels worth keeping.
pub(crate) const SALES_ROW: &str = "Sales";
pub(crate) const EPS_ROW: &str = "EPS";

//////////////////////////////////////////////////////////////////
// equity
//////////////////////////////////////////////////////////////////

/// `div#equity` holds the stats panel.
pub(crate) const EQUITY: &str = "equity";
pub(crate) const STATS_ITEM: &str = "stats_item";
pub(crate) const STATS_LABEL: &str = "stats_label";
pub(crate) const STATS_VALUE: &str = "stats_value";

/// Reported in thousands.
pub(crate) const MARKET_CAP_LABEL: &str = "Market Cap (000's)";
pub(crate) const SHARES_LABEL: &str = "Shares";

//////////////////////////////////////////////////////////////////
// quote
//////////////////////////////////////////////////////////////////

pub(crate) const QUOTE_CLOSE: &str = "quote__close";

lazy_static::lazy_static! {
    /// First decimal number in the closing quote, e.g. `Rs.123.45` -> `123.45`.
    pub(crate) static ref PRICE: Regex = Regex::new(r"\d+\.\d+").expect("valid price pattern");

    /// Fiscal year within a column header, e.g. `Jun 2023` -> `2023`.
    pub(crate) static ref YEAR: Regex =
        Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year pattern");
}
