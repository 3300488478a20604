/// Value recorded whenever a metric could not be collected.
pub const NOT_AVAILABLE: &str = "N/A";

/// Key statistics collected per ticker, in output column order.
///
/// See <https://finance.yahoo.com/quote/AAPL/key-statistics?p=AAPL>. "Shares Short" appears twice;
/// both columns receive the first match on the page.
pub const DATA_TO_COLLECT: [&str; 30] = [
    "Dividend Date",
    "Ex-Dividend Date",
    "Last Split Date",
    "Last Split Factor",
    "Diluted EPS",
    "PEG Ratio",
    "Book Value Per Share",
    "EBITDA",
    "Price/Sales",
    "Price/Book",
    "Forward P/E",
    "Revenue",
    "Shares Short",
    "Market Cap",
    "Float",
    "Shares Outstanding",
    "Profit Margin",
    "Operating Margin",
    "Return on Assets",
    "Return on Equity",
    "Quarterly Revenue Growth",
    "Gross Profit",
    "Quarterly Earnings Growth",
    "% Held by Insiders",
    "% Held by Institutions",
    "Shares Short",
    "Forward Annual Dividend Rate",
    "Operating Cash Flow",
    "Levered Free Cash Flow",
    "Beta",
];

/// Labels that are substrings of other labels (e.g. "Revenue" inside "Quarterly Revenue Growth"),
/// so they must equal the element text instead of being searched for.
pub const EXACT_MATCH: [&str; 2] = ["EBITDA", "Revenue"];

/// How a metric's label is located in the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matching {
    /// The label is a regular expression searched for within the element text.
    Pattern,

    /// The element text must equal the label.
    Exact,
}

/// A single named metric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub matching: Matching,
}

impl Metric {
    pub fn pattern(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matching: Matching::Pattern,
        }
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matching: Matching::Exact,
        }
    }
}

/// Build the ordered metric list from label names, flagging those found in `exact`.
pub fn build<S, E>(names: &[S], exact: &[E]) -> Vec<Metric>
where
    S: AsRef<str>,
    E: AsRef<str>,
{
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if exact.iter().any(|e| e.as_ref() == name) {
                Metric::exact(name)
            } else {
                Metric::pattern(name)
            }
        })
        .collect()
}

/// The default metric list: [`DATA_TO_COLLECT`] with [`EXACT_MATCH`] flagged.
pub fn default_metrics() -> Vec<Metric> {
    build(&DATA_TO_COLLECT, &EXACT_MATCH)
}

/// Metric names, in column order.
pub fn names(metrics: &[Metric]) -> Vec<&str> {
    metrics.iter().map(|metric| metric.name.as_str()).collect()
}
