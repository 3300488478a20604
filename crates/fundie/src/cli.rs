use clap::{Args, Parser, Subcommand, ValueEnum};
use fundie_spider::fan_out::DEFAULT_PARTITION;
use fundie_spider::source::YAHOO_KEY_STATISTICS;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// If no level is provided, progress bars are drawn instead.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape key statistics for every ticker in the input table, and write them to a CSV file.
    Fetch(FetchArgs),

    /// List the metrics that would be collected.
    Metrics(MetricArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// CSV file with stock symbols in the first column, and a header row.
    #[arg(short, long, default_value = "NASDAQ_exchange.csv")]
    pub input: PathBuf,

    /// Output CSV file.
    ///
    /// Defaults to "Fundamentals_yahoo <MM-DD HH_MM_SS>.csv" in the working directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of tickers fetched sequentially by each worker.
    #[arg(short, long, default_value_t = DEFAULT_PARTITION)]
    pub partition: usize,

    /// Page URL, with `{symbol}` in place of the ticker.
    #[arg(long, default_value = YAHOO_KEY_STATISTICS)]
    pub url: String,

    /// Read saved pages from `<DIR>/<SYMBOL>.html` instead of fetching them.
    #[arg(long, value_name = "DIR", conflicts_with = "url")]
    pub pages: Option<PathBuf>,

    /// Request timeout, in seconds. No timeout by default.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub metrics: MetricArgs,
}

#[derive(Args, Debug)]
pub struct MetricArgs {
    /// Metric labels to collect, in column order; defaults to the full key statistics list.
    #[arg(short, long, num_args = 1..)]
    pub metrics: Option<Vec<String>>,

    /// Labels that must match exactly rather than as a pattern.
    #[arg(long, num_args = 1..)]
    pub exact: Option<Vec<String>>,
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
