mod error;
pub use error::{Error, Result};

/// Fixed list of key statistics to collect, and how each label is matched.
pub mod metrics;

/// Symbol → collected values, loaded from the input table.
pub mod registry;

/// Locating a metric's value inside a statistics page.
pub mod extract;

/// Page retrieval; the [Yahoo Finance] key-statistics page by default.
///
/// [Yahoo Finance]: https://finance.yahoo.com/quote/AAPL/key-statistics?p=AAPL
pub mod source;

/// Fetch one page per symbol and extract every metric from it.
pub mod fetch;

/// Split the registry into chunks and run one fetch task per chunk.
pub mod fan_out;

/// Write the input table back out with the collected metrics appended.
pub mod export;

/// Progress bars for interactive runs.
pub mod tui;

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
}

/// User agent sent when `USER_AGENT` is not set; the statistics page rejects the reqwest default.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Build the standard HTTP client, with `USER_AGENT` read from the environment (or `.env`).
///
/// No request timeout is set unless one is passed; a hung request blocks its task.
pub fn std_client_build(timeout: Option<std::time::Duration>) -> Result<http::HttpClient> {
    let user_agent = http::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let mut builder = reqwest::ClientBuilder::new().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Format the time elapsed since `time`, for log lines.
pub fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2?}", time.elapsed())
}
