use crate::http::HttpClient;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::trace;

/// Yahoo Finance key statistics; `{symbol}` is replaced by the ticker.
pub const YAHOO_KEY_STATISTICS: &str =
    "https://finance.yahoo.com/quote/{symbol}/key-statistics?p={symbol}";

/// Where statistics pages come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the page for `symbol` as text.
    async fn page(&self, symbol: &str) -> Result<String>;
}

/// One HTTP GET per symbol against a templated URL.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: HttpClient,
    url_template: String,
}

impl HttpSource {
    pub fn new(client: HttpClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Source for the [`YAHOO_KEY_STATISTICS`] page.
    pub fn yahoo(client: HttpClient) -> Self {
        Self::new(client, YAHOO_KEY_STATISTICS)
    }

    pub fn url(&self, symbol: &str) -> String {
        self.url_template.replace("{symbol}", symbol)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn page(&self, symbol: &str) -> Result<String> {
        let url = self.url(symbol);
        trace!("fetching {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { status, url });
        }

        Ok(response.text().await?)
    }
}

/// Pages previously saved to disk, as `{dir}/{symbol}.html`.
#[derive(Clone, Debug)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.html"))
    }
}

#[async_trait]
impl PageSource for DirSource {
    async fn page(&self, symbol: &str) -> Result<String> {
        let path = self.path(symbol);
        trace!("reading page at path: {path:?}");
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
