use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid pattern for metric \"{metric}\": {source}")]
    Pattern {
        metric: String,
        #[source]
        source: regex::Error,
    },

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("partition size must be greater than zero")]
    Partition,

    #[error("registry error: {0}")]
    Registry(String),
}
