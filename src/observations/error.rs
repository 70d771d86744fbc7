use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response payload from {0}")]
    Payload(String, #[source] reqwest::Error),
}
