use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Could not load {expected} response from '{url}' (status {status})")]
    StatusError {
        url: String,
        status: u16,
        expected: &'static str,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("XML parse error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Missing content: {0}")]
    MissingContent(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
