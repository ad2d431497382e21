use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum FetchError {
    #[error("some required configuration attributes are missing: {}", fields.join(", "))]
    #[diagnostic(help("The GitHub API url, owner, repository and filepath are all required"))]
    MissingConfiguration { fields: Vec<&'static str> },

    #[error("a branch, tag or commit sha is required to list repository files")]
    #[diagnostic(help("Use --ref to select the tree to list"))]
    MissingRef,

    #[error("invalid request url: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unable to reach '{url}'")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to fetch '{url}'. Status code: {status_code}. Message: {status_message}")]
    HttpStatus {
        url: String,
        status_code: u16,
        status_message: String,
    },

    #[error("too many redirects while fetching '{url}' (limit is {limit})")]
    TooManyRedirects { url: String, limit: usize },

    #[error("content is not valid base64")]
    Decode {
        #[source]
        source: base64::DecodeError,
    },

    #[error("Unable to fetch GitHub content ({source})")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialize HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {scheme} proxy configuration")]
    #[diagnostic(help("Check the proxy host and port in the settings file"))]
    Proxy {
        scheme: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to load config")]
    ConfigLoad {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Whether repeating the same fetch may succeed.
    ///
    /// Transport failures and server-side (5xx) statuses are transient; every other
    /// failure will repeat identically.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::HttpStatus { status_code, .. } => (500..600).contains(status_code),
            _ => false,
        }
    }

    /// Returns true for errors raised before any request is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FetchError::MissingConfiguration { .. } | FetchError::MissingRef
        )
    }
}
