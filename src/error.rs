use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("HTTP request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed document from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected document shape from {url}: {message}")]
    Shape { url: String, message: String },

    #[error("Template '{kind}' not found at {path}")]
    TemplateNotFound { kind: String, path: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl HubError {
    /// True for the failures that mean "could not read the remote document".
    pub fn is_fetch(&self) -> bool {
        matches!(self, HubError::Fetch { .. } | HubError::Status { .. })
    }

    /// True for malformed JSON and for well-formed JSON of the wrong shape.
    pub fn is_parse(&self) -> bool {
        matches!(self, HubError::Parse { .. } | HubError::Shape { .. })
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
