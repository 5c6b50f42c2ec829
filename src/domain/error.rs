use thiserror::Error;

#[derive(Error, Debug)]
pub enum KrishiError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Stored data error: {0}")]
    Data(String),
}

/// Failures raised by a generative backend.
///
/// These never leave the resolver: every variant is logged and answered from
/// the offline knowledge base instead.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("No generative backend is available")]
    Unavailable,

    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend response could not be parsed: {0}")]
    Parse(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Backend did not answer within {0:?}")]
    Timeout(std::time::Duration),
}
