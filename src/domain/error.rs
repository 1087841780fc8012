use thiserror::Error;

/// Fatal errors of a send run. None of them is retried.
#[derive(Error, Debug)]
pub enum GelfError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize GELF record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write to {address}: {source}")]
    Write {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

impl GelfError {
    /// Short label used in diagnostics and exit logging.
    pub fn kind(&self) -> &'static str {
        match self {
            GelfError::Configuration(_) => "configuration",
            GelfError::Connection { .. } => "connection",
            GelfError::Serialization(_) => "serialization",
            GelfError::Write { .. } => "write",
        }
    }
}
