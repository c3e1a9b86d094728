use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Invalid command-line combination; the message is shown to the user as-is
    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing Rubrik credentials: {0}")]
    Credentials(String),

    #[error("Rubrik API error: {0}")]
    RubrikApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Zabbix sender error: {0}")]
    Zabbix(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
