use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillsError {
    #[error("Config directory not found at {0}. Run 'vendor-bills init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Missing {0}. Set it in config.toml or pass --input <file>.")]
    MissingCredentials(&'static str),

    #[error("Failed to fetch bills from {url}: HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("Failed to fetch bills: {0}")]
    Fetch(String),

    #[error("Invalid bills payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Bill '{0}' not found")]
    BillNotFound(String),

    #[error("Invalid bill index '{0}'. Use 'vendor-bills list' to see available bills.")]
    InvalidBillIndex(String),

    #[error("No bills found.")]
    NoBills,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillsError>;
