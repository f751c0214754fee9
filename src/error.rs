use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Tex2BibError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("ADS API returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Unexpected ADS response: {0}")]
    Response(String),

    #[error("Destination file already exists: {0:?}")]
    DestinationExists(PathBuf),

    #[error("Writing {0:?} aborted")]
    Aborted(PathBuf),
}

impl Tex2BibError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Network(_) | Self::Service { .. } | Self::Response(_) => 3,
            Self::Io { .. } | Self::DestinationExists(_) | Self::Aborted(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, Tex2BibError>;
