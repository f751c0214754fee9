use clap::ValueEnum;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, Tex2BibError};

pub const DEFAULT_API_URL: &str = "https://api.adsabs.harvard.edu";
pub const DEFAULT_BIB_FILE: &str = "references.bib";
pub const DEFAULT_MAX_QUERY: usize = 90;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables consulted for the ADS token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["ADS_API_TOKEN", "ADS_DEV_KEY"];

/// What to do when the destination bib file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OnConflict {
    /// Ask on the terminal: Enter overwrites, anything else is a new file name
    #[default]
    Prompt,
    /// Replace the existing file
    Overwrite,
    /// Abort without writing
    Fail,
    /// Write to the first free `<stem>-<n>.<ext>` next to it
    Rename,
}

/// Run configuration handed to the converter.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bib_file: PathBuf,
    pub token: String,
    pub api_url: String,
    pub max_query: usize,
    pub timeout: Duration,
    pub strip_ampersands: bool,
    pub verbose: bool,
    pub on_conflict: OnConflict,
}

impl Settings {
    /// Settings with defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bib_file: PathBuf::from(DEFAULT_BIB_FILE),
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            max_query: DEFAULT_MAX_QUERY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            strip_ampersands: false,
            verbose: false,
            on_conflict: OnConflict::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Tex2BibError::Config("ADS token is empty".to_string()));
        }
        if self.max_query == 0 {
            return Err(Tex2BibError::Config(
                "max query size must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Tex2BibError::Config(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default location of the ADS token file, `~/.ads/dev_key`.
pub fn default_token_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ads").join("dev_key"))
}

/// Resolve the ADS token: explicit value, then environment, then token file.
pub fn resolve_token<F>(explicit: Option<&str>, env: F, token_file: Option<&Path>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Using ADS token given on the command line");
        return Ok(token.to_string());
    }

    for var in TOKEN_ENV_VARS {
        if let Some(token) = env(var).map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            debug!("Using ADS token from ${}", var);
            return Ok(token);
        }
    }

    if let Some(path) = token_file {
        if path.is_file() {
            let content = fs::read_to_string(path).map_err(|e| Tex2BibError::io(path, e))?;
            let token = content.trim();
            if !token.is_empty() {
                debug!("Using ADS token from {:?}", path);
                return Ok(token.to_string());
            }
        }
    }

    Err(Tex2BibError::Config(format!(
        "no ADS token found; pass --token, set {} or write it to ~/.ads/dev_key",
        TOKEN_ENV_VARS.join(" or ")
    )))
}

/// API base URL, honouring `ADS_BASE_URL`.
pub fn api_url_from_env() -> String {
    std::env::var("ADS_BASE_URL")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
