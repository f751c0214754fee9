//! Create a BibTeX file from the `\cite` commands of LaTeX sources by querying
//! the NASA ADS export API.

pub mod ads;
pub mod config;
pub mod converter;
pub mod error;
pub mod latex;
pub mod output;

pub use config::{OnConflict, Settings};
pub use converter::{RunSummary, Tex2BibConverter};
pub use error::Tex2BibError;
