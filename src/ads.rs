//! Batched bibcode export through the ADS API.
//!
//! See <https://github.com/adsabs/adsabs-dev-api> for the endpoint contract.

use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{Result, Tex2BibError};

pub const EXPORT_PATH: &str = "/v1/export/bibtex";
pub const SORT_ORDER: &str = "year desc";

/// Body of one export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdsQuery {
    pub bibcode: Vec<String>,
    pub sort: &'static str,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    msg: String,
    export: String,
}

/// One successful batch: the BibTeX text and how many entries ADS reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBatch {
    pub retrieved: usize,
    pub export: String,
}

/// Accumulated export over all batches, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportResult {
    pub chunks: Vec<String>,
    pub retrieved: usize,
}

impl ExportResult {
    pub fn push(&mut self, batch: ExportBatch) {
        self.retrieved += batch.retrieved;
        self.chunks.push(batch.export);
    }

    /// The full BibTeX text.
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

/// Query for up to `max_query` bibcodes starting at `start`.
///
/// Empty when `start` is past the end of the list.
pub fn prep_query(bibcodes: &[String], start: usize, max_query: usize) -> AdsQuery {
    let start = start.min(bibcodes.len());
    let end = start.saturating_add(max_query).min(bibcodes.len());
    AdsQuery {
        bibcode: bibcodes[start..end].to_vec(),
        sort: SORT_ORDER,
    }
}

/// Split `bibcodes` into `ceil(len / max_query)` queries, each paired with its
/// start offset.
pub fn batches(
    bibcodes: &[String],
    max_query: usize,
) -> impl Iterator<Item = (usize, AdsQuery)> + '_ {
    let step = max_query.max(1);
    (0..bibcodes.len())
        .step_by(step)
        .map(move |start| (start, prep_query(bibcodes, start, step)))
}

/// Number of retrieved entries from an export status message.
///
/// ADS answers e.g. `"Retrieved 3 abstracts, starting with number 1."`; the
/// count is the second whitespace separated word.
pub fn parse_retrieved_count(msg: &str) -> Result<usize> {
    let word = msg
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Tex2BibError::Response(format!("no count in message '{}'", msg)))?;
    word.parse::<usize>()
        .map_err(|_| Tex2BibError::Response(format!("invalid count '{}' in message '{}'", word, msg)))
}

/// Parse the JSON body of a successful export response.
pub fn parse_export_response(body: &str) -> Result<ExportBatch> {
    let response: ExportResponse = serde_json::from_str(body)
        .map_err(|e| Tex2BibError::Response(format!("malformed export response: {}", e)))?;
    Ok(ExportBatch {
        retrieved: parse_retrieved_count(&response.msg)?,
        export: response.export,
    })
}

pub struct AdsClient {
    http: Client,
    endpoint: String,
    token: String,
    max_query: usize,
    verbose: bool,
}

impl AdsClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", settings.api_url.trim_end_matches('/'), EXPORT_PATH),
            token: settings.token.clone(),
            max_query: settings.max_query,
            verbose: settings.verbose,
        })
    }

    /// Export all bibcodes as BibTeX, one request per batch.
    ///
    /// The first failing batch aborts the whole export.
    pub fn export(&self, bibcodes: &[String]) -> Result<ExportResult> {
        info!("Query bibcodes on ADS..");

        let mut result = ExportResult::default();
        for (start, query) in batches(bibcodes, self.max_query) {
            info!(
                "  Query {}-{} of {}..",
                start + 1,
                start + query.bibcode.len(),
                bibcodes.len()
            );
            if self.verbose {
                match serde_json::to_string(&query) {
                    Ok(payload) => info!("Query: {}", payload),
                    Err(e) => warn!("Could not serialize query for display: {}", e),
                }
            }

            let batch = self.send(&query)?;
            info!("  {} retrieved.", batch.retrieved);
            result.push(batch);
        }

        Ok(result)
    }

    fn send(&self, query: &AdsQuery) -> Result<ExportBatch> {
        debug!("POST {} ({} bibcodes)", self.endpoint, query.bibcode.len());
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Tex2BibError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        parse_export_response(&body)
    }
}
