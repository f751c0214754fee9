use log::{info, warn};

/// Outcome of comparing requested bibcodes with the retrieved BibTeX.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub requested: usize,
    pub retrieved: usize,
    /// Requested bibcodes with no entry in the export, in request order.
    pub missing: Vec<String>,
    /// Entry keys in the export that were never requested.
    pub unexpected: Vec<String>,
}

impl Reconciliation {
    pub fn is_complete(&self) -> bool {
        self.requested == self.retrieved && self.missing.is_empty()
    }
}

/// Keys of all BibTeX entries in `bibtex`.
///
/// An entry header is any line starting with `@`; its key runs from after the
/// first `{` to the end of the line, without the trailing comma.
pub fn entry_keys(bibtex: &str) -> Vec<String> {
    bibtex
        .lines()
        .filter(|line| line.starts_with('@'))
        .filter_map(|line| {
            let open = line.find('{')?;
            let key = line[open + 1..].trim_end();
            let key = key.strip_suffix(',').unwrap_or(key).trim();
            Some(key.to_string())
        })
        .filter(|key| !key.is_empty())
        .collect()
}

/// Compare the requested bibcodes with what ADS returned.
pub fn reconcile(requested: &[String], retrieved: usize, bibtex: &str) -> Reconciliation {
    if retrieved == requested.len() {
        info!("All {} references retrieved.", retrieved);
        return Reconciliation {
            requested: requested.len(),
            retrieved,
            ..Default::default()
        };
    }

    info!(
        "{} references could not be found on ADS.",
        requested.len().saturating_sub(retrieved)
    );

    let mut missing: Vec<String> = requested.to_vec();
    let mut unexpected = Vec::new();
    for key in entry_keys(bibtex) {
        match missing.iter().position(|b| *b == key) {
            Some(idx) => {
                missing.remove(idx);
            }
            None => {
                warn!(
                    "Reference retrieved with bibcode that is not in the tex file(s): {}. Cross-check with the list of missing bibcodes.",
                    key
                );
                unexpected.push(key);
            }
        }
    }

    Reconciliation {
        requested: requested.len(),
        retrieved,
        missing,
        unexpected,
    }
}
