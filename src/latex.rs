pub mod bibliography;
pub mod parser;

use std::collections::BTreeSet;

pub use bibliography::{entry_keys, reconcile, Reconciliation};
pub use parser::{extract_citations, extract_citations_from_str, normalize_bibcode};

/// Command prefix shared by `\cite`, `\citep`, `\citet`, `\citealp`, ...
pub const CITE_MARKER: &str = "\\cite";

/// Deduplicated bibcodes in lexicographic order.
///
/// The order is fixed at construction; batches sent to ADS are slices of it,
/// so identical sources always produce identical queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationSet {
    bibcodes: Vec<String>,
}

impl CitationSet {
    pub fn len(&self) -> usize {
        self.bibcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bibcodes.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.bibcodes
    }

    pub fn contains(&self, bibcode: &str) -> bool {
        self.bibcodes
            .binary_search_by(|b| b.as_str().cmp(bibcode))
            .is_ok()
    }
}

impl From<BTreeSet<String>> for CitationSet {
    fn from(set: BTreeSet<String>) -> Self {
        Self {
            bibcodes: set.into_iter().collect(),
        }
    }
}
