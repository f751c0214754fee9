use log::{info, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, Tex2BibError};
use crate::latex::{CitationSet, CITE_MARKER};

/// Journal abbreviation that cannot be typed literally inside `\cite{}`.
const AMP_JOURNAL_SHORT: &str = "AA";
const AMP_JOURNAL: &str = "A&A";

/// Extract all bibcodes cited in the given LaTeX files.
///
/// Paths that do not exist are skipped with a warning.
pub fn extract_citations<P: AsRef<Path>>(tex_files: &[P]) -> Result<CitationSet> {
    info!("Extracting citations from tex file(s):");

    let mut bibcodes = BTreeSet::new();
    for tex_file in tex_files {
        let tex_file = tex_file.as_ref();
        if !tex_file.exists() {
            warn!("Tex-file does not exist: {}", tex_file.display());
            continue;
        }

        info!("Reading {} ..", tex_file.display());
        let content = fs::read_to_string(tex_file).map_err(|e| Tex2BibError::io(tex_file, e))?;
        extract_citations_from_str(&content, &mut bibcodes);
    }

    let citations = CitationSet::from(bibcodes);
    info!("{} references extracted.", citations.len());
    Ok(citations)
}

/// Collect the bibcodes of every citation command in `content` into `bibcodes`.
pub fn extract_citations_from_str(content: &str, bibcodes: &mut BTreeSet<String>) {
    for line in content.lines() {
        extract_from_line(line, bibcodes);
    }
}

fn extract_from_line(line: &str, bibcodes: &mut BTreeSet<String>) {
    let mut rest = line;
    while let Some(pos) = rest.find(CITE_MARKER) {
        let after_marker = &rest[pos + CITE_MARKER.len()..];

        // No argument on this line: nothing more to collect from it.
        let Some(open) = after_marker.find('{') else {
            break;
        };
        let body_and_rest = &after_marker[open + 1..];

        // An unterminated argument runs to the end of the line.
        let (body, remainder) = match body_and_rest.find('}') {
            Some(close) => (&body_and_rest[..close], &body_and_rest[close + 1..]),
            None => (body_and_rest, ""),
        };

        for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            bibcodes.insert(normalize_bibcode(token));
        }

        rest = remainder;
    }
}

/// Expand the `AA` journal abbreviation to `A&A`.
///
/// Only whole letter segments are replaced: `2016AA...594A..13P` becomes
/// `2016A&A...594A..13P`, while `AAS` or `SmithAA` stay as they are. This
/// differs from a plain substring replacement, which would also turn the
/// `AAS` journal code into `A&AS`.
pub fn normalize_bibcode(token: &str) -> String {
    let mut normalized = String::with_capacity(token.len() + 1);
    let mut segment = String::new();

    for c in token.chars() {
        if c.is_ascii_alphabetic() {
            segment.push(c);
        } else {
            flush_segment(&mut normalized, &mut segment);
            normalized.push(c);
        }
    }
    flush_segment(&mut normalized, &mut segment);

    normalized
}

fn flush_segment(out: &mut String, segment: &mut String) {
    if segment == AMP_JOURNAL_SHORT {
        out.push_str(AMP_JOURNAL);
    } else {
        out.push_str(segment);
    }
    segment.clear();
}
