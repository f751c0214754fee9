use log::debug;
use std::borrow::Cow;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::OnConflict;
use crate::error::{Result, Tex2BibError};

/// Pick the file to write to when `path` may already exist.
///
/// With [`OnConflict::Prompt`] the user is asked on `output` and answers on
/// `input`: an empty line overwrites, any other text is tried as a new path.
/// End of input aborts.
pub fn resolve_destination<R: BufRead, W: Write>(
    path: &Path,
    policy: OnConflict,
    mut input: R,
    mut output: W,
) -> Result<PathBuf> {
    let mut candidate = path.to_path_buf();
    if !candidate.exists() {
        return Ok(candidate);
    }

    match policy {
        OnConflict::Overwrite => Ok(candidate),
        OnConflict::Fail => Err(Tex2BibError::DestinationExists(candidate)),
        OnConflict::Rename => Ok(next_free_path(&candidate)),
        OnConflict::Prompt => {
            while candidate.exists() {
                write!(
                    output,
                    "File '{}' exists. Either hit Enter to overwrite or type a different file name. Ctrl+C to abort. ",
                    candidate.display()
                )
                .and_then(|_| output.flush())
                .map_err(|e| Tex2BibError::io(&candidate, e))?;

                let mut answer = String::new();
                let read = input
                    .read_line(&mut answer)
                    .map_err(|e| Tex2BibError::io(&candidate, e))?;
                if read == 0 {
                    return Err(Tex2BibError::Aborted(candidate));
                }

                let answer = answer.trim();
                if answer.is_empty() {
                    break;
                }
                candidate = PathBuf::from(answer);
            }
            Ok(candidate)
        }
    }
}

/// First `<stem>-<n>.<ext>` next to `path` that does not exist.
fn next_free_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            path.with_file_name(name)
        })
        .find(|p| !p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// The text to write, with every `&` removed when `strip_ampersands` is set.
pub fn render_bibliography(bibtex: &str, strip_ampersands: bool) -> Cow<'_, str> {
    if strip_ampersands && bibtex.contains('&') {
        Cow::Owned(bibtex.replace('&', ""))
    } else {
        Cow::Borrowed(bibtex)
    }
}

/// Write the BibTeX text to `path`.
pub fn write_bibliography(path: &Path, bibtex: &str, strip_ampersands: bool) -> Result<()> {
    let content = render_bibliography(bibtex, strip_ampersands);
    fs::write(path, content.as_bytes()).map_err(|e| Tex2BibError::io(path, e))?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
