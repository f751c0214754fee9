use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::ads::AdsClient;
use crate::config::Settings;
use crate::error::Result;
use crate::latex::{self, Reconciliation};
use crate::output;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub written: usize,
    pub reconciliation: Reconciliation,
}

/// Creates a bib file from LaTeX sources via the ADS API.
pub struct Tex2BibConverter {
    tex_files: Vec<PathBuf>,
    settings: Settings,
    client: AdsClient,
}

impl Tex2BibConverter {
    pub fn new(tex_files: Vec<PathBuf>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let client = AdsClient::new(&settings)?;
        Ok(Self {
            tex_files,
            settings,
            client,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the pipeline, prompting on the terminal if the bib file exists.
    pub fn run(&self) -> Result<RunSummary> {
        let stdin = io::stdin();
        self.run_with_prompt(stdin.lock(), io::stdout())
    }

    /// Extract, query, write and reconcile, in that order.
    ///
    /// `input`/`output` are only used to confirm overwriting an existing file.
    pub fn run_with_prompt<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<RunSummary> {
        let citations = latex::extract_citations(&self.tex_files)?;
        let export = self.client.export(citations.as_slice())?;

        let destination =
            output::resolve_destination(&self.settings.bib_file, self.settings.on_conflict, input, output)?;
        let bibtex = export.text();
        output::write_bibliography(&destination, &bibtex, self.settings.strip_ampersands)?;
        info!(
            "{} references written to {}.",
            export.retrieved,
            destination.display()
        );

        let reconciliation = latex::reconcile(citations.as_slice(), export.retrieved, &bibtex);

        Ok(RunSummary {
            destination,
            written: export.retrieved,
            reconciliation,
        })
    }
}
