use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tex2bib::config::{self, OnConflict, Settings};
use tex2bib::{RunSummary, Tex2BibConverter, Tex2BibError};

/// Extracts bibcodes from TEXFILE(s), queries them on ADS, and creates a bib file
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// LaTeX source files to scan for \cite commands
    #[arg(value_name = "TEXFILE")]
    tex_files: Vec<PathBuf>,
    /// Output bib file
    #[arg(short, long, value_name = "BIBFILE", default_value = config::DEFAULT_BIB_FILE)]
    bibfile: PathBuf,
    /// ADS API token (otherwise $ADS_API_TOKEN, $ADS_DEV_KEY or ~/.ads/dev_key)
    #[arg(short, long)]
    token: Option<String>,
    /// Show the ADS queries
    #[arg(short, long)]
    verbose: bool,
    /// Remove ampersands from the written bib file
    #[arg(short = 'a', long)]
    no_amp: bool,
    /// Maximum number of bibcodes per ADS query
    #[arg(long, default_value_t = config::DEFAULT_MAX_QUERY)]
    max_query: usize,
    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    /// What to do if the bib file already exists
    #[arg(long, value_enum, default_value_t = OnConflict::Prompt)]
    on_conflict: OnConflict,
    /// Overwrite an existing bib file without asking
    #[arg(short, long, conflicts_with = "on_conflict")]
    force: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Configure logging
    let default_filter = if args.verbose { "info,tex2bib=debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .init();

    if args.tex_files.is_empty() {
        println!("For help type: tex2bib --help");
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(summary) => report(&summary),
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<Tex2BibError>()
                .map_or(1, Tex2BibError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<RunSummary> {
    let token = config::resolve_token(
        args.token.as_deref(),
        |var| std::env::var(var).ok(),
        config::default_token_file().as_deref(),
    )?;

    let settings = Settings {
        bib_file: args.bibfile,
        token,
        api_url: config::api_url_from_env(),
        max_query: args.max_query,
        timeout: Duration::from_secs(args.timeout),
        strip_ampersands: args.no_amp,
        verbose: args.verbose,
        on_conflict: if args.force {
            OnConflict::Overwrite
        } else {
            args.on_conflict
        },
    };

    let converter = Tex2BibConverter::new(args.tex_files, settings)?;
    let summary = converter
        .run()
        .with_context(|| format!("Failed to create {:?}", converter.settings().bib_file))?;
    Ok(summary)
}

fn report(summary: &RunSummary) -> ExitCode {
    let reconciliation = &summary.reconciliation;
    if reconciliation.is_complete() || reconciliation.missing.is_empty() {
        return ExitCode::SUCCESS;
    }

    println!("\nBibcodes that could not be found on ADS:");
    for bibcode in &reconciliation.missing {
        println!("{}", bibcode);
    }
    ExitCode::from(1)
}
