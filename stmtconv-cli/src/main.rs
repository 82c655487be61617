use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stmtconv_core::{SortKey, StatementDate};
use stmtconv_export::OutputSinks;
use stmtconv_ingest::{
    BackendKind, Batch, DocumentWalker, LineClassifier, MemoryBackend, TextBackend, scan_statements,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "stmtconv",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STMTCONV_BUILD_SHA"), ")"),
    about = "Convert Wells Fargo PDF statements into a transaction CSV"
)]
struct Cli {
    /// Config file (default: $STMTCONV_HOME/config.toml, else ~/.stmtconv/config.toml, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every statement in a directory
    Convert {
        /// Directory holding MMDDYY*.pdf statements
        input: PathBuf,

        /// Output directory (default: [output].dir from config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Text extractor: pdftotext | pdf-extract
        #[arg(long)]
        backend: Option<BackendKind>,

        /// Sort key: date | amount | name | none
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Print how every line of one statement is classified
    Inspect {
        /// Statement file (MMDDYY*.pdf, or extracted text with --text)
        file: PathBuf,

        /// Treat the file as already-extracted text (pages split by form feeds)
        #[arg(long)]
        text: bool,

        /// Text extractor: pdftotext | pdf-extract
        #[arg(long)]
        backend: Option<BackendKind>,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file unless one exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert {
            input,
            out,
            backend,
            sort,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            convert(&cfg, &input, out, backend, sort)?;
        }

        Command::Inspect { file, text, backend } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            inspect(&cfg, &file, text, backend)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn classifier(cfg: &Config) -> Result<LineClassifier> {
    let patterns = cfg.patterns.compile().context("compiling [patterns]")?;
    Ok(LineClassifier::new(patterns))
}

fn convert(
    cfg: &Config,
    input: &Path,
    out: Option<PathBuf>,
    backend: Option<BackendKind>,
    sort: Option<SortKey>,
) -> Result<()> {
    let classifier = classifier(cfg)?;
    let backend = backend
        .unwrap_or(cfg.extract.backend)
        .create(&cfg.extract.pdftotext_command);
    let out_dir = out.unwrap_or_else(|| cfg.output.dir.clone());
    info!(input = %input.display(), output = %out_dir.display(), "Converting statements");

    let scan = scan_statements(input, classifier.patterns())
        .with_context(|| format!("scanning {}", input.display()))?;

    let sinks = OutputSinks::open(&out_dir, &cfg.output.names)
        .with_context(|| format!("preparing output in {}", out_dir.display()))?;

    let mut outcome = Batch::new(backend.as_ref(), &classifier)
        .run(&scan.statements)
        .with_context(|| format!("converting statements in {}", input.display()))?;
    outcome.skipped_files = scan.skipped_files;

    for doc in &outcome.documents {
        println!(
            "{} | pages={} | transactions={} | skipped={}",
            doc.path.display(),
            doc.pages,
            doc.transactions,
            doc.tally.excluded + doc.tally.possibly_relevant
        );
    }

    let paths = sinks.write(&mut outcome, sort.unwrap_or(cfg.sort.by))?;

    let tally = outcome.tally();
    println!(
        "\nParsed {} transactions from {} statements ({} files skipped, {} lines skipped)",
        outcome.transactions.len(),
        outcome.documents.len(),
        outcome.skipped_files.len(),
        outcome.skipped_lines.len()
    );
    println!(
        "Lines: {} total | {} matched | {} excluded | {} possibly relevant",
        tally.total(),
        tally.matched,
        tally.excluded,
        tally.possibly_relevant
    );
    println!("Wrote:");
    println!("- {}", paths.transactions.display());
    println!("- {}", paths.skipped_files.display());
    println!("- {}", paths.skipped_lines.display());

    Ok(())
}

fn inspect(cfg: &Config, file: &Path, text: bool, backend: Option<BackendKind>) -> Result<()> {
    let classifier = classifier(cfg)?;
    let date = StatementDate::from_path(file)?;

    let backend: Box<dyn TextBackend> = if text {
        let raw = std::fs::read_to_string(file)
            .with_context(|| format!("read {}", file.display()))?;
        let mut memory = MemoryBackend::new();
        memory.insert_text(file, &raw);
        Box::new(memory)
    } else {
        backend
            .unwrap_or(cfg.extract.backend)
            .create(&cfg.extract.pdftotext_command)
    };

    let document = backend.open(file)?;
    let mut walker = DocumentWalker::new(&classifier, file, date);

    for index in 0..document.page_count() {
        println!("--- page {} ---", index + 1);
        for line in document.page_text(index)?.lines() {
            let class = walker
                .feed_line(line)
                .with_context(|| format!("page {}: {line:?}", index + 1))?;
            println!("{:<12} {:?} | {}", class.label(), walker.phase(), line);
        }
    }

    let outcome = walker.finish();
    println!("\n{:?}", outcome.tally);
    for t in &outcome.transactions {
        println!(
            "{} | {} | {} {} | {} | {}",
            t.date(),
            t.reference().unwrap_or("-"),
            t.amount(),
            if t.is_credit() { "CR" } else { "DR" },
            t.name(),
            t.last_four()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stmtconv_core::ConvertError;

    #[test]
    fn test_missing_input_reports_input_not_found_and_writes_nothing() {
        let scratch = tempfile::tempdir().unwrap();
        let out = scratch.path().join("output");
        let input = scratch.path().join("no-statements-here");

        let err = convert(&Config::default(), &input, Some(out.clone()), None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::InputNotFound { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_empty_input_directory_writes_none() {
        let scratch = tempfile::tempdir().unwrap();
        let input = scratch.path().join("statements");
        std::fs::create_dir(&input).unwrap();
        let out = scratch.path().join("output");

        convert(&Config::default(), &input, Some(out.clone()), None, None).unwrap();
        assert_eq!(std::fs::read_to_string(out.join("transactions.csv")).unwrap(), "None");
    }
}
