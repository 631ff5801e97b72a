//! Command-line entry point.
//!
//! Loads one reference corpus, then corrects ASR segments read line by line
//! from stdin, printing `status|accuracy|final_text` per line:
//!
//! ```text
//! $ echo "hom nay troi dep" | viet-align reference.json
//! corrected|0.90|Hôm nay trời đẹp.
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use viet_align::config::AlignConfig;
use viet_align::corpus::{CorpusRef, ReferenceCorpus};
use viet_align::pipeline::SegmentCorrector;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Align Vietnamese ASR output against a reference transcript.
#[derive(Debug, Parser)]
#[command(name = "viet-align", version, about)]
struct Cli {
    /// Reference corpus file: JSON (`{"full_text", "sentences"}` or a bare
    /// string), or plain text with `--raw`.
    corpus_file: PathBuf,

    /// Treat the corpus file as plain transcript text instead of JSON.
    #[arg(long)]
    raw: bool,

    /// Settings file to use instead of the platform default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AlignConfig::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AlignConfig::load().context("loading settings")?,
    };

    let content = std::fs::read_to_string(&cli.corpus_file)
        .with_context(|| format!("reading corpus file {}", cli.corpus_file.display()))?;
    let corpus = if cli.raw {
        CorpusRef::Parsed(ReferenceCorpus::from_text(&content))
    } else {
        CorpusRef::from_json(&content)
            .with_context(|| format!("parsing corpus file {}", cli.corpus_file.display()))?
    };
    log::info!(
        "loaded corpus from {} ({} sentences)",
        cli.corpus_file.display(),
        corpus.sentence_texts().len()
    );

    let mut corrector = SegmentCorrector::new(config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let outcome = corrector.correct(&line, Some(&corpus));
        writeln!(
            out,
            "{}|{:.2}|{}",
            outcome.status, outcome.accuracy, outcome.final_text
        )
        .context("writing stdout")?;
    }

    Ok(())
}
