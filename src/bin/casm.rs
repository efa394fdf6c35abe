use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use casm::{listing, AsmConfig, Assembler};

#[derive(Parser, Debug)]
#[command(author, version, about = "One-pass assembler for the casm word machine")]
struct Opts {
    /// Source file to assemble (stdin when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
    /// Write the image here (little-endian 16-bit words)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// JSON assembler settings (see `AsmConfig`)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output image capacity in words (overrides --config)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    capacity: Option<u16>,
    /// Do not print the listing
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();
    let input: Box<dyn BufRead> = match &opts.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            anyhow::anyhow!("Unable to open input file {}: {e}", path.display())
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let mut cfg = match &opts.config {
        Some(path) => serde_json::from_str::<AsmConfig>(&std::fs::read_to_string(path)?)?,
        None => AsmConfig::default(),
    };
    if let Some(capacity) = opts.capacity {
        cfg.capacity = capacity;
    }
    anyhow::ensure!(cfg.capacity > 0, "capacity must be at least one word");

    let mut asm = Assembler::new(cfg);
    let lines = asm.assemble_source(input)?;
    let report = asm.finalize();

    for d in asm.diagnostics() {
        eprintln!("{d}");
    }
    if !opts.quiet {
        print!("{}", listing::render(&lines, asm.image()));
    }
    if let Some(path) = &opts.output {
        std::fs::write(path, asm.image().to_le_bytes())?;
    }

    eprintln!("{} error(s), {} warning(s)", report.errors, report.warnings);
    anyhow::ensure!(report.success(), "assembly failed with {} error(s)", report.errors);
    Ok(())
}
