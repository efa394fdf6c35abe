use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use casm::disasm::fmt_word;
use casm::{listing, AsmConfig, Assembler};
use casm_listing::{assemble_file, build_report, load_image};

#[derive(Parser, Debug)]
#[command(author, version, about = "casm listing and image tool", long_about=None)]
struct Cli {
    /// Image capacity in words
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u16).range(1..))]
    capacity: u16,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file and print its listing
    List {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Disassemble an image written by `casm --output`
    Dump {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// First location to show
        #[arg(long, default_value_t = 0usize)]
        start: usize,
        /// Number of words (default: to end of image)
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn dump_words(words: &[u16], start: usize) -> String {
    let mut buf = String::new();
    for (i, w) in words.iter().enumerate() {
        let _ = writeln!(buf, "{:04}: {w:04X}  {}", start + i, fmt_word(*w));
    }
    buf
}

fn dump_range(len: usize, start: usize, count: Option<usize>) -> Result<std::ops::Range<usize>> {
    anyhow::ensure!(start <= len, "--start exceeds image length");
    let end = count.map_or(len, |n| start.saturating_add(n).min(len));
    Ok(start..end)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::List { input, format, out } => {
            let mut asm = Assembler::new(AsmConfig { capacity: cli.capacity, ..AsmConfig::default() });
            let lines = assemble_file(&mut asm, &input)?;
            let text = match format {
                OutputFormat::Text => {
                    let mut buf = listing::render(&lines, asm.image());
                    let fin = asm.finalize();
                    for d in asm.diagnostics() { let _ = writeln!(buf, "{d}"); }
                    let _ = writeln!(buf, "{} error(s), {} warning(s)", fin.errors, fin.warnings);
                    buf
                }
                OutputFormat::Json => serde_json::to_string_pretty(&build_report(&mut asm, lines))?,
            };
            if let Some(path) = out { std::fs::write(path, text)?; } else { print!("{text}"); }
        }
        Command::Dump { image, start, count } => {
            let img = load_image(&image, cli.capacity)?;
            let words = img.words();
            let range = dump_range(words.len(), start, count)?;
            print!("{}", dump_words(&words[range], start));
        }
    }

    Ok(())
}
