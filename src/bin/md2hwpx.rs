//! Thin CLI shell over [`md2hwpx::convert`]: argument parsing and file I/O only, no business
//! logic and no logging — warnings go to stderr, everything else is the library's job.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use md2hwpx::{convert, ConvertOptions};

#[derive(Parser)]
#[command(name = "md2hwpx", version, about = "Convert CommonMark-flavored Markdown into HWPX documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a Markdown file into a .hwpx archive.
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "default")]
        style: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Command::Convert { input, output, style } = cli.command;

    let source = match fs::read(&input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: failed to read '{}': {e}", input.display());
            return ExitCode::from(3);
        }
    };

    let result = match convert(&source, &style, ConvertOptions::default()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(3);
        }
    };

    for warning in &result.warnings {
        eprintln!("warning: {}: {}", warning.kind, warning.message);
    }

    if let Err(e) = fs::write(&output, &result.bytes) {
        eprintln!("error: failed to write '{}': {e}", output.display());
        return ExitCode::from(4);
    }

    ExitCode::SUCCESS
}
