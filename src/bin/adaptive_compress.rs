//! Adaptive order-0 arithmetic coding compressor.
//!
//! Usage: `adaptive_compress InputFile OutputFile`. Starts from a flat
//! 257-symbol table and updates it after every byte; the corresponding
//! `adaptive_decompress` program applies the same updates in lockstep.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Compress a file with adaptive order-0 arithmetic coding.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// File to compress
    input_file: String,

    /// Destination for the compressed stream
    output_file: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .ok();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> arithcode::Result<()> {
    let input = BufReader::new(File::open(&args.input_file)?);
    let output = BufWriter::new(File::create(&args.output_file)?);
    arithcode::compress_adaptive(input, output)
}
