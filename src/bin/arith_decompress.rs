//! Static order-0 arithmetic coding decompressor.
//!
//! Usage: `arith_decompress InputFile OutputFile`, where the input was
//! produced by `arith_compress`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Decompress a file produced by the static arithmetic compressor.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Compressed file to read
    input_file: String,

    /// Destination for the decompressed bytes
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
    arithcode::decompress_static(input, output)
}
