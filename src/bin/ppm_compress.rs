//! PPM compressor.
//!
//! Usage: `ppm_compress InputFile OutputFile`. Uses a prediction by
//! partial matching model of order [`arithcode::MODEL_ORDER`]; the
//! corresponding `ppm_decompress` program must use the same order.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Compress a file with PPM modeling and arithmetic coding.
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
    info!("ppm model order {}", arithcode::MODEL_ORDER);
    let input = BufReader::new(File::open(&args.input_file)?);
    let output = BufWriter::new(File::create(&args.output_file)?);
    arithcode::compress_ppm(input, output, arithcode::MODEL_ORDER)
}
