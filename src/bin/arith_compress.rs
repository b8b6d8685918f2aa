//! Static order-0 arithmetic coding compressor.
//!
//! Usage: `arith_compress InputFile OutputFile`. Decompress with the
//! corresponding `arith_decompress` program.

use std::fs::{self, File};
use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Compress a file with static order-0 arithmetic coding.
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
    let data = fs::read(&args.input_file)?;
    info!("compressing {} bytes", data.len());
    let output = BufWriter::new(File::create(&args.output_file)?);
    arithcode::compress_static(&data, output)
}
