//! Whole-stream compression and decompression drivers.
//!
//! Three self-delimited formats over a 257-symbol alphabet (byte values
//! plus symbol 256 for end of stream / escape):
//!
//! - **static**: a header of 256 big-endian 32-bit frequencies followed
//!   by the arithmetic-coded body;
//! - **adaptive**: headerless; both sides start from a flat table and
//!   increment the coded symbol after every step;
//! - **ppm**: headerless; both sides grow an identical context tree and
//!   walk the escape cascade from the highest reachable order down to the
//!   unconditional order-(−1) table.
//!
//! Encoder and decoder stay synchronized because they apply exactly the
//! same model updates in exactly the same places.

use std::io::{ErrorKind, Read, Write};

use log::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::coder::{ArithmeticDecoder, ArithmeticEncoder};
use crate::error::{Error, Result};
use crate::frequency::{FlatFrequencyTable, FrequencyTable, SimpleFrequencyTable};
use crate::ppm::PpmModel;

/// Default PPM model order. Compressor and decompressor must agree on
/// this value; memory grows as O(257^order) in the worst case.
pub const MODEL_ORDER: i32 = 3;

// All three file formats fix the coder state size at 32 bits.
const NUM_STATE_BITS: u32 = 32;

const SYMBOL_LIMIT: u32 = 257;
const EOF_SYMBOL: u32 = 256;

fn read_byte<R: Read>(input: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

/// Compress `data` with a static order-0 model.
///
/// Writes the 256-entry frequency header, then the coded body, then the
/// end-of-stream symbol.
pub fn compress_static<W: Write>(data: &[u8], output: W) -> Result<()> {
    let mut freqs = SimpleFrequencyTable::new(vec![0; SYMBOL_LIMIT as usize])?;
    freqs.increment(EOF_SYMBOL)?;
    for &b in data {
        freqs.increment(u32::from(b))?;
    }
    debug!("static compress: {} input bytes", data.len());

    let mut bitout = BitWriter::new(output);
    for symbol in 0..256 {
        let freq = freqs.get(symbol)?;
        for shift in (0..32).rev() {
            bitout.write(((freq >> shift) & 1) as u8)?;
        }
    }

    let mut enc = ArithmeticEncoder::new(NUM_STATE_BITS, &mut bitout)?;
    for &b in data {
        enc.write(&freqs, u32::from(b))?;
    }
    enc.write(&freqs, EOF_SYMBOL)?;
    enc.finish()?;
    bitout.finish()
}

/// Decompress a stream produced by [`compress_static`].
pub fn decompress_static<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut bitin = BitReader::new(input);
    let mut frequencies = vec![0u32; SYMBOL_LIMIT as usize];
    for freq in frequencies.iter_mut().take(256) {
        let mut value = 0u32;
        for _ in 0..32 {
            value = value << 1 | u32::from(bitin.read_no_eof()?);
        }
        *freq = value;
    }
    frequencies[EOF_SYMBOL as usize] = 1;
    let freqs = SimpleFrequencyTable::new(frequencies)?;

    let mut dec = ArithmeticDecoder::new(NUM_STATE_BITS, &mut bitin)?;
    loop {
        let symbol = dec.read(&freqs)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
    }
    output.flush()?;
    Ok(())
}

/// Compress a byte stream with an adaptive order-0 model.
///
/// Headerless: both sides start from a flat 257-symbol table and
/// increment each symbol's frequency right after coding it.
pub fn compress_adaptive<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let init = FlatFrequencyTable::new(SYMBOL_LIMIT)?;
    let mut freqs = SimpleFrequencyTable::from_table(&init)?;
    let mut bitout = BitWriter::new(output);
    let mut enc = ArithmeticEncoder::new(NUM_STATE_BITS, &mut bitout)?;

    while let Some(byte) = read_byte(&mut input)? {
        let symbol = u32::from(byte);
        enc.write(&freqs, symbol)?;
        freqs.increment(symbol)?;
    }
    enc.write(&freqs, EOF_SYMBOL)?;
    enc.finish()?;
    bitout.finish()
}

/// Decompress a stream produced by [`compress_adaptive`].
pub fn decompress_adaptive<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let init = FlatFrequencyTable::new(SYMBOL_LIMIT)?;
    let mut freqs = SimpleFrequencyTable::from_table(&init)?;
    let mut bitin = BitReader::new(input);
    let mut dec = ArithmeticDecoder::new(NUM_STATE_BITS, &mut bitin)?;

    loop {
        let symbol = dec.read(&freqs)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        freqs.increment(symbol)?;
    }
    output.flush()?;
    Ok(())
}

/// Compress a byte stream with a PPM model of the given order.
///
/// Headerless; the decompressor must be given the same order.
pub fn compress_ppm<R: Read, W: Write>(mut input: R, output: W, model_order: i32) -> Result<()> {
    let mut model = PpmModel::new(model_order, SYMBOL_LIMIT, EOF_SYMBOL)?;
    let mut bitout = BitWriter::new(output);
    let mut enc = ArithmeticEncoder::new(NUM_STATE_BITS, &mut bitout)?;
    let mut history: Vec<u32> = Vec::new();
    debug!("ppm compress: model order {model_order}");

    while let Some(byte) = read_byte(&mut input)? {
        let symbol = u32::from(byte);
        encode_symbol(&model, &history, symbol, &mut enc)?;
        model.increment_contexts(&history, symbol)?;
        push_history(&model, &mut history, symbol);
    }
    encode_symbol(&model, &history, EOF_SYMBOL, &mut enc)?;
    enc.finish()?;
    bitout.finish()
}

/// Decompress a stream produced by [`compress_ppm`] with the same order.
pub fn decompress_ppm<R: Read, W: Write>(input: R, mut output: W, model_order: i32) -> Result<()> {
    let mut model = PpmModel::new(model_order, SYMBOL_LIMIT, EOF_SYMBOL)?;
    let mut bitin = BitReader::new(input);
    let mut dec = ArithmeticDecoder::new(NUM_STATE_BITS, &mut bitin)?;
    let mut history: Vec<u32> = Vec::new();
    debug!("ppm decompress: model order {model_order}");

    loop {
        let symbol = decode_symbol(&model, &history, &mut dec)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        model.increment_contexts(&history, symbol)?;
        push_history(&model, &mut history, symbol);
    }
    output.flush()?;
    Ok(())
}

// Append the newest symbol at the tail, dropping the oldest from the head
// once the window is full. Both codec directions must use this exact
// convention or they lose sync.
fn push_history(model: &PpmModel, history: &mut Vec<u32>, symbol: u32) {
    if model.model_order() >= 1 {
        if history.len() == model.model_order() as usize {
            history.remove(0);
        }
        history.push(symbol);
    }
}

// Walk orders from the longest reachable history suffix down to 0,
// escaping at every context that has never seen `symbol`; fall through to
// the order -1 table, where every symbol (end-of-stream included) is
// representable.
fn encode_symbol<W: Write>(
    model: &PpmModel,
    history: &[u32],
    symbol: u32,
    enc: &mut ArithmeticEncoder<'_, W>,
) -> Result<()> {
    if let Some(root) = model.root() {
        'orders: for order in (0..=history.len()).rev() {
            let mut ctx = root;
            for &sym in &history[history.len() - order..] {
                match ctx.child(sym)? {
                    Some(child) => ctx = child,
                    None => continue 'orders,
                }
            }
            if symbol != model.escape_symbol() && ctx.frequencies().get(symbol)? > 0 {
                return enc.write(ctx.frequencies(), symbol);
            }
            enc.write(ctx.frequencies(), model.escape_symbol())?;
        }
    }
    enc.write(model.order_minus1_freqs(), symbol)
}

// Mirror of encode_symbol: reads either a real symbol or an escape at
// each context the encoder visited, in the same order.
fn decode_symbol<R: Read>(
    model: &PpmModel,
    history: &[u32],
    dec: &mut ArithmeticDecoder<'_, R>,
) -> Result<u32> {
    if let Some(root) = model.root() {
        'orders: for order in (0..=history.len()).rev() {
            let mut ctx = root;
            for &sym in &history[history.len() - order..] {
                match ctx.child(sym)? {
                    Some(child) => ctx = child,
                    None => continue 'orders,
                }
            }
            let symbol = dec.read(ctx.frequencies())?;
            if symbol != model.escape_symbol() {
                return Ok(symbol);
            }
        }
    }
    dec.read(model.order_minus1_freqs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_header_layout_single_byte() {
        let mut compressed = Vec::new();
        compress_static(&[0x41], &mut compressed).unwrap();

        // 256 big-endian u32 frequencies: a single 1 at symbol 0x41.
        assert!(compressed.len() > 1024);
        let header = &compressed[..1024];
        for (i, chunk) in header.chunks(4).enumerate() {
            if i == 0x41 {
                assert_eq!(chunk, &[0, 0, 0, 1]);
            } else {
                assert_eq!(chunk, &[0, 0, 0, 0]);
            }
        }

        let mut decompressed = Vec::new();
        decompress_static(&compressed[..], &mut decompressed).unwrap();
        assert_eq!(decompressed, vec![0x41]);
    }

    #[test]
    fn test_static_empty_input() {
        let mut compressed = Vec::new();
        compress_static(&[], &mut compressed).unwrap();
        assert!(compressed[..1024].iter().all(|&b| b == 0));

        let mut decompressed = Vec::new();
        decompress_static(&compressed[..], &mut decompressed).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_static_run_of_zero_bytes() {
        let input = [0u8, 0, 0];
        let mut compressed = Vec::new();
        compress_static(&input, &mut compressed).unwrap();
        let mut decompressed = Vec::new();
        decompress_static(&compressed[..], &mut decompressed).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_adaptive_roundtrip() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let mut compressed = Vec::new();
        compress_adaptive(&input[..], &mut compressed).unwrap();
        let mut decompressed = Vec::new();
        decompress_adaptive(&compressed[..], &mut decompressed).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_ppm_order0_repeated_byte() {
        let input = [0x41u8; 4];
        let mut compressed = Vec::new();
        compress_ppm(&input[..], &mut compressed, 0).unwrap();
        let mut decompressed = Vec::new();
        decompress_ppm(&compressed[..], &mut decompressed, 0).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_ppm_abracadabra() {
        let input = b"ABRACADABRA";
        let mut compressed = Vec::new();
        compress_ppm(&input[..], &mut compressed, MODEL_ORDER).unwrap();
        let mut decompressed = Vec::new();
        decompress_ppm(&compressed[..], &mut decompressed, MODEL_ORDER).unwrap();
        assert_eq!(&decompressed, input);
    }

    #[test]
    fn test_ppm_order_minus1_roundtrip() {
        // Order -1 degenerates to the flat unconditional distribution.
        let input = b"order minus one still round-trips";
        let mut compressed = Vec::new();
        compress_ppm(&input[..], &mut compressed, -1).unwrap();
        let mut decompressed = Vec::new();
        decompress_ppm(&compressed[..], &mut decompressed, -1).unwrap();
        assert_eq!(&decompressed, input);
    }
}
