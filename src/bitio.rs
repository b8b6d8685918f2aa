//! Bit-level input and output adapters.
//!
//! Both adapters pack bits MSB-first within each byte, so the bit stream
//! layout is big-endian and the end of a stream always falls on a byte
//! boundary (the writer zero-pads the final byte).

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};

/// Reads bits MSB-first from an underlying byte stream.
///
/// Once the underlying stream reports end of data, [`BitReader::read`]
/// returns `Ok(None)` forever.
pub struct BitReader<R: Read> {
    input: R,
    current_byte: u8,
    num_bits_remaining: u32,
    eof: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a bit reader over the given byte stream.
    pub fn new(input: R) -> Self {
        Self {
            input,
            current_byte: 0,
            num_bits_remaining: 0,
            eof: false,
        }
    }

    /// Read the next bit, or `None` at end of stream.
    pub fn read(&mut self) -> Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }
        if self.num_bits_remaining == 0 {
            let mut buf = [0u8; 1];
            loop {
                match self.input.read(&mut buf) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(None);
                    }
                    Ok(_) => break,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(Error::Io(e)),
                }
            }
            self.current_byte = buf[0];
            self.num_bits_remaining = 8;
        }
        self.num_bits_remaining -= 1;
        Ok(Some((self.current_byte >> self.num_bits_remaining) & 1))
    }

    /// Read the next bit, failing with [`Error::UnexpectedEof`] at end of
    /// stream.
    pub fn read_no_eof(&mut self) -> Result<u8> {
        self.read()?.ok_or(Error::UnexpectedEof)
    }
}

/// Writes bits MSB-first to an underlying byte stream.
pub struct BitWriter<W: Write> {
    output: W,
    current_byte: u8,
    num_bits_filled: u32,
}

impl<W: Write> BitWriter<W> {
    /// Create a bit writer over the given byte stream.
    pub fn new(output: W) -> Self {
        Self {
            output,
            current_byte: 0,
            num_bits_filled: 0,
        }
    }

    /// Write a single bit, which must be 0 or 1.
    pub fn write(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(Error::InvalidBit(bit));
        }
        self.current_byte = (self.current_byte << 1) | bit;
        self.num_bits_filled += 1;
        if self.num_bits_filled == 8 {
            self.output.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.num_bits_filled = 0;
        }
        Ok(())
    }

    /// Pad the current byte with zero bits (0 to 7 of them) and flush the
    /// underlying writer. Does not close the underlying stream.
    pub fn finish(&mut self) -> Result<()> {
        while self.num_bits_filled != 0 {
            self.write(0)?;
        }
        self.output.flush()?;
        Ok(())
    }
}
