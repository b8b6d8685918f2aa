//! Fixed-precision arithmetic coder core.
//!
//! The encoder and decoder share one integer recurrence over a shrinking
//! code interval `[low, high]` of `num_state_bits` bits. Top bits are
//! emitted (or consumed) only once both ends of the interval agree on
//! them, so the decoder can reproduce every decision from the bit stream
//! alone; straddles of the midpoint are deferred through an underflow
//! counter and resolved as complements of the next agreed top bit.
//!
//! All interval arithmetic is done in `u64`; the `maximum_total` ceiling
//! derived from the state size guarantees that no intermediate product
//! overflows and that no symbol's sub-interval collapses to nothing.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Interval state and derived constants shared by encoder and decoder.
#[derive(Debug)]
struct CodeRange {
    num_state_bits: u32,
    full_range: u64,
    half_range: u64,
    quarter_range: u64,
    minimum_range: u64,
    maximum_total: u64,
    state_mask: u64,
    // low conceptually has infinite trailing 0s, high infinite trailing 1s.
    low: u64,
    high: u64,
}

impl CodeRange {
    fn new(num_state_bits: u32) -> Result<Self> {
        if !(1..=63).contains(&num_state_bits) {
            return Err(Error::InvalidStateSize(num_state_bits));
        }
        let full_range = 1u64 << num_state_bits;
        let half_range = full_range >> 1;
        let quarter_range = half_range >> 1;
        let minimum_range = quarter_range + 2;
        let maximum_total = (u64::MAX / full_range).min(minimum_range);
        let state_mask = full_range - 1;
        Ok(Self {
            num_state_bits,
            full_range,
            half_range,
            quarter_range,
            minimum_range,
            maximum_total,
            state_mask,
            low: 0,
            high: state_mask,
        })
    }

    /// Check the interval invariants and the table values, then narrow the
    /// interval onto the symbol's sub-range. Encoder and decoder both go
    /// through this exact arithmetic, which is what keeps them in lockstep.
    fn narrow<F: FrequencyTable + ?Sized>(&mut self, freqs: &F, symbol: u32) -> Result<()> {
        if self.low >= self.high
            || self.low & self.state_mask != self.low
            || self.high & self.state_mask != self.high
        {
            return Err(Error::Logic("low or high out of range"));
        }
        let range = self.high - self.low + 1;
        if !(self.minimum_range..=self.full_range).contains(&range) {
            return Err(Error::Logic("range out of range"));
        }

        let total = u64::from(freqs.total());
        let sym_low = u64::from(freqs.low(symbol)?);
        let sym_high = u64::from(freqs.high(symbol)?);
        if sym_low == sym_high {
            return Err(Error::ZeroFrequency(symbol));
        }
        if total > self.maximum_total {
            return Err(Error::TotalTooLarge {
                total,
                maximum: self.maximum_total,
            });
        }

        let new_low = self.low + sym_low * range / total;
        let new_high = self.low + sym_high * range / total - 1;
        self.low = new_low;
        self.high = new_high;
        Ok(())
    }
}

/// Encodes symbols into a bit stream using arbitrary frequency tables.
///
/// The encoder borrows its [`BitWriter`]; after [`finish`](Self::finish)
/// the caller must also call [`BitWriter::finish`] to pad the stream to a
/// byte boundary, in that order.
pub struct ArithmeticEncoder<'a, W: Write> {
    state: CodeRange,
    output: &'a mut BitWriter<W>,
    num_underflow: u64,
}

impl<'a, W: Write> ArithmeticEncoder<'a, W> {
    /// Create an encoder with the given state size, writing to `output`.
    pub fn new(num_state_bits: u32, output: &'a mut BitWriter<W>) -> Result<Self> {
        Ok(Self {
            state: CodeRange::new(num_state_bits)?,
            output,
            num_underflow: 0,
        })
    }

    /// Encode a symbol drawn from the given frequency table.
    pub fn write<F: FrequencyTable + ?Sized>(&mut self, freqs: &F, symbol: u32) -> Result<()> {
        self.state.narrow(freqs, symbol)?;

        // Shift out bits on which low and high agree.
        while (self.state.low ^ self.state.high) & self.state.half_range == 0 {
            self.shift()?;
            self.state.low = (self.state.low << 1) & self.state.state_mask;
            self.state.high = ((self.state.high << 1) & self.state.state_mask) | 1;
        }

        // Defer straddles of the midpoint: low starts 01, high starts 10.
        while self.state.low & !self.state.high & self.state.quarter_range != 0 {
            self.underflow()?;
            self.state.low = (self.state.low << 1) & (self.state.state_mask >> 1);
            self.state.high = ((self.state.high << 1) & (self.state.state_mask >> 1))
                | self.state.half_range
                | 1;
        }
        Ok(())
    }

    /// Terminate the symbol stream with a single 1 bit, which forces the
    /// decoder to settle inside the final interval. The caller must then
    /// finish the underlying bit writer.
    pub fn finish(&mut self) -> Result<()> {
        self.output.write(1)
    }

    fn shift(&mut self) -> Result<()> {
        let bit = (self.state.low >> (self.state.num_state_bits - 1)) as u8;
        self.output.write(bit)?;

        // Write out the deferred underflow bits as complements.
        for _ in 0..self.num_underflow {
            self.output.write(bit ^ 1)?;
        }
        self.num_underflow = 0;
        Ok(())
    }

    fn underflow(&mut self) -> Result<()> {
        if self.num_underflow == u64::MAX {
            return Err(Error::MaximumUnderflow);
        }
        self.num_underflow += 1;
        Ok(())
    }
}

/// Decodes symbols from a bit stream, mirroring [`ArithmeticEncoder`].
///
/// Reads past the end of the stream behave as an infinite tail of zero
/// bits, which together with the encoder's final 1 bit is what makes the
/// stream self-delimiting.
pub struct ArithmeticDecoder<'a, R: Read> {
    state: CodeRange,
    input: &'a mut BitReader<R>,
    code: u64,
}

impl<'a, R: Read> ArithmeticDecoder<'a, R> {
    /// Create a decoder with the given state size, filling its code
    /// register from `input`.
    pub fn new(num_state_bits: u32, input: &'a mut BitReader<R>) -> Result<Self> {
        let state = CodeRange::new(num_state_bits)?;
        let mut decoder = Self {
            state,
            input,
            code: 0,
        };
        for _ in 0..decoder.state.num_state_bits {
            decoder.code = decoder.code << 1 | u64::from(decoder.read_code_bit()?);
        }
        Ok(decoder)
    }

    /// Decode the next symbol against the given frequency table.
    ///
    /// The table must be in the same state the encoder's table was in when
    /// the symbol was written.
    pub fn read<F: FrequencyTable + ?Sized>(&mut self, freqs: &F) -> Result<u32> {
        let total = u64::from(freqs.total());
        if total > self.state.maximum_total {
            return Err(Error::TotalTooLarge {
                total,
                maximum: self.state.maximum_total,
            });
        }

        // Translate the code register into the frequency table's scale.
        let range = self.state.high - self.state.low + 1;
        let offset = self.code - self.state.low;
        let value = ((offset + 1) * total - 1) / range;
        if value * range / total > offset {
            return Err(Error::Logic("value consistency check failed"));
        }
        if value >= total {
            return Err(Error::Logic("value out of range"));
        }

        // Find the highest symbol whose cumulative low is at most `value`.
        let mut start = 0u32;
        let mut end = freqs.symbol_limit();
        while end - start > 1 {
            let middle = (start + end) >> 1;
            if u64::from(freqs.low(middle)?) > value {
                end = middle;
            } else {
                start = middle;
            }
        }
        if start + 1 != end {
            return Err(Error::Logic("binary search produced the wrong bracket"));
        }
        let symbol = start;

        let sym_low = u64::from(freqs.low(symbol)?);
        let sym_high = u64::from(freqs.high(symbol)?);
        if offset < sym_low * range / total || sym_high * range / total <= offset {
            return Err(Error::Logic("code outside the decoded symbol's sub-range"));
        }

        self.update(freqs, symbol)?;
        if self.code < self.state.low || self.code > self.state.high {
            return Err(Error::Logic("code out of range"));
        }
        Ok(symbol)
    }

    fn update<F: FrequencyTable + ?Sized>(&mut self, freqs: &F, symbol: u32) -> Result<()> {
        self.state.narrow(freqs, symbol)?;

        while (self.state.low ^ self.state.high) & self.state.half_range == 0 {
            self.shift()?;
            self.state.low = (self.state.low << 1) & self.state.state_mask;
            self.state.high = ((self.state.high << 1) & self.state.state_mask) | 1;
        }

        while self.state.low & !self.state.high & self.state.quarter_range != 0 {
            self.underflow()?;
            self.state.low = (self.state.low << 1) & (self.state.state_mask >> 1);
            self.state.high = ((self.state.high << 1) & (self.state.state_mask >> 1))
                | self.state.half_range
                | 1;
        }
        Ok(())
    }

    fn shift(&mut self) -> Result<()> {
        self.code = ((self.code << 1) & self.state.state_mask) | u64::from(self.read_code_bit()?);
        Ok(())
    }

    fn underflow(&mut self) -> Result<()> {
        // Keep the top bit, drop the second-highest, append a fresh bit.
        self.code = (self.code & self.state.half_range)
            | ((self.code << 1) & (self.state.state_mask >> 1))
            | u64::from(self.read_code_bit()?);
        Ok(())
    }

    fn read_code_bit(&mut self) -> Result<u8> {
        Ok(self.input.read()?.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::SimpleFrequencyTable;
    use proptest::prelude::*;

    fn roundtrip(num_state_bits: u32, freqs: &SimpleFrequencyTable, symbols: &[u32]) -> Vec<u32> {
        let mut encoded = Vec::new();
        let mut bitout = BitWriter::new(&mut encoded);
        let mut enc = ArithmeticEncoder::new(num_state_bits, &mut bitout).unwrap();
        for &s in symbols {
            enc.write(freqs, s).unwrap();
        }
        enc.finish().unwrap();
        bitout.finish().unwrap();

        let mut bitin = BitReader::new(&encoded[..]);
        let mut dec = ArithmeticDecoder::new(num_state_bits, &mut bitin).unwrap();
        (0..symbols.len()).map(|_| dec.read(freqs).unwrap()).collect()
    }

    #[test]
    fn test_state_size_bounds() {
        assert!(matches!(
            CodeRange::new(0).unwrap_err(),
            Error::InvalidStateSize(0)
        ));
        assert!(matches!(
            CodeRange::new(64).unwrap_err(),
            Error::InvalidStateSize(64)
        ));
        assert!(CodeRange::new(1).is_ok());
        assert!(CodeRange::new(63).is_ok());
    }

    #[test]
    fn test_maximum_total_never_exceeds_minimum_range() {
        for bits in 1..=63 {
            let range = CodeRange::new(bits).unwrap();
            assert!(range.maximum_total <= range.minimum_range);
            assert!(range.maximum_total >= 1);
        }
    }

    #[test]
    fn test_recommended_state_size_constants() {
        let range = CodeRange::new(32).unwrap();
        assert_eq!(range.full_range, 1 << 32);
        assert_eq!(range.minimum_range, (1 << 30) + 2);
        assert_eq!(range.maximum_total, (1 << 30) + 2);
        assert_eq!(range.state_mask, u64::from(u32::MAX));
    }

    #[test]
    fn test_interval_invariants_hold_after_every_symbol() {
        let freqs = SimpleFrequencyTable::new(vec![5, 1, 9, 2, 7]).unwrap();
        let pattern = [0u32, 2, 4, 2, 0, 3, 1];
        let symbols: Vec<u32> = (0..200).map(|i: usize| pattern[i % 7]).collect();

        let mut encoded = Vec::new();
        let mut bitout = BitWriter::new(&mut encoded);
        let mut enc = ArithmeticEncoder::new(16, &mut bitout).unwrap();
        for &s in &symbols {
            enc.write(&freqs, s).unwrap();
            let st = &enc.state;
            assert!(st.low <= st.state_mask && st.high <= st.state_mask);
            assert!(st.low < st.half_range && st.high >= st.half_range);
            assert!(!(st.low >= st.quarter_range && st.high < 3 * st.quarter_range));
        }
        enc.finish().unwrap();
        bitout.finish().unwrap();

        let mut bitin = BitReader::new(&encoded[..]);
        let mut dec = ArithmeticDecoder::new(16, &mut bitin).unwrap();
        for &expected in &symbols {
            assert_eq!(dec.read(&freqs).unwrap(), expected);
            assert!(dec.state.low <= dec.code && dec.code <= dec.state.high);
        }
    }

    #[test]
    fn test_roundtrip_at_one_state_bit() {
        // At num_state_bits = 1 the maximum total is 2, so only a binary
        // alphabet with unit frequencies can be coded.
        let freqs = SimpleFrequencyTable::new(vec![1, 1]).unwrap();
        let symbols = vec![0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1];
        assert_eq!(roundtrip(1, &freqs, &symbols), symbols);
    }

    #[test]
    fn test_roundtrip_across_state_sizes() {
        let freqs = SimpleFrequencyTable::new(vec![1, 1, 1]).unwrap();
        let symbols: Vec<u32> = (0..50).map(|i| (i * 7 % 3) as u32).collect();
        for bits in [2, 8, 16, 32, 62] {
            assert_eq!(roundtrip(bits, &freqs, &symbols), symbols, "bits={bits}");
        }
    }

    #[test]
    fn test_zero_frequency_symbol_rejected() {
        let freqs = SimpleFrequencyTable::new(vec![1, 0, 1]).unwrap();
        let mut encoded = Vec::new();
        let mut bitout = BitWriter::new(&mut encoded);
        let mut enc = ArithmeticEncoder::new(32, &mut bitout).unwrap();
        let err = enc.write(&freqs, 1).unwrap_err();
        assert!(matches!(err, Error::ZeroFrequency(1)));
    }

    #[test]
    fn test_oversized_total_rejected() {
        // num_state_bits = 8 gives maximum_total = 66.
        let freqs = SimpleFrequencyTable::new(vec![50, 50]).unwrap();
        let mut encoded = Vec::new();
        let mut bitout = BitWriter::new(&mut encoded);
        let mut enc = ArithmeticEncoder::new(8, &mut bitout).unwrap();
        let err = enc.write(&freqs, 0).unwrap_err();
        assert!(matches!(err, Error::TotalTooLarge { total: 100, .. }));
        assert!(err.is_domain());
    }

    #[test]
    fn test_underflow_stress_roundtrip() {
        // A skewed distribution repeatedly lands the interval on the
        // midpoint straddle, exercising the deferred-bit path.
        let freqs = SimpleFrequencyTable::new(vec![1, 1, 1]).unwrap();
        let symbols = vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2];
        assert_eq!(roundtrip(32, &freqs, &symbols), symbols);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_random_tables(
            freqs in prop::collection::vec(1u32..8, 2..8),
            seed in prop::collection::vec(0usize..1000, 1..200),
            bits in prop::sample::select(vec![8u32, 16, 32]),
        ) {
            // Frequencies are bounded so the total stays below the
            // smallest maximum_total in play (66 at 8 state bits).
            let table = SimpleFrequencyTable::new(freqs.clone()).unwrap();
            prop_assume!(u64::from(table.total()) <= CodeRange::new(bits).unwrap().maximum_total);
            let symbols: Vec<u32> =
                seed.iter().map(|&i| (i % freqs.len()) as u32).collect();
            prop_assert_eq!(roundtrip(bits, &table, &symbols), symbols);
        }
    }
}
