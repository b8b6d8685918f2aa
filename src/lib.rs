//! # Arithmetic Coding
//!
//! *Entropy coding at the Shannon limit, one interval at a time.*
//!
//! ## Intuition First
//!
//! Imagine the interval [0, 1) as a ruler. Give every symbol a segment of
//! the ruler proportional to its probability. To encode a message, zoom
//! into the segment of the first symbol, subdivide that segment the same
//! way, zoom again for the second symbol, and so on. Any number inside
//! the final sliver identifies the whole message.
//!
//! Arithmetic coding is that zooming process carried out in fixed-width
//! integers. The interval `[low, high]` shrinks symbol by symbol; bits
//! the two ends agree on are emitted immediately, and straddles of the
//! midpoint are deferred through an underflow counter until a later
//! symbol resolves them.
//!
//! ## The Problem
//!
//! Prefix codes assign whole bits per symbol:
//! - **Huffman coding**: fast, but rounds every probability to a power of
//!   two, wasting up to a bit per symbol.
//! - **Arithmetic coding**: spends fractional bits per symbol, reaching
//!   the entropy of whatever model feeds it, which makes the *model* the
//!   interesting part.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon          Entropy as the fundamental limit
//! 1952  Huffman          Optimal prefix codes
//! 1976  Rissanen/Pasco   Arithmetic coding: fractional bits per symbol
//! 1979  Rubin            Carry control for streaming implementations
//! 1987  Witten/Neal/     CACM reference implementation with integer
//!       Cleary           state and underflow deferral
//! 1984  Cleary/Witten    PPM: escape-based variable-order modeling
//! 1990  Moffat           PPMC escape estimation refinements
//! ```
//!
//! ## Mathematical Formulation
//!
//! Given cumulative frequencies $\mathrm{low}(s)$, $\mathrm{high}(s)$ and
//! total $T$, each symbol maps the interval of width
//! $R = \mathrm{high} - \mathrm{low} + 1$ onto its sub-interval:
//!
//! ```text
//! low'  = low + ⌊low(s) · R / T⌋
//! high' = low + ⌊high(s) · R / T⌋ − 1
//! ```
//!
//! The decoder inverts the map by locating its code register inside
//! exactly one sub-interval, then applies the identical update.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(\log n)$ per symbol for the decoder's cumulative binary
//!   search ($n$ = alphabet size), plus $O(n)$ for a lazy cumulative
//!   rebuild after a table mutation.
//! - **Space**: $O(n)$ per frequency table; the PPM context tree grows up
//!   to $O(n^k)$ for model order $k$.
//!
//! ## Failure Modes
//!
//! 1. **Total too large**: if a table's total exceeds the per-state-size
//!    ceiling, sub-intervals could collapse or overflow 64 bits; the
//!    coder refuses rather than desynchronize.
//! 2. **Model drift**: encoder and decoder must apply identical model
//!    updates in identical order; any divergence garbles the rest of the
//!    stream.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **coder**: the fixed-precision encoder/decoder pair over any
//!   [`FrequencyTable`].
//! - **frequency**: flat and mutable tables with lazily cached cumulative
//!   sums.
//! - **ppm**: an escape-based context-tree model.
//! - **stream**: self-delimited static, adaptive and PPM file codecs and
//!   the driver binaries built on them.
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic Coding
//!   for Data Compression." Communications of the ACM 30(6).
//! - Cleary, J. G., Witten, I. H. (1984). "Data Compression Using
//!   Adaptive Coding and Partial String Matching." IEEE Trans. Comm.
//! - Moffat, A., Neal, R. M., Witten, I. H. (1998). "Arithmetic Coding
//!   Revisited." ACM TOIS 16(3).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod coder;
pub mod error;
pub mod frequency;
pub mod ppm;
pub mod stream;

pub use bitio::{BitReader, BitWriter};
pub use coder::{ArithmeticDecoder, ArithmeticEncoder};
pub use error::{Error, Result};
pub use frequency::{FlatFrequencyTable, FrequencyTable, SimpleFrequencyTable};
pub use ppm::PpmModel;
pub use stream::{
    compress_adaptive, compress_ppm, compress_static, decompress_adaptive, decompress_ppm,
    decompress_static, MODEL_ORDER,
};
