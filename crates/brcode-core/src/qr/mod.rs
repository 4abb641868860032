//! QR code symbol encoder (ISO/IEC 18004, model 2).
//!
//! Converts payload text into a module matrix:
//! - numeric, alphanumeric or byte mode, whichever is most compact
//! - versions 1-40 (21x21 to 177x177 modules), levels L, M, Q, H
//! - Reed-Solomon error correction over GF(2^8) with polynomial 0x11D
//! - finder, separator, timing and alignment patterns, format and version
//!   information
//! - all 8 mask patterns scored by the four penalty rules, best one kept
//!
//! # Example
//!
//! ```
//! use brcode_core::qr::{encode_symbol, EcLevel};
//!
//! let symbol = encode_symbol("HELLO WORLD").unwrap();
//! assert_eq!(symbol.version(), 1);
//! assert_eq!(symbol.size(), 21);
//! assert!(symbol.ec_level() >= EcLevel::M);
//! ```

pub mod mask;
pub mod matrix;
pub mod reed_solomon;
pub mod segment;
pub mod tables;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SymbolOptions;
use crate::error::{BrCodeError, Result};

use self::matrix::Matrix;
use self::segment::{Mode, Segment};
use self::tables::BlockLayout;

pub use self::tables::{MAX_VERSION, MIN_VERSION};

/// Error-correction level, ordered from weakest to strongest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EcLevel {
    /// Low (~7% recovery).
    L,
    /// Medium (~15% recovery).
    #[default]
    M,
    /// Quartile (~25% recovery).
    Q,
    /// High (~30% recovery).
    H,
}

impl EcLevel {
    /// All levels, weakest first.
    pub const ALL: [EcLevel; 4] = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H];

    /// Row index into the block tables.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Two-bit level code stored in the format information.
    pub fn format_bits(self) -> u32 {
        match self {
            EcLevel::L => 0b01,
            EcLevel::M => 0b00,
            EcLevel::Q => 0b11,
            EcLevel::H => 0b10,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        })
    }
}

impl FromStr for EcLevel {
    type Err = BrCodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            _ => Err(BrCodeError::InvalidConfig(format!(
                "unknown error-correction level {s:?} (expected L, M, Q or H)"
            ))),
        }
    }
}

/// A finished QR code symbol. Read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    version: u8,
    ec_level: EcLevel,
    mask: u8,
    mode: Mode,
    size: usize,
    modules: Vec<bool>,
}

impl Symbol {
    /// Symbol version (1-40).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Error-correction level written into the format information.
    pub fn ec_level(&self) -> EcLevel {
        self.ec_level
    }

    /// Mask pattern id (0-7).
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Segment mode the text was encoded with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at (`row`, `col`) is dark. Out-of-range
    /// coordinates read as light, like the quiet zone.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.modules[row * self.size + col]
    }

    /// Row-major module colours, `true` = dark.
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Iterate over rows of modules.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.size)
    }
}

/// Encode `text` at the default options (minimum level M, EC boosting on).
pub fn encode_symbol(text: &str) -> Result<Symbol> {
    encode_symbol_with(text, &SymbolOptions::default())
}

/// Encode `text` into a QR symbol.
///
/// Picks the smallest version that holds the text at `options.min_ec_level`,
/// optionally raises the level while the version still fits, then evaluates
/// every mask (unless one is forced) and keeps the lowest penalty.
pub fn encode_symbol_with(text: &str, options: &SymbolOptions) -> Result<Symbol> {
    options.validate()?;
    let segment = Segment::new(text.as_bytes());

    let (version, used_bits) = select_version(&segment, options)?;
    let min_level = options.min_ec_level;
    let mut level = min_level;
    if options.boost_ec {
        for candidate in EcLevel::ALL.into_iter().filter(|l| *l > min_level) {
            if used_bits <= BlockLayout::new(version, candidate).data_codewords() * 8 {
                level = candidate;
            }
        }
    }

    let layout = BlockLayout::new(version, level);
    let data = segment::data_codewords(&segment, version, layout.data_codewords());
    let codewords = add_ec_and_interleave(&data, &layout);

    let mut matrix = Matrix::with_function_patterns(version);
    matrix.place_data(&codewords);

    let candidates: Vec<u8> = match options.mask {
        Some(m) => vec![m],
        None => (0..mask::MASK_COUNT).collect(),
    };
    let mut best: Option<(u8, u32, Vec<bool>)> = None;
    for m in candidates {
        let mut modules = matrix.masked(m);
        matrix.draw_format(&mut modules, level, m);
        let score = mask::penalty(&modules, matrix.size());
        if best.as_ref().map_or(true, |(_, s, _)| score < *s) {
            best = Some((m, score, modules));
        }
    }
    let (mask, score, modules) =
        best.ok_or_else(|| BrCodeError::InvalidConfig("no mask pattern to evaluate".into()))?;

    debug!(
        version,
        level = %level,
        mode = %segment.mode(),
        mask,
        penalty = score,
        data_bits = used_bits,
        "encoded symbol"
    );

    Ok(Symbol {
        version,
        ec_level: level,
        mask,
        mode: segment.mode(),
        size: matrix.size(),
        modules,
    })
}

/// Smallest version in the configured range whose capacity at the minimum
/// level holds the segment. Returns the version and the segment's bit length.
fn select_version(segment: &Segment<'_>, options: &SymbolOptions) -> Result<(u8, usize)> {
    let level = options.min_ec_level;
    let mut needed = 0;
    for version in options.min_version..=options.max_version {
        let Some(bits) = segment.total_bits(version) else {
            continue;
        };
        needed = bits;
        if bits <= BlockLayout::new(version, level).data_codewords() * 8 {
            return Ok((version, bits));
        }
    }
    if needed == 0 {
        needed = 4 + segment.mode().count_bits(options.max_version)
            + segment.mode().data_bits(segment.char_count());
    }
    Err(BrCodeError::PayloadTooLarge {
        bits: needed,
        level,
    })
}

/// Split data codewords into blocks, append each block's EC codewords, and
/// interleave: data column by column, then EC column by column.
fn add_ec_and_interleave(data: &[u8], layout: &BlockLayout) -> Vec<u8> {
    debug_assert_eq!(data.len(), layout.data_codewords());
    let short_len = layout.short_block_data_len();
    let generator = reed_solomon::generator(layout.ec_per_block);

    let mut data_blocks: Vec<&[u8]> = Vec::with_capacity(layout.blocks);
    let mut ec_blocks: Vec<Vec<u8>> = Vec::with_capacity(layout.blocks);
    let mut offset = 0;
    for i in 0..layout.blocks {
        // Short blocks come first; the rest carry one extra data codeword.
        let len = short_len + usize::from(i >= layout.short_blocks());
        let block = &data[offset..offset + len];
        ec_blocks.push(reed_solomon::remainder(block, &generator));
        data_blocks.push(block);
        offset += len;
    }

    let mut result = Vec::with_capacity(layout.total_codewords);
    for i in 0..=short_len {
        for block in &data_blocks {
            if let Some(&b) = block.get(i) {
                result.push(b);
            }
        }
    }
    for i in 0..layout.ec_per_block {
        for block in &ec_blocks {
            result.push(block[i]);
        }
    }
    debug_assert_eq!(result.len(), layout.total_codewords);
    result
}
