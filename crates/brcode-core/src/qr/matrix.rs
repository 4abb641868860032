//! Module grid construction: function patterns, data placement and the
//! format/version information regions.

use super::tables::{alignment_positions, side_length};
use super::EcLevel;

/// Generator of the BCH(15,5) format code.
const FORMAT_GENERATOR: u32 = 0x537;

/// XOR mask applied to the format code.
const FORMAT_MASK: u32 = 0x5412;

/// Generator of the BCH(18,6) version code.
const VERSION_GENERATOR: u32 = 0x1F25;

/// State of a module while the symbol is being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleState {
    /// Not yet assigned.
    Empty,
    /// Reserved for a function pattern; never masked or overwritten by data.
    Function(bool),
    /// Data, EC or remainder bit, before masking.
    Data(bool),
}

/// Square module grid, row-major.
#[derive(Clone, Debug)]
pub struct Matrix {
    size: usize,
    modules: Vec<ModuleState>,
}

impl Matrix {
    /// Grid for `version` with every function pattern placed and the format
    /// area reserved (light until [`Matrix::draw_format`]).
    pub fn with_function_patterns(version: u8) -> Self {
        let size = side_length(version);
        let mut m = Matrix {
            size,
            modules: vec![ModuleState::Empty; size * size],
        };
        m.place_timing_patterns();
        m.place_finder_pattern(3, 3);
        m.place_finder_pattern(3, size - 4);
        m.place_finder_pattern(size - 4, 3);
        m.place_alignment_patterns(version);
        m.reserve_format_area();
        m.place_version_info(version);
        m
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// State at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> ModuleState {
        self.modules[row * self.size + col]
    }

    /// Whether (`row`, `col`) is part of a function pattern.
    pub fn is_function(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), ModuleState::Function(_))
    }

    fn set_function(&mut self, row: usize, col: usize, dark: bool) {
        self.modules[row * self.size + col] = ModuleState::Function(dark);
    }

    fn place_timing_patterns(&mut self) {
        for i in 0..self.size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }
    }

    /// 7x7 finder plus its one-module light separator, centred on
    /// (`row`, `col`). Modules outside the grid are skipped.
    fn place_finder_pattern(&mut self, row: usize, col: usize) {
        for dr in -4i32..=4 {
            for dc in -4i32..=4 {
                let r = row as i32 + dr;
                let c = col as i32 + dc;
                if r < 0 || c < 0 || r >= self.size as i32 || c >= self.size as i32 {
                    continue;
                }
                let dist = dr.abs().max(dc.abs());
                self.set_function(r as usize, c as usize, dist != 2 && dist != 4);
            }
        }
    }

    fn place_alignment_pattern(&mut self, row: usize, col: usize) {
        for dr in -2i32..=2 {
            for dc in -2i32..=2 {
                let r = (row as i32 + dr) as usize;
                let c = (col as i32 + dc) as usize;
                self.set_function(r, c, dr.abs().max(dc.abs()) != 1);
            }
        }
    }

    fn place_alignment_patterns(&mut self, version: u8) {
        let positions = alignment_positions(version);
        let last = positions.len().saturating_sub(1);
        for (i, &r) in positions.iter().enumerate() {
            for (j, &c) in positions.iter().enumerate() {
                // The three finder corners have no alignment pattern.
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.place_alignment_pattern(r, c);
            }
        }
    }

    fn reserve_format_area(&mut self) {
        let bits = vec![false; 15];
        self.write_format_modules(&bits);
    }

    fn place_version_info(&mut self, version: u8) {
        if version < 7 {
            return;
        }
        let bits = version_info_bits(version);
        for i in 0..18 {
            let dark = (bits >> i) & 1 != 0;
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            // Bottom-left block is the transpose of the top-right block.
            self.set_function(b, a, dark);
            self.set_function(a, b, dark);
        }
    }

    /// Fill every non-function module with the bits of `codewords` along the
    /// two-column zig-zag, right to left, skipping the vertical timing column.
    /// Modules left over after the last codeword are light remainder bits.
    pub fn place_data(&mut self, codewords: &[u8]) {
        let size = self.size;
        let total_bits = codewords.len() * 8;
        let mut bit_idx = 0usize;
        let mut right = size - 1;
        loop {
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..size {
                let row = if upward { size - 1 - vert } else { vert };
                for dc in 0..2 {
                    let col = right - dc;
                    if self.get(row, col) != ModuleState::Empty {
                        continue;
                    }
                    let dark = bit_idx < total_bits
                        && (codewords[bit_idx / 8] >> (7 - bit_idx % 8)) & 1 != 0;
                    self.modules[row * size + col] = ModuleState::Data(dark);
                    bit_idx += 1;
                }
            }
            if right < 2 {
                break;
            }
            right -= 2;
        }
        debug_assert!(bit_idx >= total_bits, "codewords overflow the symbol");
    }

    /// Module colours after XOR-ing data modules with `mask`.
    pub fn masked(&self, mask: u8) -> Vec<bool> {
        let size = self.size;
        self.modules
            .iter()
            .enumerate()
            .map(|(idx, state)| match *state {
                ModuleState::Function(d) => d,
                ModuleState::Data(d) => d ^ super::mask::applies(mask, idx / size, idx % size),
                ModuleState::Empty => false,
            })
            .collect()
    }

    /// Write both copies of the format information for (`level`, `mask`) into
    /// a masked module vector produced by [`Matrix::masked`].
    pub fn draw_format(&self, modules: &mut [bool], level: EcLevel, mask: u8) {
        let bits = format_info_bits(level, mask);
        for (i, (r, c)) in format_positions(self.size).into_iter().enumerate() {
            modules[r * self.size + c] = (bits >> (i % 15)) & 1 != 0;
        }
        // Dark module.
        modules[(self.size - 8) * self.size + 8] = true;
    }

    fn write_format_modules(&mut self, bits: &[bool]) {
        for (i, (r, c)) in format_positions(self.size).into_iter().enumerate() {
            self.set_function(r, c, bits[i % 15]);
        }
        let size = self.size;
        self.set_function(size - 8, 8, true);
    }
}

/// Positions of the 30 format modules: bits 0..15 of the copy around the
/// top-left finder, then bits 0..15 of the split copy.
pub fn format_positions(size: usize) -> Vec<(usize, usize)> {
    let mut pos = Vec::with_capacity(30);
    // Copy 1: column 8 going down, then row 8 going left.
    for i in 0..=5 {
        pos.push((i, 8));
    }
    pos.push((7, 8));
    pos.push((8, 8));
    pos.push((8, 7));
    for i in 9..15 {
        pos.push((8, 14 - i));
    }
    // Copy 2: row 8 from the right edge, then column 8 near the bottom.
    for i in 0..8 {
        pos.push((8, size - 1 - i));
    }
    for i in 8..15 {
        pos.push((size - 15 + i, 8));
    }
    pos
}

/// 15-bit BCH-protected format word for (`level`, `mask`), already XOR-ed
/// with 0x5412. Bit 14 is the most significant.
pub fn format_info_bits(level: EcLevel, mask: u8) -> u32 {
    let data = (level.format_bits() << 3) | u32::from(mask);
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    ((data << 10) | (rem & 0x3FF)) ^ FORMAT_MASK
}

/// 18-bit BCH-protected version word (versions 7 and up).
pub fn version_info_bits(version: u8) -> u32 {
    let data = u32::from(version);
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (data << 12) | (rem & 0xFFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::tables::raw_data_modules;

    #[test]
    fn format_bits_reference_values() {
        // Level M with mask 0 encodes data 00000, leaving only the XOR mask.
        assert_eq!(format_info_bits(EcLevel::M, 0), 0b101010000010010);
        assert_eq!(format_info_bits(EcLevel::L, 0), 0b111011111000100);
        assert_eq!(format_info_bits(EcLevel::H, 7), 0b000100000111011);
    }

    #[test]
    fn version_bits_reference_values() {
        assert_eq!(version_info_bits(7), 0x07C94);
        assert_eq!(version_info_bits(40), 0x28C69);
    }

    #[test]
    fn free_modules_match_raw_capacity() {
        for version in [1u8, 2, 6, 7, 14, 21, 32, 40] {
            let m = Matrix::with_function_patterns(version);
            let size = m.size();
            let empty = (0..size * size)
                .filter(|&i| m.get(i / size, i % size) == ModuleState::Empty)
                .count();
            assert_eq!(empty, raw_data_modules(version), "version {version}");
        }
    }

    #[test]
    fn finder_pattern_shape() {
        let m = Matrix::with_function_patterns(1);
        let expected = [
            "1111111", "1000001", "1011101", "1011101", "1011101", "1000001", "1111111",
        ];
        for (r, line) in expected.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                assert_eq!(m.get(r, c), ModuleState::Function(ch == '1'), "({r}, {c})");
            }
        }
        // Separator.
        for i in 0..8 {
            assert_eq!(m.get(7, i), ModuleState::Function(false));
            assert_eq!(m.get(i, 7), ModuleState::Function(false));
        }
    }

    #[test]
    fn data_fills_every_free_module() {
        let version = 2;
        let mut m = Matrix::with_function_patterns(version);
        let codewords = vec![0xFFu8; raw_data_modules(version) / 8];
        m.place_data(&codewords);
        let size = m.size();
        let mut dark_data = 0;
        for r in 0..size {
            for c in 0..size {
                match m.get(r, c) {
                    ModuleState::Empty => panic!("({r}, {c}) left empty"),
                    ModuleState::Data(true) => dark_data += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(dark_data, codewords.len() * 8);
    }

    #[test]
    fn first_codeword_starts_bottom_right() {
        let mut m = Matrix::with_function_patterns(1);
        m.place_data(&[0b1000_0000]);
        assert_eq!(m.get(20, 20), ModuleState::Data(true));
        assert_eq!(m.get(20, 19), ModuleState::Data(false));
        assert_eq!(m.get(19, 20), ModuleState::Data(false));
    }
}
