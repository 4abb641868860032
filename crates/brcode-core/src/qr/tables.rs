//! Version and error-correction block tables (ISO/IEC 18004, Tables 9 and 10).

use super::EcLevel;

/// Smallest symbol version.
pub const MIN_VERSION: u8 = 1;

/// Largest symbol version.
pub const MAX_VERSION: u8 = 40;

/// EC codewords per block, indexed by `[level.ordinal()][version]`.
/// Index 0 is padding.
#[rustfmt::skip]
const EC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    // 0, 1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [0,  7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // L
    [0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28], // M
    [0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // Q
    [0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // H
];

/// Number of EC blocks, indexed by `[level.ordinal()][version]`.
#[rustfmt::skip]
const NUM_BLOCKS: [[u8; 41]; 4] = [
    // 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [0,  1, 1, 1, 1, 1, 2, 2, 2, 2,  4,  4,  4,  4,  4,  6,  6,  6,  6,  7,  8,  8,  9,  9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25], // L
    [0,  1, 1, 1, 2, 2, 4, 4, 4, 5,  5,  5,  8,  9,  9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49], // M
    [0,  1, 1, 2, 2, 4, 4, 6, 6, 8,  8,  8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68], // Q
    [0,  1, 1, 2, 4, 4, 4, 5, 6, 8,  8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81], // H
];

/// Block structure of one version at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    /// Total codewords in the symbol (data + EC).
    pub total_codewords: usize,
    /// EC codewords appended to every block.
    pub ec_per_block: usize,
    /// Number of blocks.
    pub blocks: usize,
}

impl BlockLayout {
    /// Look up the layout for `version` at `level`.
    pub fn new(version: u8, level: EcLevel) -> Self {
        debug_assert!((MIN_VERSION..=MAX_VERSION).contains(&version));
        let v = usize::from(version);
        let l = level.ordinal();
        Self {
            total_codewords: raw_data_modules(version) / 8,
            ec_per_block: usize::from(EC_CODEWORDS_PER_BLOCK[l][v]),
            blocks: usize::from(NUM_BLOCKS[l][v]),
        }
    }

    /// Data codewords available to the encoded segment.
    pub fn data_codewords(&self) -> usize {
        self.total_codewords - self.ec_per_block * self.blocks
    }

    /// Blocks that carry one data codeword fewer than the rest.
    pub fn short_blocks(&self) -> usize {
        self.blocks - self.total_codewords % self.blocks
    }

    /// Data codewords in a short block.
    pub fn short_block_data_len(&self) -> usize {
        self.total_codewords / self.blocks - self.ec_per_block
    }
}

/// Side length in modules.
pub fn side_length(version: u8) -> usize {
    usize::from(version) * 4 + 17
}

/// Modules left for data and EC bits once every function pattern is placed,
/// including the remainder bits.
pub fn raw_data_modules(version: u8) -> usize {
    let v = usize::from(version);
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Centre coordinates (shared by rows and columns) of the alignment patterns.
pub fn alignment_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let v = usize::from(version);
    let num_align = v / 7 + 2;
    let step = (v * 8 + num_align * 3 + 5) / (num_align * 4 - 4) * 2;
    let last = side_length(version) - 7;
    // Centres after the first are evenly spaced back from the far edge; the
    // gap to 6 absorbs the remainder.
    let mut positions: Vec<usize> = (0..num_align - 1).map(|i| last - i * step).collect();
    positions.push(6);
    positions.reverse();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_capacities_match_reference_values() {
        // (version, level, data codewords)
        let cases = [
            (1, EcLevel::L, 19),
            (1, EcLevel::M, 16),
            (1, EcLevel::Q, 13),
            (1, EcLevel::H, 9),
            (5, EcLevel::M, 86),
            (5, EcLevel::Q, 62),
            (10, EcLevel::M, 216),
            (40, EcLevel::L, 2956),
            (40, EcLevel::M, 2334),
            (40, EcLevel::Q, 1666),
            (40, EcLevel::H, 1276),
        ];
        for (v, l, expected) in cases {
            assert_eq!(BlockLayout::new(v, l).data_codewords(), expected, "v{v} {l:?}");
        }
    }

    #[test]
    fn block_sizes_are_consistent() {
        for v in MIN_VERSION..=MAX_VERSION {
            for l in EcLevel::ALL {
                let layout = BlockLayout::new(v, l);
                let long = layout.blocks - layout.short_blocks();
                let data = layout.short_block_data_len() * layout.blocks + long;
                assert_eq!(data, layout.data_codewords(), "v{v} {l:?}");
                assert!(layout.short_blocks() >= 1);
            }
        }
    }

    #[test]
    fn raw_modules_known_values() {
        assert_eq!(raw_data_modules(1), 208);
        assert_eq!(raw_data_modules(2), 359);
        assert_eq!(raw_data_modules(7), 1568);
        assert_eq!(raw_data_modules(40), 29648);
    }

    #[test]
    fn alignment_positions_ascend_within_grid() {
        for v in 2..=MAX_VERSION {
            let positions = alignment_positions(v);
            assert_eq!(positions.len(), usize::from(v) / 7 + 2, "v{v}");
            assert_eq!(positions[0], 6);
            assert_eq!(*positions.last().unwrap(), side_length(v) - 7);
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "v{v}: {positions:?}");
        }
    }

    #[test]
    fn alignment_positions_known_values() {
        assert!(alignment_positions(1).is_empty());
        assert_eq!(alignment_positions(2), vec![6, 18]);
        assert_eq!(alignment_positions(7), vec![6, 22, 38]);
        assert_eq!(alignment_positions(32), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(alignment_positions(36), vec![6, 24, 50, 76, 102, 128, 154]);
        assert_eq!(alignment_positions(39), vec![6, 26, 54, 82, 110, 138, 166]);
        assert_eq!(alignment_positions(40), vec![6, 30, 58, 86, 114, 142, 170]);
    }
}
