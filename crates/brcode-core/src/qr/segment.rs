//! Data segment encoding: mode selection and the codeword bit stream.

use std::fmt;

/// Characters of the alphanumeric mode, in value order.
const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pad codewords appended after the terminator, alternating.
const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Encoding mode of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Decimal digits, 10 bits per 3 digits.
    Numeric,
    /// Upper-case letters, digits and ` $%*+-./:`, 11 bits per 2 characters.
    Alphanumeric,
    /// Raw bytes, 8 bits each.
    Byte,
}

impl Mode {
    /// Most compact mode that represents every byte of `data`.
    pub fn select(data: &[u8]) -> Self {
        if data.iter().all(u8::is_ascii_digit) {
            Mode::Numeric
        } else if data.iter().all(|b| alphanumeric_value(*b).is_some()) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }

    /// Four-bit mode indicator.
    pub fn indicator(self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
        }
    }

    /// Width of the character count field for `version`.
    pub fn count_bits(self, version: u8) -> usize {
        let band = match version {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Mode::Numeric => [10, 12, 14][band],
            Mode::Alphanumeric => [9, 11, 13][band],
            Mode::Byte => [8, 16, 16][band],
        }
    }

    /// Bits taken by `chars` characters of payload in this mode.
    pub fn data_bits(self, chars: usize) -> usize {
        match self {
            Mode::Numeric => chars / 3 * 10 + [0, 4, 7][chars % 3],
            Mode::Alphanumeric => chars / 2 * 11 + (chars % 2) * 6,
            Mode::Byte => chars * 8,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Numeric => "numeric",
            Mode::Alphanumeric => "alphanumeric",
            Mode::Byte => "byte",
        })
    }
}

fn alphanumeric_value(b: u8) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .iter()
        .position(|&c| c == b)
        .map(|p| p as u32)
}

/// A single-mode data segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    mode: Mode,
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    /// Segment over `data` in the most compact mode.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            mode: Mode::select(data),
            data,
        }
    }

    /// Encoding mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Character count (bytes, for every mode used here).
    pub fn char_count(&self) -> usize {
        self.data.len()
    }

    /// Total bits (indicator + count + data) at `version`, or `None` when the
    /// character count overflows the count field.
    pub fn total_bits(&self, version: u8) -> Option<usize> {
        let count_bits = self.mode.count_bits(version);
        if self.char_count() >= 1usize << count_bits {
            return None;
        }
        Some(4 + count_bits + self.mode.data_bits(self.char_count()))
    }

    /// Append indicator, count and payload bits to `bits`.
    pub fn write(&self, version: u8, bits: &mut BitStream) {
        bits.put_bits(self.mode.indicator(), 4);
        bits.put_bits(self.char_count() as u32, self.mode.count_bits(version));
        match self.mode {
            Mode::Numeric => {
                for chunk in self.data.chunks(3) {
                    let value = chunk
                        .iter()
                        .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'));
                    bits.put_bits(value, chunk.len() * 3 + 1);
                }
            }
            Mode::Alphanumeric => {
                for chunk in self.data.chunks(2) {
                    // Every byte was validated by `Mode::select`.
                    let values: Vec<u32> = chunk.iter().filter_map(|&b| alphanumeric_value(b)).collect();
                    match values.as_slice() {
                        [a, b] => bits.put_bits(a * 45 + b, 11),
                        [a] => bits.put_bits(*a, 6),
                        _ => {}
                    }
                }
            }
            Mode::Byte => {
                for &b in self.data {
                    bits.put_bits(u32::from(b), 8);
                }
            }
        }
    }
}

/// MSB-first bit stream packed into bytes.
#[derive(Clone, Debug, Default)]
pub struct BitStream {
    data: Vec<u8>,
    bit_count: usize,
}

impl BitStream {
    /// Empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub fn put_bits(&mut self, value: u32, count: usize) {
        debug_assert!(count <= 32);
        for i in (0..count).rev() {
            let bit = (value >> i) & 1 != 0;
            let byte_idx = self.bit_count / 8;
            if byte_idx >= self.data.len() {
                self.data.push(0);
            }
            if bit {
                self.data[byte_idx] |= 1 << (7 - self.bit_count % 8);
            }
            self.bit_count += 1;
        }
    }

    /// Number of bits written.
    pub fn len_bits(&self) -> usize {
        self.bit_count
    }

    /// Terminate and pad the stream to exactly `capacity` codewords.
    pub fn finish(mut self, capacity: usize) -> Vec<u8> {
        let capacity_bits = capacity * 8;
        debug_assert!(self.bit_count <= capacity_bits);

        let terminator = capacity_bits.saturating_sub(self.bit_count).min(4);
        self.put_bits(0, terminator);
        let to_byte = (8 - self.bit_count % 8) % 8;
        self.put_bits(0, to_byte);

        for pad in PAD_BYTES.iter().cycle() {
            if self.data.len() >= capacity {
                break;
            }
            self.put_bits(u32::from(*pad), 8);
        }
        self.data
    }
}

/// Data codewords for `segment` in a symbol of `version` with `capacity`
/// data codewords.
pub fn data_codewords(segment: &Segment<'_>, version: u8, capacity: usize) -> Vec<u8> {
    let mut bits = BitStream::new();
    segment.write(version, &mut bits);
    bits.finish(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_most_compact_mode() {
        assert_eq!(Mode::select(b"0123456789"), Mode::Numeric);
        assert_eq!(Mode::select(b"HELLO WORLD"), Mode::Alphanumeric);
        assert_eq!(Mode::select(b"5802BR6304"), Mode::Alphanumeric);
        assert_eq!(Mode::select(b"Test Store"), Mode::Byte);
        assert_eq!(Mode::select("São".as_bytes()), Mode::Byte);
        assert_eq!(Mode::select(b""), Mode::Numeric);
    }

    #[test]
    fn count_field_widths() {
        assert_eq!(Mode::Byte.count_bits(9), 8);
        assert_eq!(Mode::Byte.count_bits(10), 16);
        assert_eq!(Mode::Numeric.count_bits(26), 12);
        assert_eq!(Mode::Alphanumeric.count_bits(27), 13);
    }

    #[test]
    fn data_bit_lengths() {
        assert_eq!(Mode::Numeric.data_bits(8), 27);
        assert_eq!(Mode::Alphanumeric.data_bits(11), 61);
        assert_eq!(Mode::Byte.data_bits(3), 24);
    }

    #[test]
    fn hello_world_data_codewords() {
        let seg = Segment::new(b"HELLO WORLD");
        assert_eq!(seg.total_bits(1), Some(74));
        assert_eq!(
            data_codewords(&seg, 1, 16),
            vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
        );
    }

    #[test]
    fn numeric_encoding() {
        // "01234567" -> 0001 0000001000 0000001100 0101011001 1000011
        let seg = Segment::new(b"01234567");
        assert_eq!(
            data_codewords(&seg, 1, 19)[..6],
            [0x10, 0x20, 0x0C, 0x56, 0x61, 0x80]
        );
    }

    #[test]
    fn count_overflow_is_rejected() {
        let data = vec![b'a'; 256];
        let seg = Segment::new(&data);
        assert_eq!(seg.total_bits(9), None);
        assert_eq!(seg.total_bits(10), Some(4 + 16 + 2048));
    }

    #[test]
    fn finish_pads_to_capacity() {
        let mut bits = BitStream::new();
        bits.put_bits(0b0100, 4);
        bits.put_bits(1, 8);
        bits.put_bits(u32::from(b'A'), 8);
        assert_eq!(bits.len_bits(), 20);
        let cw = bits.finish(5);
        assert_eq!(cw, vec![0x40, 0x14, 0x10, 0xEC, 0x11]);
    }
}
