//! CRC-16/CCITT-FALSE checksum used by field `63`.
//!
//! Polynomial 0x1021, initial register 0xFFFF, MSB first, no reflection and
//! no final XOR. The checksum of a payload covers every byte before the
//! checksum value, including the literal `6304` tag and length.

/// Generator polynomial (x^16 + x^12 + x^5 + 1).
pub const POLY: u16 = 0x1021;

/// Initial register value.
pub const INIT: u16 = 0xFFFF;

/// Incremental CRC-16/CCITT-FALSE accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Crc16 {
    value: u16,
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16 {
    /// Start a new checksum at [`INIT`].
    pub const fn new() -> Self {
        Self { value: INIT }
    }

    /// Feed one byte into the register.
    pub fn add_byte(&mut self, byte: u8) {
        self.value ^= u16::from(byte) << 8;
        for _ in 0..8 {
            self.value = if self.value & 0x8000 != 0 {
                (self.value << 1) ^ POLY
            } else {
                self.value << 1
            };
        }
    }

    /// Feed a byte slice into the register.
    pub fn update(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.add_byte(b);
        }
    }

    /// Current register value.
    pub fn value(&self) -> u16 {
        self.value
    }
}

/// CRC-16/CCITT-FALSE of `data`.
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.value()
}

/// Checksum of `prefix` as four uppercase hex digits.
pub fn compute_checksum(prefix: &str) -> String {
    format_checksum(crc16_ccitt_false(prefix.as_bytes()))
}

/// Format a register value the way field `63` carries it.
pub fn format_checksum(value: u16) -> String {
    format!("{value:04X}")
}
