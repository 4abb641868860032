//! Reed-Solomon error correction over GF(2^8).
//!
//! Field polynomial 0x11D (x^8 + x^4 + x^3 + x^2 + 1), generator element 2.
//! The exponent and logarithm tables are built at compile time and shared
//! read-only by every encoder.

/// Primitive polynomial of the field.
pub const PRIMITIVE_POLY: u16 = 0x11D;

/// GF(2^8) exponent and logarithm lookup tables.
pub struct GfTables {
    exp: [u8; 256],
    log: [u8; 256],
}

impl GfTables {
    const fn build() -> Self {
        let mut exp = [0u8; 256];
        let mut log = [0u8; 256];
        let mut val: u16 = 1;
        let mut i = 0;
        while i < 255 {
            exp[i] = val as u8;
            log[val as usize] = i as u8;
            val <<= 1;
            if val >= 256 {
                val ^= PRIMITIVE_POLY;
            }
            i += 1;
        }
        exp[255] = exp[0];
        GfTables { exp, log }
    }

    /// `alpha^i`.
    pub fn exp(&self, i: usize) -> u8 {
        self.exp[i % 255]
    }

    /// Product of two field elements.
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let idx = (usize::from(self.log[usize::from(a)]) + usize::from(self.log[usize::from(b)])) % 255;
        self.exp[idx]
    }
}

/// Shared field tables.
pub static GF: GfTables = GfTables::build();

/// Generator polynomial `prod (x - alpha^i)` for `i in 0..degree`, highest
/// degree first with the monic leading coefficient dropped.
pub fn generator(degree: usize) -> Vec<u8> {
    assert!((1..=255).contains(&degree), "degree out of range: {degree}");
    let mut coeffs = vec![0u8; degree];
    coeffs[degree - 1] = 1;
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            coeffs[j] = GF.mul(coeffs[j], root);
            if j + 1 < degree {
                coeffs[j] ^= coeffs[j + 1];
            }
        }
        root = GF.mul(root, 0x02);
    }
    coeffs
}

/// Remainder of `data * x^n` divided by the generator, i.e. the `n` EC
/// codewords, highest degree first.
pub fn remainder(data: &[u8], generator: &[u8]) -> Vec<u8> {
    let n = generator.len();
    let mut rem = vec![0u8; n];
    for &byte in data {
        let factor = byte ^ rem[0];
        rem.rotate_left(1);
        rem[n - 1] = 0;
        for (r, &g) in rem.iter_mut().zip(generator) {
            *r ^= GF.mul(g, factor);
        }
    }
    rem
}

/// `n_ec` EC codewords for `data`.
pub fn encode(data: &[u8], n_ec: usize) -> Vec<u8> {
    remainder(data, &generator(n_ec))
}
