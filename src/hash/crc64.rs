//! CRC-64, reflected, with generator polynomial `0xd800000000000000`.
//!
//! This is the same construction ImageMagick's WizardsToolkit uses for
//! `GetStringInfoHash` / `crc64.c`: a reflected CRC with an 8-bit table
//! built by running the bit-at-a-time update eight times per table entry.

/// The generator polynomial. Reflected input/output, so the table is built
/// by running the reflected update from the least-significant bit.
const GENERATOR: u64 = 0xd800000000000000;

fn build_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    for (n, entry) in table.iter_mut().enumerate() {
        let mut c = n as u64;
        for _ in 0..8 {
            c = if c & 1 != 0 {
                (c >> 1) ^ GENERATOR
            } else {
                c >> 1
            };
        }
        *entry = c;
    }
    table
}

/// Streaming CRC-64 state: block size 1 (byte-at-a-time), digest size 8.
#[derive(Debug, Clone)]
pub struct Crc64 {
    table: [u64; 256],
    crc: u64,
}

impl Default for Crc64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc64 {
    pub const DIGEST_SIZE: usize = 8;
    pub const BLOCK_SIZE: usize = 1;

    pub fn new() -> Self {
        Self {
            table: build_table(),
            crc: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.crc = (self.crc >> 8) ^ self.table[((self.crc ^ u64::from(byte)) & 0xff) as usize];
        }
    }

    /// CRC-64 carries no internal padding; finalize just serializes the
    /// running checksum big-endian.
    pub fn finalize(&self) -> [u8; 8] {
        self.crc.to_be_bytes()
    }
}

/// One-shot CRC-64 over a byte slice, used by [`Bytes::content_hash`](crate::Bytes::content_hash).
pub fn crc64(data: &[u8]) -> u64 {
    let mut state = Crc64::new();
    state.update(data);
    u64::from_be_bytes(state.finalize())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_digest_is_zero() {
        assert_eq!(crc64(b""), 0);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let whole = crc64(b"abcdefgh");
        let mut s = Crc64::new();
        s.update(b"abcd");
        s.update(b"efgh");
        assert_eq!(u64::from_be_bytes(s.finalize()), whole);
    }
}
