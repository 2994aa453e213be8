//! MD5, specified by [RFC 1321](https://www.rfc-editor.org/rfc/rfc1321).
//!
//! Structurally this is a Merkle-Damgard/Davies-Meyer construction just
//! like [SHA-1](super::sha1), but with little-endian block loading and a
//! little-endian length suffix (low word first, then high word), unlike
//! SHA-1/SHA-2's big-endian convention.

const BLOCK_BYTES: usize = 64;

/// Per-round shift amounts, four groups of sixteen.
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9,
    14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15,
    21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// $K_i = \lfloor 2^{32} \times |\sin(i + 1)| \rfloor$, precomputed.
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

fn compress(state: [u32; 4], block: &[u8; BLOCK_BYTES]) -> [u32; 4] {
    let mut m = [0u32; 16];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        m[i] = u32::from_le_bytes(chunk.try_into().unwrap());
    }

    let [mut a, mut b, mut c, mut d] = state;
    for i in 0..64 {
        let (f, g) = match i {
            0..=15 => ((b & c) | (!b & d), i),
            16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
            32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
            _ => (c ^ (b | !d), (7 * i) % 16),
        };
        let f = f
            .wrapping_add(a)
            .wrapping_add(K[i])
            .wrapping_add(m[g]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(f.rotate_left(S[i]));
    }

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
    ]
}

/// Streaming MD5: block size 64, digest size 16.
#[derive(Debug, Clone)]
pub struct Md5 {
    state: [u32; 4],
    buffer: [u8; BLOCK_BYTES],
    buffer_len: usize,
    total_len: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    pub const DIGEST_SIZE: usize = 16;
    pub const BLOCK_SIZE: usize = BLOCK_BYTES;

    pub fn new() -> Self {
        Self {
            state: [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476],
            buffer: [0; BLOCK_BYTES],
            buffer_len: 0,
            total_len: 0,
        }
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.total_len += data.len() as u64;
        if self.buffer_len > 0 {
            let take = (BLOCK_BYTES - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len == BLOCK_BYTES {
                self.state = compress(self.state, &self.buffer);
                self.buffer_len = 0;
            }
        }
        while data.len() >= BLOCK_BYTES {
            let block: &[u8; BLOCK_BYTES] = data[..BLOCK_BYTES].try_into().unwrap();
            self.state = compress(self.state, block);
            data = &data[BLOCK_BYTES..];
        }
        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    /// Padding: a single `0x80` byte, zeros up to length `≡ 56 (mod 64)`,
    /// then the bit-length as two little-endian 32-bit words, low word
    /// first.
    pub fn finalize(&self) -> [u8; 16] {
        let mut state = self.state;
        let bit_len = self.total_len.wrapping_mul(8);
        let mut tail = [0u8; BLOCK_BYTES * 2];
        tail[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        tail[self.buffer_len] = 0x80;
        let pad_blocks = if self.buffer_len < 56 { 1 } else { 2 };
        let len_offset = pad_blocks * BLOCK_BYTES - 8;
        tail[len_offset..len_offset + 8].copy_from_slice(&bit_len.to_le_bytes());
        for block in tail[..pad_blocks * BLOCK_BYTES].chunks_exact(BLOCK_BYTES) {
            state = compress(state, block.try_into().unwrap());
        }

        let mut out = [0u8; 16];
        for (word, chunk) in state.iter().zip(out.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn md5(data: &[u8]) -> [u8; 16] {
        let mut h = Md5::new();
        h.update(data);
        h.finalize()
    }

    #[test]
    fn abc() {
        assert_eq!(
            crate::bytes::bytes_to_hex(&md5(b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn empty() {
        assert_eq!(
            crate::bytes::bytes_to_hex(&md5(b"")),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let whole = md5(b"the quick brown fox jumps over the lazy dog, twice over");
        let mut h = Md5::new();
        h.update(b"the quick brown fox jumps");
        h.update(b" over the lazy dog, twice over");
        assert_eq!(h.finalize(), whole);
    }
}
