//! SHA-1, specified by [FIPS
//! 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
//!
//! The compression function here is SHACAL-1, the block cipher underlying
//! SHA-1's Davies-Meyer construction: 80 rounds of a permutation driven by
//! a 16-word message schedule that is rotated and refreshed each round.
//! Note that this is a weak hash function with known vulnerabilities, and
//! is vulnerable to length-extension attacks; it is provided for
//! compatibility, not for new designs.

const BLOCK_BYTES: usize = 64;

/// Helper function $f_t$: [$Ch$](ch) for $t < 20$, [$Maj$](maj) for $40 \le
/// t < 60$, and [$Parity$](parity) otherwise.
fn ft(t: u32, x: u32, y: u32, z: u32) -> u32 {
    match t {
        0..=19 => ch(x, y, z),
        40..=59 => maj(x, y, z),
        _ => parity(x, y, z),
    }
}

fn kt(t: u32) -> u32 {
    match t {
        0..=19 => 0x5a827999,
        20..=39 => 0x6ed9eba1,
        40..=59 => 0x8f1bbcdc,
        _ => 0xca62c1d6,
    }
}

fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

fn parity(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

/// SHACAL-1: the underlying block cipher of SHA-1's Davies-Meyer
/// construction.
fn shacal1(state: [u32; 5], block: &[u8; BLOCK_BYTES]) -> [u32; 5] {
    let mut schedule = [0u32; 16];
    for (s, chunk) in schedule.iter_mut().zip(block.chunks_exact(4)) {
        *s = u32::from_be_bytes(chunk.try_into().unwrap());
    }

    let [mut a, mut b, mut c, mut d, mut e] = state;
    for t in 0..80u32 {
        let wt = schedule[0];
        let temp = a
            .rotate_left(5)
            .wrapping_add(ft(t, b, c, d))
            .wrapping_add(e)
            .wrapping_add(kt(t))
            .wrapping_add(wt);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;

        let next = (schedule[13] ^ schedule[8] ^ schedule[2] ^ schedule[0]).rotate_left(1);
        schedule.rotate_left(1);
        schedule[15] = next;
    }

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
        state[4].wrapping_add(e),
    ]
}

/// Streaming SHA-1: block size 64, digest size 20.
#[derive(Debug, Clone)]
pub struct Sha1 {
    state: [u32; 5],
    buffer: [u8; BLOCK_BYTES],
    buffer_len: usize,
    total_len: u64,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    pub const DIGEST_SIZE: usize = 20;
    pub const BLOCK_SIZE: usize = BLOCK_BYTES;

    pub fn new() -> Self {
        Self {
            state: [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0],
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
                self.state = shacal1(self.state, &self.buffer);
                self.buffer_len = 0;
            }
        }
        while data.len() >= BLOCK_BYTES {
            let block: &[u8; BLOCK_BYTES] = data[..BLOCK_BYTES].try_into().unwrap();
            self.state = shacal1(self.state, block);
            data = &data[BLOCK_BYTES..];
        }
        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    /// Padding: a single `0x80` byte, zeros up to length `≡ 56 (mod 64)`,
    /// then the bit-length as a big-endian 64-bit integer.
    pub fn finalize(&self) -> [u8; 20] {
        let mut state = self.state;
        let bit_len = self.total_len.wrapping_mul(8);
        let mut tail = [0u8; BLOCK_BYTES * 2];
        tail[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        tail[self.buffer_len] = 0x80;
        let pad_blocks = if self.buffer_len < 56 { 1 } else { 2 };
        let len_offset = pad_blocks * BLOCK_BYTES - 8;
        tail[len_offset..len_offset + 8].copy_from_slice(&bit_len.to_be_bytes());
        for block in tail[..pad_blocks * BLOCK_BYTES].chunks_exact(BLOCK_BYTES) {
            state = shacal1(state, block.try_into().unwrap());
        }

        let mut out = [0u8; 20];
        for (word, chunk) in state.iter().zip(out.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sha1(data: &[u8]) -> [u8; 20] {
        let mut h = Sha1::new();
        h.update(data);
        h.finalize()
    }

    #[test]
    fn abc() {
        assert_eq!(
            crate::bytes::bytes_to_hex(&sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let whole = sha1(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq");
        let mut h = Sha1::new();
        h.update(b"abcdbcdecdefdefgefghfghighij");
        h.update(b"hijkijkljklmklmnlmnomnopnopq");
        assert_eq!(h.finalize(), whole);
    }
}
