//! A ChaCha20-like ARX stream cipher, grounded on
//! `original_source/wizard/chacha.c`.
//!
//! Unlike AES/Serpent/Twofish, this primitive is stateful: every call to
//! [`encrypt_block`](ChaCha::encrypt_block) advances an internal 64-bit
//! block counter, matching the source's `chacha_info->x12`/`x13` registers.
//! Encipherment and decipherment are the same operation (XOR with a
//! keystream block), matching the source's `DecipherChachaBlock` being a
//! thin wrapper around `EncipherChachaBlock`.

pub const BLOCK_BYTES: usize = 64;
const ROUNDS: usize = 20;

const SIGMA: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574]; // "expand 32-byte k"
const TAU: [u32; 4] = [0x61707865, 0x3120646e, 0x79622d36, 0x6b206574]; // "expand 16-byte k"

fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(12);
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(7);
}

/// A keyed ChaCha instance with a running block counter and an 8-byte
/// nonce, matching the source's `ChachaInfo`.
#[derive(Debug, Clone)]
pub struct ChaCha {
    key: [u32; 16],
    x12: u32,
    x13: u32,
}

impl ChaCha {
    /// `key` is 16 or 32 bytes; `nonce` is the 16-byte register the cipher
    /// envelope derives per [its nonce convention](crate::cipher::CipherEnvelope):
    /// the first 8 bytes seed the base block counter (`key[12..14]`), the
    /// last 8 bytes are the wire nonce (`key[14..16]`).
    pub fn new(key: &[u8], nonce: &[u8; 16]) -> Self {
        let (constants, key_words) = if key.len() == 32 {
            (SIGMA, key)
        } else {
            (TAU, key)
        };

        let mut k = [0u32; 16];
        k[0..4].copy_from_slice(&constants);
        for (i, chunk) in key_words[0..16].chunks_exact(4).enumerate() {
            k[4 + i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        let second_half = if key_words.len() == 32 {
            &key_words[16..32]
        } else {
            &key_words[0..16]
        };
        for (i, chunk) in second_half.chunks_exact(4).enumerate() {
            k[8 + i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        k[12] = u32::from_le_bytes(nonce[0..4].try_into().unwrap());
        k[13] = u32::from_le_bytes(nonce[4..8].try_into().unwrap());
        k[14] = u32::from_le_bytes(nonce[8..12].try_into().unwrap());
        k[15] = u32::from_le_bytes(nonce[12..16].try_into().unwrap());

        Self {
            key: k,
            x12: 0,
            x13: 0,
        }
    }

    /// XOR `block` (64 bytes) with the keystream for the current counter
    /// value, then advance the counter. Used for both enciphering and
    /// deciphering.
    pub fn apply_keystream(&mut self, block: &mut [u8; BLOCK_BYTES]) {
        let mut x = self.key;
        x[12] = x[12].wrapping_add(self.x12);
        x[13] = x[13].wrapping_add(self.x13);

        for _ in (0..ROUNDS).step_by(2) {
            quarter_round(&mut x, 0, 4, 8, 12);
            quarter_round(&mut x, 1, 5, 9, 13);
            quarter_round(&mut x, 2, 6, 10, 14);
            quarter_round(&mut x, 3, 7, 11, 15);
            quarter_round(&mut x, 0, 5, 10, 15);
            quarter_round(&mut x, 1, 6, 11, 12);
            quarter_round(&mut x, 2, 7, 8, 13);
            quarter_round(&mut x, 3, 4, 9, 14);
        }

        for i in 0..16 {
            x[i] = x[i].wrapping_add(self.key[i]);
        }
        x[12] = x[12].wrapping_add(self.x12);
        x[13] = x[13].wrapping_add(self.x13);

        for (word, chunk) in x.iter().zip(block.chunks_mut(4)) {
            for (b, w) in chunk.iter_mut().zip(word.to_le_bytes()) {
                *b ^= w;
            }
        }

        self.x12 = self.x12.wrapping_add(1);
        if self.x12 == 0 {
            self.x13 = self.x13.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keystream_is_involution() {
        let key = [0u8; 32];
        let nonce = [0u8; 16];
        let plaintext = [7u8; BLOCK_BYTES];

        let mut enc = ChaCha::new(&key, &nonce);
        let mut block = plaintext;
        enc.apply_keystream(&mut block);
        assert_ne!(block, plaintext);

        let mut dec = ChaCha::new(&key, &nonce);
        dec.apply_keystream(&mut block);
        assert_eq!(block, plaintext);
    }

    #[test]
    fn counter_advances_between_blocks() {
        let key = [1u8; 16];
        let nonce = [2u8; 16];
        let mut cipher = ChaCha::new(&key, &nonce);
        let mut first = [0u8; BLOCK_BYTES];
        let mut second = [0u8; BLOCK_BYTES];
        cipher.apply_keystream(&mut first);
        cipher.apply_keystream(&mut second);
        assert_ne!(first, second);
    }
}
