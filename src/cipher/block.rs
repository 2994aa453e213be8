//! The four block primitives (L1) and the [`BlockPrimitive`] trait the
//! modes of operation (L2) dispatch through. [`CipherKind`] is a tagged
//! enum, matching the hash envelope's dispatch shape; the concrete
//! primitive instance, once keyed, is held behind a `Box<dyn
//! BlockPrimitive>` because its size (16 or 24 or 32-byte key, 16 or
//! 64-byte block) varies by primitive and, for Primitive A, by key
//! length too.

pub mod aes;
pub mod chacha;
pub(crate) mod modes;
pub(crate) mod padding;
pub mod serpent;
pub mod twofish;

pub use modes::ModeKind;

use {
    aes::{Aes128, Aes192, Aes256},
    chacha::ChaCha,
    serpent::Serpent,
    twofish::Twofish,
};

use crate::error::CipherError;

/// A keyed block primitive operating on a fixed-size block given as a
/// byte slice. Mutable receiver because [`ChaCha`] carries a running
/// block counter that advances on every call; the other three
/// primitives simply ignore `&mut self`.
pub trait BlockPrimitive {
    fn block_size(&self) -> usize;
    fn encipher_block(&mut self, block: &mut [u8]);
    fn decipher_block(&mut self, block: &mut [u8]);
}

impl BlockPrimitive for Aes128 {
    fn block_size(&self) -> usize {
        16
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes128::encrypt_block(self, input));
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes128::decrypt_block(self, input));
    }
}

impl BlockPrimitive for Aes192 {
    fn block_size(&self) -> usize {
        16
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes192::encrypt_block(self, input));
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes192::decrypt_block(self, input));
    }
}

impl BlockPrimitive for Aes256 {
    fn block_size(&self) -> usize {
        16
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes256::encrypt_block(self, input));
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Aes256::decrypt_block(self, input));
    }
}

impl BlockPrimitive for Serpent {
    fn block_size(&self) -> usize {
        16
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Serpent::encrypt_block(self, input));
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Serpent::decrypt_block(self, input));
    }
}

impl BlockPrimitive for Twofish {
    fn block_size(&self) -> usize {
        16
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Twofish::encrypt_block(self, input));
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        let input: [u8; 16] = block.try_into().expect("16-byte block");
        block.copy_from_slice(&Twofish::decrypt_block(self, input));
    }
}

impl BlockPrimitive for ChaCha {
    fn block_size(&self) -> usize {
        chacha::BLOCK_BYTES
    }

    fn encipher_block(&mut self, block: &mut [u8]) {
        let mut buf: [u8; chacha::BLOCK_BYTES] = block.try_into().expect("64-byte block");
        self.apply_keystream(&mut buf);
        block.copy_from_slice(&buf);
    }

    fn decipher_block(&mut self, block: &mut [u8]) {
        self.encipher_block(block)
    }
}

/// Which of the four required block primitives a cipher envelope wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    /// 128-bit SPN, key 128/192/256 bits (AES, FIPS 197).
    PrimitiveA,
    /// 128-bit 32-round SPN, key 128/192/256 bits.
    PrimitiveB,
    /// 128-bit Feistel cipher, key 128/192/256 bits.
    PrimitiveC,
    /// 512-bit ARX stream cipher, key 128 or 256 bits.
    PrimitiveD,
}

impl CipherKind {
    /// The block size in bytes this primitive operates on, independent
    /// of key length.
    pub fn block_size(self) -> usize {
        match self {
            CipherKind::PrimitiveA | CipherKind::PrimitiveB | CipherKind::PrimitiveC => 16,
            CipherKind::PrimitiveD => chacha::BLOCK_BYTES,
        }
    }

    fn supported_key_lengths(self) -> &'static [usize] {
        match self {
            CipherKind::PrimitiveA | CipherKind::PrimitiveB | CipherKind::PrimitiveC => {
                &[16, 24, 32]
            }
            CipherKind::PrimitiveD => &[16, 32],
        }
    }

    /// Pad `key` with a leading `0x01` sentinel then zeros up to the
    /// primitive's maximum key length (32 bytes) if it's not already
    /// one of the primitive's natively supported lengths.
    fn normalize_key(self, key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let supported = self.supported_key_lengths();
        if supported.contains(&key.len()) {
            return Ok(key.to_vec());
        }
        let mut padded = key.to_vec();
        padded.push(0x01);
        match supported.iter().copied().find(|&n| n >= padded.len()) {
            Some(target) => {
                padded.resize(target, 0);
                Ok(padded)
            }
            None => Err(CipherError::UnsupportedKeyLength(key.len() * 8)),
        }
    }

    /// Build the keyed primitive instance for this kind, normalizing
    /// `key` first. `nonce` is the envelope's current nonce buffer;
    /// Primitive D derives its internal counter/wire-nonce registers
    /// from its leading 16 bytes (see
    /// [`ChaCha::new`](chacha::ChaCha::new)), zero-padded if shorter.
    /// The other three primitives ignore it.
    pub(super) fn build(self, key: &[u8], nonce: &[u8]) -> Result<Box<dyn BlockPrimitive>, CipherError> {
        let key = self.normalize_key(key)?;
        Ok(match (self, key.len()) {
            (CipherKind::PrimitiveA, 16) => Box::new(Aes128 {
                key: key.try_into().unwrap(),
            }),
            (CipherKind::PrimitiveA, 24) => Box::new(Aes192 {
                key: key.try_into().unwrap(),
            }),
            (CipherKind::PrimitiveA, 32) => Box::new(Aes256 {
                key: key.try_into().unwrap(),
            }),
            (CipherKind::PrimitiveB, _) => Box::new(Serpent::new(&key)),
            (CipherKind::PrimitiveC, _) => Box::new(Twofish::new(&key)),
            (CipherKind::PrimitiveD, _) => {
                let mut register = [0u8; 16];
                let take = nonce.len().min(16);
                register[..take].copy_from_slice(&nonce[..take]);
                Box::new(ChaCha::new(&key, &register))
            }
            _ => unreachable!("normalize_key only returns supported lengths"),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_key_is_padded_with_sentinel() {
        let kind = CipherKind::PrimitiveA;
        let padded = kind.normalize_key(&[0xaa; 10]).unwrap();
        assert_eq!(padded.len(), 16);
        assert_eq!(padded[10], 0x01);
        assert_eq!(&padded[11..], &[0u8; 5]);
    }

    #[test]
    fn primitive_b_accepts_192_bit_key() {
        let kind = CipherKind::PrimitiveB;
        assert!(kind.build(&[0u8; 24], &[0u8; 16]).is_ok());
    }

    #[test]
    fn primitive_d_threads_nonce_into_the_key_schedule() {
        let kind = CipherKind::PrimitiveD;
        let key = [0u8; 16];
        let a = kind.build(&key, &[0u8; 64]).unwrap();
        let b = kind.build(&key, &[0xff; 64]).unwrap();
        let mut block_a = [0u8; chacha::BLOCK_BYTES];
        let mut block_b = [0u8; chacha::BLOCK_BYTES];
        let mut a = a;
        let mut b = b;
        a.encipher_block(&mut block_a);
        b.encipher_block(&mut block_b);
        assert_ne!(block_a, block_b);
    }

    #[test]
    fn primitive_a_rejects_an_unpaddable_length() {
        let kind = CipherKind::PrimitiveA;
        assert!(matches!(
            kind.normalize_key(&[0u8; 40]),
            Err(CipherError::UnsupportedKeyLength(320))
        ));
    }
}
