//! The hash envelope (L2) and the seven primitives (L1) it dispatches to.
//!
//! Every primitive follows the same `Init/Update/Final` shape: construct
//! fresh state, stream bytes through [`update`](HashEnvelope::update) any
//! number of times, then call [`finalize`](HashEnvelope::finalize) once to
//! obtain the digest. [`HashEnvelope`] is a tagged union over the seven
//! cores rather than a trait object, so `acquire` is a single match arm
//! and adding a primitive never requires touching a `Box<dyn Hash>`
//! wrapper.

pub mod crc64;
pub mod md5;
pub mod sha1;
pub mod sha2;
pub mod sha3;

pub use crc64::{crc64, Crc64};
pub use md5::Md5;
pub use sha1::Sha1;
pub use sha2::{Sha224, Sha256, Sha384, Sha512};
pub use sha3::{Sha3Generic, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::{bytes::bytes_to_hex, error::HashError};

/// Which of the five rate/capacity/output profiles a sponge hash uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpongeProfile {
    /// The legacy generic profile: rate 1024 bits, capacity 576 bits, 288-bit output.
    Generic,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

/// Which of the seven hash cores an envelope wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Crc64,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sponge(SpongeProfile),
}

#[derive(Debug, Clone)]
enum HashState {
    Crc64(Crc64),
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    SpongeGeneric(Sha3Generic),
    Sha3_224(Sha3_224),
    Sha3_256(Sha3_256),
    Sha3_384(Sha3_384),
    Sha3_512(Sha3_512),
}

impl HashState {
    fn new(kind: HashKind) -> Self {
        match kind {
            HashKind::Crc64 => HashState::Crc64(Crc64::new()),
            HashKind::Md5 => HashState::Md5(Md5::new()),
            HashKind::Sha1 => HashState::Sha1(Sha1::new()),
            HashKind::Sha224 => HashState::Sha224(Sha224::new()),
            HashKind::Sha256 => HashState::Sha256(Sha256::new()),
            HashKind::Sha384 => HashState::Sha384(Sha384::new()),
            HashKind::Sha512 => HashState::Sha512(Sha512::new()),
            HashKind::Sponge(SpongeProfile::Generic) => HashState::SpongeGeneric(Sha3Generic::new()),
            HashKind::Sponge(SpongeProfile::Sha3_224) => HashState::Sha3_224(Sha3_224::new()),
            HashKind::Sponge(SpongeProfile::Sha3_256) => HashState::Sha3_256(Sha3_256::new()),
            HashKind::Sponge(SpongeProfile::Sha3_384) => HashState::Sha3_384(Sha3_384::new()),
            HashKind::Sponge(SpongeProfile::Sha3_512) => HashState::Sha3_512(Sha3_512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            HashState::Crc64(s) => s.update(data),
            HashState::Md5(s) => s.update(data),
            HashState::Sha1(s) => s.update(data),
            HashState::Sha224(s) => s.update(data),
            HashState::Sha256(s) => s.update(data),
            HashState::Sha384(s) => s.update(data),
            HashState::Sha512(s) => s.update(data),
            HashState::SpongeGeneric(s) => s.update(data),
            HashState::Sha3_224(s) => s.update(data),
            HashState::Sha3_256(s) => s.update(data),
            HashState::Sha3_384(s) => s.update(data),
            HashState::Sha3_512(s) => s.update(data),
        }
    }

    fn finalize(&self) -> Vec<u8> {
        match self {
            HashState::Crc64(s) => s.finalize().to_vec(),
            HashState::Md5(s) => s.finalize().to_vec(),
            HashState::Sha1(s) => s.finalize().to_vec(),
            HashState::Sha224(s) => s.finalize().to_vec(),
            HashState::Sha256(s) => s.finalize().to_vec(),
            HashState::Sha384(s) => s.finalize().to_vec(),
            HashState::Sha512(s) => s.finalize().to_vec(),
            HashState::SpongeGeneric(s) => s.finalize().to_vec(),
            HashState::Sha3_224(s) => s.finalize().to_vec(),
            HashState::Sha3_256(s) => s.finalize().to_vec(),
            HashState::Sha3_384(s) => s.finalize().to_vec(),
            HashState::Sha3_512(s) => s.finalize().to_vec(),
        }
    }

    fn digest_size(&self) -> usize {
        match self {
            HashState::Crc64(_) => Crc64::DIGEST_SIZE,
            HashState::Md5(_) => Md5::DIGEST_SIZE,
            HashState::Sha1(_) => Sha1::DIGEST_SIZE,
            HashState::Sha224(_) => Sha224::DIGEST_SIZE,
            HashState::Sha256(_) => Sha256::DIGEST_SIZE,
            HashState::Sha384(_) => Sha384::DIGEST_SIZE,
            HashState::Sha512(_) => Sha512::DIGEST_SIZE,
            HashState::SpongeGeneric(_) => Sha3Generic::DIGEST_SIZE,
            HashState::Sha3_224(_) => Sha3_224::DIGEST_SIZE,
            HashState::Sha3_256(_) => Sha3_256::DIGEST_SIZE,
            HashState::Sha3_384(_) => Sha3_384::DIGEST_SIZE,
            HashState::Sha3_512(_) => Sha3_512::DIGEST_SIZE,
        }
    }

    fn block_size(&self) -> usize {
        match self {
            HashState::Crc64(_) => Crc64::BLOCK_SIZE,
            HashState::Md5(_) => Md5::BLOCK_SIZE,
            HashState::Sha1(_) => Sha1::BLOCK_SIZE,
            HashState::Sha224(_) => Sha224::BLOCK_SIZE,
            HashState::Sha256(_) => Sha256::BLOCK_SIZE,
            HashState::Sha384(_) => Sha384::BLOCK_SIZE,
            HashState::Sha512(_) => Sha512::BLOCK_SIZE,
            HashState::SpongeGeneric(_) => Sha3Generic::BLOCK_SIZE,
            HashState::Sha3_224(_) => Sha3_224::BLOCK_SIZE,
            HashState::Sha3_256(_) => Sha3_256::BLOCK_SIZE,
            HashState::Sha3_384(_) => Sha3_384::BLOCK_SIZE,
            HashState::Sha3_512(_) => Sha3_512::BLOCK_SIZE,
        }
    }
}

/// The streaming hash envelope (L2): `acquire` a kind, `update` any number
/// of times, `finalize` once, then read `digest`/`hex_digest`.
///
/// Invariant: after `finalize`, the digest buffer holds exactly
/// `digest_size()` bytes. A subsequent `update` without a fresh `init`
/// invalidates it — `digest`/`hex_digest` return
/// [`HashError::NotFinalized`] until `finalize` runs again.
#[derive(Debug, Clone)]
pub struct HashEnvelope {
    kind: HashKind,
    state: HashState,
    digest: Option<Vec<u8>>,
}

impl HashEnvelope {
    /// Create a fresh envelope for `kind`. Equivalent to `acquire` followed
    /// by `init` in the source API; there is no uninitialized envelope
    /// state to distinguish in this port.
    pub fn acquire(kind: HashKind) -> Self {
        Self {
            kind,
            state: HashState::new(kind),
            digest: None,
        }
    }

    /// Reset the envelope to a fresh state for the same [`HashKind`],
    /// discarding any data streamed so far.
    pub fn init(&mut self) {
        self.state = HashState::new(self.kind);
        self.digest = None;
    }

    /// Stream more preimage bytes. `update(a); update(b)` commutes with
    /// `update(a ++ b)`.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
        self.digest = None;
    }

    /// Compute the digest over everything streamed so far. Idempotent:
    /// calling `finalize` again without an intervening `update` recomputes
    /// the same digest.
    pub fn finalize(&mut self) {
        self.digest = Some(self.state.finalize());
    }

    pub fn digest(&self) -> Result<&[u8], HashError> {
        self.digest.as_deref().ok_or(HashError::NotFinalized)
    }

    pub fn hex_digest(&self) -> Result<String, HashError> {
        self.digest().map(bytes_to_hex)
    }

    pub fn digest_size(&self) -> usize {
        self.state.digest_size()
    }

    pub fn block_size(&self) -> usize {
        self.state.block_size()
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn streaming_law_holds_across_kinds() {
        for kind in [
            HashKind::Crc64,
            HashKind::Md5,
            HashKind::Sha1,
            HashKind::Sha256,
            HashKind::Sponge(SpongeProfile::Sha3_256),
        ] {
            let mut whole = HashEnvelope::acquire(kind);
            whole.update(b"the quick brown fox jumps over the lazy dog");
            whole.finalize();

            let mut parts = HashEnvelope::acquire(kind);
            parts.update(b"the quick brown fox ");
            parts.update(b"jumps over the lazy dog");
            parts.finalize();

            assert_eq!(whole.digest().unwrap(), parts.digest().unwrap());
        }
    }

    #[test]
    fn digest_before_finalize_errors() {
        let envelope = HashEnvelope::acquire(HashKind::Sha256);
        assert!(matches!(envelope.digest(), Err(HashError::NotFinalized)));
    }

    #[test]
    fn digest_size_matches_finalized_length() {
        let mut envelope = HashEnvelope::acquire(HashKind::Sponge(SpongeProfile::Generic));
        envelope.update(b"abc");
        envelope.finalize();
        assert_eq!(envelope.digest().unwrap().len(), envelope.digest_size());
    }

    #[test]
    fn sha256_matches_known_vector() {
        let mut envelope = HashEnvelope::acquire(HashKind::Sha256);
        envelope.update(b"abc");
        envelope.finalize();
        assert_eq!(
            envelope.hex_digest().unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
