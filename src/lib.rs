//! A cryptographic toolkit: symmetric enciphering, cryptographic hashing,
//! and a persistent keyring in which generated symmetric keys are
//! catalogued.
//!
//! The crate is organized bottom-up:
//!
//! - [`bytes`] — the owned byte buffer that is the unit of I/O across the
//!   whole API.
//! - [`cipher`] — four [block primitives](cipher::block) plugged into five
//!   [modes of operation](cipher::block::modes) through a single
//!   [envelope](cipher::CipherEnvelope).
//! - [`hash`] — seven digest algorithms behind a single streaming
//!   [envelope](hash::HashEnvelope).
//! - [`keyring`] — a binary, append-only file format storing `(id, key,
//!   nonce, timestamp, version)` tuples under a cross-process
//!   [file lock](keyring::lock).
//! - [`fileio`] — little-endian fixed-width integer I/O helpers shared by
//!   the keyring layer.

pub mod bytes;
pub mod cipher;
pub mod error;
pub mod fileio;
pub mod hash;
pub mod keyring;
mod random;

pub use {
    bytes::Bytes,
    error::{CipherError, FatalError, HashError, KeyringError, LockError},
    random::Rng,
};
