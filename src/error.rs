//! Error types.
//!
//! The toolkit distinguishes four kinds of failure. Programmer errors and
//! resource errors (invalid enum tag, corrupted envelope signature,
//! allocation failure) are not represented as [`Result`] at all — they
//! panic, the same way the source's `WizardAssert`/`ThrowWizardFatalError`
//! tear down the process. I/O errors and cryptographic errors are
//! recoverable from the caller's point of view and are represented by the
//! error enums below.

use std::{fmt, io};

/// Severity band an error belongs to, mirroring the source's exception
/// severity enumeration (`WarningException`, `ErrorException`,
/// `FatalErrorException`). Only used to tag [`FatalError`]; the I/O and
/// cryptographic error enums below are always at `Error` severity by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    FatalError,
}

/// A programmer or resource error: invalid enum tag, corrupted envelope
/// signature, or similar. These are not meant to be caught; they exist so
/// that [`panic!`] call sites have a uniform, greppable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub severity: Severity,
    pub message: String,
}

impl FatalError {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.message)
    }
}

/// Errors surfaced by the [cipher envelope](crate::cipher::CipherEnvelope).
///
/// This is the only recoverable error at the cipher layer: once a key is
/// installed, every other failure (a counter wrapping past the register's
/// most significant byte, a corrupted internal signature) is fatal and
/// tears down the process via [`panic!`], matching [`FatalError`]'s role.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("key length {0} bits is not supported by this primitive")]
    UnsupportedKeyLength(usize),
}

/// Errors surfaced by the [hash envelope](crate::hash::HashEnvelope).
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("digest requested before finalize() was called")]
    NotFinalized,
}

/// Errors surfaced by [keyring](crate::keyring) file operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyringError {
    #[error("corrupt keyring: {0}")]
    Corrupt(&'static str),
    #[error("unknown keyring protocol version {0}.{1}")]
    UnknownVersion(u16, u16),
    #[error("key already present")]
    DuplicateKey,
    #[error("key not found")]
    NotFound,
    #[error("file write failed: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("file read failed: {0}")]
    ReadFailed(#[source] io::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Errors surfaced by [the cross-process file lock](crate::keyring::lock).
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not acquire lock on {path} after {attempts} attempts")]
    Timeout { path: String, attempts: u32 },
    #[error("lock file I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for LockError {
    fn from(e: io::Error) -> Self {
        LockError::Io(e)
    }
}
