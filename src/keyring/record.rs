//! The in-memory keyring record and the envelope that holds one while it
//! is being built up for import or filled in by export.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current protocol version emitted by this implementation. Readers must
/// still accept (1,0) — see [`crate::keyring::file`].
pub const PROTOCOL_MAJOR: u16 = 1;
pub const PROTOCOL_MINOR: u16 = 1;

/// Overwrite a buffer with zeros in a way the optimizer cannot elide,
/// per the toolkit's key-wiping convention.
fn secure_zero(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        unsafe { std::ptr::write_volatile(byte, 0) };
    }
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
}

/// One `(id, key, nonce, timestamp, version)` tuple, plus the path of
/// the directory containing its keyring file. Owns its three buffers;
/// they are wiped when the record is dropped.
#[derive(Debug, Clone)]
pub struct KeyringRecord {
    path: std::path::PathBuf,
    id: Vec<u8>,
    key: Vec<u8>,
    nonce: Vec<u8>,
    protocol_major: u16,
    protocol_minor: u16,
    timestamp: u64,
}

impl KeyringRecord {
    /// A fresh record bound to `path`, with empty buffers, the current
    /// timestamp, and this implementation's protocol version.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs();
        Self {
            path: path.into(),
            id: Vec::new(),
            key: Vec::new(),
            nonce: Vec::new(),
            protocol_major: PROTOCOL_MAJOR,
            protocol_minor: PROTOCOL_MINOR,
            timestamp,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn set_id(&mut self, id: &[u8]) {
        self.id = id.to_vec();
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn set_key(&mut self, key: &[u8]) {
        self.key = key.to_vec();
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn set_nonce(&mut self, nonce: &[u8]) {
        self.nonce = nonce.to_vec();
    }

    pub fn protocol_version(&self) -> (u16, u16) {
        (self.protocol_major, self.protocol_minor)
    }

    pub(crate) fn set_protocol_version(&mut self, major: u16, minor: u16) {
        self.protocol_major = major;
        self.protocol_minor = minor;
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl Drop for KeyringRecord {
    fn drop(&mut self) {
        secure_zero(&mut self.id);
        secure_zero(&mut self.key);
        secure_zero(&mut self.nonce);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        let mut record = KeyringRecord::new("/tmp/example");
        record.set_id(b"\x41");
        record.set_key(&[0x42; 16]);
        record.set_nonce(&[0x43; 16]);
        assert_eq!(record.id(), b"\x41");
        assert_eq!(record.key(), &[0x42; 16]);
        assert_eq!(record.nonce(), &[0x43; 16]);
        assert_eq!(record.protocol_version(), (PROTOCOL_MAJOR, PROTOCOL_MINOR));
    }
}
