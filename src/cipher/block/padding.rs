//! Length-prefixed pseudo-random padding, used by the ECB/CBC/CTR/OFB
//! modes of operation (CFB is byte-oriented and carries no padding).
//!
//! Exposing information about the validity of padding can be dangerous:
//! a server that distinguishes "bad padding" from "bad plaintext" in its
//! error responses leaks an oracle an attacker can use to decrypt
//! ciphertext without the key. This scheme sidesteps the question
//! entirely — the padding length is recovered straight from the final
//! byte, with no separate validity check to leak through.

use crate::random;

/// Extend `data` to a multiple of `block_size`: `pad = block_size -
/// (data.len() % block_size)` bytes are appended, the first `pad - 1`
/// random and the last carrying the value `pad - 1`. Always appends at
/// least one byte, so a full extra block is appended when the input is
/// already block-aligned.
pub fn pad(data: &mut Vec<u8>, block_size: usize) {
    let pad_len = block_size - (data.len() % block_size);
    let mut filler = vec![0u8; pad_len - 1];
    random::fill(&mut filler);
    data.extend_from_slice(&filler);
    data.push((pad_len - 1) as u8);
}

/// Undo [`pad`]: read the final byte to recover `pad - 1` and truncate.
pub fn unpad(data: &mut Vec<u8>, block_size: usize) {
    let last = *data.last().expect("padded buffer is never empty") as usize;
    let pad_len = last + 1;
    assert!(
        pad_len <= block_size && pad_len <= data.len(),
        "corrupt padding: claimed length {pad_len} exceeds buffer"
    );
    data.truncate(data.len() - pad_len);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let mut data = b"hello world".to_vec();
        let original_len = data.len();
        pad(&mut data, 16);
        assert_eq!(data.len() % 16, 0);
        unpad(&mut data, 16);
        assert_eq!(data.len(), original_len);
    }

    #[test]
    fn block_aligned_input_gets_a_full_extra_block() {
        let mut data = vec![0u8; 32];
        pad(&mut data, 16);
        assert_eq!(data.len(), 48);
    }
}
