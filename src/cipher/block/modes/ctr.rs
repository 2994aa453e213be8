use crate::cipher::block::{padding, BlockPrimitive};

pub(super) fn encipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    padding::pad(data, block_size);
    apply_keystream(primitive, nonce, data);
}

pub(super) fn decipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    apply_keystream(primitive, nonce, data);
    padding::unpad(data, block_size);
}

fn apply_keystream(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut [u8]) {
    let block_size = primitive.block_size();
    let mut register = nonce.to_vec();
    for block in data.chunks_mut(block_size) {
        let mut keystream = register.clone();
        primitive.encipher_block(&mut keystream);
        for (b, k) in block.iter_mut().zip(&keystream) {
            *b ^= k;
        }
        increment_be(&mut register);
    }
}

/// Increment `register` as a big-endian integer. Panics on overflow
/// past the most significant byte, matching the envelope's fatal-error
/// policy for corrupted internal state.
fn increment_be(register: &mut [u8]) {
    for byte in register.iter_mut().rev() {
        let (value, carry) = byte.overflowing_add(1);
        *byte = value;
        if !carry {
            return;
        }
    }
    panic!("CTR counter wrapped past the most significant byte of the register");
}
