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
        primitive.encipher_block(&mut register);
        for (b, r) in block.iter_mut().zip(&register) {
            *b ^= r;
        }
    }
}
