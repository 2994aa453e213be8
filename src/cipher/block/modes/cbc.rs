use crate::cipher::block::{padding, BlockPrimitive};

pub(super) fn encipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    padding::pad(data, block_size);
    let mut register = nonce.to_vec();
    for block in data.chunks_mut(block_size) {
        for (b, r) in block.iter_mut().zip(&register) {
            *b ^= r;
        }
        primitive.encipher_block(block);
        register.copy_from_slice(block);
    }
}

pub(super) fn decipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    let mut register = nonce.to_vec();
    for block in data.chunks_mut(block_size) {
        let ciphertext = block.to_vec();
        primitive.decipher_block(block);
        for (b, r) in block.iter_mut().zip(&register) {
            *b ^= r;
        }
        register = ciphertext;
    }
    padding::unpad(data, block_size);
}
