use crate::cipher::block::{padding, BlockPrimitive};

pub(super) fn encipher(primitive: &mut dyn BlockPrimitive, data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    padding::pad(data, block_size);
    for block in data.chunks_mut(block_size) {
        primitive.encipher_block(block);
    }
}

pub(super) fn decipher(primitive: &mut dyn BlockPrimitive, data: &mut Vec<u8>) {
    let block_size = primitive.block_size();
    for block in data.chunks_mut(block_size) {
        primitive.decipher_block(block);
    }
    padding::unpad(data, block_size);
}
