use crate::cipher::block::BlockPrimitive;

pub(super) fn encipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut [u8]) {
    let mut register = nonce.to_vec();
    for byte in data.iter_mut() {
        let mut keystream = register.clone();
        primitive.encipher_block(&mut keystream);
        let ciphertext_byte = *byte ^ keystream[0];
        register.remove(0);
        register.push(ciphertext_byte);
        *byte = ciphertext_byte;
    }
}

pub(super) fn decipher(primitive: &mut dyn BlockPrimitive, nonce: &[u8], data: &mut [u8]) {
    let mut register = nonce.to_vec();
    for byte in data.iter_mut() {
        let mut keystream = register.clone();
        primitive.encipher_block(&mut keystream);
        let plaintext_byte = *byte ^ keystream[0];
        let ciphertext_byte = *byte;
        register.remove(0);
        register.push(ciphertext_byte);
        *byte = plaintext_byte;
    }
}
