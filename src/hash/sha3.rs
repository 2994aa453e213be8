//! The Keccak sponge construction, specified by [FIPS
//! 202](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.202.pdf), in five
//! rate/capacity/output profiles: the four standard SHA3-224/256/384/512
//! parameterizations, plus a fifth "generic" profile (1024-bit rate,
//! 576-bit capacity, 288-bit/36-byte output) carried over from the legacy
//! hash dispatcher this toolkit is descended from, which predates the
//! FIPS 202 standardization of SHA-3 and used its own rate/capacity split.


const NUM_ROWS: usize = 5;
const NUM_COLS: usize = 5;
const NUM_ROUNDS: usize = 24;

type State = [[u64; NUM_COLS]; NUM_ROWS];

const RHO_OFFSETS: [[u32; NUM_COLS]; NUM_ROWS] = [
    [0, 1, 190, 28, 91],
    [36, 300, 6, 55, 276],
    [3, 10, 171, 153, 231],
    [105, 45, 15, 21, 136],
    [210, 66, 253, 120, 78],
];

const RC: [u64; NUM_ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

fn keccak_p(state: &mut State) {
    for ir in 0..NUM_ROUNDS {
        theta(state);
        rho(state);
        pi(state);
        chi(state);
        iota(state, ir);
    }
}

#[allow(clippy::needless_range_loop)]
fn theta(state: &mut State) {
    let mut c = [0u64; NUM_COLS];
    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            c[x] ^= state[y][x];
        }
    }

    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            state[y][x] ^= c[if x == 0 { NUM_COLS - 1 } else { x - 1 }];
            state[y][x] ^= c[(x + 1) % NUM_COLS].rotate_left(1);
        }
    }
}

#[allow(clippy::needless_range_loop)]
fn rho(state: &mut State) {
    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            state[y][x] = state[y][x].rotate_left(RHO_OFFSETS[y][x]);
        }
    }
}

#[allow(clippy::needless_range_loop)]
fn pi(state: &mut State) {
    let copy = *state;
    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            state[y][x] = copy[x][(x + 3 * y) % NUM_COLS];
        }
    }
}

#[allow(clippy::needless_range_loop)]
fn chi(state: &mut State) {
    let copy = *state;
    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            state[y][x] = copy[y][x] ^ (!copy[y][(x + 1) % NUM_ROWS] & copy[y][(x + 2) % NUM_ROWS]);
        }
    }
}

fn iota(state: &mut State, ir: usize) {
    state[0][0] ^= RC[ir];
}

fn xor_block_into_state(state: &mut State, block: &[u8]) {
    for (lane, chunk) in state.iter_mut().flatten().zip(block.chunks(8)) {
        let mut padded = [0u8; 8];
        padded[..chunk.len()].copy_from_slice(chunk);
        *lane ^= u64::from_le_bytes(padded);
    }
}

fn squeeze_bytes<const D: usize>(state: &State) -> [u8; D] {
    let mut output = [0; D];
    state
        .iter()
        .flatten()
        .flat_map(|b| b.to_le_bytes())
        .zip(output.iter_mut())
        .for_each(|(s, r)| *r = s);
    output
}

/// pad10*1 with the SHA-3 domain separator `01`, appended to a final
/// (possibly empty) partial block of length `< R`.
fn pad_last_block<const R: usize>(tail: &[u8]) -> [u8; R] {
    let mut block = [0u8; R];
    block[..tail.len()].copy_from_slice(tail);
    block[tail.len()] |= 0b0000_0110;
    block[R - 1] |= 0b1000_0000;
    block
}

/// A streaming Keccak sponge with compile-time rate `R` (bytes) and
/// output/digest size `D` (bytes). `R + capacity` is always 200 bytes
/// (1600 bits); the generic aliases below fix `R` and `D` to the five
/// profiles this toolkit supports.
#[derive(Debug, Clone)]
struct KeccakSponge<const R: usize, const D: usize> {
    state: State,
    buffer: [u8; R],
    buffer_len: usize,
}

impl<const R: usize, const D: usize> KeccakSponge<R, D> {
    fn new() -> Self {
        Self {
            state: State::default(),
            buffer: [0; R],
            buffer_len: 0,
        }
    }

    fn update(&mut self, mut data: &[u8]) {
        if self.buffer_len > 0 {
            let take = (R - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len == R {
                xor_block_into_state(&mut self.state, &self.buffer);
                keccak_p(&mut self.state);
                self.buffer_len = 0;
            }
        }
        while data.len() >= R {
            xor_block_into_state(&mut self.state, &data[..R]);
            keccak_p(&mut self.state);
            data = &data[R..];
        }
        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    fn finalize(&self) -> [u8; D] {
        let mut state = self.state;
        let last: [u8; R] = pad_last_block::<R>(&self.buffer[..self.buffer_len]);
        xor_block_into_state(&mut state, &last);
        keccak_p(&mut state);
        squeeze_bytes::<D>(&state)
    }
}

macro_rules! sha3_profile {
    ($name:ident, $rate:expr, $digest_size:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name(KeccakSponge<$rate, $digest_size>);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub const DIGEST_SIZE: usize = $digest_size;
            pub const BLOCK_SIZE: usize = $rate;

            pub fn new() -> Self {
                Self(KeccakSponge::new())
            }

            pub fn update(&mut self, data: &[u8]) {
                self.0.update(data)
            }

            pub fn finalize(&self) -> [u8; $digest_size] {
                self.0.finalize()
            }
        }
    };
}

sha3_profile!(Sha3_224, 144, 28, "SHA3-224: rate 1152 bits, capacity 448 bits.");
sha3_profile!(Sha3_256, 136, 32, "SHA3-256: rate 1088 bits, capacity 512 bits.");
sha3_profile!(Sha3_384, 104, 48, "SHA3-384: rate 832 bits, capacity 768 bits.");
sha3_profile!(Sha3_512, 72, 64, "SHA3-512: rate 576 bits, capacity 1024 bits.");
sha3_profile!(
    Sha3Generic,
    128,
    36,
    "The legacy generic sponge profile: rate 1024 bits, capacity 576 bits, 288-bit output."
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::bytes::bytes_to_hex;

    #[test]
    fn sha3_256_empty() {
        let h = Sha3_256::new();
        assert_eq!(
            bytes_to_hex(&h.finalize()),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn sha3_512_empty() {
        let h = Sha3_512::new();
        assert_eq!(
            bytes_to_hex(&h.finalize()),
            "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a615b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
        );
    }

    #[test]
    fn generic_profile_digest_is_36_bytes() {
        let mut h = Sha3Generic::new();
        h.update(b"abc");
        assert_eq!(h.finalize().len(), 36);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut whole = Sha3_256::new();
        whole.update(b"the quick brown fox jumps over the lazy dog");
        let whole = whole.finalize();

        let mut h = Sha3_256::new();
        h.update(b"the quick brown fox ");
        h.update(b"jumps over the lazy dog");
        assert_eq!(h.finalize(), whole);
    }
}
