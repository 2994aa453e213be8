//! A process-wide cryptographically secure random number generator.
//!
//! The cipher envelope acquires a process-wide [`Rng`] handle on first
//! use, lazily seeded from OS entropy. Its output stream is the SHA-256
//! of its internal state, rehashed whenever the state is exhausted. It
//! is the only source of randomness used for padding bytes and nonces,
//! and the only process-wide mutable state the toolkit depends on.

use std::sync::{Mutex, OnceLock};

use rand::RngCore;

use crate::hash::Sha256;

/// Cryptographically secure pseudorandom number generator.
pub trait Csprng {
    fn next(&mut self) -> u8;
}

/// A source of entropy.
///
/// Typically, this is a hardware component which generates "true randomness"
/// based on the environment, such as the environmental noise, typing and mouse
/// movement patterns, static noise coming from other hardware components, and
/// other similar unpredictable sources.
pub trait Entropy {
    fn get(&mut self, buf: &mut [u8]);
}

/// The operating system's entropy source, via [`rand::rngs::OsRng`].
struct OsEntropy;

impl Entropy for OsEntropy {
    fn get(&mut self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}

/// A CSPRNG whose output stream is the SHA-256 of its internal state:
/// each draw of 32 bytes triggers a rehash, folding the prior digest
/// back in as the next state.
pub struct Rng {
    state: [u8; 32],
    pos: usize,
}

impl Rng {
    fn seeded(mut entropy: impl Entropy) -> Self {
        let mut state = [0u8; 32];
        entropy.get(&mut state);
        log::trace!("rng seeded from entropy source");
        let mut rng = Self { state, pos: 32 };
        rng.rehash();
        rng
    }

    fn rehash(&mut self) {
        let mut h = Sha256::new();
        h.update(&self.state);
        self.state = h.finalize();
        self.pos = 0;
        log::trace!("rng state rehashed");
    }
}

impl Csprng for Rng {
    fn next(&mut self) -> u8 {
        if self.pos == self.state.len() {
            self.rehash();
        }
        let byte = self.state[self.pos];
        self.pos += 1;
        byte
    }
}

static GLOBAL: OnceLock<Mutex<Rng>> = OnceLock::new();

/// Fill `buf` with bytes from the process-wide RNG, seeding it from OS
/// entropy on first use. This is the only entropy-backed suspension
/// point in the toolkit; every other operation is CPU-only.
pub fn fill(buf: &mut [u8]) {
    let mutex = GLOBAL.get_or_init(|| Mutex::new(Rng::seeded(OsEntropy)));
    let mut rng = mutex.lock().expect("rng mutex poisoned");
    for b in buf.iter_mut() {
        *b = rng.next();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn successive_fills_differ() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill(&mut a);
        fill(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn rehash_crosses_state_boundary() {
        let mut rng = Rng::seeded(OsEntropy);
        let drawn: Vec<u8> = (0..40).map(|_| rng.next()).collect();
        assert_eq!(drawn.len(), 40);
    }
}
