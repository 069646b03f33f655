//! Random generator state for the matrix backend
//!
//! A snapshot is a `(state, algorithm)` pair; restoring builds a fresh
//! generator of that algorithm positioned at the state.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Generator algorithms a snapshot can name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RngAlgorithm {
    ChaCha20,
}

/// Key, stream and position of a ChaCha generator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorState {
    seed: [u8; 32],
    stream: u64,
    word_pos: u128,
}

/// Snapshot returned by `get_random_state`
pub type RandomState = (GeneratorState, RngAlgorithm);

pub fn snapshot(rng: &ChaCha20Rng) -> RandomState {
    let state = GeneratorState {
        seed: rng.get_seed(),
        stream: rng.get_stream(),
        word_pos: rng.get_word_pos(),
    };
    (state, RngAlgorithm::ChaCha20)
}

pub fn restore(snapshot: &RandomState) -> ChaCha20Rng {
    let (state, algorithm) = snapshot;
    match algorithm {
        RngAlgorithm::ChaCha20 => {
            let mut rng = ChaCha20Rng::from_seed(state.seed);
            rng.set_stream(state.stream);
            rng.set_word_pos(state.word_pos);
            rng
        }
    }
}
