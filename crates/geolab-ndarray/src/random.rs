//! Random generator state for the dense backend

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Everything needed to reproduce the next draws of a [`ChaCha8Rng`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseRandomState {
    seed: [u8; 32],
    stream: u64,
    word_pos: u128,
}

impl DenseRandomState {
    pub fn capture(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            stream: rng.get_stream(),
            word_pos: rng.get_word_pos(),
        }
    }

    /// A new generator positioned exactly at this snapshot
    pub fn restore(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}
