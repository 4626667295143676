//! RNG module - piece sources
//!
//! The playfield never picks pieces itself; it asks a [`PieceSource`].
//! [`UniformSource`] is the production source: a seeded ChaCha8 stream that
//! picks each of the seven types with equal probability, so a game can be
//! replayed from its seed. [`ScriptedSource`] replays a fixed, non-empty
//! sequence for tests and puzzles.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::random_type;
use crate::types::{EngineError, PieceType};

/// Supplies the type of each newly spawned piece
pub trait PieceSource {
    fn next_piece(&mut self) -> PieceType;
}

impl<F> PieceSource for F
where
    F: FnMut() -> PieceType,
{
    fn next_piece(&mut self) -> PieceType {
        self()
    }
}

/// Uniform random piece source
#[derive(Debug, Clone)]
pub struct UniformSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl UniformSource {
    /// Create a source with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a source with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this source was created with (for replaying a game)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for UniformSource {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PieceSource for UniformSource {
    fn next_piece(&mut self) -> PieceType {
        random_type(&mut self.rng)
    }
}

/// Replays a fixed sequence of pieces, starting over when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    sequence: Vec<PieceType>,
    index: usize,
}

impl ScriptedSource {
    /// Create a source from a sequence
    ///
    /// An empty sequence is rejected with [`EngineError::InvalidConfig`].
    pub fn new(sequence: impl Into<Vec<PieceType>>) -> Result<Self, EngineError> {
        let sequence = sequence.into();
        if sequence.is_empty() {
            return Err(EngineError::InvalidConfig(
                "scripted piece sequence is empty".to_string(),
            ));
        }
        Ok(Self { sequence, index: 0 })
    }

    /// Always produce the same piece
    pub fn repeat(kind: PieceType) -> Self {
        Self {
            sequence: vec![kind],
            index: 0,
        }
    }

    /// Peek at the next piece without consuming it
    pub fn peek(&self) -> PieceType {
        self.sequence[self.index]
    }
}

impl PieceSource for ScriptedSource {
    fn next_piece(&mut self) -> PieceType {
        let piece = self.sequence[self.index];
        self.index = (self.index + 1) % self.sequence.len();
        piece
    }
}
