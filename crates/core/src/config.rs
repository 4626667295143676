//! Engine configuration
//!
//! Defaults describe the standard 10x20 game with a random seed. Values can be
//! overridden from the environment or deserialized from JSON; missing fields
//! keep their defaults.

use serde::{Deserialize, Serialize};

use crate::types::{EngineError, FIELD_HEIGHT, FIELD_WIDTH, MIN_FIELD_SIDE};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub field_width: usize,
    pub field_height: usize,
    /// Piece sequence seed; `None` picks one at random
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `BLOCKFALL_FIELD_WIDTH` / `BLOCKFALL_FIELD_HEIGHT`: field size
    /// - `BLOCKFALL_SEED`: fixed piece sequence seed
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let field_width = env::var("BLOCKFALL_FIELD_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.field_width);

        let field_height = env::var("BLOCKFALL_FIELD_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.field_height);

        let seed = env::var("BLOCKFALL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            field_width,
            field_height,
            seed,
        }
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the field can hold every piece
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.field_width < MIN_FIELD_SIDE || self.field_height < MIN_FIELD_SIDE {
            return Err(EngineError::InvalidConfig(format!(
                "field must be at least {MIN_FIELD_SIDE}x{MIN_FIELD_SIDE}, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        Ok(())
    }
}
