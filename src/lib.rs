//! Blockfall (workspace facade crate).
//!
//! Re-exports the engine crates under `blockfall::{core,types}` so drivers
//! and tests only need one dependency.

pub use blockfall_core as core;
pub use blockfall_types as types;
