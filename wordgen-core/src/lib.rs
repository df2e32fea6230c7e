//! Trainable character-sequence generator.
//!
//! This crate learns how likely each character is to follow a short history
//! of preceding characters, then walks that Markov chain to synthesize new,
//! plausible-looking words:
//! - Weighted training from words or free text
//! - One-time finalize into cumulative distributions
//! - Inverse-CDF generation from a caller-supplied random source
//! - Text and binary persistence of finalized models
//!
//! File loading and command-line handling are left to callers.

/// Model construction settings (alphabet, history depth).
pub mod config;

/// Error type shared by every fallible operation.
pub mod error;

/// Core model types and generation logic.
pub mod model;

/// Persistence of finalized tables.
///
/// Reached through `SequenceModel`, not exposed
pub(crate) mod io;

pub use config::ModelConfig;
pub use error::{ModelError, Result};
pub use model::length::LengthBounds;
pub use model::sequence_model::SequenceModel;
pub use model::table::DistributionTable;
