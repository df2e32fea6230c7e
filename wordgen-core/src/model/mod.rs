//! Character-sequence model and its building blocks:
//! - Alphabet and symbol indexes (`Alphabet`)
//! - Open-phase transition statistics (`State`)
//! - Closed-phase cumulative distributions (`Distribution`, `DistributionTable`)
//! - Length constraints for bounded generation (`LengthBounds`)
//! - The trainable model itself (`SequenceModel`)

/// Ordered symbol set with an implicit terminator.
pub mod alphabet;

/// Length constraints and restart cap for bounded generation.
pub mod length;

/// Trainable model: open-phase training, finalize, generation and persistence.
pub mod sequence_model;

/// Per-history transition statistics and their cumulative distributions.
///
/// Tracks outgoing weights and performs inverse-CDF sampling.
pub mod state;

/// Closed, read-only sampling table.
pub mod table;
