use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Lowercase Latin letters, the alphabet used when none is given.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Number of preceding symbols used to predict the next one.
pub const DEFAULT_ORDER: usize = 3;

/// Construction-time settings of a `SequenceModel`.
///
/// The configuration is fixed once a model is built: every model carries its
/// own copy, there is no shared global alphabet.
///
/// # Invariants
/// - `order >= 1` (checked by `validate`)
/// - Duplicate characters in `alphabet` are ignored after their first occurrence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
	/// Valid input/output symbols, in order.
	pub alphabet: String,

	/// History depth (N). 1 gives a bigram chain, 3 a four-gram chain.
	pub order: usize,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { alphabet: DEFAULT_ALPHABET.to_owned(), order: DEFAULT_ORDER }
	}
}

impl ModelConfig {
	/// Replaces the alphabet.
	pub fn with_alphabet(mut self, alphabet: &str) -> Self {
		self.alphabet = alphabet.to_owned();
		self
	}

	/// Replaces the history depth.
	pub fn with_order(mut self, order: usize) -> Self {
		self.order = order;
		self
	}

	/// Checks that the configuration can back a model.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `order` is 0.
	pub fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(ModelError::InvalidConfig("order must be >= 1".to_owned()));
		}
		Ok(())
	}
}
