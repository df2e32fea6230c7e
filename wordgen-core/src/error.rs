use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Every failure a `SequenceModel` can report.
///
/// None of these leave the model half-updated: an operation either applies
/// completely or returns one of these and changes nothing.
#[derive(Error, Debug)]
pub enum ModelError {
	#[error("model is finalized, training is closed")]
	Finalized,

	#[error("model is not finalized")]
	NotFinalized,

	#[error("input is empty")]
	EmptyInput,

	#[error("symbol {symbol:?} at position {position} is not in the alphabet")]
	InvalidSymbol { symbol: char, position: usize },

	#[error("text contains no alphabet symbol")]
	NoSymbols,

	#[error("invalid weight: {0}")]
	InvalidWeight(f64),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("model configurations do not match")]
	ConfigMismatch,

	#[error("invalid length bounds: min {min} > max {max}")]
	InvalidLengthBounds { min: usize, max: usize },

	#[error("no word satisfied the length bounds after {attempts} attempts")]
	LengthUnsatisfiable { attempts: usize },

	#[error("distribution table is too large to serialize")]
	TableTooLarge,

	#[error("malformed table: {0}")]
	Malformed(String),

	#[error("probability {value} at index {index} is outside [0, 1]")]
	OutOfRange { index: usize, value: f64 },

	#[error("table truncated: expected {expected} values, found {found}")]
	Truncated { expected: usize, found: usize },

	#[error("unexpected data after the end of the table")]
	TrailingData,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("binary snapshot error: {0}")]
	Binary(#[from] postcard::Error),
}
