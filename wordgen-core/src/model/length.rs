use crate::error::{ModelError, Result};

/// Default number of restarts before a bounded generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Length constraints for bounded generation.
///
/// # Responsibilities
/// - Track the minimum and (optional) maximum output length
/// - Cap the number of restarts so unsatisfiable bounds cannot loop forever
///
/// # Invariants
/// - `min <= max` when `max` is set (checked by the setters)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthBounds {
	min: usize,
	max: Option<usize>,

	/// Number of generations tried before giving up, at least 1.
	max_attempts: usize,
}

impl Default for LengthBounds {
	fn default() -> Self {
		Self { min: 0, max: None, max_attempts: DEFAULT_MAX_ATTEMPTS }
	}
}

impl LengthBounds {
	/// Creates bounds `min..=max` (`max = None` means unbounded).
	///
	/// # Errors
	/// Returns `InvalidLengthBounds` if `min > max`.
	pub fn new(min: usize, max: Option<usize>) -> Result<Self> {
		let mut bounds = Self::default();
		bounds.set_max(max)?;
		bounds.set_min(min)?;
		Ok(bounds)
	}

	pub fn min(&self) -> usize {
		self.min
	}

	pub fn max(&self) -> Option<usize> {
		self.max
	}

	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	/// Sets how many words are generated before giving up.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_attempts` is 0.
	pub fn set_max_attempts(&mut self, max_attempts: usize) -> Result<()> {
		if max_attempts == 0 {
			return Err(ModelError::InvalidConfig("max_attempts must be >= 1".to_owned()));
		}
		self.max_attempts = max_attempts;
		Ok(())
	}

	/// Sets the minimum length.
	///
	/// # Errors
	/// Returns `InvalidLengthBounds` if it exceeds the current maximum.
	pub fn set_min(&mut self, min: usize) -> Result<()> {
		Self::check(min, self.max)?;
		self.min = min;
		Ok(())
	}

	/// Sets the maximum length (`None` for unbounded).
	///
	/// # Errors
	/// Returns `InvalidLengthBounds` if it is below the current minimum.
	pub fn set_max(&mut self, max: Option<usize>) -> Result<()> {
		Self::check(self.min, max)?;
		self.max = max;
		Ok(())
	}

	/// Returns true once `length` symbols leave no room for another one.
	pub(crate) fn is_full(&self, length: usize) -> bool {
		self.max.is_some_and(|max| length >= max)
	}

	pub(crate) fn accepts(&self, length: usize) -> bool {
		length >= self.min && self.max.is_none_or(|max| length <= max)
	}

	fn check(min: usize, max: Option<usize>) -> Result<()> {
		match max {
			Some(max) if min > max => Err(ModelError::InvalidLengthBounds { min, max }),
			_ => Ok(()),
		}
	}
}
