use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, Symbol};
use super::length::LengthBounds;
use super::state::Distribution;
use crate::error::{ModelError, Result};

/// Closed, sampling-ready form of a trained model.
///
/// Maps each observed history window to the cumulative distribution of the
/// symbol that follows it. Sampling only reads the table, so a single table
/// can serve any number of independent random sources.
///
/// # Invariants
/// - Every history has exactly `order` symbols, each `<= alphabet.terminator()`
/// - Every distribution satisfies the `Distribution` invariants
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DistributionTable {
	alphabet: Alphabet,
	order: usize,
	rows: HashMap<Vec<Symbol>, Distribution>,
}

impl DistributionTable {
	pub(crate) fn new(alphabet: Alphabet, order: usize, rows: HashMap<Vec<Symbol>, Distribution>) -> Self {
		Self { alphabet, order, rows }
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of history windows with a distribution.
	pub fn state_count(&self) -> usize {
		self.rows.len()
	}

	/// History before any symbol has been emitted.
	pub fn initial_history(&self) -> Vec<Symbol> {
		vec![self.alphabet.terminator(); self.order]
	}

	/// Returns the distribution following `history`, if one was observed.
	pub fn distribution(&self, history: &[Symbol]) -> Option<&Distribution> {
		self.rows.get(history)
	}

	/// Generates one word.
	///
	/// Walks the chain from the all-terminator history, drawing one value in
	/// [0, 1) per step, until the terminator is drawn or the current history
	/// has no (or an empty) distribution. The result never contains the
	/// terminator and may be empty.
	///
	/// The walk has no length cap. A table read from external data may hold a
	/// cycle that never reaches the terminator, and then this never returns:
	/// use `generate_bounded` with a maximum length on tables you did not build.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
		self.walk(rng, &LengthBounds::default())
	}

	/// Generates one word whose length lies within `bounds`.
	///
	/// - Reaching the maximum stops the walk and keeps what was emitted.
	/// - Stopping below the minimum discards the word and starts over.
	///
	/// # Errors
	/// Returns `LengthUnsatisfiable` after `bounds.max_attempts()` rejected words.
	pub fn generate_bounded<R: Rng + ?Sized>(&self, rng: &mut R, bounds: &LengthBounds) -> Result<String> {
		for attempt in 0..bounds.max_attempts() {
			let word = self.walk(rng, bounds);
			if bounds.accepts(word.chars().count()) {
				return Ok(word);
			}
			log::trace!("attempt {} rejected {:?}, restarting", attempt, word);
		}

		log::warn!(
			"no word within [{}, {:?}] after {} attempts",
			bounds.min(),
			bounds.max(),
			bounds.max_attempts()
		);
		Err(ModelError::LengthUnsatisfiable { attempts: bounds.max_attempts() })
	}

	fn walk<R: Rng + ?Sized>(&self, rng: &mut R, bounds: &LengthBounds) -> String {
		let mut history = self.initial_history();
		let mut word = String::new();
		let mut length = 0;

		while !bounds.is_full(length) {
			let draw: f64 = rng.random();
			let next = self.rows.get(history.as_slice()).and_then(|distribution| distribution.sample(draw));

			// The terminator (and any index past it) has no character
			let Some((symbol, c)) = next.and_then(|symbol| self.alphabet.char_at(symbol).map(|c| (symbol, c))) else {
				break;
			};

			word.push(c);
			length += 1;

			if !history.is_empty() {
				history.rotate_left(1);
				let last = history.len() - 1;
				history[last] = symbol;
			}
		}

		word
	}

	/// Checks the table invariants.
	///
	/// Used on tables that did not come out of `finalize`.
	pub(crate) fn validate(&self) -> Result<()> {
		let terminator = self.alphabet.terminator();
		for (history, distribution) in &self.rows {
			if history.len() != self.order || history.iter().any(|s| *s > terminator) {
				return Err(ModelError::Malformed(format!("invalid history {:?}", history)));
			}

			let mut previous: Option<(Symbol, f64)> = None;
			for (index, (symbol, cumulative)) in distribution.entries().iter().enumerate() {
				if !(0.0..=1.0).contains(cumulative) {
					return Err(ModelError::OutOfRange { index, value: *cumulative });
				}
				if *symbol > terminator {
					return Err(ModelError::Malformed(format!("symbol {} past the terminator", symbol)));
				}
				if let Some((last_symbol, last_cumulative)) = previous {
					if *symbol <= last_symbol || *cumulative < last_cumulative {
						return Err(ModelError::Malformed(format!("row {:?} is not ordered", history)));
					}
				}
				previous = Some((*symbol, *cumulative));
			}
		}
		Ok(())
	}
}
