use std::collections::HashMap;
use std::io::{Read, Write};
use std::iter;

use rand::Rng;

use super::alphabet::{Alphabet, Symbol};
use super::length::LengthBounds;
use super::state::State;
use super::table::DistributionTable;
use crate::config::ModelConfig;
use crate::error::{ModelError, Result};
use crate::io;

/// Trainable character-sequence generator.
///
/// A model starts open: `analyze_word` and `analyze_text` accumulate
/// weighted transitions between history windows of `order` symbols and the
/// symbol that follows them. `finalize` (explicit, or implied by the first
/// generation) closes it once and for all, turning the statistics into
/// cumulative distributions. A closed model only generates and serializes.
///
/// # Responsibilities
/// - Validate training input before touching any statistic
/// - Convert statistics to a `DistributionTable` exactly once
/// - Generate words from a caller-supplied random source
///
/// # Invariants
/// - `table.is_some()` if and only if the model is closed
/// - `states` is empty once the model is closed
#[derive(Clone, Debug)]
pub struct SequenceModel {
	config: ModelConfig,
	alphabet: Alphabet,

	/// Transition statistics, keyed by history window.
	states: HashMap<Vec<Symbol>, State>,

	/// Sampling table, present once finalized.
	table: Option<DistributionTable>,
}

impl Default for SequenceModel {
	/// Open model over the lowercase Latin alphabet with a 3-symbol history.
	fn default() -> Self {
		Self::from_parts(ModelConfig::default())
	}
}

impl SequenceModel {
	/// Creates an open, empty model.
	///
	/// # Errors
	/// Returns `InvalidConfig` if the configuration does not validate.
	pub fn new(config: ModelConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self::from_parts(config))
	}

	fn from_parts(config: ModelConfig) -> Self {
		let alphabet = Alphabet::new(&config.alphabet);
		Self { config, alphabet, states: HashMap::new(), table: None }
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn order(&self) -> usize {
		self.config.order
	}

	/// Returns true once the model is closed.
	pub fn is_finalized(&self) -> bool {
		self.table.is_some()
	}

	/// Number of observed history windows.
	pub fn state_count(&self) -> usize {
		match &self.table {
			Some(table) => table.state_count(),
			None => self.states.len(),
		}
	}

	/// Read-only access to the sampling table of a closed model.
	pub fn table(&self) -> Option<&DistributionTable> {
		self.table.as_ref()
	}

	/// Weight accumulated for `next` after `history` during training.
	///
	/// `history` is the text emitted so far: only its last `order` characters
	/// count, and shorter histories are padded with the terminator as at the
	/// start of a word. `next = None` stands for the terminator.
	///
	/// Returns `None` if the model is closed or a character is not in the
	/// alphabet.
	pub fn transition_weight(&self, history: &str, next: Option<char>) -> Option<f64> {
		if self.is_finalized() {
			return None;
		}

		let mut window = vec![self.alphabet.terminator(); self.config.order];
		for c in history.chars() {
			window.rotate_left(1);
			window[self.config.order - 1] = self.alphabet.index_of(c)?;
		}
		let next = match next {
			Some(c) => self.alphabet.index_of(c)?,
			None => self.alphabet.terminator(),
		};

		Some(self.states.get(&window).map_or(0.0, |state| state.weight(next)))
	}

	/// Adds a word to the transition statistics.
	///
	/// Every symbol contributes `weight` to the transition from the history
	/// preceding it, and one more `weight` goes to the transition from the
	/// last history to the terminator. A weight of 1.0 counts the word once.
	///
	/// # Errors
	/// - `Finalized` if the model is closed
	/// - `InvalidWeight` if `weight` is NaN, infinite or negative
	/// - `EmptyInput` if `word` is empty
	/// - `InvalidSymbol` if a character is not in the alphabet
	///
	/// Nothing is recorded unless the whole word is valid.
	pub fn analyze_word(&mut self, word: &str, weight: f64) -> Result<()> {
		self.check_open(weight)?;
		if word.is_empty() {
			return Err(ModelError::EmptyInput);
		}

		let symbols = word
			.chars()
			.enumerate()
			.map(|(position, symbol)| {
				self.alphabet
					.index_of(symbol)
					.ok_or(ModelError::InvalidSymbol { symbol, position })
			})
			.collect::<Result<Vec<Symbol>>>()?;

		self.record(&symbols, weight);
		Ok(())
	}

	/// Adds every word of `text` to the transition statistics.
	///
	/// Words are maximal runs of alphabet symbols; any other character is a
	/// separator and consecutive separators collapse.
	///
	/// Returns the number of words recorded.
	///
	/// # Errors
	/// - `Finalized` if the model is closed
	/// - `InvalidWeight` if `weight` is NaN, infinite or negative
	/// - `EmptyInput` if `text` is empty
	/// - `NoSymbols` if `text` holds separators only
	pub fn analyze_text(&mut self, text: &str, weight: f64) -> Result<usize> {
		self.check_open(weight)?;
		if text.is_empty() {
			return Err(ModelError::EmptyInput);
		}

		let words: Vec<Vec<Symbol>> = text
			.split(|c: char| !self.alphabet.contains(c))
			.filter(|run| !run.is_empty())
			.map(|run| run.chars().filter_map(|c| self.alphabet.index_of(c)).collect())
			.collect();

		if words.is_empty() {
			return Err(ModelError::NoSymbols);
		}

		for symbols in &words {
			self.record(symbols, weight);
		}
		Ok(words.len())
	}

	fn check_open(&self, weight: f64) -> Result<()> {
		if self.is_finalized() {
			return Err(ModelError::Finalized);
		}
		if !weight.is_finite() || weight < 0.0 {
			return Err(ModelError::InvalidWeight(weight));
		}
		Ok(())
	}

	/// Walks already validated symbols, then the terminator.
	fn record(&mut self, symbols: &[Symbol], weight: f64) {
		let terminator = self.alphabet.terminator();
		let last = self.config.order - 1;
		let mut history = vec![terminator; self.config.order];

		for &symbol in symbols.iter().chain(iter::once(&terminator)) {
			self.states
				.entry(history.clone())
				.or_default()
				.add_transition(symbol, weight);
			history.rotate_left(1);
			history[last] = symbol;
		}
	}

	/// Merges the statistics of another open model into this one.
	///
	/// Intended for combining models trained on separate corpora.
	///
	/// # Errors
	/// - `Finalized` if either model is closed
	/// - `ConfigMismatch` if alphabets or orders differ
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.is_finalized() || other.is_finalized() {
			return Err(ModelError::Finalized);
		}
		if self.alphabet != other.alphabet || self.config.order != other.config.order {
			return Err(ModelError::ConfigMismatch);
		}

		for (history, state) in &other.states {
			self.states.entry(history.clone()).or_default().merge(state);
		}
		Ok(())
	}

	/// Closes the model. Calling it again has no effect.
	pub fn finalize(&mut self) {
		self.close();
	}

	fn close(&mut self) -> &DistributionTable {
		let (alphabet, order, states) = (&self.alphabet, self.config.order, &mut self.states);
		self.table.get_or_insert_with(|| {
			let rows: HashMap<_, _> = std::mem::take(states)
				.into_iter()
				.map(|(history, state)| (history, state.to_distribution()))
				.collect();
			log::debug!(
				"finalized model: {} states, {} empty",
				rows.len(),
				rows.values().filter(|distribution| distribution.is_empty()).count()
			);
			DistributionTable::new(alphabet.clone(), order, rows)
		})
	}

	/// Generates one word, finalizing the model first if needed.
	///
	/// See `DistributionTable::generate`. A model trained through `analyze_word`
	/// or `analyze_text` always reaches the terminator, but one loaded with
	/// `read_table` or `from_bytes` may not: prefer `generate_bounded` with a
	/// maximum length there.
	pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
		self.close().generate(rng)
	}

	/// Generates one word within `bounds`, finalizing the model first if needed.
	///
	/// # Errors
	/// Returns `LengthUnsatisfiable` if no word fits after `bounds.max_attempts()` tries.
	pub fn generate_bounded<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: &LengthBounds) -> Result<String> {
		self.close().generate_bounded(rng, bounds)
	}

	/// Writes the sampling table as whitespace-separated cumulative probabilities.
	///
	/// # Errors
	/// Returns `NotFinalized` without writing anything if the model is open.
	pub fn write_table<W: Write>(&self, writer: W) -> Result<()> {
		let table = self.table.as_ref().ok_or(ModelError::NotFinalized)?;
		io::write_table(table, writer)
	}

	/// Replaces this model with a table read from `reader` and closes it.
	///
	/// The table must match this model's alphabet and order.
	///
	/// # Errors
	/// Any malformed, out-of-range or short stream fails and leaves the model untouched.
	pub fn read_table<R: Read>(&mut self, reader: R) -> Result<()> {
		let table = io::read_table(&self.alphabet, self.config.order, reader)?;
		self.states.clear();
		self.table = Some(table);
		Ok(())
	}

	/// Serializes a closed model, configuration included, to a compact binary snapshot.
	///
	/// # Errors
	/// Returns `NotFinalized` if the model is open.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let table = self.table.as_ref().ok_or(ModelError::NotFinalized)?;
		io::to_bytes(table)
	}

	/// Restores a closed model from a binary snapshot.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let table = io::from_bytes(bytes)?;
		let config = ModelConfig {
			alphabet: table.alphabet().chars().collect(),
			order: table.order(),
		};
		config.validate()?;

		Ok(Self {
			config,
			alphabet: table.alphabet().clone(),
			states: HashMap::new(),
			table: Some(table),
		})
	}
}
