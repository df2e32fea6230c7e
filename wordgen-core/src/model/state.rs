use serde::{Deserialize, Serialize};

use super::alphabet::Symbol;

/// Represents a history in the open (training) phase.
///
/// A `State` stores every transition observed from one history window to the
/// next symbol, with the weight accumulated for it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by how often (and how strongly) they were observed.
///
/// ## Invariants
/// - Each next symbol appears at most once in `transitions`
/// - Weights only ever grow by addition
#[derive(Clone, Debug, Default)]
pub struct State {
	/// Outgoing transitions in first-seen order.
	/// Example: [(e, 42.0), (a, 3.0), (terminator, 1.0)]
	transitions: Vec<(Symbol, f64)>,
}

impl State {
	/// Adds `weight` to the transition toward `next`.
	///
	/// - If the transition already exists, its weight is increased.
	/// - Otherwise, a new transition is created with `weight`.
	pub fn add_transition(&mut self, next: Symbol, weight: f64) {
		match self.transitions.iter_mut().find(|(symbol, _)| *symbol == next) {
			Some((_, total)) => *total += weight,
			None => self.transitions.push((next, weight)),
		}
	}

	/// Returns the weight accumulated toward `next` (0 if never observed).
	pub fn weight(&self, next: Symbol) -> f64 {
		self.transitions
			.iter()
			.find(|(symbol, _)| *symbol == next)
			.map_or(0.0, |(_, weight)| *weight)
	}

	/// Sum of all outgoing weights.
	pub fn total(&self) -> f64 {
		self.transitions.iter().map(|(_, weight)| weight).sum()
	}

	/// Merges another state into this one. Weights are summed.
	pub fn merge(&mut self, other: &Self) {
		for (next, weight) in &other.transitions {
			self.add_transition(*next, *weight);
		}
	}

	/// Builds the cumulative distribution of this state.
	///
	/// Entries are ordered by symbol index (terminator last), running-summed and
	/// divided by the total. Entries that add no probability mass are dropped.
	/// A state whose total is not a positive finite number yields an empty
	/// distribution.
	pub fn to_distribution(&self) -> Distribution {
		let mut sorted = self.transitions.clone();
		sorted.sort_by_key(|(symbol, _)| *symbol);

		// Summed in the same order as the running sum so the last entry is exactly 1
		let total = sorted.iter().fold(0.0, |sum, (_, weight)| sum + weight);
		if !(total.is_finite() && total > 0.0) {
			return Distribution::default();
		}

		let mut running = 0.0;
		let mut previous = 0.0;
		let mut entries = Vec::with_capacity(sorted.len());
		for (symbol, weight) in sorted {
			running += weight;
			let cumulative = f64::min(running / total, 1.0);
			if cumulative > previous {
				entries.push((symbol, cumulative));
				previous = cumulative;
			}
		}

		Distribution { entries }
	}
}

/// Cumulative distribution of the symbol following one history.
///
/// ## Invariants
/// - Entries are sorted by symbol index
/// - Cumulative probabilities are non-decreasing and within [0, 1]
/// - The last entry is 1.0 (within rounding) when built from a positive total
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Distribution {
	entries: Vec<(Symbol, f64)>,
}

impl Distribution {
	/// Builds a distribution from already validated entries.
	pub(crate) fn from_entries(entries: Vec<(Symbol, f64)>) -> Self {
		Self { entries }
	}

	pub fn entries(&self) -> &[(Symbol, f64)] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Inverse-CDF lookup for a draw in [0, 1).
	///
	/// Picks the first entry whose cumulative probability is strictly greater
	/// than `draw`. If rounding leaves the whole row at or below `draw`, the
	/// last entry is picked. Returns `None` for an empty distribution.
	pub fn sample(&self, draw: f64) -> Option<Symbol> {
		let index = self.entries.partition_point(|(_, cumulative)| *cumulative <= draw);
		self.entries
			.get(index)
			.or_else(|| self.entries.last())
			.map(|(symbol, _)| *symbol)
	}

	/// Cumulative probability of all symbols with index `<= symbol`.
	pub fn cumulative_at(&self, symbol: Symbol) -> f64 {
		self.entries
			.iter()
			.take_while(|(s, _)| *s <= symbol)
			.last()
			.map_or(0.0, |(_, cumulative)| *cumulative)
	}
}
