use serde::{Deserialize, Serialize};

/// Index of a symbol inside an `Alphabet`.
///
/// Indexes `0..len` are alphabet members; `len` is the terminator.
pub type Symbol = u32;

/// Ordered set of valid characters for one model.
///
/// The terminator is not a character: it is the index just past the last
/// member, so it can never collide with a user-supplied symbol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
	symbols: Vec<char>,
}

impl Alphabet {
	/// Builds an alphabet from the characters of `chars`.
	///
	/// Repeated characters keep their first position.
	pub fn new(chars: &str) -> Self {
		let mut symbols: Vec<char> = Vec::new();
		for c in chars.chars() {
			if !symbols.contains(&c) {
				symbols.push(c);
			}
		}
		Self { symbols }
	}

	/// Number of members (the terminator excluded).
	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	/// Index reserved for the terminator.
	pub fn terminator(&self) -> Symbol {
		self.symbols.len() as Symbol
	}

	/// Number of distinct values a history slot or a next symbol can take.
	pub fn radix(&self) -> usize {
		self.symbols.len() + 1
	}

	/// Returns the index of `c`, or `None` if `c` is not a member.
	pub fn index_of(&self, c: char) -> Option<Symbol> {
		self.symbols.iter().position(|&s| s == c).map(|i| i as Symbol)
	}

	/// Returns the character at `symbol`, or `None` for the terminator
	/// and anything past it.
	pub fn char_at(&self, symbol: Symbol) -> Option<char> {
		self.symbols.get(symbol as usize).copied()
	}

	pub fn contains(&self, c: char) -> bool {
		self.symbols.contains(&c)
	}

	/// Iterates over the members in order.
	pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
		self.symbols.iter().copied()
	}
}
