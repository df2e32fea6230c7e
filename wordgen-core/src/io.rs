use std::collections::HashMap;
use std::io::{BufWriter, Read, Write};

use crate::error::{ModelError, Result};
use crate::model::alphabet::{Alphabet, Symbol};
use crate::model::state::Distribution;
use crate::model::table::DistributionTable;

/// Number of values in the dense text table: one row of `radix` values for
/// each of the `radix^order` history windows.
///
/// Returns `(rows, values)`.
fn dense_shape(alphabet: &Alphabet, order: usize) -> Result<(usize, usize)> {
	let radix = alphabet.radix();
	let rows = u32::try_from(order)
		.ok()
		.and_then(|order| radix.checked_pow(order))
		.ok_or(ModelError::TableTooLarge)?;
	let values = rows.checked_mul(radix).ok_or(ModelError::TableTooLarge)?;
	Ok((rows, values))
}

/// History window at position `row` of the dense enumeration.
///
/// Windows are enumerated lexicographically, oldest symbol most significant.
fn history_at(mut row: usize, radix: usize, order: usize) -> Vec<Symbol> {
	let mut history = vec![0; order];
	for slot in history.iter_mut().rev() {
		*slot = (row % radix) as Symbol;
		row /= radix;
	}
	history
}

/// Writes a table as a flat, space-separated stream of cumulative probabilities.
///
/// Each history window writes `radix` values, the cumulative probability of
/// every symbol index (terminator last). Unobserved windows write zeros.
pub(crate) fn write_table<W: Write>(table: &DistributionTable, writer: W) -> Result<()> {
	let alphabet = table.alphabet();
	let radix = alphabet.radix();
	let (rows, values) = dense_shape(alphabet, table.order())?;
	log::debug!("writing table: {} rows, {} values", rows, values);

	let mut writer = BufWriter::new(writer);
	for row in 0..rows {
		let history = history_at(row, radix, table.order());
		match table.distribution(&history) {
			Some(distribution) if !distribution.is_empty() => {
				for symbol in 0..radix {
					write!(writer, "{} ", distribution.cumulative_at(symbol as Symbol))?;
				}
			}
			_ => {
				for _ in 0..radix {
					writer.write_all(b"0 ")?;
				}
			}
		}
	}
	writer.flush()?;
	Ok(())
}

/// Reads a table written by `write_table` for the given alphabet and order.
///
/// # Errors
/// - `Malformed` if a value does not parse or a row decreases
/// - `OutOfRange` if a value is outside [0, 1]
/// - `Truncated` if the stream ends early
/// - `TrailingData` if values remain after the last row
pub(crate) fn read_table<R: Read>(alphabet: &Alphabet, order: usize, mut reader: R) -> Result<DistributionTable> {
	let radix = alphabet.radix();
	let (rows, values) = dense_shape(alphabet, order)?;

	let mut text = String::new();
	reader.read_to_string(&mut text)?;
	let mut tokens = text.split_whitespace();

	let mut table = HashMap::new();
	let mut row_values = Vec::with_capacity(radix);
	for row in 0..rows {
		row_values.clear();
		for symbol in 0..radix {
			let index = row * radix + symbol;
			let token = tokens.next().ok_or(ModelError::Truncated { expected: values, found: index })?;
			let value: f64 = token
				.parse()
				.map_err(|_| ModelError::Malformed(format!("invalid value {:?} at index {}", token, index)))?;
			if !(0.0..=1.0).contains(&value) {
				return Err(ModelError::OutOfRange { index, value });
			}
			row_values.push(value);
		}

		if let Some(distribution) = distribution_from_row(&row_values, row * radix)? {
			table.insert(history_at(row, radix, order), distribution);
		}
	}

	if tokens.next().is_some() {
		return Err(ModelError::TrailingData);
	}

	log::debug!("read table: {} states from {} values", table.len(), values);
	Ok(DistributionTable::new(alphabet.clone(), order, table))
}

/// Keeps the symbols that add probability mass. An all-zero row is unobserved.
fn distribution_from_row(values: &[f64], offset: usize) -> Result<Option<Distribution>> {
	let mut entries = Vec::new();
	let mut previous = 0.0;
	for (symbol, &value) in values.iter().enumerate() {
		if value < previous {
			return Err(ModelError::Malformed(format!(
				"cumulative probability decreases at index {}",
				offset + symbol
			)));
		}
		if value > previous {
			entries.push((symbol as Symbol, value));
			previous = value;
		}
	}

	if entries.is_empty() {
		Ok(None)
	} else {
		Ok(Some(Distribution::from_entries(entries)))
	}
}

/// Serializes a table, alphabet and order included, with `postcard`.
pub(crate) fn to_bytes(table: &DistributionTable) -> Result<Vec<u8>> {
	Ok(postcard::to_stdvec(table)?)
}

/// Deserializes and validates a table written by `to_bytes`.
pub(crate) fn from_bytes(bytes: &[u8]) -> Result<DistributionTable> {
	let table: DistributionTable = postcard::from_bytes(bytes)?;
	table.validate()?;
	Ok(table)
}
