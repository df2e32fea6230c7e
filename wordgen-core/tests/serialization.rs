use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use wordgen_core::{LengthBounds, ModelConfig, ModelError, SequenceModel};

/// Random source stuck at the top of [0, 1).
struct MaxRng;

impl RngCore for MaxRng {
	fn next_u32(&mut self) -> u32 {
		u32::MAX
	}

	fn next_u64(&mut self) -> u64 {
		u64::MAX
	}

	fn fill_bytes(&mut self, dst: &mut [u8]) {
		dst.fill(u8::MAX);
	}
}

fn trained() -> SequenceModel {
	let mut model = SequenceModel::default();
	for word in ["hello", "world", "test"] {
		model.analyze_word(word, 1.0).unwrap();
	}
	model.analyze_text("lorem ipsum dolor sit amet", 0.25).unwrap();
	model.finalize();
	model
}

fn small() -> SequenceModel {
	SequenceModel::new(ModelConfig::default().with_alphabet("ab").with_order(1)).unwrap()
}

fn serialized(model: &SequenceModel) -> String {
	let mut buffer = Vec::new();
	model.write_table(&mut buffer).unwrap();
	String::from_utf8(buffer).unwrap()
}

#[test]
fn text_table_layout() {
	let mut model = small();
	model.analyze_word("ab", 1.0).unwrap();
	model.finalize();
	// Rows a, b, start; columns a, b, end
	assert_eq!(serialized(&model), "0 1 1 0 0 1 1 1 1 ");
}

#[test]
fn full_table_has_one_value_per_transition() {
	let text = serialized(&trained());
	assert_eq!(text.split_whitespace().count(), 27 * 27 * 27 * 27);
	assert!(text.contains('.'));
}

#[test]
fn unfinalized_model_is_not_serialized() {
	let mut model = SequenceModel::default();
	model.analyze_word("test", 1.0).unwrap();

	let mut buffer = Vec::new();
	assert!(matches!(model.write_table(&mut buffer), Err(ModelError::NotFinalized)));
	assert!(buffer.is_empty());
	assert!(!model.is_finalized());
	assert!(matches!(model.to_bytes(), Err(ModelError::NotFinalized)));
}

#[test]
fn round_trip_reproduces_generation() {
	let mut model = trained();
	let mut restored = SequenceModel::default();
	restored.read_table(serialized(&model).as_bytes()).unwrap();

	assert!(restored.is_finalized());
	assert_eq!(restored.table(), model.table());

	let mut first = StdRng::seed_from_u64(12345);
	let mut second = StdRng::seed_from_u64(12345);
	let words: Vec<String> = (0..50).map(|_| model.generate(&mut first)).collect();
	let again: Vec<String> = (0..50).map(|_| restored.generate(&mut second)).collect();
	assert_eq!(words, again);
}

#[test]
fn restored_model_rejects_training() {
	let mut restored = SequenceModel::default();
	restored.read_table(serialized(&trained()).as_bytes()).unwrap();
	assert!(matches!(restored.analyze_word("newword", 1.0), Err(ModelError::Finalized)));
}

#[test]
fn reading_replaces_training_statistics() {
	let mut source = small();
	source.analyze_word("ab", 1.0).unwrap();
	source.finalize();

	let mut target = small();
	target.analyze_word("bbbb", 1.0).unwrap();
	target.read_table(serialized(&source).as_bytes()).unwrap();

	let mut rng = StdRng::seed_from_u64(5);
	assert_eq!(target.generate(&mut rng), "ab");
}

fn assert_untouched(model: &SequenceModel) {
	assert!(!model.is_finalized());
	assert_eq!(model.state_count(), 3);
	assert_eq!(model.transition_weight("", Some('a')), Some(2.0));
	assert_eq!(model.transition_weight("a", None), Some(2.0));
}

fn target() -> SequenceModel {
	let mut model = small();
	model.analyze_word("a", 2.0).unwrap();
	model.analyze_word("b", 1.0).unwrap();
	model
}

#[test]
fn garbage_is_rejected() {
	let mut model = target();
	assert!(matches!(model.read_table("invalid data here".as_bytes()), Err(ModelError::Malformed(_))));
	assert_untouched(&model);
}

#[test]
fn out_of_range_values_are_rejected() {
	for bad in ["1.5", "-1.0", "NaN"] {
		let mut model = target();
		let text = format!("{} 0 0 0 0 0 0 0 1", bad);
		match model.read_table(text.as_bytes()) {
			Err(ModelError::OutOfRange { index, .. }) => assert_eq!(index, 0),
			other => panic!("unexpected result for {}: {:?}", bad, other),
		}
		assert_untouched(&model);
	}
}

#[test]
fn out_of_range_value_inside_a_full_table_is_rejected() {
	let text = serialized(&trained());
	let tampered = format!("-1.0 {}", text.split_once(' ').unwrap().1);

	let mut model = SequenceModel::default();
	assert!(matches!(model.read_table(tampered.as_bytes()), Err(ModelError::OutOfRange { .. })));
	assert!(!model.is_finalized());
}

#[test]
fn short_stream_is_rejected() {
	let mut model = target();
	match model.read_table("0 1 1 0 0 1 1 1".as_bytes()) {
		Err(ModelError::Truncated { expected, found }) => assert_eq!((expected, found), (9, 8)),
		other => panic!("unexpected result: {:?}", other),
	}
	assert_untouched(&model);
}

#[test]
fn trailing_values_are_rejected() {
	let mut model = target();
	assert!(matches!(
		model.read_table("0 1 1 0 0 1 1 1 1 0".as_bytes()),
		Err(ModelError::TrailingData)
	));
	assert_untouched(&model);
}

#[test]
fn decreasing_row_is_rejected() {
	let mut model = target();
	assert!(matches!(
		model.read_table("0 1 0.5 0 0 1 1 1 1".as_bytes()),
		Err(ModelError::Malformed(_))
	));
	assert_untouched(&model);
}

#[test]
fn rounding_overrun_takes_the_last_entry() {
	// Start row reaches only 0.5; the top draw runs past it
	let mut model = small();
	model.read_table("0 0 0 0 0 0 0.5 0.5 0.5".as_bytes()).unwrap();
	assert_eq!(model.generate(&mut MaxRng), "a");
}

#[test]
fn fractional_weights_survive_both_round_trips() {
	// Added out of symbol order: summing 0.3 + 0.2 + 0.1 and 0.1 + 0.2 + 0.3 differ
	let mut model = SequenceModel::new(ModelConfig::default().with_alphabet("abc").with_order(1)).unwrap();
	model.analyze_word("c", 0.3).unwrap();
	model.analyze_word("b", 0.2).unwrap();
	model.analyze_word("a", 0.1).unwrap();
	model.finalize();

	let table = model.table().unwrap();
	let start = table.distribution(&table.initial_history()).unwrap();
	assert_eq!(start.entries().last(), Some(&(2, 1.0)));

	let mut restored = SequenceModel::new(model.config().clone()).unwrap();
	restored.read_table(serialized(&model).as_bytes()).unwrap();
	assert_eq!(restored.table(), model.table());

	let snapshot = SequenceModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
	assert_eq!(snapshot.table(), model.table());
}

#[test]
fn loaded_cycle_is_cut_by_the_maximum_length() {
	// Start -> a, then a -> a forever: no terminator is reachable
	let mut model = small();
	model.read_table("1 1 1 0 0 0 1 1 1".as_bytes()).unwrap();
	let bounds = LengthBounds::new(0, Some(4)).unwrap();
	let mut rng = StdRng::seed_from_u64(3);
	assert_eq!(model.generate_bounded(&mut rng, &bounds).unwrap(), "aaaa");
}

#[test]
fn binary_snapshot_round_trip() {
	let config = ModelConfig::default().with_alphabet("xyzé").with_order(2);
	let mut model = SequenceModel::new(config.clone()).unwrap();
	model.analyze_text("xyz zéx yyé xzz", 1.0).unwrap();
	model.finalize();

	let bytes = model.to_bytes().unwrap();
	let mut restored = SequenceModel::from_bytes(&bytes).unwrap();
	assert!(restored.is_finalized());
	assert_eq!(restored.config(), &config);
	assert_eq!(restored.table(), model.table());

	let mut first = StdRng::seed_from_u64(99);
	let mut second = StdRng::seed_from_u64(99);
	for _ in 0..20 {
		assert_eq!(model.generate(&mut first), restored.generate(&mut second));
	}
}

#[test]
fn corrupt_snapshot_is_rejected() {
	assert!(SequenceModel::from_bytes(&[0xff, 0xff, 0xff]).is_err());

	let mut model = small();
	model.analyze_word("ab", 1.0).unwrap();
	model.finalize();
	let bytes = model.to_bytes().unwrap();
	assert!(SequenceModel::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}
