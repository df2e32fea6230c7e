use std::fs;
use std::path::{Path, PathBuf};

use wordgen_core::{LengthBounds, ModelConfig, SequenceModel};

/// Distribution file: one "word count [extra fields...]" entry per line.
const DISTRIBUTION_FILE: &str = "./data/count_1w.txt";

/// Builds the snapshot path next to the distribution file.
///
/// Example:
/// `data/count_1w.txt` → `data/count_1w.bin`
fn snapshot_path<P: AsRef<Path>>(input_path: P) -> PathBuf {
	input_path.as_ref().with_extension("bin")
}

/// Trains a model from a distribution file.
///
/// - Lines that do not start with a word and a numeric count are skipped
/// - Words are lowercased; words outside the alphabet are skipped
fn train_from_distribution<P: AsRef<Path>>(filename: P) -> Result<SequenceModel, Box<dyn std::error::Error>> {
	let contents = fs::read_to_string(filename)?;
	let mut model = SequenceModel::new(ModelConfig::default())?;

	let mut skipped = 0;
	for line in contents.lines() {
		let mut fields = line.split_whitespace();
		let (Some(word), Some(count)) = (fields.next(), fields.next()) else {
			continue;
		};
		let Ok(count) = count.parse::<f64>() else {
			skipped += 1;
			continue;
		};
		if let Err(e) = model.analyze_word(&word.to_lowercase(), count) {
			log::debug!("skipping {:?}: {}", word, e);
			skipped += 1;
		}
	}
	log::info!("trained {} states, {} lines skipped", model.state_count(), skipped);

	model.finalize();
	Ok(model)
}

/// Loads the snapshot if one exists, otherwise trains and writes it.
fn load_model<P: AsRef<Path>>(filename: P) -> Result<SequenceModel, Box<dyn std::error::Error>> {
	let snapshot = snapshot_path(&filename);
	if snapshot.exists() {
		log::info!("loading snapshot {}", snapshot.display());
		return Ok(SequenceModel::from_bytes(&fs::read(snapshot)?)?);
	}

	let model = train_from_distribution(&filename)?;
	fs::write(&snapshot, model.to_bytes()?)?;
	Ok(model)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	// Load the snapshot (.bin) if it exists, otherwise train from the distribution file
	let mut model = load_model(DISTRIBUTION_FILE)?;

	// The caller owns the random source; a seeded one makes runs reproducible
	let mut rng = rand::rng();

	// Unbounded words: the chain stops whenever the terminator is drawn
	for i in 0..5 {
		println!("Generated word {}: {}", i + 1, model.generate(&mut rng));
	}

	// Bounded words: too short restarts, too long is cut at the maximum
	let bounds = LengthBounds::new(4, Some(8))?;
	for i in 0..5 {
		println!("Bounded word {}: {}", i + 1, model.generate_bounded(&mut rng, &bounds)?);
	}

	// Invalid bounds are rejected up front
	match LengthBounds::new(8, Some(4)) {
		Ok(_) => println!("Should not happen"),
		Err(e) => println!("{}", e),
	}

	Ok(())
}
