use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::model::scope::ScopeKey;
use crate::model::sequence::Sequence;

/// Mining counts of one sequence in one scope.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyRow {
	pub scope: ScopeKey,
	pub sequence: Sequence,
	pub frequency: u64,
	pub occurrence: Option<u64>,
}

/// Everything a mining pass hands to the component manager.
///
/// Written once by the mining pass and replayed with
/// `ComponentManager::feed_snapshot`, so an analysed code base does not have
/// to be mined again on every run.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MiningSnapshot {
	pub literals: Vec<(ScopeKey, Sequence)>,
	pub records: Vec<FrequencyRow>,
	pub cardinalities: Vec<(ScopeKey, u64)>,
	pub global_cardinality: u64,
}

/// Reads a snapshot encoded with `postcard`.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<MiningSnapshot, PoolError> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

/// Writes `snapshot` to `path` with `postcard`.
pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshot: &MiningSnapshot) -> Result<(), PoolError> {
	let bytes = postcard::to_stdvec(snapshot)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "bin";

/// The snapshot file kept next to `source`, e.g. `data/bank.txt` → `data/bank.bin`.
///
/// # Errors
/// Returns `Io` with `InvalidInput` if `source` names no file.
pub fn snapshot_path<P: AsRef<Path>>(source: P) -> Result<PathBuf, PoolError> {
	let source = source.as_ref();
	if source.file_name().is_none() {
		let message = format!("{} does not name a file", source.display());
		return Err(io::Error::new(io::ErrorKind::InvalidInput, message).into());
	}
	Ok(source.with_extension(SNAPSHOT_EXTENSION))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::sequence::Type;
	use pretty_assertions::assert_eq;

	#[test]
	fn snapshot_path_replaces_extension() {
		assert_eq!(snapshot_path("data/bank.txt").unwrap(), PathBuf::from("data/bank.bin"));
		assert_eq!(snapshot_path("bank").unwrap(), PathBuf::from("bank.bin"));
		assert_eq!(snapshot_path("../mining").unwrap(), PathBuf::from("../mining.bin"));
		assert!(matches!(snapshot_path(""), Err(PoolError::Io(e)) if e.kind() == io::ErrorKind::InvalidInput));
		assert!(snapshot_path("data/..").is_err());
	}

	#[test]
	fn snapshot_survives_a_file_round_trip() {
		let zero = Sequence::literal(Type::primitive("int"), "0");
		let snapshot = MiningSnapshot {
			literals: vec![(ScopeKey::namespace("bank"), zero.clone())],
			records: vec![FrequencyRow { scope: ScopeKey::namespace("bank"), sequence: zero, frequency: 3, occurrence: Some(1) }],
			cardinalities: vec![(ScopeKey::namespace("bank"), 2)],
			global_cardinality: 5,
		};

		let path = std::env::temp_dir().join(format!("seqpool-snapshot-{}.bin", std::process::id()));
		write_snapshot(&path, &snapshot).unwrap();
		let loaded = read_snapshot(&path).unwrap();
		let _ = fs::remove_file(&path);

		assert_eq!(loaded, snapshot);
	}

	#[test]
	fn missing_snapshot_is_an_io_error() {
		let err = read_snapshot("/nonexistent/seqpool/snapshot.bin").unwrap_err();
		assert!(matches!(err, PoolError::Io(_)));
	}
}
