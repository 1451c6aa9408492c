use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::model::scope::ScopeMode;

/// Run configuration of a `ComponentManager`.
///
/// # Responsibilities
/// - Enable or disable constant mining (statistics and weighted selection)
/// - Optionally fix the scoped literal mode before any literal is registered
/// - Control how often mined constants are preferred, and seed the random source
///
/// Fields omitted from a serialized configuration take their `Default` value.
/// Deserialization goes through the same range check as
/// [`ManagerConfig::set_mining_probability`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "ConfigFile")]
pub struct ManagerConfig {
	/// Keep mining statistics and use them to bias selection.
	pub constant_mining: bool,

	/// Scoped literal mode of the run. `None` lets the first scoped
	/// registration decide.
	pub literals_level: Option<ScopeMode>,

	/// Probability of drawing from the weighted mined constants (0.0..=1.0).
	mining_probability: f64,

	/// Seed of the run's random source.
	pub seed: u64,
}

impl Default for ManagerConfig {
	fn default() -> Self {
		Self { constant_mining: false, literals_level: None, mining_probability: 0.01, seed: 0 }
	}
}

/// Unchecked field values as they appear in a serialized configuration.
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
	constant_mining: bool,
	literals_level: Option<ScopeMode>,
	mining_probability: f64,
	seed: u64,
}

impl Default for ConfigFile {
	fn default() -> Self {
		let config = ManagerConfig::default();
		Self {
			constant_mining: config.constant_mining,
			literals_level: config.literals_level,
			mining_probability: config.mining_probability,
			seed: config.seed,
		}
	}
}

impl TryFrom<ConfigFile> for ManagerConfig {
	type Error = PoolError;

	fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
		let mut config = ManagerConfig {
			constant_mining: file.constant_mining,
			literals_level: file.literals_level,
			seed: file.seed,
			..ManagerConfig::default()
		};
		config.set_mining_probability(file.mining_probability)?;
		Ok(config)
	}
}

impl ManagerConfig {
	/// Returns the current mining probability.
	pub fn mining_probability(&self) -> f64 {
		self.mining_probability
	}

	/// Sets the mining probability (0.0..=1.0).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_mining_probability(&mut self, probability: f64) -> Result<(), PoolError> {
		if !(0.0..=1.0).contains(&probability) {
			return Err(PoolError::InvalidProbability(probability));
		}
		self.mining_probability = probability;
		Ok(())
	}

	/// A configuration with constant mining enabled.
	pub fn with_mining(probability: f64) -> Result<Self, PoolError> {
		let mut config = Self { constant_mining: true, ..Self::default() };
		config.set_mining_probability(probability)?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn probability_is_validated() {
		let mut config = ManagerConfig::default();
		assert!(config.set_mining_probability(1.5).is_err());
		assert!(config.set_mining_probability(-0.1).is_err());
		assert!(config.set_mining_probability(f64::NAN).is_err());
		config.set_mining_probability(0.25).unwrap();
		assert_eq!(config.mining_probability(), 0.25);
	}

	#[test]
	fn deserialization_validates_probability() {
		let mut config = ManagerConfig::with_mining(0.3).unwrap();
		config.seed = 17;
		let bytes = postcard::to_stdvec(&config).unwrap();
		assert_eq!(postcard::from_bytes::<ManagerConfig>(&bytes).unwrap(), config);

		// Same field layout, out-of-range probability
		let bad = postcard::to_stdvec(&(true, Option::<ScopeMode>::None, 7.5_f64, 17_u64)).unwrap();
		assert!(postcard::from_bytes::<ManagerConfig>(&bad).is_err());
	}

	#[test]
	fn mining_config() {
		let config = ManagerConfig::with_mining(1.0).unwrap();
		assert!(config.constant_mining);
		assert_eq!(config.literals_level, None);
		assert!(ManagerConfig::with_mining(2.0).is_err());
	}
}
