use std::collections::HashMap;

use log::{debug, error};

use crate::error::PoolError;
use crate::model::scope::ScopeKey;
use crate::model::sequence::Sequence;
use crate::model::statistics::MiningStatistics;

/// Selection weight of each mined sequence within one scope.
pub type Weights = HashMap<Sequence, f64>;

/// TF-IDF style weight of a constant.
///
/// `frequency * (N + 1) / ((N + 1) - occurrence)`, where `N` is the number of
/// scope instances and `occurrence` the number of them the constant appears in.
///
/// Returns `None` when `occurrence > N`, which would make the denominator
/// zero or negative.
pub fn tf_idf(frequency: u64, occurrence: u64, cardinality: u64) -> Option<f64> {
	if occurrence > cardinality {
		return None;
	}
	let n_plus_one = cardinality as f64 + 1.0;
	Some(frequency as f64 * n_plus_one / (n_plus_one - occurrence as f64))
}

/// Lazily computed weights, memoized per scope for the rest of the run.
///
/// # Invariants
/// - An entry is written once and never invalidated
/// - A scope whose statistics fail validation gets no entry
#[derive(Clone, Debug, Default)]
pub struct WeightCache {
	cache: HashMap<ScopeKey, Weights>,
}

impl WeightCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the weights of every sequence with statistics in `scope`.
	///
	/// A scope without frequency data yields an empty mapping.
	///
	/// # Errors
	/// Returns `DataIntegrity` if an occurrence count exceeds the scope
	/// cardinality. Nothing is cached for that scope.
	pub fn weights_for(&mut self, scope: &ScopeKey, statistics: &MiningStatistics) -> Result<&Weights, PoolError> {
		if !self.cache.contains_key(scope) {
			let weights = Self::compute(scope, statistics)?;
			self.cache.insert(scope.clone(), weights);
		}
		Ok(&self.cache[scope])
	}

	fn compute(scope: &ScopeKey, statistics: &MiningStatistics) -> Result<Weights, PoolError> {
		let mut weights = Weights::new();
		let Some(scoped) = statistics.scope(scope).filter(|s| !s.frequency().is_empty()) else {
			debug!("no frequency data for {}", scope);
			return Ok(weights);
		};

		let cardinality = statistics.cardinality_for(scope);
		for (sequence, &frequency) in scoped.frequency() {
			let occurrence = scoped.occurrence().get(sequence).copied().unwrap_or(1);
			match tf_idf(frequency, occurrence, cardinality) {
				Some(weight) => {
					weights.insert(sequence.clone(), weight);
				}
				None => {
					error!(
						"rejecting mining record for {} in {}: occurrence {} with cardinality {}",
						sequence, scope, occurrence, cardinality
					);
					return Err(PoolError::DataIntegrity {
						scope: scope.clone(),
						sequence: sequence.clone(),
						occurrence,
						cardinality,
					});
				}
			}
		}

		debug!("computed {} weight(s) for {}", weights.len(), scope);
		Ok(weights)
	}

	pub fn is_cached(&self, scope: &ScopeKey) -> bool {
		self.cache.contains_key(scope)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::sequence::Type;
	use pretty_assertions::assert_eq;

	fn int(value: i32) -> Sequence {
		Sequence::literal(Type::primitive("int"), &value.to_string())
	}

	#[test]
	fn formula_matches_reference_values() {
		let weight = tf_idf(5, 2, 10).unwrap();
		assert!((weight - 55.0 / 9.0).abs() < 1e-12);
		assert_eq!(tf_idf(0, 2, 10), Some(0.0));
		assert_eq!(tf_idf(3, 1, 0), None);
	}

	#[test]
	fn occurrence_past_cardinality_is_rejected() {
		assert_eq!(tf_idf(1, 11, 10), None);
		assert_eq!(tf_idf(1, 12, 10), None);
		let edge = tf_idf(1, 10, 10).unwrap();
		assert!(edge.is_finite());

		let mut stats = MiningStatistics::new();
		stats.set_global_cardinality(10);
		stats.record_frequency(ScopeKey::Global, int(1), 4);
		stats.record_occurrence(ScopeKey::Global, int(1), 11);

		let mut cache = WeightCache::new();
		let err = cache.weights_for(&ScopeKey::Global, &stats).unwrap_err();
		assert!(matches!(err, PoolError::DataIntegrity { occurrence: 11, cardinality: 10, .. }));
		assert!(!cache.is_cached(&ScopeKey::Global));
	}

	#[test]
	fn missing_statistics_give_empty_weights() {
		let stats = MiningStatistics::new();
		let mut cache = WeightCache::new();
		assert!(cache.weights_for(&ScopeKey::unit("Account"), &stats).unwrap().is_empty());
	}

	#[test]
	fn weights_are_memoized() {
		let scope = ScopeKey::unit("Account");
		let mut stats = MiningStatistics::new();
		stats.set_global_cardinality(4);
		stats.record_frequency(scope.clone(), int(1), 2);

		let mut cache = WeightCache::new();
		let first = cache.weights_for(&scope, &stats).unwrap().clone();
		// Missing occurrence counts as one scope instance
		assert_eq!(first.get(&int(1)), Some(&(2.0 * 5.0 / 4.0)));

		stats.record_frequency(scope.clone(), int(2), 9);
		let second = cache.weights_for(&scope, &stats).unwrap();
		assert_eq!(second, &first);
	}
}
