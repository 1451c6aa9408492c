use std::collections::HashMap;

use crate::model::scope::ScopeKey;
use crate::model::sequence::Sequence;

/// Mining counts observed for one scope instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeStatistics {
	/// Times each sequence occurs within the scope.
	frequency: HashMap<Sequence, u64>,
	/// Number of distinct scope instances each sequence occurs in.
	occurrence: HashMap<Sequence, u64>,
	/// Number of scope instances considered, when specific to this scope.
	cardinality: Option<u64>,
}

impl ScopeStatistics {
	pub fn frequency(&self) -> &HashMap<Sequence, u64> {
		&self.frequency
	}

	pub fn occurrence(&self) -> &HashMap<Sequence, u64> {
		&self.occurrence
	}

	pub fn cardinality(&self) -> Option<u64> {
		self.cardinality
	}
}

/// Frequency, occurrence and cardinality data fed by the mining pass.
///
/// One record per scope key, so general, per-unit and per-namespace
/// statistics share a single representation. Pure storage: the weights
/// derived from it live in `WeightCache`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiningStatistics {
	scopes: HashMap<ScopeKey, ScopeStatistics>,
	/// Total number of declaring units analysed.
	global_cardinality: u64,
}

impl MiningStatistics {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the frequency of `sequence` in `scope`, replacing a previous value.
	pub fn record_frequency(&mut self, scope: ScopeKey, sequence: Sequence, frequency: u64) {
		self.scopes.entry(scope).or_default().frequency.insert(sequence, frequency);
	}

	/// Sets the occurrence count of `sequence` in `scope`, replacing a previous value.
	pub fn record_occurrence(&mut self, scope: ScopeKey, sequence: Sequence, occurrence: u64) {
		self.scopes.entry(scope).or_default().occurrence.insert(sequence, occurrence);
	}

	pub fn set_cardinality(&mut self, scope: ScopeKey, cardinality: u64) {
		self.scopes.entry(scope).or_default().cardinality = Some(cardinality);
	}

	pub fn set_global_cardinality(&mut self, cardinality: u64) {
		self.global_cardinality = cardinality;
	}

	pub fn global_cardinality(&self) -> u64 {
		self.global_cardinality
	}

	pub fn scope(&self, scope: &ScopeKey) -> Option<&ScopeStatistics> {
		self.scopes.get(scope)
	}

	/// The rarity denominator `N` for `scope`.
	///
	/// A cardinality recorded for the scope itself wins over the global one.
	pub fn cardinality_for(&self, scope: &ScopeKey) -> u64 {
		self.scopes
			.get(scope)
			.and_then(ScopeStatistics::cardinality)
			.unwrap_or(self.global_cardinality)
	}

	pub fn scopes(&self) -> impl Iterator<Item = (&ScopeKey, &ScopeStatistics)> {
		self.scopes.iter()
	}
}
