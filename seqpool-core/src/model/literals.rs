use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::PoolError;
use crate::model::pool::TypeIndex;
use crate::model::scope::{ScopeKey, ScopeMode};
use crate::model::sequence::{Sequence, Type, TypeOracle};
use crate::model::sequence_list::SequenceList;
use crate::model::statistics::MiningStatistics;

/// Literal sequences and their mining statistics, grouped by scope.
///
/// # Responsibilities
/// - Keep each literal visible only within the scope it was registered under
/// - Enforce that a run uses a single scoped mode (declaring unit or namespace)
/// - Hold the mining statistics when constant mining is enabled
///
/// # Invariants
/// - All non-global keys share the same `ScopeMode`
/// - `statistics` is `Some` exactly when mining is enabled
#[derive(Clone, Debug)]
pub struct LiteralScopeStore {
	configured: Option<ScopeMode>,
	active: Option<ScopeMode>,
	scopes: HashMap<ScopeKey, TypeIndex>,
	statistics: Option<MiningStatistics>,
}

impl LiteralScopeStore {
	/// Creates an empty store.
	///
	/// - `configured`: the scoped mode fixed up front, if any
	/// - `mining`: whether mining statistics are kept
	pub fn new(configured: Option<ScopeMode>, mining: bool) -> Self {
		Self {
			configured,
			active: None,
			scopes: HashMap::new(),
			statistics: mining.then(MiningStatistics::new),
		}
	}

	/// The scoped mode in use, if a scoped literal or statistic was registered
	/// or the mode was configured.
	pub fn active_mode(&self) -> Option<ScopeMode> {
		self.active.or(self.configured)
	}

	/// Checks `scope` against the mode of the run and locks the mode on first use.
	///
	/// # Errors
	/// - `LiteralLevelMismatch` if the configuration fixes the other mode
	/// - `MixedLiteralScopes` if the other mode is already in use
	fn claim(&mut self, scope: &ScopeKey) -> Result<(), PoolError> {
		let Some(requested) = scope.mode() else {
			return Ok(());
		};
		if let Some(configured) = self.configured {
			if configured != requested {
				return Err(PoolError::LiteralLevelMismatch { configured, requested });
			}
		}
		match self.active {
			Some(active) if active != requested => Err(PoolError::MixedLiteralScopes { active, requested }),
			Some(_) => Ok(()),
			None => {
				debug!("literal scope mode locked to {}", requested);
				self.active = Some(requested);
				Ok(())
			}
		}
	}

	/// Adds a literal visible only within `scope`.
	pub fn register_literal(&mut self, scope: ScopeKey, sequence: Sequence) -> Result<(), PoolError> {
		self.claim(&scope)?;
		debug!("literal {} registered in {}", sequence, scope);
		self.scopes.entry(scope).or_default().add(&sequence);
		Ok(())
	}

	/// Attaches mining counts for `sequence` in `scope`.
	///
	/// `occurrence` is the number of scope instances the sequence was seen in;
	/// when absent the weight computation assumes a single one.
	///
	/// # Errors
	/// - `MiningDisabled` if the store keeps no statistics
	/// - `NotPrimitive` if the sequence does not produce a primitive-like value
	/// - the mode errors of `register_literal`
	pub fn record_frequency(
		&mut self,
		scope: ScopeKey,
		sequence: Sequence,
		frequency: u64,
		occurrence: Option<u64>,
	) -> Result<(), PoolError> {
		if self.statistics.is_none() {
			return Err(PoolError::MiningDisabled);
		}
		if !sequence.is_primitive_like() {
			return Err(PoolError::NotPrimitive { sequence });
		}
		self.claim(&scope)?;

		let statistics = self.statistics.as_mut().ok_or(PoolError::MiningDisabled)?;
		if let Some(occurrence) = occurrence {
			statistics.record_occurrence(scope.clone(), sequence.clone(), occurrence);
		}
		statistics.record_frequency(scope, sequence, frequency);
		Ok(())
	}

	/// Sets the number of scope instances behind `scope`'s statistics.
	///
	/// # Errors
	/// `MiningDisabled` before any mode check, then the mode errors of
	/// `register_literal`.
	pub fn set_cardinality(&mut self, scope: ScopeKey, cardinality: u64) -> Result<(), PoolError> {
		if self.statistics.is_none() {
			return Err(PoolError::MiningDisabled);
		}
		self.claim(&scope)?;
		let statistics = self.statistics.as_mut().ok_or(PoolError::MiningDisabled)?;
		statistics.set_cardinality(scope, cardinality);
		Ok(())
	}

	pub fn set_global_cardinality(&mut self, cardinality: u64) -> Result<(), PoolError> {
		let statistics = self.statistics.as_mut().ok_or(PoolError::MiningDisabled)?;
		statistics.set_global_cardinality(cardinality);
		Ok(())
	}

	/// Returns the literals registered under `scope` that produce a value usable as `needed`.
	pub fn lookup<'a>(&'a self, oracle: &dyn TypeOracle, scope: &ScopeKey, needed: &Type) -> SequenceList<'a> {
		match self.scopes.get(scope) {
			Some(index) => index.lookup(oracle, needed, false, false),
			None => SequenceList::new(),
		}
	}

	pub fn statistics(&self) -> Option<&MiningStatistics> {
		self.statistics.as_ref()
	}

	/// Returns every literal of every scope.
	pub fn all_sequences(&self) -> HashSet<Sequence> {
		self.scopes.values().flat_map(TypeIndex::all_sequences).collect()
	}

	pub fn scope_count(&self) -> usize {
		self.scopes.len()
	}
}
