use std::collections::HashSet;

use log::{debug, error, log_enabled, trace, warn, Level};

use crate::error::PoolError;
use crate::io::MiningSnapshot;
use crate::model::config::ManagerConfig;
use crate::model::literals::LiteralScopeStore;
use crate::model::operation::Operation;
use crate::model::pool::SequencePool;
use crate::model::scope::ScopeKey;
use crate::model::selector::WeightedSelector;
use crate::model::sequence::{NominalTypes, Sequence, Type, TypeOracle};
use crate::model::sequence_list::SequenceList;
use crate::model::statistics::MiningStatistics;
use crate::model::weights::{WeightCache, Weights};

/// Stores the component sequences of a generation run.
///
/// Component sequences are the building blocks the generator combines into
/// larger sequences. The manager answers "which sequences can fill input
/// slot `i` of operation `o`" by merging:
/// - the general pool (seeds plus generated sequences)
/// - global literals
/// - the literals scoped to the operation's declaring unit or namespace
///
/// When constant mining is enabled, `select` can bias its choice toward
/// mined constants using TF-IDF weights computed once per scope.
///
/// All state is owned by the instance: independent runs never share it.
pub struct ComponentManager {
	config: ManagerConfig,
	oracle: Box<dyn TypeOracle>,
	pool: SequencePool,
	literals: LiteralScopeStore,
	weights: WeightCache,
	selector: WeightedSelector,
}

impl ComponentManager {
	/// Creates a manager with an empty seed set.
	pub fn new(config: ManagerConfig) -> Self {
		Self::with_seeds(config, Vec::new())
	}

	/// Creates a manager whose pool starts with `seeds`.
	///
	/// Seeds survive every `reset`.
	pub fn with_seeds<I: IntoIterator<Item = Sequence>>(config: ManagerConfig, seeds: I) -> Self {
		Self {
			oracle: Box::new(NominalTypes::new()),
			pool: SequencePool::new(seeds),
			literals: LiteralScopeStore::new(config.literals_level, config.constant_mining),
			weights: WeightCache::new(),
			selector: WeightedSelector::new(config.seed),
			config,
		}
	}

	/// Replaces the type oracle used for assignability queries.
	pub fn with_oracle<O: TypeOracle + 'static>(mut self, oracle: O) -> Self {
		self.oracle = Box::new(oracle);
		self
	}

	pub fn config(&self) -> &ManagerConfig {
		&self.config
	}

	/// Adds a generated component sequence to the pool.
	pub fn add_generated(&mut self, sequence: Sequence) {
		self.pool.add(sequence);
	}

	/// Removes every generated sequence, keeping the seeds.
	///
	/// Literals, mining statistics and cached weights are unaffected.
	pub fn reset(&mut self) {
		self.pool.reset();
	}

	/// Number of sequences in the pool that are not seeds.
	pub fn generated_count(&self) -> usize {
		self.pool.generated_count()
	}

	/// Number of sequences in the pool, seeds included.
	pub fn size(&self) -> usize {
		self.pool.size()
	}

	/// The distinct sequences of the pool, seeds included.
	pub fn all_generated_sequences(&self) -> HashSet<Sequence> {
		self.pool.all_sequences()
	}

	/// Pool sequences producing a value assignable to `ty`, without literals.
	pub fn sequences_for_type(&self, ty: &Type) -> SequenceList<'_> {
		self.pool.index().lookup(&*self.oracle, ty, false, false)
	}

	/// Returns the sequences that can fill input `slot` of `operation`.
	///
	/// - `receivers_only`: the slot is an invocation target; only receiver
	///   values are returned and literals are never added
	///
	/// # Errors
	/// - `SlotOutOfRange` if the operation has no such slot
	/// - `ReceiverPrecondition` if `receivers_only` is set for a slot whose
	///   type can never be a receiver
	pub fn query(&self, operation: &Operation, slot: usize, receivers_only: bool) -> Result<SequenceList<'_>, PoolError> {
		let needed = self.needed_type(operation, slot, receivers_only)?;
		Self::candidates(&self.pool, &self.literals, &*self.oracle, operation, needed, receivers_only)
	}

	/// Selects one sequence for input `slot` of `operation`.
	///
	/// With constant mining enabled and probability `mining_probability`, the
	/// choice is weighted by the TF-IDF weights of the operation's mining scope;
	/// candidates without a weight are excluded from that draw. Otherwise, or
	/// if the weighted draw selects nothing, the choice is uniform.
	///
	/// Returns `None` when no candidate exists.
	///
	/// # Errors
	/// The errors of `query`, and `DataIntegrity` from the weight computation.
	pub fn select(&mut self, operation: &Operation, slot: usize, receivers_only: bool) -> Result<Option<Sequence>, PoolError> {
		let needed = self.needed_type(operation, slot, receivers_only)?;
		let candidates = Self::candidates(&self.pool, &self.literals, &*self.oracle, operation, needed, receivers_only)?;

		if self.config.constant_mining && !receivers_only && self.selector.coin(self.config.mining_probability()) {
			let scope = Self::mining_scope_of(&self.literals, operation);
			if let Some(statistics) = self.literals.statistics() {
				let weights = self.weights.weights_for(&scope, statistics)?;
				if let Some(chosen) = self.selector.pick(candidates.iter(), weights) {
					trace!("weighted pick for {} slot {} in {}", operation, slot, scope);
					return Ok(Some(chosen.clone()));
				}
				trace!("weighted pick for {} slot {} found nothing, falling back", operation, slot);
			}
		}

		Ok(self.selector.pick_uniform(&candidates).cloned())
	}

	/// Returns the mined literals that can fill input `slot` of `operation`.
	///
	/// Only the operation's mining scope is consulted, see [`Self::mining_scope`].
	/// Receiver slots never get literals.
	pub fn mined_sequences(&self, operation: &Operation, slot: usize, receivers_only: bool) -> Result<SequenceList<'_>, PoolError> {
		let needed = self.needed_type(operation, slot, receivers_only)?;
		if receivers_only {
			return Ok(SequenceList::new());
		}
		let scope = self.mining_scope(operation);
		Ok(self.literals.lookup(&*self.oracle, &scope, needed))
	}

	/// The scope whose statistics weight the inputs of `operation`.
	///
	/// The operation's unit or namespace under the active scoped mode, or
	/// `Global` when no scoped mode is active or the operation has no
	/// matching declaration.
	pub fn mining_scope(&self, operation: &Operation) -> ScopeKey {
		Self::mining_scope_of(&self.literals, operation)
	}

	/// Returns the weights of `scope`, computing them on first use.
	///
	/// # Errors
	/// - `MiningDisabled` if constant mining is off
	/// - `DataIntegrity` if the scope's statistics are inconsistent
	pub fn weights_for(&mut self, scope: &ScopeKey) -> Result<&Weights, PoolError> {
		let statistics = self.literals.statistics().ok_or(PoolError::MiningDisabled)?;
		self.weights.weights_for(scope, statistics)
	}

	/// Registers a literal visible within `scope`. Called by the mining pass.
	///
	/// # Errors
	/// `MixedLiteralScopes` or `LiteralLevelMismatch` if `scope` conflicts
	/// with the scoped mode of the run.
	pub fn register_literal(&mut self, scope: ScopeKey, sequence: Sequence) -> Result<(), PoolError> {
		self.literals.register_literal(scope, sequence)
	}

	/// Records mining counts for `sequence` in `scope`. Called by the mining pass.
	pub fn record_frequency(
		&mut self,
		scope: ScopeKey,
		sequence: Sequence,
		frequency: u64,
		occurrence: Option<u64>,
	) -> Result<(), PoolError> {
		if self.weights.is_cached(&scope) {
			warn!("statistics for {} changed after its weights were computed", scope);
		}
		self.literals.record_frequency(scope, sequence, frequency, occurrence)
	}

	/// Sets the number of scope instances behind the statistics of `scope`.
	pub fn set_scope_cardinality(&mut self, scope: ScopeKey, cardinality: u64) -> Result<(), PoolError> {
		self.literals.set_cardinality(scope, cardinality)
	}

	/// Sets the number of declaring units analysed by the mining pass.
	pub fn set_global_cardinality(&mut self, cardinality: u64) -> Result<(), PoolError> {
		self.literals.set_global_cardinality(cardinality)
	}

	/// Replays a mining snapshot through the registration API.
	///
	/// A snapshot carrying statistics is rejected as a whole when mining is
	/// disabled. Otherwise feeding stops at the first rejected entry.
	pub fn feed_snapshot(&mut self, snapshot: &MiningSnapshot) -> Result<(), PoolError> {
		let has_statistics = !snapshot.records.is_empty() || !snapshot.cardinalities.is_empty();
		if has_statistics && self.literals.statistics().is_none() {
			return Err(PoolError::MiningDisabled);
		}
		for (scope, sequence) in &snapshot.literals {
			self.register_literal(scope.clone(), sequence.clone())?;
		}
		if !has_statistics {
			return Ok(());
		}
		self.set_global_cardinality(snapshot.global_cardinality)?;
		for (scope, cardinality) in &snapshot.cardinalities {
			self.set_scope_cardinality(scope.clone(), *cardinality)?;
		}
		for row in &snapshot.records {
			self.record_frequency(row.scope.clone(), row.sequence.clone(), row.frequency, row.occurrence)?;
		}
		debug!(
			"fed snapshot: {} literal(s), {} record(s)",
			snapshot.literals.len(),
			snapshot.records.len()
		);
		Ok(())
	}

	/// The mining statistics, present only when constant mining is enabled.
	pub fn mining_statistics(&self) -> Option<&MiningStatistics> {
		self.literals.statistics()
	}

	/// Returns every sequence producing a primitive-like value: all literals,
	/// plus pool sequences keyed by a type the oracle rejects as a receiver.
	pub fn all_primitive_like_sequences(&self) -> HashSet<Sequence> {
		let mut result = self.literals.all_sequences();
		for (ty, bucket) in self.pool.index().buckets() {
			if !self.oracle.is_receiver_capable(ty) {
				result.extend(bucket.iter().cloned());
			}
		}
		result
	}

	/// Logs the pool and literal-store contents at debug level.
	pub fn log_summary(&self) {
		if !log_enabled!(Level::Debug) {
			return;
		}
		debug!(
			"pool: {} sequence(s), {} seed(s), {} generated",
			self.pool.size(),
			self.pool.seed_count(),
			self.pool.generated_count()
		);
		for (ty, bucket) in self.pool.index().buckets() {
			debug!("  {}: {} sequence(s)", ty, bucket.len());
		}
		debug!(
			"literals: {} scope(s), mode {:?}",
			self.literals.scope_count(),
			self.literals.active_mode()
		);
	}

	/// Resolves the type of input `slot` and checks the receiver precondition.
	fn needed_type<'o>(&self, operation: &'o Operation, slot: usize, receivers_only: bool) -> Result<&'o Type, PoolError> {
		let needed = operation.input_type_at(slot).ok_or_else(|| PoolError::SlotOutOfRange {
			operation: operation.to_string(),
			slot,
			arity: operation.inputs().len(),
		})?;

		if receivers_only && !self.oracle.is_receiver_capable(needed) {
			error!("receiver-only query for {} slot {} of type {}", operation, slot, needed);
			return Err(PoolError::ReceiverPrecondition {
				operation: operation.to_string(),
				slot,
				ty: needed.clone(),
			});
		}
		Ok(needed)
	}

	/// Pool sequences followed by global and scoped literals.
	fn candidates<'a>(
		pool: &'a SequencePool,
		literals: &'a LiteralScopeStore,
		oracle: &dyn TypeOracle,
		operation: &Operation,
		needed: &Type,
		receivers_only: bool,
	) -> Result<SequenceList<'a>, PoolError> {
		let result = pool.lookup(oracle, needed, false, receivers_only)?;
		if receivers_only {
			return Ok(result);
		}

		let mut result = result.append(literals.lookup(oracle, &ScopeKey::Global, needed));
		if let Some(scope) = Self::literal_scope_of(literals, operation) {
			result = result.append(literals.lookup(oracle, &scope, needed));
		}
		Ok(result)
	}

	/// The scoped literal key of `operation` under the active mode.
	fn literal_scope_of(literals: &LiteralScopeStore, operation: &Operation) -> Option<ScopeKey> {
		let mode = literals.active_mode()?;
		operation.declaration()?.scope(mode)
	}

	fn mining_scope_of(literals: &LiteralScopeStore, operation: &Operation) -> ScopeKey {
		Self::literal_scope_of(literals, operation).unwrap_or(ScopeKey::Global)
	}
}
