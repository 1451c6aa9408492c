use std::collections::{HashMap, HashSet};

use crate::error::PoolError;
use crate::model::sequence::{Sequence, Type, TypeOracle};
use crate::model::sequence_list::SequenceList;

/// Sequences bucketed by the types of values they produce.
///
/// Buckets are kept in first-insertion order so that lookups, and the random
/// choices made over them, are reproducible under a fixed seed.
///
/// # Invariants
/// - `types[i]` is the key of `buckets[i]`, and `positions[types[i]] == i`
/// - Every bucket is non-empty
#[derive(Clone, Debug, Default)]
pub struct TypeIndex {
	types: Vec<Type>,
	buckets: Vec<Vec<Sequence>>,
	positions: HashMap<Type, usize>,
}

impl TypeIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `sequence` under every type it produces.
	///
	/// Sequences that produce no value are ignored.
	pub fn add(&mut self, sequence: &Sequence) {
		for ty in sequence.produced_types() {
			let position = match self.positions.get(&ty) {
				Some(&position) => position,
				None => {
					self.types.push(ty.clone());
					self.buckets.push(Vec::new());
					self.positions.insert(ty, self.buckets.len() - 1);
					self.buckets.len() - 1
				}
			};
			self.buckets[position].push(sequence.clone());
		}
	}

	/// Returns the sequences producing a value usable as `needed`.
	///
	/// - `exact_only`: only the bucket keyed by `needed` itself
	/// - `receivers_only`: skip buckets whose type cannot be an invocation target
	pub fn lookup<'a>(
		&'a self,
		oracle: &dyn TypeOracle,
		needed: &Type,
		exact_only: bool,
		receivers_only: bool,
	) -> SequenceList<'a> {
		let mut result = SequenceList::new();
		if exact_only {
			if let Some(&position) = self.positions.get(needed) {
				if !receivers_only || oracle.is_receiver_capable(needed) {
					result.push_segment(&self.buckets[position]);
				}
			}
			return result;
		}

		for (ty, bucket) in self.types.iter().zip(&self.buckets) {
			if receivers_only && !oracle.is_receiver_capable(ty) {
				continue;
			}
			if oracle.is_assignable(ty, needed) {
				result.push_segment(bucket);
			}
		}
		result
	}

	/// Returns the distinct sequences held by the index.
	pub fn all_sequences(&self) -> HashSet<Sequence> {
		self.buckets.iter().flatten().cloned().collect()
	}

	/// Iterates over `(type, bucket)` pairs in insertion order.
	pub fn buckets(&self) -> impl Iterator<Item = (&Type, &[Sequence])> {
		self.types.iter().zip(self.buckets.iter().map(Vec::as_slice))
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

/// The general pool of reusable component sequences.
///
/// # Responsibilities
/// - Hold seed sequences, given once at construction
/// - Accumulate generated sequences during a run
/// - Answer type-keyed lookups
/// - Restore the seed set on `reset`
///
/// # Invariants
/// - Seeds are never removed
/// - `stored` starts with the seeds, in order
/// - Every stored sequence producing a value is indexed
#[derive(Clone, Debug)]
pub struct SequencePool {
	seeds: Vec<Sequence>,
	stored: Vec<Sequence>,
	index: TypeIndex,
}

impl SequencePool {
	/// Creates a pool holding the given seeds.
	///
	/// Duplicate seeds are collapsed, first occurrence wins.
	pub fn new<I: IntoIterator<Item = Sequence>>(seeds: I) -> Self {
		let mut unique: HashSet<Sequence> = HashSet::new();
		let seeds: Vec<Sequence> = seeds.into_iter().filter(|s| unique.insert(s.clone())).collect();
		let mut pool = Self { seeds, stored: Vec::new(), index: TypeIndex::new() };
		pool.reset();
		pool
	}

	/// Adds a sequence. Duplicates are kept.
	pub fn add(&mut self, sequence: Sequence) {
		self.index.add(&sequence);
		self.stored.push(sequence);
	}

	/// Returns the sequences producing a value assignable to `needed`.
	///
	/// # Errors
	/// Returns `NonReceiverLookup` if `receivers_only` is requested for a
	/// type that can never be an invocation target.
	pub fn lookup<'a>(
		&'a self,
		oracle: &dyn TypeOracle,
		needed: &Type,
		exact_only: bool,
		receivers_only: bool,
	) -> Result<SequenceList<'a>, PoolError> {
		if receivers_only && !oracle.is_receiver_capable(needed) {
			return Err(PoolError::NonReceiverLookup { ty: needed.clone() });
		}
		Ok(self.index.lookup(oracle, needed, exact_only, receivers_only))
	}

	/// Discards everything except the seeds.
	pub fn reset(&mut self) {
		self.index = TypeIndex::new();
		for seed in &self.seeds {
			self.index.add(seed);
		}
		self.stored = self.seeds.clone();
	}

	/// Number of stored sequences, seeds included.
	pub fn size(&self) -> usize {
		self.stored.len()
	}

	pub fn seed_count(&self) -> usize {
		self.seeds.len()
	}

	/// Number of sequences added since construction or the last reset.
	pub fn generated_count(&self) -> usize {
		self.stored.len() - self.seeds.len()
	}

	pub fn seeds(&self) -> &[Sequence] {
		&self.seeds
	}

	/// Returns the distinct stored sequences, seeds included.
	pub fn all_sequences(&self) -> HashSet<Sequence> {
		self.stored.iter().cloned().collect()
	}

	pub(crate) fn index(&self) -> &TypeIndex {
		&self.index
	}
}
