use thiserror::Error;

use crate::model::scope::{ScopeKey, ScopeMode};
use crate::model::sequence::{Sequence, Type};

/// Errors raised by the component pool and the mining feed.
///
/// Configuration errors, precondition violations and data-integrity faults
/// are fatal for a run (see [`PoolError::is_fatal`]). An absent selection is
/// never an error: it is reported as `None` by the selecting operations.
#[derive(Debug, Error)]
pub enum PoolError {
	/// Both scoped literal modes were used in the same run.
	#[error("literal scopes cannot be mixed: {active} literals are active, got a {requested} literal")]
	MixedLiteralScopes { active: ScopeMode, requested: ScopeMode },

	/// A scoped literal does not match the mode fixed by the configuration.
	#[error("literals level is configured as {configured}, got a {requested} literal")]
	LiteralLevelMismatch { configured: ScopeMode, requested: ScopeMode },

	/// Receiver candidates were requested for a slot that can never hold a receiver.
	#[error("receiver-only query for non-receiver slot: operation={operation} slot={slot} type={ty}")]
	ReceiverPrecondition { operation: String, slot: usize, ty: Type },

	/// Receiver candidates were requested from the pool for a non-receiver type.
	#[error("receiver-only lookup for non-receiver type {ty}")]
	NonReceiverLookup { ty: Type },

	#[error("operation {operation} has {arity} input slot(s), got slot {slot}")]
	SlotOutOfRange { operation: String, slot: usize, arity: usize },

	/// An occurrence count that would zero or invert the weight denominator.
	#[error("occurrence {occurrence} of {sequence} in {scope} exceeds the scope cardinality {cardinality}")]
	DataIntegrity { scope: ScopeKey, sequence: Sequence, occurrence: u64, cardinality: u64 },

	/// Mining statistics only apply to sequences producing primitive-like values.
	#[error("sequence {sequence} does not produce a primitive-like value")]
	NotPrimitive { sequence: Sequence },

	#[error("constant mining is not enabled")]
	MiningDisabled,

	/// A step uses a value that no earlier step produced.
	#[error("step {index} uses value {input}, which is not produced by an earlier step")]
	MalformedSequence { index: usize, input: usize },

	#[error("probability must be between 0.0 and 1.0, got {0}")]
	InvalidProbability(f64),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("snapshot encoding failed: {0}")]
	Snapshot(#[from] postcard::Error),
}

impl PoolError {
	/// Returns `true` for errors that must end the run.
	///
	/// These indicate a bad configuration, a caller bug or corrupt mining
	/// data rather than a transient condition.
	pub fn is_fatal(&self) -> bool {
		matches!(
			self,
			PoolError::MixedLiteralScopes { .. }
				| PoolError::LiteralLevelMismatch { .. }
				| PoolError::ReceiverPrecondition { .. }
				| PoolError::NonReceiverLookup { .. }
				| PoolError::DataIntegrity { .. }
		)
	}
}
