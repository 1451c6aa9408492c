//! Top-level module for the component pool.
//!
//! This module provides everything a feedback-directed generator needs to
//! reuse previously built sequences:
//! - Sequences, types and operation signatures (`sequence`, `operation`)
//! - Literal scopes (`scope`)
//! - The general pool and scoped literal stores (`pool`, `literals`)
//! - Mining statistics, TF-IDF weights and weighted selection
//!   (`statistics`, `weights`, `selector`)
//! - The orchestrating `ComponentManager` and its configuration

/// Immutable sequences, nominal types and the type oracle seam.
pub mod sequence;

/// Operation signatures and their declaring unit.
pub mod operation;

/// Scope keys and the two scoped literal modes.
pub mod scope;

/// Lazily composed lists of borrowed sequences.
pub mod sequence_list;

/// Type-keyed sequence index and the general pool.
///
/// Supports seeds, duplicate-preserving insertion, assignability-aware
/// lookup and reset to the seed set.
pub mod pool;

/// Scoped literal sequences and the single-mode invariant.
pub mod literals;

/// Frequency, occurrence and cardinality data from the mining pass.
pub mod statistics;

/// TF-IDF weights, computed lazily and cached per scope.
pub mod weights;

/// Proportional and uniform random selection over candidates.
pub mod selector;

/// Run configuration.
pub mod config;

/// High-level interface used by the generation loop and the mining pass.
pub mod manager;
