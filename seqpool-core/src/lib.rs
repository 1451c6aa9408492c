//! Component sequence pool for feedback-directed random test generation.
//!
//! This crate stores the sequences a generator builds and reuses, including:
//! - A general pool with seeds, type-keyed lookup and reset
//! - Literals scoped to a declaring unit or a namespace
//! - Constant-mining statistics and TF-IDF weighted selection
//! - Mining snapshot persistence
//!
//! The generation loop, the mining pass and the type system are external:
//! they drive this crate through `model::manager::ComponentManager` and the
//! `model::sequence::TypeOracle` trait.

/// Pool, literal scopes, statistics and selection.
pub mod model;

/// Mining snapshot persistence.
pub mod io;

/// Crate error type.
pub mod error;

pub use error::PoolError;
pub use model::manager::ComponentManager;
