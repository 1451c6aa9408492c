use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a declaring unit (the class or module an operation belongs to).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(Arc<str>);

/// Identifier of a namespace (the package or module path grouping units).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceId(Arc<str>);

impl UnitId {
	pub fn new(name: &str) -> Self {
		Self(Arc::from(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl NamespaceId {
	pub fn new(name: &str) -> Self {
		Self(Arc::from(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Visibility boundary of a literal and key of its mining statistics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKey {
	Global,
	DeclaringUnit(UnitId),
	Namespace(NamespaceId),
}

/// The two mutually exclusive scoped literal modes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeMode {
	DeclaringUnit,
	Namespace,
}

impl ScopeKey {
	pub fn unit(name: &str) -> Self {
		ScopeKey::DeclaringUnit(UnitId::new(name))
	}

	pub fn namespace(name: &str) -> Self {
		ScopeKey::Namespace(NamespaceId::new(name))
	}

	/// The scoped mode of this key, `None` for `Global`.
	pub fn mode(&self) -> Option<ScopeMode> {
		match self {
			ScopeKey::Global => None,
			ScopeKey::DeclaringUnit(_) => Some(ScopeMode::DeclaringUnit),
			ScopeKey::Namespace(_) => Some(ScopeMode::Namespace),
		}
	}
}

impl fmt::Display for ScopeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScopeKey::Global => f.write_str("global"),
			ScopeKey::DeclaringUnit(unit) => write!(f, "unit {}", unit.as_str()),
			ScopeKey::Namespace(ns) => write!(f, "namespace {}", ns.as_str()),
		}
	}
}

impl fmt::Display for ScopeMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScopeMode::DeclaringUnit => f.write_str("declaring-unit"),
			ScopeMode::Namespace => f.write_str("namespace"),
		}
	}
}
