use std::fmt;
use std::sync::Arc;

use crate::model::scope::{NamespaceId, ScopeKey, ScopeMode, UnitId};
use crate::model::sequence::Type;

/// Where a member operation is declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
	pub unit: UnitId,
	/// `None` for units declared outside any namespace.
	pub namespace: Option<NamespaceId>,
}

impl Declaration {
	pub fn new(unit: &str, namespace: Option<&str>) -> Self {
		Self { unit: UnitId::new(unit), namespace: namespace.map(NamespaceId::new) }
	}

	/// The scope key of this declaration under the given literal mode.
	pub fn scope(&self, mode: ScopeMode) -> Option<ScopeKey> {
		match mode {
			ScopeMode::DeclaringUnit => Some(ScopeKey::DeclaringUnit(self.unit.clone())),
			ScopeMode::Namespace => self.namespace.clone().map(ScopeKey::Namespace),
		}
	}
}

/// What an operation does.
///
/// Member operations carry their declaration, which decides the literal
/// scope their inputs draw from. `Standalone` covers operations with no
/// declaring unit, such as constant declarations or array creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	Invocation(Declaration),
	Construction(Declaration),
	FieldAccess(Declaration),
	Standalone,
}

/// Signature of an operation the generator can call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Operation {
	name: Arc<str>,
	kind: OperationKind,
	inputs: Vec<Type>,
	output: Type,
}

impl Operation {
	pub fn new(name: &str, kind: OperationKind, inputs: Vec<Type>, output: Type) -> Self {
		Self { name: Arc::from(name), kind, inputs, output }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &OperationKind {
		&self.kind
	}

	pub fn inputs(&self) -> &[Type] {
		&self.inputs
	}

	pub fn output(&self) -> &Type {
		&self.output
	}

	pub fn input_type_at(&self, slot: usize) -> Option<&Type> {
		self.inputs.get(slot)
	}

	pub fn declaration(&self) -> Option<&Declaration> {
		match &self.kind {
			OperationKind::Invocation(decl)
			| OperationKind::Construction(decl)
			| OperationKind::FieldAccess(decl) => Some(decl),
			OperationKind::Standalone => None,
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inputs: Vec<&str> = self.inputs.iter().map(Type::name).collect();
		match self.declaration() {
			Some(decl) => write!(f, "{}.{}({})", decl.unit.as_str(), self.name, inputs.join(", ")),
			None => write!(f, "{}({})", self.name, inputs.join(", ")),
		}
	}
}
