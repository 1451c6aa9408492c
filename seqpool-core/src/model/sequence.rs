use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Category of a nominal type.
///
/// Only `Reference` and `Array` values can be the target of an invocation;
/// primitives, their boxed forms and text are plain values.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
	Primitive,
	Boxed,
	Text,
	Reference,
	Array,
	Void,
}

/// A nominal type descriptor.
///
/// Two types are the same type when both their name and kind match.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
	name: Arc<str>,
	kind: TypeKind,
}

impl Type {
	pub fn new(name: &str, kind: TypeKind) -> Self {
		Self { name: Arc::from(name), kind }
	}

	pub fn primitive(name: &str) -> Self {
		Self::new(name, TypeKind::Primitive)
	}

	pub fn boxed(name: &str) -> Self {
		Self::new(name, TypeKind::Boxed)
	}

	pub fn text(name: &str) -> Self {
		Self::new(name, TypeKind::Text)
	}

	pub fn reference(name: &str) -> Self {
		Self::new(name, TypeKind::Reference)
	}

	pub fn array(name: &str) -> Self {
		Self::new(name, TypeKind::Array)
	}

	pub fn void() -> Self {
		Self::new("void", TypeKind::Void)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> TypeKind {
		self.kind
	}

	pub fn is_void(&self) -> bool {
		self.kind == TypeKind::Void
	}

	/// Returns `true` for primitives, boxed primitives and text.
	pub fn is_nonreceiver(&self) -> bool {
		matches!(self.kind, TypeKind::Primitive | TypeKind::Boxed | TypeKind::Text)
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// Type-compatibility queries supplied by the enclosing generator.
pub trait TypeOracle {
	/// Returns `true` if a value of `candidate` can be used where `needed` is expected.
	fn is_assignable(&self, candidate: &Type, needed: &Type) -> bool;

	/// Returns `true` if values of `ty` can be the target of an invocation.
	fn is_receiver_capable(&self, ty: &Type) -> bool {
		!ty.is_nonreceiver() && !ty.is_void()
	}
}

/// Nominal assignability: a type is assignable to itself and to every
/// declared (transitive) supertype.
#[derive(Default, Clone, Debug)]
pub struct NominalTypes {
	supertypes: HashMap<Type, Vec<Type>>,
}

impl NominalTypes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `supertype` as a direct supertype of `subtype`.
	pub fn declare_subtype(&mut self, subtype: Type, supertype: Type) {
		let parents = self.supertypes.entry(subtype).or_default();
		if !parents.contains(&supertype) {
			parents.push(supertype);
		}
	}
}

impl TypeOracle for NominalTypes {
	fn is_assignable(&self, candidate: &Type, needed: &Type) -> bool {
		if candidate == needed {
			return true;
		}

		// Breadth-first walk over the declared supertypes
		let mut seen: HashSet<&Type> = HashSet::new();
		let mut queue: VecDeque<&Type> = VecDeque::from([candidate]);
		while let Some(current) = queue.pop_front() {
			if let Some(parents) = self.supertypes.get(current) {
				for parent in parents {
					if parent == needed {
						return true;
					}
					if seen.insert(parent) {
						queue.push_back(parent);
					}
				}
			}
		}
		false
	}
}

/// One statement of a sequence.
///
/// `inputs` are indices of earlier steps whose values this step consumes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step {
	operation: Arc<str>,
	output: Type,
	inputs: Vec<usize>,
}

impl Step {
	pub fn new(operation: &str, output: Type, inputs: Vec<usize>) -> Self {
		Self { operation: Arc::from(operation), output, inputs }
	}

	pub fn operation(&self) -> &str {
		&self.operation
	}

	pub fn output(&self) -> &Type {
		&self.output
	}

	pub fn inputs(&self) -> &[usize] {
		&self.inputs
	}
}

/// An immutable recipe of steps that constructs a value.
///
/// Cloning is cheap (the steps are shared) and equality is structural, so
/// sequences are used directly as map keys.
///
/// # Invariants
/// - A sequence has at least one step
/// - Every step input refers to an earlier step
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sequence {
	steps: Arc<[Step]>,
}

impl Sequence {
	/// Builds a sequence from its steps.
	///
	/// # Errors
	/// Returns `MalformedSequence` if a step consumes a value that is not
	/// produced by an earlier step, or if `steps` is empty.
	pub fn new(steps: Vec<Step>) -> Result<Self, PoolError> {
		if steps.is_empty() {
			return Err(PoolError::MalformedSequence { index: 0, input: 0 });
		}
		for (index, step) in steps.iter().enumerate() {
			for &input in &step.inputs {
				if input >= index || steps[input].output.is_void() {
					return Err(PoolError::MalformedSequence { index, input });
				}
			}
		}
		Ok(Self { steps: Arc::from(steps) })
	}

	/// A single-step sequence that declares a constant of type `ty`.
	pub fn literal(ty: Type, value: &str) -> Self {
		let operation = format!("{} = {}", ty, value);
		Self { steps: Arc::from(vec![Step::new(&operation, ty, Vec::new())]) }
	}

	/// Returns a new sequence with `step` appended.
	///
	/// # Errors
	/// Same conditions as [`Sequence::new`].
	pub fn extend(&self, step: Step) -> Result<Self, PoolError> {
		let mut steps = self.steps.to_vec();
		steps.push(step);
		Self::new(steps)
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn last_step(&self) -> Option<&Step> {
		self.steps.last()
	}

	/// Types of the values this sequence makes available to a larger sequence.
	///
	/// These are the output of the last step and the values it consumed,
	/// without duplicates and without `void`.
	pub fn produced_types(&self) -> Vec<Type> {
		let Some(last) = self.last_step() else {
			return Vec::new();
		};
		let mut types: Vec<Type> = Vec::new();
		let consumed = last.inputs().iter().filter_map(|&i| self.steps.get(i).map(Step::output));
		for ty in std::iter::once(last.output()).chain(consumed) {
			if !ty.is_void() && !types.contains(ty) {
				types.push(ty.clone());
			}
		}
		types
	}

	/// Returns `true` if the final value is a primitive, boxed primitive or text.
	pub fn is_primitive_like(&self) -> bool {
		self.last_step().is_some_and(|step| step.output().is_nonreceiver())
	}
}

impl fmt::Display for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ops: Vec<&str> = self.steps.iter().map(Step::operation).collect();
		write!(f, "[{}]", ops.join("; "))
	}
}
