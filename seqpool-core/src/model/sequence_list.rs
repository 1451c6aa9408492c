use crate::model::sequence::Sequence;

/// A list of sequences made of borrowed segments.
///
/// Lookups never copy sequences: each matching bucket of a store becomes one
/// segment, and merging two results only concatenates their segments.
/// Indexing walks the segments, so `get` is linear in the number of segments.
#[derive(Clone, Debug, Default)]
pub struct SequenceList<'a> {
	segments: Vec<&'a [Sequence]>,
	len: usize,
}

impl<'a> SequenceList<'a> {
	pub fn new() -> Self {
		Self { segments: Vec::new(), len: 0 }
	}

	/// Appends a segment. Empty segments are dropped.
	pub fn push_segment(&mut self, segment: &'a [Sequence]) {
		if segment.is_empty() {
			return;
		}
		self.len += segment.len();
		self.segments.push(segment);
	}

	/// Concatenates `other` after this list.
	pub fn append(mut self, other: SequenceList<'a>) -> Self {
		for segment in other.segments {
			self.push_segment(segment);
		}
		self
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn get(&self, mut index: usize) -> Option<&'a Sequence> {
		for segment in &self.segments {
			if index < segment.len() {
				return Some(&segment[index]);
			}
			index -= segment.len();
		}
		None
	}

	pub fn iter(&self) -> impl Iterator<Item = &'a Sequence> + '_ {
		self.segments.iter().flat_map(|segment| segment.iter())
	}

	pub fn contains(&self, sequence: &Sequence) -> bool {
		self.iter().any(|s| s == sequence)
	}

	/// Materializes the list into owned sequences.
	pub fn to_vec(&self) -> Vec<Sequence> {
		self.iter().cloned().collect()
	}
}
