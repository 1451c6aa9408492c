use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::sequence::Sequence;
use crate::model::sequence_list::SequenceList;
use crate::model::weights::Weights;

/// Random choices over candidate sequences, driven by one seeded source.
///
/// All draws of a run go through the same `StdRng`, so a run is
/// reproducible from its seed.
#[derive(Clone, Debug)]
pub struct WeightedSelector {
	rng: StdRng,
}

impl WeightedSelector {
	pub fn new(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}

	/// Picks a candidate with probability proportional to its weight.
	///
	/// Candidates missing from `weights` (or weighted zero) are never picked.
	/// A candidate listed twice is twice as likely.
	///
	/// Returns `None` if no candidate has a positive weight.
	///
	/// This method performs:
	/// - an O(n) scan collecting the weighted candidates
	/// - a cumulative subtraction to select a bucket
	pub fn pick<'a, I>(&mut self, candidates: I, weights: &Weights) -> Option<&'a Sequence>
	where
		I: IntoIterator<Item = &'a Sequence>,
	{
		if weights.is_empty() {
			trace!("no weights, nothing to pick");
			return None;
		}

		let weighted: Vec<(&'a Sequence, f64)> = candidates
			.into_iter()
			.filter_map(|sequence| match weights.get(sequence) {
				Some(&weight) if weight > 0.0 && weight.is_finite() => Some((sequence, weight)),
				_ => None,
			})
			.collect();

		let total: f64 = weighted.iter().map(|(_, weight)| weight).sum();
		if weighted.is_empty() || total <= 0.0 {
			trace!("no weighted candidate among {} weight(s)", weights.len());
			return None;
		}

		let mut r = self.rng.random_range(0.0..total);

		let mut fallback: Option<&'a Sequence> = None;
		for (sequence, weight) in weighted {
			if r < weight {
				return Some(sequence);
			}
			r -= weight;
			fallback = Some(sequence);
		}

		// Rounding can leave `r` just past the last bucket
		fallback
	}

	/// Picks a candidate uniformly. Returns `None` if there is none.
	pub fn pick_uniform<'a>(&mut self, candidates: &SequenceList<'a>) -> Option<&'a Sequence> {
		if candidates.is_empty() {
			return None;
		}
		candidates.get(self.rng.random_range(0..candidates.len()))
	}

	/// Returns `true` with probability `p`.
	pub fn coin(&mut self, p: f64) -> bool {
		p > 0.0 && self.rng.random_bool(p.min(1.0))
	}
}
