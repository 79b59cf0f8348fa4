//! Sequence Optimizer (C5)
//!
//! A Viterbi decoder over a sequence of chord time-steps, choosing one
//! fingering per step to minimize total difficulty.

use crate::difficulty::difficulty;
use crate::enumerate::{ChordInput, Fingering, enumerate_fingerings};
use crate::error::{CancelToken, FretseqError, Result};
use crate::fretboard::FretboardGraph;

/// The union of all candidate fingerings across a sequence, indexed
/// `0..M-1`. Owned by one decoding run; the transition/emission
/// matrices and Viterbi tables built from it are released at the run's
/// end.
pub struct FingeringBank {
	fingerings: Vec<Fingering>,
	/// `owner[i]` is the index of the chord (column) that contributed
	/// state `i`, i.e. the emission matrix in sparse form.
	owner: Vec<usize>,
	n_chords: usize,
}

impl FingeringBank {
	/// Builds the bank by enumerating every chord's candidates up
	/// front. Chords are enumerated left to right; cancellation is
	/// observed between chords, per the concurrency model.
	pub fn build(
		graph: &FretboardGraph,
		chords: &[ChordInput],
		cancel: &CancelToken,
	) -> Result<Self> {
		let mut fingerings = Vec::new();
		let mut owner = Vec::new();
		for (t, chord) in chords.iter().enumerate() {
			cancel.check()?;
			let candidates = enumerate_fingerings(graph, chord, cancel)?;
			if candidates.is_empty() {
				return Err(FretseqError::NoFingering {
					chord_index: t,
					unplaced: chord.clone(),
				});
			}
			for f in candidates {
				fingerings.push(f);
				owner.push(t);
			}
		}
		Ok(FingeringBank {
			fingerings,
			owner,
			n_chords: chords.len(),
		})
	}

	/// Appends a new chord's fingerings to the bank for incremental
	/// growth: new states are appended as new rows/columns of the
	/// logical emission matrix; existing states implicitly emit 0 for
	/// the new column (`owner` already encodes that; only states whose
	/// owner equals the new chord's index emit 1 there).
	pub fn extend(
		&mut self,
		graph: &FretboardGraph,
		chord: &ChordInput,
		cancel: &CancelToken,
	) -> Result<()> {
		let t = self.n_chords;
		let candidates = enumerate_fingerings(graph, chord, cancel)?;
		if candidates.is_empty() {
			return Err(FretseqError::NoFingering {
				chord_index: t,
				unplaced: chord.clone(),
			});
		}
		for f in candidates {
			self.fingerings.push(f);
			self.owner.push(t);
		}
		self.n_chords += 1;
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.fingerings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fingerings.is_empty()
	}

	pub fn n_chords(&self) -> usize {
		self.n_chords
	}

	pub fn fingering(&self, state: usize) -> &Fingering {
		&self.fingerings[state]
	}

	/// `B[state][t] == 1` iff `state` was enumerated for chord `t`.
	fn emits_at(&self, state: usize, t: usize) -> bool {
		self.owner[state] == t
	}

	/// Row `i` of the transition matrix: `inv_diff(i -> j) = 1 /
	/// difficulty(j given previous=i)`, normalized to sum to 1. Per the
	/// Open Question resolution, self-transitions are included in the
	/// normalization denominator (the source sums over every state
	/// without excluding `j == i`).
	///
	/// Exposed publicly so an embedder can compute rows in parallel
	/// across states, per the concurrency model's "rows of A depend
	/// only on the source fingering and the full bank" guarantee.
	pub fn transition_row(&self, graph: &FretboardGraph, i: usize) -> Vec<f64> {
		let previous = &self.fingerings[i];
		let inv_diffs: Vec<f64> = self
			.fingerings
			.iter()
			.map(|current| 1.0 / difficulty(graph, current, Some(previous)))
			.collect();
		let total: f64 = inv_diffs.iter().sum();
		inv_diffs.into_iter().map(|d| d / total).collect()
	}
}

/// Standard log-space Viterbi decode over `bank`.
///
/// `initial_prior` defaults to uniform over all states when `None`.
/// Ties are broken toward the smaller state index. Returns one
/// fingering per input chord, aligned by index.
///
/// Checks `cancel` between transition-matrix rows (an O(M) pass per
/// row) and between decoded time-steps.
pub fn decode(
	graph: &FretboardGraph,
	chords: &[ChordInput],
	initial_prior: Option<&[f64]>,
	cancel: &CancelToken,
) -> Result<Vec<Fingering>> {
	if chords.is_empty() {
		return Ok(Vec::new());
	}

	let bank = FingeringBank::build(graph, chords, cancel)?;
	decode_from_bank(graph, &bank, initial_prior, cancel)
}

/// Decodes directly from a pre-built bank, the entry point an embedder
/// uses after incrementally growing a bank with [`FingeringBank::extend`].
pub fn decode_from_bank(
	graph: &FretboardGraph,
	bank: &FingeringBank,
	initial_prior: Option<&[f64]>,
	cancel: &CancelToken,
) -> Result<Vec<Fingering>> {
	let m = bank.len();
	let t_len = bank.n_chords();
	if m == 0 || t_len == 0 {
		return Ok(Vec::new());
	}

	let pi: Vec<f64> = match initial_prior {
		Some(prior) => prior.to_vec(),
		None => vec![1.0 / m as f64; m],
	};

	// Transition matrix rows, computed lazily row-by-row (row i only
	// needed when backtracking from state i at t-1).
	let mut rows: Vec<Option<Vec<f64>>> = vec![None; m];

	let neg_inf = f64::NEG_INFINITY;
	let mut omega = vec![vec![neg_inf; m]; t_len];
	let mut prev = vec![vec![0usize; m]; t_len.saturating_sub(1)];

	for j in 0..m {
		if bank.emits_at(j, 0) {
			omega[0][j] = pi[j].ln();
		}
	}

	for t in 1..t_len {
		cancel.check()?;
		for j in 0..m {
			if !bank.emits_at(j, t) {
				continue; // log(0) emission: unreachable at this time-step.
			}
			let mut best_val = neg_inf;
			let mut best_i = 0usize;
			for i in 0..m {
				if omega[t - 1][i] == neg_inf {
					continue;
				}
				if rows[i].is_none() {
					cancel.check()?;
					rows[i] = Some(bank.transition_row(graph, i));
				}
				let row = rows[i].as_ref().unwrap();
				let candidate = omega[t - 1][i] + row[j].ln();
				if candidate > best_val {
					best_val = candidate;
					best_i = i;
				}
			}
			omega[t][j] = best_val;
			prev[t - 1][j] = best_i;
		}
	}

	let mut s_star = 0usize;
	let mut best = neg_inf;
	for j in 0..m {
		if omega[t_len - 1][j] > best {
			best = omega[t_len - 1][j];
			s_star = j;
		}
	}

	let mut path = vec![0usize; t_len];
	path[t_len - 1] = s_star;
	for t in (0..t_len - 1).rev() {
		path[t] = prev[t][path[t + 1]];
	}

	Ok(path.into_iter().map(|state| bank.fingering(state).clone()).collect())
}
