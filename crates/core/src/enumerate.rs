//! Candidate Enumerator (C3)
//!
//! Given a chord (an unordered set of required pitches) and a
//! [`FretboardGraph`], produces every playable [`Fingering`]: an ordered
//! tuple of positions, one per required note, with no two positions
//! sharing a string. Per-note candidate lists become layers of a
//! layered directed graph, edges join adjacent layers when the two
//! positions sit on different strings and are within reach of each
//! other, and every chord-note ordering (permutation) is tried since
//! chord notes are themselves unordered.

use itertools::Itertools;

use crate::error::{CancelToken, Result};
use crate::fretboard::{FretboardGraph, Position};
use crate::note::Note;

/// Maximum fret span across non-open positions, strictly enforced as
/// `< 5` (so a span of exactly 4 is the widest allowed stretch).
pub const MAX_FRET_SPAN: u8 = 5;

/// Maximum pairwise physical distance, in fretboard-graph units,
/// allowed between two positions considered adjacent during
/// enumeration. Strictly enforced as `< 6`.
pub const MAX_CANDIDATE_DISTANCE: f64 = 6.0;

/// One time-step's required pitches. Order is not semantic; size must
/// be at least 1.
pub type ChordInput = Vec<Note>;

/// An ordered tuple of positions, one per required pitch of a chord,
/// with no two positions sharing a string. The order is the
/// enumeration order (the permutation that produced it) and is
/// load-bearing for the difficulty model's path-length term; it is a
/// deliberate quirk of the heuristic, not a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingering(pub(crate) Vec<Position>);

impl Fingering {
	/// Wraps an explicit position tuple as a fingering, bypassing
	/// enumeration. Used by tests and by consumers constructing a
	/// fingering from external input (e.g. a CLI-supplied tab string).
	pub fn from_positions(positions: Vec<Position>) -> Self {
		Fingering(positions)
	}

	pub fn positions(&self) -> &[Position] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The set of string indices this fingering occupies.
	pub fn string_set(&self) -> std::collections::HashSet<u8> {
		self.0.iter().map(|p| p.string_index).collect()
	}

	/// Renders the fingering as a tab-style string indexed by string
	/// (lowest-indexed string first), `x` for a string not in the
	/// fingering, matching the corpus's `x32010` tab notation.
	pub fn to_tab(&self, string_count: usize) -> String {
		let mut frets: Vec<Option<u8>> = vec![None; string_count];
		for p in &self.0 {
			if let Some(slot) = frets.get_mut(p.string_index as usize) {
				*slot = Some(p.fret_index);
			}
		}
		frets
			.iter()
			.map(|f| match f {
				Some(fret) => fret.to_string(),
				None => "x".to_string(),
			})
			.collect::<Vec<_>>()
			.join("")
	}

	fn position_set(&self) -> std::collections::BTreeSet<Position> {
		self.0.iter().copied().collect()
	}
}

/// Set-equality of positions: two fingerings are the same candidate
/// iff their sets of positions are equal, regardless of enumeration
/// order. This deliberately differs from a naive `Vec` comparison,
/// which would also distinguish orderings.
impl PartialOrd for Fingering {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for Fingering {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.position_set().cmp(&other.position_set())
	}
}

fn is_edge_possible(graph: &FretboardGraph, from: Position, to: Position) -> bool {
	from.string_index != to.string_index && graph.distance(from, to) < MAX_CANDIDATE_DISTANCE
}

fn fret_span_ok(positions: &[Position]) -> bool {
	let fretted: Vec<u8> = positions
		.iter()
		.map(|p| p.fret_index)
		.filter(|&f| f != 0)
		.collect();
	match (fretted.iter().min(), fretted.iter().max()) {
		(Some(&min), Some(&max)) => max - min < MAX_FRET_SPAN,
		_ => true,
	}
}

fn one_per_string(positions: &[Position]) -> bool {
	let strings: std::collections::HashSet<u8> = positions.iter().map(|p| p.string_index).collect();
	strings.len() == positions.len()
}

/// Depth-first search over one permutation's layered candidate lists,
/// extending `path` and invoking `emit` on every completed simple path
/// that visits one node per layer and satisfies the per-step edge
/// possibility check.
fn walk_layers(
	layers: &[&[Position]],
	depth: usize,
	path: &mut Vec<Position>,
	graph: &FretboardGraph,
	emit: &mut impl FnMut(&[Position]),
) {
	if depth == layers.len() {
		emit(path);
		return;
	}
	for &candidate in layers[depth] {
		if let Some(&prev) = path.last()
			&& !is_edge_possible(graph, prev, candidate)
		{
			continue;
		}
		path.push(candidate);
		walk_layers(layers, depth + 1, path, graph, emit);
		path.pop();
	}
}

/// Enumerates every playable fingering for `chord_notes` on `graph`.
/// Returns an empty vector (not an error) when a required note has no
/// reachable position or no combination satisfies the playability
/// constraints; the caller (C5's decoder) is responsible for
/// surfacing `NoFingering`.
///
/// Checks `cancel` once per permutation of the chord's note ordering,
/// matching the "between chords" granularity the concurrency model
/// names for C3.
pub fn enumerate_fingerings(
	graph: &FretboardGraph,
	chord_notes: &ChordInput,
	cancel: &CancelToken,
) -> Result<Vec<Fingering>> {
	if chord_notes.is_empty() {
		return Ok(Vec::new());
	}

	let per_note: Vec<&[Position]> = chord_notes
		.iter()
		.map(|n| graph.positions_for_note(*n))
		.collect();
	if per_note.iter().any(|positions| positions.is_empty()) {
		return Ok(Vec::new());
	}

	if chord_notes.len() == 1 {
		return Ok(per_note[0]
			.iter()
			.map(|&p| Fingering(vec![p]))
			.collect());
	}

	let indices: Vec<usize> = (0..chord_notes.len()).collect();
	let mut found: std::collections::BTreeSet<Fingering> = std::collections::BTreeSet::new();

	for perm in indices.iter().permutations(indices.len()) {
		cancel.check()?;
		let layers: Vec<&[Position]> = perm.iter().map(|&&i| per_note[i]).collect();
		let mut path = Vec::with_capacity(layers.len());
		walk_layers(&layers, 0, &mut path, graph, &mut |positions| {
			if positions.len() == chord_notes.len()
				&& one_per_string(positions)
				&& fret_span_ok(positions)
			{
				found.insert(Fingering(positions.to_vec()));
			}
		});
	}

	Ok(found.into_iter().collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fretboard::{DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH, Tuning, build_fretboard};
	use crate::note::Degree;

	fn standard_graph() -> FretboardGraph {
		build_fretboard(
			&Tuning::standard_guitar(),
			DEFAULT_N_FRETS,
			DEFAULT_SCALE_LENGTH,
		)
		.unwrap()
	}

	#[test]
	fn single_note_chord_yields_one_fingering_per_position() {
		let graph = standard_graph();
		let chord = vec![Note::new(Degree::E, 2)];
		let token = CancelToken::new();
		let fingerings = enumerate_fingerings(&graph, &chord, &token).unwrap();
		assert!(!fingerings.is_empty());
		assert!(fingerings.iter().all(|f| f.len() == 1));
	}

	#[test]
	fn every_fingering_respects_one_per_string() {
		let graph = standard_graph();
		// A fret-3 barre across the three lowest strings: G2, C3, F3.
		// Same-fret positions keep the pairwise physical distance small
		// regardless of string spacing, so this chord is reachable.
		let chord = vec![
			Note::new(Degree::G, 2),
			Note::new(Degree::C, 3),
			Note::new(Degree::F, 3),
		];
		let token = CancelToken::new();
		let fingerings = enumerate_fingerings(&graph, &chord, &token).unwrap();
		assert!(!fingerings.is_empty());
		for f in &fingerings {
			assert!(one_per_string(f.positions()));
			assert!(fret_span_ok(f.positions()));
			assert_eq!(f.len(), chord.len());
		}
	}

	#[test]
	fn unreachable_note_yields_empty_set() {
		let graph = standard_graph();
		// E8 is far beyond 20 frets on every string.
		let chord = vec![Note::new(Degree::E, 2), Note::new(Degree::E, 8)];
		let token = CancelToken::new();
		let fingerings = enumerate_fingerings(&graph, &chord, &token).unwrap();
		assert!(fingerings.is_empty());
	}

	#[test]
	fn duplicate_pitches_on_a_strictly_ascending_tuning_are_unreachable() {
		// Two positions voicing the same pitch on different strings would
		// need open_i + f == open_j + f, i.e. open_i == open_j, impossible
		// on a strictly ascending tuning. So a repeated-pitch "chord" always
		// enumerates to nothing, rather than ever placing both copies.
		let graph = standard_graph();
		let chord = vec![Note::new(Degree::E, 4), Note::new(Degree::E, 4)];
		let token = CancelToken::new();
		let fingerings = enumerate_fingerings(&graph, &chord, &token).unwrap();
		assert!(fingerings.is_empty());
	}

	#[test]
	fn output_is_deduplicated_by_position_set() {
		let graph = standard_graph();
		// A2 and D3 each reachable two ways (open-string pair, or a
		// fret-5 pair one string up), giving two distinct same-fret
		// fingerings to dedup across permutations of the input order.
		let chord = vec![Note::new(Degree::A, 2), Note::new(Degree::D, 3)];
		let token = CancelToken::new();
		let fingerings = enumerate_fingerings(&graph, &chord, &token).unwrap();
		assert!(fingerings.len() >= 2);
		let mut seen = std::collections::HashSet::new();
		for f in &fingerings {
			let set: std::collections::BTreeSet<(u8, u8)> = f
				.positions()
				.iter()
				.map(|p| (p.string_index, p.fret_index))
				.collect();
			assert!(seen.insert(set), "duplicate fingering found");
		}
	}

	#[test]
	fn cancellation_short_circuits_enumeration() {
		let graph = standard_graph();
		let chord = vec![
			Note::new(Degree::C, 3),
			Note::new(Degree::E, 3),
			Note::new(Degree::G, 3),
		];
		let token = CancelToken::new();
		token.cancel();
		let result = enumerate_fingerings(&graph, &chord, &token);
		assert!(result.is_err());
	}
}
