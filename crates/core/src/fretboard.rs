//! Fretboard graph
//!
//! A static, immutable weighted graph over every `(string, fret)`
//! position reachable on a configured instrument. Edges carry a
//! physical-distance weight derived from the "rule of 18" fret-spacing
//! geometry; the rest of the engine only ever queries distances through
//! this graph, never recomputes them.

use petgraph::graphmap::UnGraphMap;

use crate::error::{FretseqError, Result};
use crate::note::Note;

/// Fret geometric ratio divisor ("rule of 18"). Must match exactly for
/// cross-implementation reproducibility.
pub const FRET_RATIO: f64 = 17.817;

/// Default scale length, in arbitrary physical units.
pub const DEFAULT_SCALE_LENGTH: f64 = 650.0;

/// Default number of frets modeled past the nut.
pub const DEFAULT_N_FRETS: u8 = 20;

/// String-axis Euclidean weight applied before taking the distance.
pub const STRING_AXIS_WEIGHT: f64 = 6.0;

/// An ordered sequence of open-string notes, lowest-indexed string first.
/// Invariant: strictly ascending by MIDI number (so every preset tuning
/// satisfies the monotonicity check at graph build time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning(Vec<Note>);

impl Tuning {
	/// Wraps a note sequence as a tuning without validating monotonicity.
	/// `build_fretboard` performs that check; this constructor exists so
	/// callers can build a `Tuning` before deciding whether to validate.
	pub fn new(notes: Vec<Note>) -> Self {
		Tuning(notes)
	}

	pub fn strings(&self) -> &[Note] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Standard 6-string guitar: E2 A2 D3 G3 B3 E4.
	pub fn standard_guitar() -> Self {
		use crate::note::Degree::*;
		Tuning(vec![
			Note::new(E, 2),
			Note::new(A, 2),
			Note::new(D, 3),
			Note::new(G, 3),
			Note::new(B, 3),
			Note::new(E, 4),
		])
	}

	/// Drop D guitar: D2 A2 D3 G3 B3 E4.
	pub fn drop_d() -> Self {
		use crate::note::Degree::*;
		Tuning(vec![
			Note::new(D, 2),
			Note::new(A, 2),
			Note::new(D, 3),
			Note::new(G, 3),
			Note::new(B, 3),
			Note::new(E, 4),
		])
	}

	/// Open G guitar: D2 G2 D3 G3 B3 D4.
	pub fn open_g() -> Self {
		use crate::note::Degree::*;
		Tuning(vec![
			Note::new(D, 2),
			Note::new(G, 2),
			Note::new(D, 3),
			Note::new(G, 3),
			Note::new(B, 3),
			Note::new(D, 4),
		])
	}

	/// DADGAD: D2 A2 D3 G3 A3 D4.
	pub fn dadgad() -> Self {
		use crate::note::Degree::*;
		Tuning(vec![
			Note::new(D, 2),
			Note::new(A, 2),
			Note::new(D, 3),
			Note::new(G, 3),
			Note::new(A, 3),
			Note::new(D, 4),
		])
	}
}

/// A single playable location on the fretboard.
///
/// Identity and ordering are defined over `(string_index, fret_index)`
/// only; per the source's design note, the graph is keyed by Position,
/// not Note, since distinct positions routinely share a Note. `note` is
/// a derived, cached field.
#[derive(Debug, Clone, Copy)]
pub struct Position {
	pub string_index: u8,
	pub fret_index: u8,
	pub note: Note,
}

impl PartialEq for Position {
	fn eq(&self, other: &Self) -> bool {
		self.string_index == other.string_index && self.fret_index == other.fret_index
	}
}
impl Eq for Position {}

impl std::hash::Hash for Position {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.string_index.hash(state);
		self.fret_index.hash(state);
	}
}

impl PartialOrd for Position {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for Position {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(self.string_index, self.fret_index).cmp(&(other.string_index, other.fret_index))
	}
}

/// The distance of a fret from the nut, in the same physical units as
/// `scale_length`, using the rule-of-18 geometric progression: each
/// fret's span equals the remaining scale length divided by
/// `FRET_RATIO`, and that span is then consumed from the remaining
/// length. `fret_y(0) == 0.0`.
pub fn fret_y(fret_index: u8, scale_length: f64) -> f64 {
	let mut remaining = scale_length;
	let mut y = 0.0;
	for _ in 0..fret_index {
		let span = remaining / FRET_RATIO;
		y += span;
		remaining -= span;
	}
	y
}

/// Physical distance between two positions: Euclidean over
/// `(string_index / STRING_AXIS_WEIGHT, fret_y(fret_index))`. The /6
/// weighting de-emphasizes string-direction motion and must be
/// preserved bit-for-bit by every consumer of this metric (the
/// enumerator's pairwise reach check, the difficulty model's path
/// length).
fn physical_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	let dx = a.0 - b.0;
	let dy = a.1 - b.1;
	(dx * dx + dy * dy).sqrt()
}

/// The fretboard graph: a true complete weighted graph over every
/// `(string, fret)` position, plus a `Note -> [Position]` index for the
/// enumerator's per-note lookup. Immutable once built; safe to share freely.
pub struct FretboardGraph {
	graph: UnGraphMap<Position, f64>,
	by_note: std::collections::HashMap<Note, Vec<Position>>,
	n_frets: u8,
	scale_length: f64,
}

impl FretboardGraph {
	pub fn n_frets(&self) -> u8 {
		self.n_frets
	}

	pub fn scale_length(&self) -> f64 {
		self.scale_length
	}

	/// O(1) lookup of the physical distance between two positions.
	/// Positions not present in the graph (e.g. fret index beyond
	/// `n_frets`) have no edge and panic; callers must only ever pass
	/// positions obtained from this graph.
	pub fn distance(&self, a: Position, b: Position) -> f64 {
		if a == b {
			return 0.0;
		}
		*self
			.graph
			.edge_weight(a, b)
			.expect("distance queried between positions not present in the fretboard graph")
	}

	/// All positions on the fretboard that play exactly `note`.
	pub fn positions_for_note(&self, note: Note) -> &[Position] {
		self.by_note.get(&note).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn position_count(&self) -> usize {
		self.graph.node_count()
	}
}

/// Builds the fretboard graph from a tuning and fret count.
///
/// Validates the tuning first: it must have at least one string, every
/// open-string MIDI number must be representable, and strings must be
/// monotonically ascending in pitch (string 0 lowest), or an
/// `InvalidTuning` error is raised instead.
pub fn build_fretboard(tuning: &Tuning, n_frets: u8, scale_length: f64) -> Result<FretboardGraph> {
	if tuning.is_empty() {
		return Err(FretseqError::InvalidTuning(
			"tuning must have at least one string".to_string(),
		));
	}

	let strings = tuning.strings();
	for window in strings.windows(2) {
		if window[0].to_midi() >= window[1].to_midi() {
			return Err(FretseqError::InvalidTuning(format!(
				"strings must be strictly ascending by pitch: {} is not below {}",
				window[0], window[1]
			)));
		}
	}
	for (i, open) in strings.iter().enumerate() {
		let top_midi = open.to_midi() as i32 + n_frets as i32;
		if top_midi > i32::from(u8::MAX) {
			return Err(FretseqError::InvalidTuning(format!(
				"string {i} ({open}) exceeds the representable MIDI range at fret {n_frets}"
			)));
		}
	}

	let mut positions = Vec::new();
	for (string_index, open_note) in strings.iter().enumerate() {
		for fret_index in 0..=n_frets {
			let note = open_note.add_semitones(fret_index as i32);
			positions.push(Position {
				string_index: string_index as u8,
				fret_index,
				note,
			});
		}
	}

	let mut graph = UnGraphMap::with_capacity(positions.len(), positions.len() * positions.len());
	let mut ys = Vec::with_capacity(positions.len());
	for p in &positions {
		graph.add_node(*p);
		ys.push(fret_y(p.fret_index, scale_length));
	}
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let a = (positions[i].string_index as f64 / STRING_AXIS_WEIGHT, ys[i]);
			let b = (positions[j].string_index as f64 / STRING_AXIS_WEIGHT, ys[j]);
			let d = physical_distance(a, b);
			graph.add_edge(positions[i], positions[j], d);
		}
	}

	let mut by_note: std::collections::HashMap<Note, Vec<Position>> =
		std::collections::HashMap::new();
	for p in &positions {
		by_note.entry(p.note).or_default().push(*p);
	}

	Ok(FretboardGraph {
		graph,
		by_note,
		n_frets,
		scale_length,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::note::Degree;

	#[test]
	fn fret_y_starts_at_zero() {
		assert_eq!(fret_y(0, DEFAULT_SCALE_LENGTH), 0.0);
	}

	#[test]
	fn fret_y_is_monotonically_increasing() {
		let mut prev = fret_y(0, DEFAULT_SCALE_LENGTH);
		for f in 1..DEFAULT_N_FRETS {
			let y = fret_y(f, DEFAULT_SCALE_LENGTH);
			assert!(y > prev);
			prev = y;
		}
	}

	#[test]
	fn standard_tuning_builds_a_complete_graph() {
		let tuning = Tuning::standard_guitar();
		let graph = build_fretboard(&tuning, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH).unwrap();
		assert_eq!(graph.position_count(), 6 * (DEFAULT_N_FRETS as usize + 1));
	}

	#[test]
	fn distance_is_zero_for_identical_position() {
		let tuning = Tuning::standard_guitar();
		let graph = build_fretboard(&tuning, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH).unwrap();
		let p = graph.positions_for_note(Note::new(Degree::E, 2))[0];
		assert_eq!(graph.distance(p, p), 0.0);
	}

	#[test]
	fn distance_grows_with_fret_separation() {
		let tuning = Tuning::standard_guitar();
		let graph = build_fretboard(&tuning, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH).unwrap();
		let open = graph.positions_for_note(Note::new(Degree::E, 2))[0];
		let near = Position {
			string_index: 0,
			fret_index: 1,
			note: Note::new(Degree::E, 2).add_semitones(1),
		};
		let far = Position {
			string_index: 0,
			fret_index: 10,
			note: Note::new(Degree::E, 2).add_semitones(10),
		};
		assert!(graph.distance(open, near) < graph.distance(open, far));
	}

	#[test]
	fn non_monotonic_tuning_is_rejected() {
		let bad = Tuning::new(vec![Note::new(Degree::A, 2), Note::new(Degree::E, 2)]);
		let result = build_fretboard(&bad, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH);
		assert!(matches!(result, Err(FretseqError::InvalidTuning(_))));
	}

	#[test]
	fn empty_tuning_is_rejected() {
		let empty = Tuning::new(vec![]);
		let result = build_fretboard(&empty, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH);
		assert!(matches!(result, Err(FretseqError::InvalidTuning(_))));
	}

	#[test]
	fn note_index_finds_every_octave_on_every_string() {
		let tuning = Tuning::standard_guitar();
		let graph = build_fretboard(&tuning, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH).unwrap();
		// Open low E and the 12th-fret E on the D string both play E, different octaves/positions.
		let e2_positions = graph.positions_for_note(Note::new(Degree::E, 2));
		assert!(!e2_positions.is_empty());
	}
}
