//! Pitch identity and arithmetic
//!
//! A minimal pitch model: a `Degree` (one of the 12 pitch classes, sharps-only
//! canonical spelling) paired with an octave gives a `Note`. The only
//! contract the rest of the engine depends on is the MIDI bijection in
//! `Note::to_midi` / `Note::from_midi`. Chord-symbol parsing, scale theory,
//! and the like stay outside this crate; callers hand it notes directly.

use std::fmt;

/// One of the 12 pitch classes, spelled with sharps only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Degree {
	C,
	CSharp,
	D,
	DSharp,
	E,
	F,
	FSharp,
	G,
	GSharp,
	A,
	ASharp,
	B,
}

impl Degree {
	pub fn to_semitone(self) -> u8 {
		match self {
			Degree::C => 0,
			Degree::CSharp => 1,
			Degree::D => 2,
			Degree::DSharp => 3,
			Degree::E => 4,
			Degree::F => 5,
			Degree::FSharp => 6,
			Degree::G => 7,
			Degree::GSharp => 8,
			Degree::A => 9,
			Degree::ASharp => 10,
			Degree::B => 11,
		}
	}

	pub fn from_semitone(semitone: u8) -> Self {
		match semitone % 12 {
			0 => Degree::C,
			1 => Degree::CSharp,
			2 => Degree::D,
			3 => Degree::DSharp,
			4 => Degree::E,
			5 => Degree::F,
			6 => Degree::FSharp,
			7 => Degree::G,
			8 => Degree::GSharp,
			9 => Degree::A,
			10 => Degree::ASharp,
			11 => Degree::B,
			_ => unreachable!(),
		}
	}

	/// Wraps around octave boundaries using modular arithmetic.
	pub fn add_semitones(self, semitones: i32) -> Self {
		let current = self.to_semitone() as i32;
		Self::from_semitone((current + semitones).rem_euclid(12) as u8)
	}

	/// Always returns ascending distance (0-11).
	pub fn semitone_distance_to(self, other: Degree) -> u8 {
		let from = self.to_semitone() as i32;
		let to = other.to_semitone() as i32;
		((to - from).rem_euclid(12)) as u8
	}

	fn name(self) -> &'static str {
		match self {
			Degree::C => "C",
			Degree::CSharp => "C#",
			Degree::D => "D",
			Degree::DSharp => "D#",
			Degree::E => "E",
			Degree::F => "F",
			Degree::FSharp => "F#",
			Degree::G => "G",
			Degree::GSharp => "G#",
			Degree::A => "A",
			Degree::ASharp => "A#",
			Degree::B => "B",
		}
	}

	/// Parse a degree from a string. Flats are accepted on input but always
	/// normalized to the sharps-only canonical spelling on output.
	pub fn parse(s: &str) -> Result<Self, String> {
		match s.trim().to_uppercase().as_str() {
			"C" => Ok(Degree::C),
			"C#" | "DB" => Ok(Degree::CSharp),
			"D" => Ok(Degree::D),
			"D#" | "EB" => Ok(Degree::DSharp),
			"E" => Ok(Degree::E),
			"F" => Ok(Degree::F),
			"F#" | "GB" => Ok(Degree::FSharp),
			"G" => Ok(Degree::G),
			"G#" | "AB" => Ok(Degree::GSharp),
			"A" => Ok(Degree::A),
			"A#" | "BB" => Ok(Degree::ASharp),
			"B" => Ok(Degree::B),
			other => Err(other.to_string()),
		}
	}
}

impl fmt::Display for Degree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

/// An octave-aware note. Octave 4 is the octave starting at middle C (C4 = MIDI 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
	pub degree: Degree,
	pub octave: i8,
}

impl Note {
	pub fn new(degree: Degree, octave: i8) -> Self {
		Note { degree, octave }
	}

	pub fn to_midi(self) -> u8 {
		((self.octave as i32 + 1) * 12 + self.degree.to_semitone() as i32) as u8
	}

	pub fn from_midi(midi: u8) -> Self {
		let octave = (midi as i32 / 12) - 1;
		Note::new(Degree::from_semitone(midi % 12), octave as i8)
	}

	pub fn add_semitones(self, semitones: i32) -> Self {
		let midi = self.to_midi() as i32 + semitones;
		Self::from_midi(midi.clamp(0, 127) as u8)
	}

	pub fn semitone_distance_to(self, other: Note) -> i32 {
		other.to_midi() as i32 - self.to_midi() as i32
	}

	/// Thin text adapter for CLI/WASM input, not a music-theory component.
	/// Accepts e.g. "C4", "F#3", "Ab2".
	pub fn parse(s: &str) -> Result<Self, String> {
		let s = s.trim();
		let octave_start = s
			.char_indices()
			.find(|(i, c)| c.is_ascii_digit() || (*c == '-' && *i > 0))
			.map(|(i, _)| i)
			.ok_or_else(|| s.to_string())?;

		let degree = Degree::parse(&s[..octave_start]).map_err(|_| s.to_string())?;
		let octave = s[octave_start..]
			.parse::<i8>()
			.map_err(|_| s.to_string())?;

		Ok(Note::new(degree, octave))
	}
}

/// Standalone MIDI conversion helpers, for callers that prefer free
/// functions over the inherent methods.
pub fn note_from_midi_number(n: u8) -> Note {
	Note::from_midi(n)
}

pub fn midi_number(note: Note) -> u8 {
	note.to_midi()
}

impl fmt::Display for Note {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.degree, self.octave)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn midi_bijection_round_trips() {
		for midi in 0u8..=127 {
			let note = note_from_midi_number(midi);
			assert_eq!(midi_number(note), midi);
		}
	}

	#[test]
	fn degree_semitone_round_trips() {
		for s in 0u8..12 {
			assert_eq!(Degree::from_semitone(s).to_semitone(), s);
		}
	}

	#[test]
	fn note_equality_is_component_wise() {
		let a = Note::new(Degree::C, 4);
		let b = Note::new(Degree::C, 4);
		let c = Note::new(Degree::C, 5);
		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[test]
	fn display_is_sharps_only() {
		let note = Note::new(Degree::GSharp, 3);
		assert_eq!(note.to_string(), "G#3");
	}

	#[test]
	fn parse_accepts_flats_but_normalizes() {
		let note = Note::parse("Ab3").unwrap();
		assert_eq!(note.degree, Degree::GSharp);
		assert_eq!(note.to_string(), "G#3");
	}

	#[test]
	fn parse_negative_octave() {
		let note = Note::parse("C-1").unwrap();
		assert_eq!(note.octave, -1);
		assert_eq!(note.to_midi(), 0);
	}

	#[test]
	fn add_semitones_wraps_octave() {
		let b3 = Note::new(Degree::B, 3);
		let c4 = b3.add_semitones(1);
		assert_eq!(c4.degree, Degree::C);
		assert_eq!(c4.octave, 4);
	}

	#[test]
	fn standard_guitar_string_midi_numbers() {
		// E2 A2 D3 G3 B3 E4
		assert_eq!(Note::parse("E2").unwrap().to_midi(), 40);
		assert_eq!(Note::parse("A2").unwrap().to_midi(), 45);
		assert_eq!(Note::parse("D3").unwrap().to_midi(), 50);
		assert_eq!(Note::parse("G3").unwrap().to_midi(), 55);
		assert_eq!(Note::parse("B3").unwrap().to_midi(), 59);
		assert_eq!(Note::parse("E4").unwrap().to_midi(), 64);
	}
}
