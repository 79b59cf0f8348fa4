//! WASM bindings for fretseq
//!
//! JavaScript-friendly bindings over `fretseq-core`'s engine: build a
//! fretboard, enumerate candidate fingerings for a chord, and decode an
//! optimal fingering sequence, all driven by plain note-name strings
//! (the same thin text adapter `fretseq-cli` uses) so the browser side
//! never has to construct core types directly.

use fretseq_core::error::CancelToken;
use fretseq_core::fretboard::{DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH, Tuning, build_fretboard};
use fretseq_core::note::Note;
use fretseq_core::{ChordInput, Fingering, FretseqError, decode as core_decode, enumerate_fingerings};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
	console_error_panic_hook::set_once();
}

fn parse_tuning(notes: &[String]) -> Result<Tuning, JsValue> {
	let notes: Result<Vec<Note>, String> = notes.iter().map(|s| Note::parse(s)).collect();
	let notes = notes.map_err(|e| JsValue::from_str(&format!("invalid tuning note: {e}")))?;
	Ok(Tuning::new(notes))
}

fn parse_chord(notes: &[String]) -> Result<ChordInput, JsValue> {
	notes
		.iter()
		.map(|s| Note::parse(s).map_err(|e| JsValue::from_str(&format!("invalid note '{s}': {e}"))))
		.collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsPosition {
	pub string_index: u8,
	pub fret_index: u8,
	pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsFingering {
	pub positions: Vec<JsPosition>,
	pub tab: String,
}

fn to_js_fingering(fingering: &Fingering, string_count: usize) -> JsFingering {
	JsFingering {
		positions: fingering
			.positions()
			.iter()
			.map(|p| JsPosition {
				string_index: p.string_index,
				fret_index: p.fret_index,
				note: p.note.to_string(),
			})
			.collect(),
		tab: fingering.to_tab(string_count),
	}
}

/// Builds a fretboard graph for the given tuning (array of note-name
/// strings, lowest-indexed string first) and returns nothing directly
/// usable from JS; instead, `enumerateFingerings`/`decodeSequence`
/// rebuild the graph per call, keeping the WASM boundary stateless and
/// matching the engine's "pure function of (Tuning, Sequence)" contract.
/// Exposed separately so callers can validate a tuning up front.
#[wasm_bindgen(js_name = buildFretboard)]
pub fn build_fretboard_js(
	tuning: Vec<String>,
	n_frets: Option<u8>,
	scale_length: Option<f64>,
) -> Result<(), JsValue> {
	let tuning = parse_tuning(&tuning)?;
	build_fretboard(
		&tuning,
		n_frets.unwrap_or(DEFAULT_N_FRETS),
		scale_length.unwrap_or(DEFAULT_SCALE_LENGTH),
	)
	.map_err(|e| JsValue::from_str(&format!("{e}")))?;
	Ok(())
}

/// Enumerates every candidate fingering for one chord (array of
/// note-name strings).
#[wasm_bindgen(js_name = enumerateFingerings)]
pub fn enumerate_fingerings_js(
	tuning: Vec<String>,
	chord: Vec<String>,
	n_frets: Option<u8>,
	scale_length: Option<f64>,
) -> Result<JsValue, JsValue> {
	let tuning = parse_tuning(&tuning)?;
	let graph = build_fretboard(
		&tuning,
		n_frets.unwrap_or(DEFAULT_N_FRETS),
		scale_length.unwrap_or(DEFAULT_SCALE_LENGTH),
	)
	.map_err(|e| JsValue::from_str(&format!("{e}")))?;

	let chord = parse_chord(&chord)?;
	let cancel = CancelToken::new();
	let fingerings = enumerate_fingerings(&graph, &chord, &cancel)
		.map_err(|e| JsValue::from_str(&format!("{e}")))?;

	let js_fingerings: Vec<JsFingering> = fingerings
		.iter()
		.map(|f| to_js_fingering(f, tuning.len()))
		.collect();

	serde_wasm_bindgen::to_value(&js_fingerings)
		.map_err(|e| JsValue::from_str(&format!("serialization error: {e}")))
}

/// Decodes the Viterbi-optimal fingering sequence for a chord sequence
/// (array of chords, each an array of note-name strings).
#[wasm_bindgen(js_name = decodeSequence)]
pub fn decode_js(
	tuning: Vec<String>,
	chords: Vec<Vec<String>>,
	n_frets: Option<u8>,
	scale_length: Option<f64>,
) -> Result<JsValue, JsValue> {
	let tuning = parse_tuning(&tuning)?;
	let graph = build_fretboard(
		&tuning,
		n_frets.unwrap_or(DEFAULT_N_FRETS),
		scale_length.unwrap_or(DEFAULT_SCALE_LENGTH),
	)
	.map_err(|e| JsValue::from_str(&format!("{e}")))?;

	let chords: Result<Vec<ChordInput>, JsValue> =
		chords.iter().map(|c| parse_chord(c)).collect();
	let chords = chords?;

	let cancel = CancelToken::new();
	let fingerings = core_decode(&graph, &chords, None, &cancel).map_err(|e| match e {
		FretseqError::NoFingering {
			chord_index,
			unplaced,
		} => JsValue::from_str(&format!(
			"no fingering for chord {chord_index} (pitches: {unplaced:?})"
		)),
		other => JsValue::from_str(&format!("{other}")),
	})?;

	let js_fingerings: Vec<JsFingering> = fingerings
		.iter()
		.map(|f| to_js_fingering(f, tuning.len()))
		.collect();

	serde_wasm_bindgen::to_value(&js_fingerings)
		.map_err(|e| JsValue::from_str(&format!("serialization error: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn enumerate_open_e_returns_one_fingering() {
		let tuning = vec![
			"E2".to_string(),
			"A2".to_string(),
			"D3".to_string(),
			"G3".to_string(),
			"B3".to_string(),
			"E4".to_string(),
		];
		let result = enumerate_fingerings_js(tuning, vec!["E2".to_string()], None, None);
		assert!(result.is_ok());
	}

	#[wasm_bindgen_test]
	fn decode_single_chord_sequence() {
		let tuning = vec![
			"E2".to_string(),
			"A2".to_string(),
			"D3".to_string(),
			"G3".to_string(),
			"B3".to_string(),
			"E4".to_string(),
		];
		let chords = vec![vec!["E2".to_string()]];
		let result = decode_js(tuning, chords, None, None);
		assert!(result.is_ok());
	}

	#[wasm_bindgen_test]
	fn invalid_note_is_rejected() {
		let tuning = vec!["Z9".to_string()];
		let result = build_fretboard_js(tuning, None, None);
		assert!(result.is_err());
	}
}
