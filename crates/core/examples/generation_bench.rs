use std::time::Instant;

use fretseq_core::error::CancelToken;
use fretseq_core::fretboard::{DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH, Tuning, build_fretboard};
use fretseq_core::note::{Degree::*, Note};
use fretseq_core::{decode, enumerate_fingerings};

fn main() {
	let tuning = Tuning::standard_guitar();
	let graph = build_fretboard(&tuning, DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH).unwrap();
	let cancel = CancelToken::new();

	println!("=== Single Note (open E) ===");
	let chord = vec![Note::new(E, 2)];
	let start = Instant::now();
	for _ in 0..100 {
		let _ = enumerate_fingerings(&graph, &chord, &cancel).unwrap();
	}
	let elapsed = start.elapsed();
	println!("100 iterations: {elapsed:?}");
	println!("Per iteration: {:?}", elapsed / 100);

	println!("\n=== Triad (C major) ===");
	let chord = vec![Note::new(C, 3), Note::new(E, 3), Note::new(G, 3)];
	let start = Instant::now();
	for _ in 0..100 {
		let _ = enumerate_fingerings(&graph, &chord, &cancel).unwrap();
	}
	let elapsed = start.elapsed();
	println!("100 iterations: {elapsed:?}");
	println!("Per iteration: {:?}", elapsed / 100);

	println!("\n=== Dense Voicing (5-note barre) ===");
	// Fret-5 barre across the five lowest strings: A2, D3, G3, C4, E4.
	let chord = vec![
		Note::new(A, 2),
		Note::new(D, 3),
		Note::new(G, 3),
		Note::new(C, 4),
		Note::new(E, 4),
	];
	let start = Instant::now();
	for _ in 0..20 {
		let _ = enumerate_fingerings(&graph, &chord, &cancel).unwrap();
	}
	let elapsed = start.elapsed();
	println!("20 iterations: {elapsed:?}");
	println!("Per iteration: {:?}", elapsed / 20);

	println!("\n=== Full Decode Over a Short Progression ===");
	// Open triad, then barres climbing the neck in whole steps, then back
	// to an open triad up top. Every step is a same-fret shape, so each
	// chord enumerates and the sequence exercises height/Δheight scoring.
	let chords = vec![
		vec![Note::new(E, 2), Note::new(A, 2), Note::new(D, 3)],
		vec![Note::new(FSharp, 2), Note::new(B, 2), Note::new(E, 3)],
		vec![Note::new(GSharp, 2), Note::new(CSharp, 3), Note::new(FSharp, 3)],
		vec![Note::new(G, 3), Note::new(B, 3), Note::new(E, 4)],
	];
	let start = Instant::now();
	for _ in 0..10 {
		let _ = decode(&graph, &chords, None, &cancel).unwrap();
	}
	let elapsed = start.elapsed();
	println!("10 iterations over a {}-chord sequence: {elapsed:?}", chords.len());
	println!("Per iteration: {:?}", elapsed / 10);
}
