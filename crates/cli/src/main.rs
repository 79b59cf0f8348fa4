use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use fretseq_core::error::CancelToken;
use fretseq_core::fretboard::{DEFAULT_N_FRETS, DEFAULT_SCALE_LENGTH, Tuning, build_fretboard};
use fretseq_core::note::Note;
use fretseq_core::{ChordInput, FretseqError, decode, enumerate_fingerings};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum InstrumentChoice {
	/// Standard 6-string guitar (EADGBE tuning)
	#[default]
	Guitar,
	/// Drop D guitar (DADGBE tuning)
	DropD,
	/// Open G guitar (DGDGBD tuning)
	OpenG,
	/// DADGAD guitar tuning
	Dadgad,
}

impl InstrumentChoice {
	fn tuning(self) -> Tuning {
		match self {
			InstrumentChoice::Guitar => Tuning::standard_guitar(),
			InstrumentChoice::DropD => Tuning::drop_d(),
			InstrumentChoice::OpenG => Tuning::open_g(),
			InstrumentChoice::Dadgad => Tuning::dadgad(),
		}
	}
}

/// Parses a custom tuning string like "E2,A2,D3,G3,B3,E4" into open-string notes.
fn parse_tuning(tuning_str: &str) -> Result<Tuning> {
	let notes: Result<Vec<Note>> = tuning_str
		.split(',')
		.map(|s| {
			Note::parse(s.trim()).map_err(|e| anyhow::anyhow!("invalid note '{}': {}", s.trim(), e))
		})
		.collect();
	Ok(Tuning::new(notes?))
}

/// Resolves the effective tuning: an explicit `--tuning` string overrides
/// the `--instrument` preset.
fn resolve_tuning(instrument: InstrumentChoice, tuning: Option<String>) -> Result<Tuning> {
	match tuning {
		Some(s) => parse_tuning(&s),
		None => Ok(instrument.tuning()),
	}
}

/// Parses one note-group line: whitespace- or comma-separated note
/// tokens (`"E2 G2 B2"` or `"E2,G2,B2"`).
fn parse_chord_line(line: &str) -> Result<ChordInput> {
	line.split(|c: char| c.is_whitespace() || c == ',')
		.filter(|tok| !tok.is_empty())
		.map(|tok| Note::parse(tok).map_err(|e| anyhow::anyhow!("invalid note '{}': {}", tok, e)))
		.collect()
}

/// Parses a full note-group sequence from text: one chord per
/// non-blank line.
fn parse_sequence(text: &str) -> Result<Vec<ChordInput>> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(parse_chord_line)
		.collect()
}

fn read_input(path: &Option<String>) -> Result<String> {
	match path {
		Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}")),
		None => {
			let mut buf = String::new();
			io::stdin()
				.read_to_string(&mut buf)
				.context("reading stdin")?;
			Ok(buf)
		}
	}
}

#[derive(Parser)]
#[command(name = "fretseq")]
#[command(about = "Fretboard modeling and Viterbi-optimal fingering selection", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a note-group sequence into the optimal fingering per group
	Decode {
		/// Path to a note-group file (one chord per line). Reads stdin if omitted.
		input: Option<String>,

		/// Instrument tuning preset
		#[arg(short, long, default_value = "guitar")]
		instrument: InstrumentChoice,

		/// Custom tuning (e.g. "D2,A2,D3,G3,B3,E4"). Overrides --instrument.
		#[arg(short, long)]
		tuning: Option<String>,

		/// Number of frets modeled on the fretboard
		#[arg(short = 'f', long, default_value_t = DEFAULT_N_FRETS)]
		frets: u8,

		/// Scale length in physical units
		#[arg(short = 's', long, default_value_t = DEFAULT_SCALE_LENGTH)]
		scale_length: f64,
	},

	/// Print every candidate fingering for a single chord (debugging)
	Enumerate {
		/// Note tokens for one chord, e.g. "E2 G2 B2" or "E2,G2,B2"
		chord: String,

		/// Instrument tuning preset
		#[arg(short, long, default_value = "guitar")]
		instrument: InstrumentChoice,

		/// Custom tuning (e.g. "D2,A2,D3,G3,B3,E4"). Overrides --instrument.
		#[arg(short, long)]
		tuning: Option<String>,

		/// Number of frets modeled on the fretboard
		#[arg(short = 'f', long, default_value_t = DEFAULT_N_FRETS)]
		frets: u8,

		/// Scale length in physical units
		#[arg(short = 's', long, default_value_t = DEFAULT_SCALE_LENGTH)]
		scale_length: f64,
	},
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Decode {
			input,
			instrument,
			tuning,
			frets,
			scale_length,
		} => run_decode(input, instrument, tuning, frets, scale_length),
		Commands::Enumerate {
			chord,
			instrument,
			tuning,
			frets,
			scale_length,
		} => run_enumerate(&chord, instrument, tuning, frets, scale_length),
	}
}

fn run_decode(
	input: Option<String>,
	instrument: InstrumentChoice,
	tuning: Option<String>,
	frets: u8,
	scale_length: f64,
) -> Result<()> {
	let tuning = resolve_tuning(instrument, tuning)?;
	let graph =
		build_fretboard(&tuning, frets, scale_length).map_err(|e| anyhow::anyhow!("{e}"))?;

	let text = read_input(&input)?;
	let chords = parse_sequence(&text)?;

	let cancel = CancelToken::new();
	match decode(&graph, &chords, None, &cancel) {
		Ok(fingerings) => {
			for fingering in &fingerings {
				println!("{}", fingering.to_tab(tuning.len()).green());
			}
			Ok(())
		}
		Err(FretseqError::NoFingering {
			chord_index,
			unplaced,
		}) => {
			eprintln!(
				"{}",
				format!("no fingering for chord {chord_index} (pitches: {unplaced:?})").red()
			);
			std::process::exit(1);
		}
		Err(e) => Err(anyhow::anyhow!("{e}")),
	}
}

fn run_enumerate(
	chord: &str,
	instrument: InstrumentChoice,
	tuning: Option<String>,
	frets: u8,
	scale_length: f64,
) -> Result<()> {
	let tuning = resolve_tuning(instrument, tuning)?;
	let graph =
		build_fretboard(&tuning, frets, scale_length).map_err(|e| anyhow::anyhow!("{e}"))?;
	let notes = parse_chord_line(chord)?;

	let cancel = CancelToken::new();
	let fingerings =
		enumerate_fingerings(&graph, &notes, &cancel).map_err(|e| anyhow::anyhow!("{e}"))?;

	if fingerings.is_empty() {
		eprintln!("{}", "no playable fingerings found".yellow());
		return Ok(());
	}

	println!("{} candidate fingerings:", fingerings.len());
	for fingering in &fingerings {
		println!("  {}", fingering.to_tab(tuning.len()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_whitespace_separated_chord_line() {
		let chord = parse_chord_line("E2 G2 B2").unwrap();
		assert_eq!(chord.len(), 3);
	}

	#[test]
	fn parses_comma_separated_chord_line() {
		let chord = parse_chord_line("E2,G2,B2").unwrap();
		assert_eq!(chord.len(), 3);
	}

	#[test]
	fn blank_lines_are_ignored_in_a_sequence() {
		let sequence = parse_sequence("E2 G2 B2\n\nA2 E3\n").unwrap();
		assert_eq!(sequence.len(), 2);
	}

	#[test]
	fn custom_tuning_overrides_instrument_preset() {
		let tuning = resolve_tuning(InstrumentChoice::Guitar, Some("D2,A2,D3".to_string())).unwrap();
		assert_eq!(tuning.len(), 3);
	}

	#[test]
	fn invalid_note_token_is_rejected() {
		assert!(parse_chord_line("Z9").is_err());
	}
}
