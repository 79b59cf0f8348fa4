//! fretseq-core: fretboard modeling and Viterbi-optimal fingering selection
//!
//! Converts a sequence of chord inputs (sets of required pitches) into a
//! sequence of guitar fingerings that are both physically playable and
//! globally optimal with respect to a difficulty model favoring smooth,
//! low-effort transitions. The engine is a pure function from
//! `(Tuning, Sequence)` to a fingering list; it performs no I/O and
//! mutates no shared state.
//!
//! # Pipeline
//!
//! ```
//! use fretseq_core::{fretboard, decode, error::CancelToken};
//! use fretseq_core::note::{Degree, Note};
//!
//! let tuning = fretboard::Tuning::standard_guitar();
//! let graph = fretboard::build_fretboard(
//!     &tuning,
//!     fretboard::DEFAULT_N_FRETS,
//!     fretboard::DEFAULT_SCALE_LENGTH,
//! ).unwrap();
//!
//! let chords = vec![vec![Note::new(Degree::E, 2)]];
//! let cancel = CancelToken::new();
//! let fingerings = decode::decode(&graph, &chords, None, &cancel).unwrap();
//! assert_eq!(fingerings.len(), 1);
//! ```

pub mod decode;
pub mod difficulty;
pub mod enumerate;
pub mod error;
pub mod fretboard;
pub mod note;

pub use decode::{FingeringBank, decode, decode_from_bank};
pub use difficulty::difficulty;
pub use enumerate::{ChordInput, Fingering, enumerate_fingerings};
pub use error::{CancelToken, FretseqError, Result};
pub use fretboard::{FretboardGraph, Position, Tuning, build_fretboard};
pub use note::{Degree, Note};
