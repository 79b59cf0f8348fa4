//! Error taxonomy (E) and cooperative cancellation (CX)
//!
//! One `thiserror`-derived enum covering every error kind in the engine:
//! a single message-bearing enum plus a crate-level `Result<T>` alias.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::note::Note;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretseqError {
	/// A chord's candidate fingering set came up empty. Fatal for the
	/// whole decoding run; carries the offending chord index and the
	/// pitches that could not be placed on any position.
	#[error("no fingering available for chord {chord_index} (unplaced: {unplaced:?})")]
	NoFingering {
		chord_index: usize,
		unplaced: Vec<Note>,
	},

	/// String pitches are not monotonically ascending by MIDI number, or
	/// fall outside the representable MIDI range. Fatal at graph build.
	#[error("invalid tuning: {0}")]
	InvalidTuning(String),

	/// Cooperative cancellation was observed. No partial output is
	/// returned alongside this variant.
	#[error("operation cancelled")]
	Cancelled,
}

pub type Result<T> = std::result::Result<T, FretseqError>;

/// A cheaply-cloneable cooperative cancellation flag.
///
/// Threaded through C3 and C5 per the concurrency model: checked between
/// chords during enumeration, between transition-matrix rows, and
/// between decoded time-steps. Flipping one clone cancels every handle
/// that shares it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self(Arc::new(AtomicBool::new(false)))
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}

	/// Returns `Err(FretseqError::Cancelled)` iff the token has been
	/// flipped; otherwise `Ok(())`. Call at the checkpoints named above.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			Err(FretseqError::Cancelled)
		} else {
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_token_is_not_cancelled() {
		let token = CancelToken::new();
		assert!(token.check().is_ok());
	}

	#[test]
	fn cancelling_one_clone_cancels_all() {
		let token = CancelToken::new();
		let clone = token.clone();
		clone.cancel();
		assert!(token.is_cancelled());
		assert_eq!(token.check(), Err(FretseqError::Cancelled));
	}
}
