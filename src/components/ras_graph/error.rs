//! Recoverable problems found in host-supplied graph input.
//!
//! None of these are fatal: the graph model drops the offending element,
//! logs the error and renders the valid subset.

use thiserror::Error;

/// A single rejected element of the host input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
	/// A connection names a user that is not in `source_ids`.
	#[error("connection {connection} references unknown user {id}")]
	UnknownSource {
		/// Offending connection id.
		connection: String,
		/// User id it names.
		id: String,
	},

	/// A connection names a CBS that is not in `target_records`.
	#[error("connection {connection} references unknown CBS {id}")]
	UnknownTarget {
		/// Offending connection id.
		connection: String,
		/// CBS id it names.
		id: String,
	},

	/// The same qualified id was listed twice; the later one is dropped.
	#[error("duplicate node id {0}")]
	DuplicateNode(String),

	/// Text that is not a `user:<id>` or `cbs:<id>` qualified id.
	#[error("malformed qualified id: {0}")]
	MalformedKey(String),
}
