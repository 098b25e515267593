//! Error types for recording and replay.

use std::fmt;

use amber_core::{Hash, ObjectKind};

/// Errors surfaced by [`Recorder`](crate::Recorder) operations and the
/// hashing functions.
///
/// Recording is all-or-nothing: any of these aborts the failing call
/// without mutating recorder state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// A description references a handle that never passed through a
    /// `set_*_handle` call, so its content hash is unknown. Recording the
    /// dependency would bake an unreproducible handle value into the
    /// graph, so the registration fails instead.
    UnresolvedHandle {
        /// Kind of the referenced object.
        kind: ObjectKind,
        /// The raw handle value, for diagnostics only.
        handle: u64,
    },
    /// A `set_*_handle` call named an index that was never registered.
    UnknownIndex {
        /// Kind the call addressed.
        kind: ObjectKind,
        /// The out-of-range index.
        index: u32,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedHandle { kind, handle } => {
                write!(f, "unresolved {kind} handle {handle:#x}: no hash recorded for it")
            }
            Self::UnknownIndex { kind, index } => {
                write!(f, "no {kind} record at index {index}")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// Errors surfaced while parsing and replaying a serialized blob.
///
/// All of these abort the entire parse with no partial object graph.
/// Per-object creation failures are *not* errors — they are recorded as
/// [`ReplayOutcome::Failed`](crate::ReplayOutcome) and dependents are
/// skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// The blob does not start with the expected `b"AMBR"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the blob.
        found: u8,
    },
    /// Truncated or structurally invalid data.
    MalformedBlob {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A section tag did not match the canonical kind order.
    UnexpectedKind {
        /// The kind the canonical order requires here.
        expected: ObjectKind,
        /// The kind the blob declared.
        found: ObjectKind,
    },
    /// A record references a hash that no already-decoded record of the
    /// dependency kind carries — a forward reference, which the format
    /// forbids.
    UnresolvedReference {
        /// Kind of the referenced object.
        kind: ObjectKind,
        /// The unresolvable content hash.
        hash: Hash,
    },
    /// A record's payload does not hash to its recorded content hash.
    HashMismatch {
        /// Kind of the corrupt record.
        kind: ObjectKind,
        /// Index of the corrupt record within its kind.
        index: u32,
        /// Hash stored in the blob.
        recorded: Hash,
        /// Hash computed from the payload bytes.
        computed: Hash,
    },
    /// The creation backend rejected a kind's capacity announcement.
    CreatorRejected {
        /// Kind whose `set_num_*` call returned false.
        kind: ObjectKind,
        /// The announced record count.
        count: u32,
    },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"AMBR\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::MalformedBlob { detail } => write!(f, "malformed blob: {detail}"),
            Self::UnexpectedKind { expected, found } => {
                write!(f, "section order violation: expected {expected}, found {found}")
            }
            Self::UnresolvedReference { kind, hash } => {
                write!(f, "unresolved reference to {kind} {hash}")
            }
            Self::HashMismatch {
                kind,
                index,
                recorded,
                computed,
            } => {
                write!(
                    f,
                    "content hash mismatch for {kind} {index}: \
                     recorded={recorded}, computed={computed}"
                )
            }
            Self::CreatorRejected { kind, count } => {
                write!(f, "creation backend rejected {count} {kind} records")
            }
        }
    }
}

impl std::error::Error for ReplayError {}
