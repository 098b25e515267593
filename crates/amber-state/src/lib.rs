//! Content hashing, recording, serialization, and replay of pipeline-state
//! graphs.
//!
//! This crate is the core of Amber. A [`Recorder`] accepts the full
//! creation-time description of pipeline objects from a live session,
//! deduplicates them by content hash, and serializes the resulting
//! dependency graph to a portable blob. A [`Replayer`] parses such a blob
//! and reconstructs the objects in dependency order against any backend
//! implementing the [`Creator`] capability trait.
//!
//! # Architecture
//!
//! - [`hash`] computes a 64-bit content hash per object kind
//! - [`codec`] defines the canonical little-endian encoding of every
//!   description; the content hash is FNV-1a over exactly these bytes, so
//!   the hash and the wire format can never disagree
//! - [`Recorder`] registers, deduplicates, and serializes
//! - [`Replayer`] parses, verifies, resolves references, and drives a
//!   [`Creator`]
//! - All payload bytes live in an `amber_arena::ScratchArena` owned by
//!   the recorder or replayer
//!
//! # Format
//!
//! ```text
//! [MAGIC "AMBR"] [VERSION u8]
//! then, per kind in ObjectKind::DECODE_ORDER:
//!   [kind tag u8] [record count u32]
//!   per record: [content hash u64] [payload len u32] [payload bytes]
//! ```
//!
//! Payloads embed dependency references as the referenced record's
//! content hash, never as a backend handle, which is what lets a blob
//! replay against a backend that assigns entirely different handles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod creator;
pub mod error;
pub mod hash;
pub mod record;
pub mod replay;

pub use codec::{DepRef, Decoded, HandleResolver, Reader, RefResolver};
pub use creator::Creator;
pub use error::{RecordError, ReplayError};
pub use record::Recorder;
pub use replay::{ReplayOutcome, ReplayedRecord, Replayer};

/// Magic bytes at the start of every serialized blob.
pub const MAGIC: [u8; 4] = *b"AMBR";

/// Current binary format version.
///
/// There is no compatibility machinery: a blob with any other version
/// fails to parse, loudly.
pub const FORMAT_VERSION: u8 = 1;
