//! Bump-allocated scratch arena for the Amber capture system.
//!
//! A [`ScratchArena`] owns every byte backing recorded description
//! payloads on the capture side and decoded payloads on the replay side.
//! Allocations are bump-pointer cheap, never individually freed, and
//! never move: the whole arena is released at once when its owner drops.
//!
//! # Handle + materialize
//!
//! Instead of handing out raw addresses, [`ScratchArena::alloc`] and
//! [`ScratchArena::push`] return an opaque [`SliceRef`] (block index,
//! offset, length). Callers materialize a `&[u8]` on demand through
//! [`ScratchArena::get`]. This keeps the arena free of `unsafe` and makes
//! it impossible for a stale address to cross the serialization boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod scratch;

pub use scratch::{ScratchArena, SliceRef};
