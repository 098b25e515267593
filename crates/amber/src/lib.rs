//! Amber: content-addressed capture and replay of GPU pipeline-state
//! graphs.
//!
//! A capture layer feeds the full creation-time description of pipeline
//! objects (samplers, layouts, shader modules, render passes, pipelines)
//! into a [`Recorder`](state::Recorder), which deduplicates them by
//! content hash and serializes the dependency graph to a portable blob.
//! A [`Replayer`](state::Replayer) later reconstructs the same objects,
//! in dependency order, against any backend implementing the
//! [`Creator`](state::Creator) capability trait — no part of the
//! original session's handles survives the round trip.
//!
//! # Quick start
//!
//! ```rust
//! use amber::prelude::*;
//! use amber::types::{SamplerDesc, ShaderModuleDesc};
//! use amber::types::{AddressMode, BorderColor, Filter, MipmapMode};
//!
//! // Record one sampler and one shader module, as a capture layer would.
//! let recorder = Recorder::new();
//!
//! let sampler = SamplerDesc {
//!     mag_filter: Filter::Linear,
//!     min_filter: Filter::Linear,
//!     mipmap_mode: MipmapMode::Nearest,
//!     address_mode_u: AddressMode::Repeat,
//!     address_mode_v: AddressMode::Repeat,
//!     address_mode_w: AddressMode::Repeat,
//!     mip_lod_bias: 0.0,
//!     max_anisotropy: None,
//!     compare_op: None,
//!     min_lod: 0.0,
//!     max_lod: 1.0,
//!     border_color: BorderColor::TransparentBlack,
//!     unnormalized_coordinates: false,
//!     extensions: vec![],
//! };
//! let h = amber::hash::sampler_hash(&sampler);
//! let index = recorder.register_sampler(h, &sampler);
//! assert_eq!(index, 0);
//!
//! let module = ShaderModuleDesc { code: vec![0x1001, 0x2002] };
//! recorder.register_shader_module(amber::hash::shader_module_hash(&module), &module);
//!
//! // Same content, same index — the graph is deduplicated.
//! assert_eq!(recorder.register_sampler(h, &sampler), 0);
//!
//! let blob = recorder.serialize();
//! assert!(!blob.is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `amber-core` | Hashes, handles, create-description types |
//! | [`arena`] | `amber-arena` | The scratch arena backing payload storage |
//! | [`state`] | `amber-state` | Hashing, codec, `Recorder`, `Replayer`, `Creator` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: hashes, handles, object kinds, descriptions (`amber-core`).
pub use amber_core as types;

/// Scratch arena storage (`amber-arena`).
pub use amber_arena as arena;

/// Hashing, serialization, recording, and replay (`amber-state`).
pub use amber_state as state;

/// Content hashing functions, re-exported from [`state`](amber_state).
pub use amber_state::hash;

/// The most commonly used items.
pub mod prelude {
    pub use amber_arena::{ScratchArena, SliceRef};
    pub use amber_core::id::{Hash, ObjectKind};
    pub use amber_state::{
        Creator, RecordError, Recorder, ReplayError, ReplayOutcome, Replayer,
    };
}

pub use prelude::{Creator, Recorder, Replayer};
