//! Content hashing for create-descriptions.
//!
//! Uses FNV-1a over the canonical wire encoding from [`crate::codec`].
//! Because the preimage *is* the serialized payload, the hash is a pure
//! function of content: scalar fields contribute their canonical bytes,
//! arrays contribute in index order, an absent extension chain
//! contributes its explicit zero count, and referenced objects
//! contribute their own content hashes rather than their handle bit
//! patterns. Padding and pointer values never exist in the preimage.
//!
//! The hashes are not cryptographically secure; they are deduplication
//! and integrity identifiers, not authentication.

use amber_core::id::{DepList, Hash};
use amber_core::layout::{DescriptorSetLayoutDesc, PipelineLayoutDesc};
use amber_core::pipeline::{ComputePipelineDesc, GraphicsPipelineDesc};
use amber_core::render_pass::RenderPassDesc;
use amber_core::sampler::SamplerDesc;
use amber_core::shader::ShaderModuleDesc;

use crate::codec::{self, HandleResolver};
use crate::error::RecordError;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// FNV-1a over a byte slice.
///
/// This is the hash of a serialized record payload; the replayer uses it
/// to verify blob integrity against each record's stored hash.
pub fn payload_hash(bytes: &[u8]) -> Hash {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    Hash(hash)
}

/// Content hash of a sampler description.
pub fn sampler_hash(desc: &SamplerDesc) -> Hash {
    let mut buf = Vec::new();
    codec::encode_sampler(&mut buf, desc);
    payload_hash(&buf)
}

/// Content hash of a shader module description.
pub fn shader_module_hash(desc: &ShaderModuleDesc) -> Hash {
    let mut buf = Vec::with_capacity(4 + desc.code.len() * 4);
    codec::encode_shader_module(&mut buf, desc);
    payload_hash(&buf)
}

/// Content hash of a render pass description.
pub fn render_pass_hash(desc: &RenderPassDesc) -> Hash {
    let mut buf = Vec::new();
    codec::encode_render_pass(&mut buf, desc);
    payload_hash(&buf)
}

/// Content hash of a descriptor set layout description.
///
/// Immutable sampler handles are resolved to sampler content hashes
/// through `resolver`; an unknown handle fails with
/// [`RecordError::UnresolvedHandle`] rather than contaminating the hash.
pub fn descriptor_set_layout_hash(
    resolver: &dyn HandleResolver,
    desc: &DescriptorSetLayoutDesc,
) -> Result<Hash, RecordError> {
    let mut buf = Vec::new();
    let mut deps = DepList::new();
    codec::encode_descriptor_set_layout(&mut buf, desc, resolver, &mut deps)?;
    Ok(payload_hash(&buf))
}

/// Content hash of a pipeline layout description.
pub fn pipeline_layout_hash(
    resolver: &dyn HandleResolver,
    desc: &PipelineLayoutDesc,
) -> Result<Hash, RecordError> {
    let mut buf = Vec::new();
    let mut deps = DepList::new();
    codec::encode_pipeline_layout(&mut buf, desc, resolver, &mut deps)?;
    Ok(payload_hash(&buf))
}

/// Content hash of a compute pipeline description.
pub fn compute_pipeline_hash(
    resolver: &dyn HandleResolver,
    desc: &ComputePipelineDesc,
) -> Result<Hash, RecordError> {
    let mut buf = Vec::new();
    let mut deps = DepList::new();
    codec::encode_compute_pipeline(&mut buf, desc, resolver, &mut deps)?;
    Ok(payload_hash(&buf))
}

/// Content hash of a graphics pipeline description.
pub fn graphics_pipeline_hash(
    resolver: &dyn HandleResolver,
    desc: &GraphicsPipelineDesc,
) -> Result<Hash, RecordError> {
    let mut buf = Vec::new();
    let mut deps = DepList::new();
    codec::encode_graphics_pipeline(&mut buf, desc, resolver, &mut deps)?;
    Ok(payload_hash(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Recorder;
    use amber_core::id::SamplerHandle;
    use amber_core::sampler::{AddressMode, ReductionMode, SamplerExt};
    use amber_core::shader::ShaderModuleDesc;
    use amber_test_utils::fixtures;

    #[test]
    fn identical_content_hashes_equal() {
        let a = fixtures::clamped_linear_sampler();
        let b = fixtures::clamped_linear_sampler();
        assert_eq!(sampler_hash(&a), sampler_hash(&b));
    }

    #[test]
    fn any_field_change_changes_hash() {
        let base = fixtures::clamped_linear_sampler();

        let mut changed = base.clone();
        changed.address_mode_w = AddressMode::MirroredRepeat;
        assert_ne!(sampler_hash(&base), sampler_hash(&changed));

        let mut changed = base.clone();
        changed.mip_lod_bias = base.mip_lod_bias + 0.5;
        assert_ne!(sampler_hash(&base), sampler_hash(&changed));

        let mut changed = base.clone();
        changed.unnormalized_coordinates = !base.unnormalized_coordinates;
        assert_ne!(sampler_hash(&base), sampler_hash(&changed));
    }

    #[test]
    fn absent_extension_chain_is_distinct_from_default_entry() {
        let bare = fixtures::clamped_linear_sampler();
        let mut extended = bare.clone();
        // WeightedAverage is the default behavior, but an explicit entry
        // must still hash differently from no chain at all.
        extended.extensions = vec![SamplerExt::ReductionMode(ReductionMode::WeightedAverage)];
        assert_ne!(sampler_hash(&bare), sampler_hash(&extended));
    }

    #[test]
    fn code_word_order_matters() {
        let a = ShaderModuleDesc {
            code: vec![1, 2, 3, 4],
        };
        let b = ShaderModuleDesc {
            code: vec![1, 2, 4, 3],
        };
        assert_ne!(shader_module_hash(&a), shader_module_hash(&b));
    }

    #[test]
    fn empty_module_has_stable_nonzero_hash() {
        let empty = ShaderModuleDesc { code: vec![] };
        let h = shader_module_hash(&empty);
        assert_eq!(h, shader_module_hash(&empty));
        assert_ne!(h, Hash(0));
    }

    #[test]
    fn payload_hash_matches_recomputed_encoding() {
        let desc = fixtures::color_depth_render_pass();
        let mut buf = Vec::new();
        crate::codec::encode_render_pass(&mut buf, &desc);
        assert_eq!(render_pass_hash(&desc), payload_hash(&buf));
    }

    #[test]
    fn binding_order_matters() {
        let a = fixtures::buffer_set_layout();
        let mut b = a.clone();
        b.bindings.reverse();

        // No sampler references, so any resolver will do.
        let recorder = Recorder::new();
        assert_ne!(
            descriptor_set_layout_hash(&recorder, &a).unwrap(),
            descriptor_set_layout_hash(&recorder, &b).unwrap()
        );
    }

    #[test]
    fn dependency_hashes_track_content_not_handle_bits() {
        // Two sessions bind DIFFERENT sampler content to the SAME handle
        // value. A layout referencing that handle must hash differently,
        // because the dependency contributes its content hash.
        let make = |bias: f32| {
            let recorder = Recorder::new();
            let mut sampler = fixtures::clamped_linear_sampler();
            sampler.mip_lod_bias = bias;
            let i = recorder.register_sampler(sampler_hash(&sampler), &sampler);
            recorder.set_sampler_handle(i, SamplerHandle(0x42)).unwrap();
            let layout = fixtures::sampled_image_set_layout(vec![SamplerHandle(0x42)]);
            descriptor_set_layout_hash(&recorder, &layout).unwrap()
        };
        assert_ne!(make(0.0), make(1.0));

        // And the converse: identical sampler content behind different
        // handle values hashes identically.
        let make_with_handle = |handle: u64| {
            let recorder = Recorder::new();
            let sampler = fixtures::clamped_linear_sampler();
            let i = recorder.register_sampler(sampler_hash(&sampler), &sampler);
            recorder
                .set_sampler_handle(i, SamplerHandle(handle))
                .unwrap();
            let layout = fixtures::sampled_image_set_layout(vec![SamplerHandle(handle)]);
            descriptor_set_layout_hash(&recorder, &layout).unwrap()
        };
        assert_eq!(make_with_handle(0x1), make_with_handle(0xFFFF_FFFF));
    }
}
