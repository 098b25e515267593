//! Descriptor-set-layout and pipeline-layout create-descriptions.

use std::ops::{BitOr, BitOrAssign};

use crate::id::{DescriptorSetLayoutHandle, SamplerHandle};

/// Bitset of shader stages, used by bindings and push-constant ranges.
///
/// Plain `u32` newtype with named constants rather than an enum — stage
/// masks combine freely and unknown bits are preserved verbatim through
/// the hash and the wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderStageFlags(pub u32);

impl ShaderStageFlags {
    /// No stages.
    pub const NONE: ShaderStageFlags = ShaderStageFlags(0);
    /// Vertex stage.
    pub const VERTEX: ShaderStageFlags = ShaderStageFlags(0x01);
    /// Tessellation control stage.
    pub const TESS_CONTROL: ShaderStageFlags = ShaderStageFlags(0x02);
    /// Tessellation evaluation stage.
    pub const TESS_EVAL: ShaderStageFlags = ShaderStageFlags(0x04);
    /// Geometry stage.
    pub const GEOMETRY: ShaderStageFlags = ShaderStageFlags(0x08);
    /// Fragment stage.
    pub const FRAGMENT: ShaderStageFlags = ShaderStageFlags(0x10);
    /// Compute stage.
    pub const COMPUTE: ShaderStageFlags = ShaderStageFlags(0x20);
    /// All graphics stages.
    pub const ALL_GRAPHICS: ShaderStageFlags = ShaderStageFlags(0x1F);
    /// All stages.
    pub const ALL: ShaderStageFlags = ShaderStageFlags(0x3F);

    /// True if every bit of `other` is set in `self`.
    pub fn contains(self, other: ShaderStageFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ShaderStageFlags {
    type Output = ShaderStageFlags;

    fn bitor(self, rhs: ShaderStageFlags) -> ShaderStageFlags {
        ShaderStageFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShaderStageFlags {
    fn bitor_assign(&mut self, rhs: ShaderStageFlags) {
        self.0 |= rhs.0;
    }
}

/// The resource class a descriptor binding holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorType {
    /// Standalone sampler.
    Sampler = 0,
    /// Combined image and sampler.
    CombinedImageSampler = 1,
    /// Sampled image.
    SampledImage = 2,
    /// Storage image.
    StorageImage = 3,
    /// Uniform texel buffer.
    UniformTexelBuffer = 4,
    /// Storage texel buffer.
    StorageTexelBuffer = 5,
    /// Uniform buffer.
    UniformBuffer = 6,
    /// Storage buffer.
    StorageBuffer = 7,
    /// Uniform buffer with a dynamic offset.
    UniformBufferDynamic = 8,
    /// Storage buffer with a dynamic offset.
    StorageBufferDynamic = 9,
    /// Input attachment.
    InputAttachment = 10,
}

impl DescriptorType {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Sampler),
            1 => Some(Self::CombinedImageSampler),
            2 => Some(Self::SampledImage),
            3 => Some(Self::StorageImage),
            4 => Some(Self::UniformTexelBuffer),
            5 => Some(Self::StorageTexelBuffer),
            6 => Some(Self::UniformBuffer),
            7 => Some(Self::StorageBuffer),
            8 => Some(Self::UniformBufferDynamic),
            9 => Some(Self::StorageBufferDynamic),
            10 => Some(Self::InputAttachment),
            _ => None,
        }
    }
}

/// One binding slot within a descriptor set layout.
///
/// `immutable_samplers` is the only place a set layout references another
/// object: a non-empty list pins one sampler per descriptor in the
/// binding. The handles are dependency edges and are replaced by sampler
/// content hashes in the serialized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorSetLayoutBinding {
    /// Binding slot number.
    pub binding: u32,
    /// Resource class held by this binding.
    pub descriptor_type: DescriptorType,
    /// Number of descriptors in the binding (array size).
    pub descriptor_count: u32,
    /// Stages that may access the binding.
    pub stages: ShaderStageFlags,
    /// Immutable samplers, one per descriptor, or empty for none.
    pub immutable_samplers: Vec<SamplerHandle>,
}

/// Optional extension entry attached to a [`DescriptorSetLayoutDesc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetLayoutExt {
    /// Per-binding flag words, parallel to the binding list.
    BindingFlags(Vec<u32>),
}

/// Full creation-time description of a descriptor set layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorSetLayoutDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// Bindings in declaration order. Order is significant: two layouts
    /// listing the same bindings in different order are distinct objects.
    pub bindings: Vec<DescriptorSetLayoutBinding>,
    /// Optional extension chain, in traversal order.
    pub extensions: Vec<SetLayoutExt>,
}

/// A push-constant range within a pipeline layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushConstantRange {
    /// Stages that may read the range.
    pub stages: ShaderStageFlags,
    /// Byte offset of the range.
    pub offset: u32,
    /// Byte size of the range.
    pub size: u32,
}

/// Full creation-time description of a pipeline layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineLayoutDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// Descriptor set layouts by set index. Dependency edges.
    pub set_layouts: Vec<DescriptorSetLayoutHandle>,
    /// Push-constant ranges in declaration order.
    pub push_constant_ranges: Vec<PushConstantRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_flags_combine() {
        let mask = ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT;
        assert!(mask.contains(ShaderStageFlags::VERTEX));
        assert!(mask.contains(ShaderStageFlags::FRAGMENT));
        assert!(!mask.contains(ShaderStageFlags::COMPUTE));
        assert!(ShaderStageFlags::ALL_GRAPHICS.contains(mask));
    }

    #[test]
    fn descriptor_type_from_raw_covers_range() {
        for v in 0..=10u32 {
            assert!(DescriptorType::from_raw(v).is_some());
        }
        assert_eq!(DescriptorType::from_raw(11), None);
    }
}
