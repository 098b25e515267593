//! Content hashes, per-kind handle newtypes, and [`ObjectKind`].

use smallvec::SmallVec;
use std::fmt;

/// 64-bit content hash of an object's create-description.
///
/// Derived solely from the description's content and the content hashes
/// of every referenced sub-object — never from backend-assigned handle
/// values. Two descriptions with identical content (transitively, through
/// their dependency subgraphs) always produce the same `Hash`. Hashes are
/// the only cross-object reference that survives serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub u64);

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<u64> for Hash {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Ordered list of dependency hashes for one object record.
///
/// Uses `SmallVec<[Hash; 8]>` since real pipeline graphs rarely exceed
/// eight edges per record (a graphics pipeline references its layout,
/// render pass, and a handful of shader modules). Larger records spill
/// to the heap transparently.
pub type DepList = SmallVec<[Hash; 8]>;

/// Backend handle for a sampler object.
///
/// Handle values are assigned by the backend at creation time and are not
/// reproducible across sessions. They are never hashed and never
/// serialized — the recorder translates them to content hashes through
/// its handle map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerHandle(pub u64);

impl fmt::Display for SamplerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for SamplerHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a shader module object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderModuleHandle(pub u64);

impl fmt::Display for ShaderModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for ShaderModuleHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a descriptor-set-layout object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorSetLayoutHandle(pub u64);

impl fmt::Display for DescriptorSetLayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for DescriptorSetLayoutHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a pipeline-layout object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineLayoutHandle(pub u64);

impl fmt::Display for PipelineLayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for PipelineLayoutHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a render-pass object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderPassHandle(pub u64);

impl fmt::Display for RenderPassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for RenderPassHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a compute pipeline object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputePipelineHandle(pub u64);

impl fmt::Display for ComputePipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for ComputePipelineHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Backend handle for a graphics pipeline object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicsPipelineHandle(pub u64);

impl fmt::Display for GraphicsPipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for GraphicsPipelineHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// The closed set of object kinds the capture format understands.
///
/// Discriminants are the wire tags written before each blob section and
/// must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Texture sampler.
    Sampler = 0,
    /// Shader module (code words).
    ShaderModule = 1,
    /// Descriptor set layout; may reference samplers.
    DescriptorSetLayout = 2,
    /// Pipeline layout; references descriptor set layouts.
    PipelineLayout = 3,
    /// Render pass.
    RenderPass = 4,
    /// Compute pipeline; references a shader module and a pipeline layout.
    ComputePipeline = 5,
    /// Graphics pipeline; references shader modules, a pipeline layout,
    /// and a render pass.
    GraphicsPipeline = 6,
}

impl ObjectKind {
    /// Every kind, in the canonical decode order.
    ///
    /// Kinds with no object dependencies come before the kinds that
    /// reference them, so a single forward pass over a blob always sees
    /// dependencies before dependents. Serialization uses the same order.
    pub const DECODE_ORDER: [ObjectKind; 7] = [
        ObjectKind::Sampler,
        ObjectKind::ShaderModule,
        ObjectKind::DescriptorSetLayout,
        ObjectKind::PipelineLayout,
        ObjectKind::RenderPass,
        ObjectKind::ComputePipeline,
        ObjectKind::GraphicsPipeline,
    ];

    /// Wire tag for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a wire tag back into a kind.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Sampler),
            1 => Some(Self::ShaderModule),
            2 => Some(Self::DescriptorSetLayout),
            3 => Some(Self::PipelineLayout),
            4 => Some(Self::RenderPass),
            5 => Some(Self::ComputePipeline),
            6 => Some(Self::GraphicsPipeline),
            _ => None,
        }
    }

    /// Lower-case display name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sampler => "sampler",
            Self::ShaderModule => "shader module",
            Self::DescriptorSetLayout => "descriptor set layout",
            Self::PipelineLayout => "pipeline layout",
            Self::RenderPass => "render pass",
            Self::ComputePipeline => "compute pipeline",
            Self::GraphicsPipeline => "graphics pipeline",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrips_for_every_kind() {
        for kind in ObjectKind::DECODE_ORDER {
            assert_eq!(ObjectKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ObjectKind::from_tag(7), None);
        assert_eq!(ObjectKind::from_tag(255), None);
    }

    #[test]
    fn decode_order_lists_dependencies_first() {
        let pos = |k: ObjectKind| {
            ObjectKind::DECODE_ORDER
                .iter()
                .position(|&o| o == k)
                .unwrap()
        };
        assert!(pos(ObjectKind::Sampler) < pos(ObjectKind::DescriptorSetLayout));
        assert!(pos(ObjectKind::DescriptorSetLayout) < pos(ObjectKind::PipelineLayout));
        assert!(pos(ObjectKind::PipelineLayout) < pos(ObjectKind::ComputePipeline));
        assert!(pos(ObjectKind::ShaderModule) < pos(ObjectKind::ComputePipeline));
        assert!(pos(ObjectKind::RenderPass) < pos(ObjectKind::GraphicsPipeline));
    }

    #[test]
    fn hash_displays_as_full_width_hex() {
        assert_eq!(Hash(0xDEAD).to_string(), "0x000000000000dead");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn from_tag_accepts_exactly_the_seven_tags(tag in any::<u8>()) {
                match ObjectKind::from_tag(tag) {
                    Some(kind) => prop_assert_eq!(kind.tag(), tag),
                    None => prop_assert!(tag > 6),
                }
            }
        }
    }
}
