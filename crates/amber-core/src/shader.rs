//! Shader modules and pipeline shader stages.

use crate::id::ShaderModuleHandle;

/// Full creation-time description of a shader module.
///
/// The code payload is an opaque sequence of 32-bit words. It is by far
/// the largest variable-length data in a typical capture, which is why
/// recorded copies live in the arena rather than on the general heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderModuleDesc {
    /// Shader code words.
    pub code: Vec<u32>,
}

/// A single programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex = 0,
    /// Tessellation control stage.
    TessControl = 1,
    /// Tessellation evaluation stage.
    TessEval = 2,
    /// Geometry stage.
    Geometry = 3,
    /// Fragment stage.
    Fragment = 4,
    /// Compute stage.
    Compute = 5,
}

impl ShaderStage {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Vertex),
            1 => Some(Self::TessControl),
            2 => Some(Self::TessEval),
            3 => Some(Self::Geometry),
            4 => Some(Self::Fragment),
            5 => Some(Self::Compute),
            _ => None,
        }
    }
}

/// One specialization constant override for a pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecConstant {
    /// Constant ID declared in the shader.
    pub id: u32,
    /// Raw value bits, zero-extended to 64 bits.
    pub value: u64,
}

/// A shader stage as referenced by a pipeline description.
///
/// The `module` field is a backend handle at record time; in the
/// serialized form it is replaced by the module's content hash, and at
/// replay time it is rewritten to the handle the creation backend
/// produced for that hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDesc {
    /// Which stage this is.
    pub stage: ShaderStage,
    /// The shader module providing the stage's code.
    pub module: ShaderModuleHandle,
    /// Entry point name within the module.
    pub entry_point: String,
    /// Specialization constant overrides, in declaration order.
    pub spec_constants: Vec<SpecConstant>,
}
