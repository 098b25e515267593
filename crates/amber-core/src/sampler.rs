//! Sampler create-descriptions.

/// Texel filtering mode for magnification and minification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Nearest-texel sampling.
    Nearest = 0,
    /// Linear interpolation between texels.
    Linear = 1,
}

impl Filter {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Nearest),
            1 => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Mipmap level selection mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipmapMode {
    /// Snap to the nearest mip level.
    Nearest = 0,
    /// Blend between adjacent mip levels.
    Linear = 1,
}

impl MipmapMode {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Nearest),
            1 => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Addressing mode for texture coordinates outside `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// Tile the texture.
    Repeat = 0,
    /// Tile with every other repetition mirrored.
    MirroredRepeat = 1,
    /// Clamp to the edge texel.
    ClampToEdge = 2,
    /// Clamp to the border color.
    ClampToBorder = 3,
}

impl AddressMode {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Repeat),
            1 => Some(Self::MirroredRepeat),
            2 => Some(Self::ClampToEdge),
            3 => Some(Self::ClampToBorder),
            _ => None,
        }
    }
}

/// Predefined border color for [`AddressMode::ClampToBorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderColor {
    /// `(0, 0, 0, 0)`.
    TransparentBlack = 0,
    /// `(0, 0, 0, 1)`.
    OpaqueBlack = 1,
    /// `(1, 1, 1, 1)`.
    OpaqueWhite = 2,
}

impl BorderColor {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::TransparentBlack),
            1 => Some(Self::OpaqueBlack),
            2 => Some(Self::OpaqueWhite),
            _ => None,
        }
    }
}

/// Comparison operator, used by depth-compare samplers and depth/stencil
/// pipeline state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// Comparison never passes.
    Never = 0,
    /// Passes when `new < old`.
    Less = 1,
    /// Passes when `new == old`.
    Equal = 2,
    /// Passes when `new <= old`.
    LessOrEqual = 3,
    /// Passes when `new > old`.
    Greater = 4,
    /// Passes when `new != old`.
    NotEqual = 5,
    /// Passes when `new >= old`.
    GreaterOrEqual = 6,
    /// Comparison always passes.
    Always = 7,
}

impl CompareOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Never),
            1 => Some(Self::Less),
            2 => Some(Self::Equal),
            3 => Some(Self::LessOrEqual),
            4 => Some(Self::Greater),
            5 => Some(Self::NotEqual),
            6 => Some(Self::GreaterOrEqual),
            7 => Some(Self::Always),
            _ => None,
        }
    }
}

/// Filter reduction mode, attached through [`SamplerExt::ReductionMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReductionMode {
    /// Weighted average of covered texels (the default behavior).
    WeightedAverage = 0,
    /// Component-wise minimum.
    Min = 1,
    /// Component-wise maximum.
    Max = 2,
}

impl ReductionMode {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::WeightedAverage),
            1 => Some(Self::Min),
            2 => Some(Self::Max),
            _ => None,
        }
    }
}

/// Optional extension entry attached to a [`SamplerDesc`].
///
/// Extensions are hashed and serialized in chain order; an empty chain is
/// encoded as an explicit zero count so that "no extensions" has its own
/// stable identity.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplerExt {
    /// Override the filter reduction mode.
    ReductionMode(ReductionMode),
    /// Custom border color, replacing the predefined [`BorderColor`].
    CustomBorderColor {
        /// RGBA border color components.
        color: [f32; 4],
    },
}

/// Full creation-time description of a sampler.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerDesc {
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Minification filter.
    pub min_filter: Filter,
    /// Mipmap selection mode.
    pub mipmap_mode: MipmapMode,
    /// Addressing mode for the U coordinate.
    pub address_mode_u: AddressMode,
    /// Addressing mode for the V coordinate.
    pub address_mode_v: AddressMode,
    /// Addressing mode for the W coordinate.
    pub address_mode_w: AddressMode,
    /// Bias added to the computed level of detail.
    pub mip_lod_bias: f32,
    /// Maximum anisotropy, or `None` when anisotropic filtering is off.
    pub max_anisotropy: Option<f32>,
    /// Depth-compare operator, or `None` for an ordinary sampler.
    pub compare_op: Option<CompareOp>,
    /// Minimum level of detail clamp.
    pub min_lod: f32,
    /// Maximum level of detail clamp.
    pub max_lod: f32,
    /// Border color for [`AddressMode::ClampToBorder`].
    pub border_color: BorderColor,
    /// Use unnormalized texel coordinates.
    pub unnormalized_coordinates: bool,
    /// Optional extension chain, in traversal order.
    pub extensions: Vec<SamplerExt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_out_of_range() {
        assert_eq!(Filter::from_raw(2), None);
        assert_eq!(AddressMode::from_raw(4), None);
        assert_eq!(BorderColor::from_raw(3), None);
        assert_eq!(CompareOp::from_raw(8), None);
        assert_eq!(ReductionMode::from_raw(3), None);
    }

    #[test]
    fn from_raw_matches_discriminant() {
        assert_eq!(CompareOp::from_raw(CompareOp::Greater as u32), Some(CompareOp::Greater));
        assert_eq!(
            AddressMode::from_raw(AddressMode::ClampToBorder as u32),
            Some(AddressMode::ClampToBorder)
        );
    }
}
