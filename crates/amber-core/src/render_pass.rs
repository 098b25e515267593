//! Render-pass create-descriptions.

/// Pixel format code.
///
/// `u32` newtype with named constants for the formats the test corpus and
/// fixtures use; backends may pass any code and it is preserved verbatim
/// through the hash and the wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format(pub u32);

impl Format {
    /// Format not specified.
    pub const UNDEFINED: Format = Format(0);
    /// 8-bit RGBA, unsigned normalized.
    pub const R8G8B8A8_UNORM: Format = Format(1);
    /// 8-bit BGRA, unsigned normalized.
    pub const B8G8R8A8_UNORM: Format = Format(2);
    /// 16-bit float RGBA.
    pub const R16G16B16A16_SFLOAT: Format = Format(3);
    /// 32-bit float RGBA.
    pub const R32G32B32A32_SFLOAT: Format = Format(4);
    /// 32-bit float RG.
    pub const R32G32_SFLOAT: Format = Format(5);
    /// 24-bit depth with 8-bit stencil.
    pub const D24_UNORM_S8_UINT: Format = Format(6);
    /// 32-bit float depth.
    pub const D32_SFLOAT: Format = Format(7);
}

/// Image layout an attachment is in at a subpass boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageLayout(pub u32);

impl ImageLayout {
    /// Contents undefined.
    pub const UNDEFINED: ImageLayout = ImageLayout(0);
    /// General-purpose layout.
    pub const GENERAL: ImageLayout = ImageLayout(1);
    /// Optimal for color attachment writes.
    pub const COLOR_ATTACHMENT: ImageLayout = ImageLayout(2);
    /// Optimal for depth/stencil attachment writes.
    pub const DEPTH_STENCIL_ATTACHMENT: ImageLayout = ImageLayout(3);
    /// Read-only depth/stencil.
    pub const DEPTH_STENCIL_READ_ONLY: ImageLayout = ImageLayout(4);
    /// Read-only shader access.
    pub const SHADER_READ_ONLY: ImageLayout = ImageLayout(5);
    /// Transfer source.
    pub const TRANSFER_SRC: ImageLayout = ImageLayout(6);
    /// Transfer destination.
    pub const TRANSFER_DST: ImageLayout = ImageLayout(7);
    /// Presentation source.
    pub const PRESENT: ImageLayout = ImageLayout(8);
}

/// What happens to an attachment's contents when a render pass begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOp {
    /// Preserve the existing contents.
    Load = 0,
    /// Clear to a pass-supplied value.
    Clear = 1,
    /// Contents need not be preserved.
    DontCare = 2,
}

impl LoadOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Load),
            1 => Some(Self::Clear),
            2 => Some(Self::DontCare),
            _ => None,
        }
    }
}

/// What happens to an attachment's contents when a render pass ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    /// Write results to memory.
    Store = 0,
    /// Results need not be written.
    DontCare = 1,
}

impl StoreOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Store),
            1 => Some(Self::DontCare),
            _ => None,
        }
    }
}

/// One attachment slot of a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// Pixel format.
    pub format: Format,
    /// Sample count (1 for single-sampled).
    pub samples: u32,
    /// Color/depth load behavior.
    pub load_op: LoadOp,
    /// Color/depth store behavior.
    pub store_op: StoreOp,
    /// Stencil load behavior.
    pub stencil_load_op: LoadOp,
    /// Stencil store behavior.
    pub stencil_store_op: StoreOp,
    /// Layout when the pass begins.
    pub initial_layout: ImageLayout,
    /// Layout when the pass ends.
    pub final_layout: ImageLayout,
}

/// Reference from a subpass to an attachment slot.
///
/// `attachment` is `None` for an intentionally unused slot (e.g. a resolve
/// position with nothing to resolve into).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Index into [`RenderPassDesc::attachments`], or `None` when unused.
    pub attachment: Option<u32>,
    /// Layout the attachment is in during the subpass.
    pub layout: ImageLayout,
}

/// One subpass of a render pass.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SubpassDesc {
    /// Input attachment references.
    pub input_attachments: Vec<AttachmentRef>,
    /// Color attachment references.
    pub color_attachments: Vec<AttachmentRef>,
    /// Resolve references; either empty or parallel to `color_attachments`.
    pub resolve_attachments: Vec<AttachmentRef>,
    /// Depth/stencil reference, if the subpass uses one.
    pub depth_stencil_attachment: Option<AttachmentRef>,
    /// Attachment indices whose contents must be preserved across the
    /// subpass without being accessed.
    pub preserve_attachments: Vec<u32>,
}

/// Execution/memory dependency between two subpasses.
///
/// `None` endpoints denote a dependency on operations outside the render
/// pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubpassDependency {
    /// Source subpass index, or `None` for external.
    pub src_subpass: Option<u32>,
    /// Destination subpass index, or `None` for external.
    pub dst_subpass: Option<u32>,
    /// Source pipeline stage mask.
    pub src_stage_mask: u32,
    /// Destination pipeline stage mask.
    pub dst_stage_mask: u32,
    /// Source access mask.
    pub src_access_mask: u32,
    /// Destination access mask.
    pub dst_access_mask: u32,
    /// Dependency flag bits, preserved verbatim.
    pub flags: u32,
}

/// Optional extension entry attached to a [`RenderPassDesc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderPassExt {
    /// Multiview rendering configuration.
    Multiview {
        /// Per-subpass view masks.
        view_masks: Vec<u32>,
        /// Correlation masks for concurrently rendered views.
        correlation_masks: Vec<u32>,
    },
}

/// Full creation-time description of a render pass.
///
/// Render passes reference no other objects; all cross-references are
/// indices into their own attachment list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPassDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// Attachment slots.
    pub attachments: Vec<AttachmentDesc>,
    /// Subpasses in execution order.
    pub subpasses: Vec<SubpassDesc>,
    /// Inter-subpass dependencies.
    pub dependencies: Vec<SubpassDependency>,
    /// Optional extension chain, in traversal order.
    pub extensions: Vec<RenderPassExt>,
}
