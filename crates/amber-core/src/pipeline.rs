//! Graphics and compute pipeline create-descriptions.

use crate::id::{PipelineLayoutHandle, RenderPassHandle};
use crate::render_pass::Format;
use crate::sampler::CompareOp;
use crate::shader::StageDesc;

/// Rate at which a vertex buffer binding advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexInputRate {
    /// Advance per vertex.
    Vertex = 0,
    /// Advance per instance.
    Instance = 1,
}

impl VertexInputRate {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Vertex),
            1 => Some(Self::Instance),
            _ => None,
        }
    }
}

/// One vertex buffer binding slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexBinding {
    /// Binding slot number.
    pub binding: u32,
    /// Byte stride between consecutive elements.
    pub stride: u32,
    /// Per-vertex or per-instance advance.
    pub input_rate: VertexInputRate,
}

/// One vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Source binding slot.
    pub binding: u32,
    /// Attribute data format.
    pub format: Format,
    /// Byte offset within the binding's element.
    pub offset: u32,
}

/// Vertex input state: bindings plus attributes, both order-significant.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct VertexInputState {
    /// Vertex buffer bindings.
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes.
    pub attributes: Vec<VertexAttribute>,
}

/// Primitive assembly topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Separate points.
    PointList = 0,
    /// Separate lines.
    LineList = 1,
    /// Connected lines.
    LineStrip = 2,
    /// Separate triangles.
    TriangleList = 3,
    /// Connected triangles sharing an edge.
    TriangleStrip = 4,
    /// Triangles sharing the first vertex.
    TriangleFan = 5,
}

impl PrimitiveTopology {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::PointList),
            1 => Some(Self::LineList),
            2 => Some(Self::LineStrip),
            3 => Some(Self::TriangleList),
            4 => Some(Self::TriangleStrip),
            5 => Some(Self::TriangleFan),
            _ => None,
        }
    }
}

/// Input assembly state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputAssemblyState {
    /// Assembly topology.
    pub topology: PrimitiveTopology,
    /// Restart strips/fans at the sentinel index value.
    pub primitive_restart: bool,
}

/// A viewport rectangle with depth range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near depth bound.
    pub min_depth: f32,
    /// Far depth bound.
    pub max_depth: f32,
}

/// An integer scissor rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect2D {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Viewport state.
///
/// When viewports or scissors are dynamic, the lists are empty and only
/// the counts are meaningful.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ViewportState {
    /// Number of viewports the pipeline uses.
    pub viewport_count: u32,
    /// Number of scissors the pipeline uses.
    pub scissor_count: u32,
    /// Static viewports, or empty when dynamic.
    pub viewports: Vec<Viewport>,
    /// Static scissors, or empty when dynamic.
    pub scissors: Vec<Rect2D>,
}

/// Triangle fill mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    /// Fill polygons.
    Fill = 0,
    /// Draw edges only.
    Line = 1,
    /// Draw vertices only.
    Point = 2,
}

impl PolygonMode {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Fill),
            1 => Some(Self::Line),
            2 => Some(Self::Point),
            _ => None,
        }
    }
}

/// Face culling mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CullMode(pub u32);

impl CullMode {
    /// Cull nothing.
    pub const NONE: CullMode = CullMode(0);
    /// Cull front faces.
    pub const FRONT: CullMode = CullMode(1);
    /// Cull back faces.
    pub const BACK: CullMode = CullMode(2);
    /// Cull everything.
    pub const FRONT_AND_BACK: CullMode = CullMode(3);
}

/// Which winding order is considered front-facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontFace {
    /// Counter-clockwise winding is front-facing.
    CounterClockwise = 0,
    /// Clockwise winding is front-facing.
    Clockwise = 1,
}

impl FrontFace {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::CounterClockwise),
            1 => Some(Self::Clockwise),
            _ => None,
        }
    }
}

/// Depth bias parameters, present only when bias is enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthBias {
    /// Constant factor added to each fragment's depth.
    pub constant_factor: f32,
    /// Maximum (or minimum) bias applied.
    pub clamp: f32,
    /// Factor applied to the fragment's slope.
    pub slope_factor: f32,
}

/// Rasterization state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterizationState {
    /// Clamp fragment depth instead of clipping.
    pub depth_clamp: bool,
    /// Discard all primitives before rasterization.
    pub rasterizer_discard: bool,
    /// Polygon fill mode.
    pub polygon_mode: PolygonMode,
    /// Face culling mask.
    pub cull_mode: CullMode,
    /// Front-face winding.
    pub front_face: FrontFace,
    /// Depth bias, or `None` when disabled.
    pub depth_bias: Option<DepthBias>,
    /// Rasterized line width.
    pub line_width: f32,
}

/// Multisample state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultisampleState {
    /// Samples per pixel (1 for single-sampled).
    pub rasterization_samples: u32,
    /// Minimum sample shading fraction, or `None` when disabled.
    pub sample_shading: Option<f32>,
    /// Static sample mask, or `None` for all-ones.
    pub sample_mask: Option<u64>,
    /// Derive coverage from the fragment's alpha.
    pub alpha_to_coverage: bool,
    /// Force the fragment's alpha to one.
    pub alpha_to_one: bool,
}

/// Stencil buffer operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilOp {
    /// Keep the current value.
    Keep = 0,
    /// Set to zero.
    Zero = 1,
    /// Replace with the reference value.
    Replace = 2,
    /// Increment, clamping at maximum.
    IncrementAndClamp = 3,
    /// Decrement, clamping at zero.
    DecrementAndClamp = 4,
    /// Bitwise invert.
    Invert = 5,
    /// Increment with wraparound.
    IncrementAndWrap = 6,
    /// Decrement with wraparound.
    DecrementAndWrap = 7,
}

impl StencilOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Keep),
            1 => Some(Self::Zero),
            2 => Some(Self::Replace),
            3 => Some(Self::IncrementAndClamp),
            4 => Some(Self::DecrementAndClamp),
            5 => Some(Self::Invert),
            6 => Some(Self::IncrementAndWrap),
            7 => Some(Self::DecrementAndWrap),
            _ => None,
        }
    }
}

/// Per-face stencil configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilOpState {
    /// Operation when the stencil test fails.
    pub fail_op: StencilOp,
    /// Operation when both stencil and depth tests pass.
    pub pass_op: StencilOp,
    /// Operation when the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOp,
    /// Stencil comparison operator.
    pub compare_op: CompareOp,
    /// Comparison mask.
    pub compare_mask: u32,
    /// Write mask.
    pub write_mask: u32,
    /// Reference value.
    pub reference: u32,
}

/// Front and back stencil configuration, present when stencil testing is
/// enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilTest {
    /// Front-facing configuration.
    pub front: StencilOpState,
    /// Back-facing configuration.
    pub back: StencilOpState,
}

/// Depth-bounds test range, present when the test is enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthBounds {
    /// Minimum bound.
    pub min: f32,
    /// Maximum bound.
    pub max: f32,
}

/// Depth/stencil state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthStencilState {
    /// Enable the depth test.
    pub depth_test: bool,
    /// Enable depth writes.
    pub depth_write: bool,
    /// Depth comparison operator.
    pub depth_compare_op: CompareOp,
    /// Depth bounds test, or `None` when disabled.
    pub depth_bounds: Option<DepthBounds>,
    /// Stencil test, or `None` when disabled.
    pub stencil: Option<StencilTest>,
}

/// Blend multiplication factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    /// `0`.
    Zero = 0,
    /// `1`.
    One = 1,
    /// Source color.
    SrcColor = 2,
    /// One minus source color.
    OneMinusSrcColor = 3,
    /// Destination color.
    DstColor = 4,
    /// One minus destination color.
    OneMinusDstColor = 5,
    /// Source alpha.
    SrcAlpha = 6,
    /// One minus source alpha.
    OneMinusSrcAlpha = 7,
    /// Destination alpha.
    DstAlpha = 8,
    /// One minus destination alpha.
    OneMinusDstAlpha = 9,
    /// Constant color.
    ConstantColor = 10,
    /// One minus constant color.
    OneMinusConstantColor = 11,
    /// Saturated source alpha.
    SrcAlphaSaturate = 12,
}

impl BlendFactor {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::SrcColor),
            3 => Some(Self::OneMinusSrcColor),
            4 => Some(Self::DstColor),
            5 => Some(Self::OneMinusDstColor),
            6 => Some(Self::SrcAlpha),
            7 => Some(Self::OneMinusSrcAlpha),
            8 => Some(Self::DstAlpha),
            9 => Some(Self::OneMinusDstAlpha),
            10 => Some(Self::ConstantColor),
            11 => Some(Self::OneMinusConstantColor),
            12 => Some(Self::SrcAlphaSaturate),
            _ => None,
        }
    }
}

/// Blend combination operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    /// `src + dst`.
    Add = 0,
    /// `src - dst`.
    Subtract = 1,
    /// `dst - src`.
    ReverseSubtract = 2,
    /// Component-wise minimum.
    Min = 3,
    /// Component-wise maximum.
    Max = 4,
}

impl BlendOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Add),
            1 => Some(Self::Subtract),
            2 => Some(Self::ReverseSubtract),
            3 => Some(Self::Min),
            4 => Some(Self::Max),
            _ => None,
        }
    }
}

/// Framebuffer logical operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    /// All zeros.
    Clear = 0,
    /// `src & dst`.
    And = 1,
    /// `src`.
    Copy = 2,
    /// `src ^ dst`.
    Xor = 3,
    /// `src | dst`.
    Or = 4,
    /// `dst`.
    NoOp = 5,
    /// `!dst`.
    Invert = 6,
    /// All ones.
    Set = 7,
}

impl LogicOp {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Clear),
            1 => Some(Self::And),
            2 => Some(Self::Copy),
            3 => Some(Self::Xor),
            4 => Some(Self::Or),
            5 => Some(Self::NoOp),
            6 => Some(Self::Invert),
            7 => Some(Self::Set),
            _ => None,
        }
    }
}

/// Mask of color components written to an attachment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorWriteMask(pub u32);

impl ColorWriteMask {
    /// Red.
    pub const R: ColorWriteMask = ColorWriteMask(0x1);
    /// Green.
    pub const G: ColorWriteMask = ColorWriteMask(0x2);
    /// Blue.
    pub const B: ColorWriteMask = ColorWriteMask(0x4);
    /// Alpha.
    pub const A: ColorWriteMask = ColorWriteMask(0x8);
    /// All components.
    pub const ALL: ColorWriteMask = ColorWriteMask(0xF);
}

/// Blend equation for one attachment, present when blending is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendEquation {
    /// Source color factor.
    pub src_color_factor: BlendFactor,
    /// Destination color factor.
    pub dst_color_factor: BlendFactor,
    /// Color combination operator.
    pub color_op: BlendOp,
    /// Source alpha factor.
    pub src_alpha_factor: BlendFactor,
    /// Destination alpha factor.
    pub dst_alpha_factor: BlendFactor,
    /// Alpha combination operator.
    pub alpha_op: BlendOp,
}

/// Per-attachment blend configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendAttachment {
    /// Blend equation, or `None` when blending is disabled.
    pub blend: Option<BlendEquation>,
    /// Component write mask.
    pub color_write_mask: ColorWriteMask,
}

/// Color blend state for all attachments of the subpass.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBlendState {
    /// Logical operation, or `None` when disabled.
    pub logic_op: Option<LogicOp>,
    /// Per-attachment configuration, parallel to the subpass's color
    /// attachments.
    pub attachments: Vec<BlendAttachment>,
    /// RGBA blend constants.
    pub blend_constants: [f32; 4],
}

/// A pipeline state that is set at draw time rather than baked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicState {
    /// Viewport rectangles.
    Viewport = 0,
    /// Scissor rectangles.
    Scissor = 1,
    /// Line width.
    LineWidth = 2,
    /// Depth bias parameters.
    DepthBias = 3,
    /// Blend constants.
    BlendConstants = 4,
    /// Depth bounds range.
    DepthBounds = 5,
    /// Stencil compare mask.
    StencilCompareMask = 6,
    /// Stencil write mask.
    StencilWriteMask = 7,
    /// Stencil reference value.
    StencilReference = 8,
}

impl DynamicState {
    /// Decode a wire discriminant.
    pub fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Viewport),
            1 => Some(Self::Scissor),
            2 => Some(Self::LineWidth),
            3 => Some(Self::DepthBias),
            4 => Some(Self::BlendConstants),
            5 => Some(Self::DepthBounds),
            6 => Some(Self::StencilCompareMask),
            7 => Some(Self::StencilWriteMask),
            8 => Some(Self::StencilReference),
            _ => None,
        }
    }
}

/// Full creation-time description of a graphics pipeline.
///
/// References shader modules (through its stages), a pipeline layout, and
/// a render pass — all dependency edges that serialize as content hashes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsPipelineDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// Programmable stages in pipeline order.
    pub stages: Vec<StageDesc>,
    /// Vertex input state.
    pub vertex_input: VertexInputState,
    /// Input assembly state.
    pub input_assembly: InputAssemblyState,
    /// Patch control points, or `None` when tessellation is unused.
    pub tessellation_control_points: Option<u32>,
    /// Viewport state.
    pub viewport: ViewportState,
    /// Rasterization state.
    pub rasterization: RasterizationState,
    /// Multisample state.
    pub multisample: MultisampleState,
    /// Depth/stencil state, or `None` when the subpass has no
    /// depth/stencil attachment.
    pub depth_stencil: Option<DepthStencilState>,
    /// Color blend state, or `None` when rasterization is discarded or
    /// the subpass has no color attachments.
    pub color_blend: Option<ColorBlendState>,
    /// States set dynamically at draw time.
    pub dynamic_states: Vec<DynamicState>,
    /// Pipeline layout. Dependency edge.
    pub layout: PipelineLayoutHandle,
    /// Render pass the pipeline executes in. Dependency edge.
    pub render_pass: RenderPassHandle,
    /// Subpass index within the render pass.
    pub subpass: u32,
}

/// Full creation-time description of a compute pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputePipelineDesc {
    /// Creation flag bits, preserved verbatim.
    pub flags: u32,
    /// The single compute stage.
    pub stage: StageDesc,
    /// Pipeline layout. Dependency edge.
    pub layout: PipelineLayoutHandle,
}
