//! Canonical binary encoding of create-descriptions.
//!
//! All integers are little-endian, floats are raw LE bit patterns,
//! strings and arrays are `u32`-length-prefixed, and optional values use
//! a one-byte presence flag. There is no padding and no self-describing
//! schema; the layout below is the format.
//!
//! The encoding does double duty: it is the payload stored in a
//! serialized blob, *and* it is the preimage of the content hash (FNV-1a
//! over exactly these bytes, see [`crate::hash`]). A single traversal
//! implementation therefore defines both, and they cannot drift apart.
//!
//! Fields that reference another object encode the referenced record's
//! content hash (`u64`), obtained through a [`HandleResolver`] on the
//! record side and rewritten back into a live handle through a
//! [`RefResolver`] on the replay side. Extension chains encode as a
//! `u32` entry count followed by tagged entries; an absent chain is the
//! explicit zero count, so "no extensions" has its own stable identity
//! instead of colliding with a skipped field.

use amber_core::id::{
    DepList, DescriptorSetLayoutHandle, Hash, PipelineLayoutHandle, RenderPassHandle,
    SamplerHandle, ShaderModuleHandle,
};
use amber_core::layout::{
    DescriptorSetLayoutBinding, DescriptorSetLayoutDesc, DescriptorType, PipelineLayoutDesc,
    PushConstantRange, SetLayoutExt, ShaderStageFlags,
};
use amber_core::pipeline::{
    BlendAttachment, BlendEquation, BlendFactor, BlendOp, ColorBlendState, ColorWriteMask,
    ComputePipelineDesc, CullMode, DepthBias, DepthBounds, DepthStencilState, DynamicState,
    FrontFace, GraphicsPipelineDesc, InputAssemblyState, LogicOp, MultisampleState, PolygonMode,
    PrimitiveTopology, RasterizationState, Rect2D, StencilOp, StencilOpState, StencilTest,
    VertexAttribute, VertexBinding, VertexInputRate, VertexInputState, Viewport, ViewportState,
};
use amber_core::render_pass::{
    AttachmentDesc, AttachmentRef, Format, ImageLayout, LoadOp, RenderPassDesc, RenderPassExt,
    StoreOp, SubpassDependency, SubpassDesc,
};
use amber_core::sampler::{
    AddressMode, BorderColor, CompareOp, Filter, MipmapMode, ReductionMode, SamplerDesc,
    SamplerExt,
};
use amber_core::shader::{
    ShaderModuleDesc, ShaderStage, SpecConstant, StageDesc,
};
use amber_core::ObjectKind;

use crate::error::{RecordError, ReplayError};

// ── Extension chain entry tags ──────────────────────────────────

/// Tag for [`SamplerExt::ReductionMode`].
pub const EXT_SAMPLER_REDUCTION_MODE: u32 = 1;
/// Tag for [`SamplerExt::CustomBorderColor`].
pub const EXT_SAMPLER_CUSTOM_BORDER_COLOR: u32 = 2;
/// Tag for [`SetLayoutExt::BindingFlags`].
pub const EXT_SET_LAYOUT_BINDING_FLAGS: u32 = 1;
/// Tag for [`RenderPassExt::Multiview`].
pub const EXT_RENDER_PASS_MULTIVIEW: u32 = 1;

// ── Record-side and replay-side reference resolution ────────────

/// Translates a backend handle into the content hash of the record it
/// was created from.
///
/// Implemented by [`Recorder`](crate::Recorder) (and its internals): the
/// map is populated by `set_*_handle` calls. Returning `None` means the
/// handle was not produced by a registered record, which fails the
/// registration or hash computation referencing it — a dependency edge
/// is never silently dropped or recorded as garbage.
///
/// Only the five referenceable kinds appear here; nothing references a
/// pipeline.
pub trait HandleResolver {
    /// Hash of the sampler a handle was created from.
    fn resolve_sampler(&self, handle: SamplerHandle) -> Option<Hash>;
    /// Hash of the shader module a handle was created from.
    fn resolve_shader_module(&self, handle: ShaderModuleHandle) -> Option<Hash>;
    /// Hash of the descriptor set layout a handle was created from.
    fn resolve_descriptor_set_layout(&self, handle: DescriptorSetLayoutHandle) -> Option<Hash>;
    /// Hash of the pipeline layout a handle was created from.
    fn resolve_pipeline_layout(&self, handle: PipelineLayoutHandle) -> Option<Hash>;
    /// Hash of the render pass a handle was created from.
    fn resolve_render_pass(&self, handle: RenderPassHandle) -> Option<Hash>;
}

/// Replay-side resolution of a serialized dependency hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepRef<H> {
    /// The referenced record was decoded and created; here is its handle.
    Live(H),
    /// The referenced record is known but has no usable handle (its
    /// creation failed, or it was itself skipped).
    Unavailable,
}

/// Looks up already-decoded records by content hash during replay.
///
/// A hash that no decoded record of the dependency kind carries is a
/// forward reference; the format guarantees dependencies decode first,
/// so implementations return [`ReplayError::UnresolvedReference`] for it.
pub trait RefResolver {
    /// Resolve a sampler dependency hash.
    fn sampler_ref(&self, hash: Hash) -> Result<DepRef<SamplerHandle>, ReplayError>;
    /// Resolve a shader module dependency hash.
    fn shader_module_ref(&self, hash: Hash) -> Result<DepRef<ShaderModuleHandle>, ReplayError>;
    /// Resolve a descriptor set layout dependency hash.
    fn descriptor_set_layout_ref(
        &self,
        hash: Hash,
    ) -> Result<DepRef<DescriptorSetLayoutHandle>, ReplayError>;
    /// Resolve a pipeline layout dependency hash.
    fn pipeline_layout_ref(&self, hash: Hash)
        -> Result<DepRef<PipelineLayoutHandle>, ReplayError>;
    /// Resolve a render pass dependency hash.
    fn render_pass_ref(&self, hash: Hash) -> Result<DepRef<RenderPassHandle>, ReplayError>;
}

/// Result of decoding one record payload.
#[derive(Clone, Debug)]
pub struct Decoded<T> {
    /// The decoded description, with dependency references rewritten to
    /// live handles. Only meaningful when `missing_dep` is false — a
    /// record with an unavailable dependency carries placeholder handles
    /// and must not reach a creation backend.
    pub desc: T,
    /// Dependency hashes in traversal order, as read from the payload.
    pub deps: DepList,
    /// True when at least one dependency had no usable handle.
    pub missing_dep: bool,
}

// ── Primitive writers ───────────────────────────────────────────

/// Append a single byte.
pub fn write_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

/// Append a little-endian u32.
pub fn write_u32_le(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian u64.
pub fn write_u64_le(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian i32.
pub fn write_i32_le(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian f32 as its raw bit pattern.
pub fn write_f32_le(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_bits().to_le_bytes());
}

/// Append a bool as one byte (0 or 1).
pub fn write_bool(buf: &mut Vec<u8>, v: bool) {
    buf.push(v as u8);
}

/// Append a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_str(buf: &mut Vec<u8>, s: &str) {
    write_u32_le(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

/// Append an optional u32 as a presence flag plus value.
pub fn write_opt_u32(buf: &mut Vec<u8>, v: Option<u32>) {
    match v {
        Some(x) => {
            write_u8(buf, 1);
            write_u32_le(buf, x);
        }
        None => write_u8(buf, 0),
    }
}

/// Append an optional u64 as a presence flag plus value.
pub fn write_opt_u64(buf: &mut Vec<u8>, v: Option<u64>) {
    match v {
        Some(x) => {
            write_u8(buf, 1);
            write_u64_le(buf, x);
        }
        None => write_u8(buf, 0),
    }
}

/// Append an optional f32 as a presence flag plus raw bits.
pub fn write_opt_f32(buf: &mut Vec<u8>, v: Option<f32>) {
    match v {
        Some(x) => {
            write_u8(buf, 1);
            write_f32_le(buf, x);
        }
        None => write_u8(buf, 0),
    }
}

// ── Reader ──────────────────────────────────────────────────────

/// Bounds-checked cursor over a byte slice.
///
/// Every read fails with [`ReplayError::MalformedBlob`] on truncation,
/// carrying the offset for diagnostics.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ReplayError> {
        if self.remaining() < n {
            return Err(malformed(format!(
                "truncated: wanted {n} bytes at offset {}, {} available",
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ReplayError> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, ReplayError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, ReplayError> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a little-endian i32.
    pub fn read_i32_le(&mut self) -> Result<i32, ReplayError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian f32 from its raw bit pattern.
    pub fn read_f32_le(&mut self) -> Result<f32, ReplayError> {
        Ok(f32::from_bits(self.read_u32_le()?))
    }

    /// Read a one-byte bool/presence flag, rejecting anything but 0 or 1.
    pub fn read_flag(&mut self) -> Result<bool, ReplayError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(malformed(format!(
                "invalid flag byte {v} at offset {}",
                self.pos - 1
            ))),
        }
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReplayError> {
        self.take(n)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<String, ReplayError> {
        let len = self.read_u32_le()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| malformed(format!("invalid UTF-8 string: {e}")))
    }

    /// Read an optional u32 (presence flag plus value).
    pub fn read_opt_u32(&mut self) -> Result<Option<u32>, ReplayError> {
        if self.read_flag()? {
            Ok(Some(self.read_u32_le()?))
        } else {
            Ok(None)
        }
    }

    /// Read an optional u64 (presence flag plus value).
    pub fn read_opt_u64(&mut self) -> Result<Option<u64>, ReplayError> {
        if self.read_flag()? {
            Ok(Some(self.read_u64_le()?))
        } else {
            Ok(None)
        }
    }

    /// Read an optional f32 (presence flag plus raw bits).
    pub fn read_opt_f32(&mut self) -> Result<Option<f32>, ReplayError> {
        if self.read_flag()? {
            Ok(Some(self.read_f32_le()?))
        } else {
            Ok(None)
        }
    }
}

fn malformed(detail: impl Into<String>) -> ReplayError {
    ReplayError::MalformedBlob {
        detail: detail.into(),
    }
}

fn read_enum<T>(
    r: &mut Reader<'_>,
    what: &str,
    from_raw: impl Fn(u32) -> Option<T>,
) -> Result<T, ReplayError> {
    let v = r.read_u32_le()?;
    from_raw(v).ok_or_else(|| malformed(format!("invalid {what} discriminant {v}")))
}

/// Read a `u32` list length, guarding it against the bytes actually
/// present.
///
/// Lengths are attacker-controlled in a hostile blob; pre-reserving a
/// `Vec` from an unchecked length would let a few bytes demand gigabytes.
/// Every list element in this format occupies at least one byte, so a
/// length greater than `remaining` can never be satisfied.
fn read_len(r: &mut Reader<'_>, what: &str) -> Result<usize, ReplayError> {
    let len = r.read_u32_le()? as usize;
    if len > r.remaining() {
        return Err(malformed(format!(
            "{what} count {len} exceeds {} remaining bytes",
            r.remaining()
        )));
    }
    Ok(len)
}

// ── Samplers ────────────────────────────────────────────────────

/// Encode a sampler description. Samplers reference no other objects.
pub fn encode_sampler(buf: &mut Vec<u8>, desc: &SamplerDesc) {
    write_u32_le(buf, desc.mag_filter as u32);
    write_u32_le(buf, desc.min_filter as u32);
    write_u32_le(buf, desc.mipmap_mode as u32);
    write_u32_le(buf, desc.address_mode_u as u32);
    write_u32_le(buf, desc.address_mode_v as u32);
    write_u32_le(buf, desc.address_mode_w as u32);
    write_f32_le(buf, desc.mip_lod_bias);
    write_opt_f32(buf, desc.max_anisotropy);
    write_opt_u32(buf, desc.compare_op.map(|op| op as u32));
    write_f32_le(buf, desc.min_lod);
    write_f32_le(buf, desc.max_lod);
    write_u32_le(buf, desc.border_color as u32);
    write_bool(buf, desc.unnormalized_coordinates);

    write_u32_le(buf, desc.extensions.len() as u32);
    for ext in &desc.extensions {
        match ext {
            SamplerExt::ReductionMode(mode) => {
                write_u32_le(buf, EXT_SAMPLER_REDUCTION_MODE);
                write_u32_le(buf, *mode as u32);
            }
            SamplerExt::CustomBorderColor { color } => {
                write_u32_le(buf, EXT_SAMPLER_CUSTOM_BORDER_COLOR);
                for &c in color {
                    write_f32_le(buf, c);
                }
            }
        }
    }
}

/// Decode a sampler description.
pub fn decode_sampler(r: &mut Reader<'_>) -> Result<SamplerDesc, ReplayError> {
    let mag_filter = read_enum(r, "filter", Filter::from_raw)?;
    let min_filter = read_enum(r, "filter", Filter::from_raw)?;
    let mipmap_mode = read_enum(r, "mipmap mode", MipmapMode::from_raw)?;
    let address_mode_u = read_enum(r, "address mode", AddressMode::from_raw)?;
    let address_mode_v = read_enum(r, "address mode", AddressMode::from_raw)?;
    let address_mode_w = read_enum(r, "address mode", AddressMode::from_raw)?;
    let mip_lod_bias = r.read_f32_le()?;
    let max_anisotropy = r.read_opt_f32()?;
    let compare_op = match r.read_opt_u32()? {
        Some(v) => Some(
            CompareOp::from_raw(v)
                .ok_or_else(|| malformed(format!("invalid compare op discriminant {v}")))?,
        ),
        None => None,
    };
    let min_lod = r.read_f32_le()?;
    let max_lod = r.read_f32_le()?;
    let border_color = read_enum(r, "border color", BorderColor::from_raw)?;
    let unnormalized_coordinates = r.read_flag()?;

    let ext_count = read_len(r, "sampler extension")?;
    let mut extensions = Vec::with_capacity(ext_count);
    for _ in 0..ext_count {
        let tag = r.read_u32_le()?;
        extensions.push(match tag {
            EXT_SAMPLER_REDUCTION_MODE => {
                SamplerExt::ReductionMode(read_enum(r, "reduction mode", ReductionMode::from_raw)?)
            }
            EXT_SAMPLER_CUSTOM_BORDER_COLOR => {
                let mut color = [0.0f32; 4];
                for c in &mut color {
                    *c = r.read_f32_le()?;
                }
                SamplerExt::CustomBorderColor { color }
            }
            _ => return Err(malformed(format!("unknown sampler extension tag {tag}"))),
        });
    }

    Ok(SamplerDesc {
        mag_filter,
        min_filter,
        mipmap_mode,
        address_mode_u,
        address_mode_v,
        address_mode_w,
        mip_lod_bias,
        max_anisotropy,
        compare_op,
        min_lod,
        max_lod,
        border_color,
        unnormalized_coordinates,
        extensions,
    })
}

// ── Shader modules ──────────────────────────────────────────────

/// Encode a shader module description. Modules reference no other objects.
pub fn encode_shader_module(buf: &mut Vec<u8>, desc: &ShaderModuleDesc) {
    write_u32_le(buf, desc.code.len() as u32);
    for &word in &desc.code {
        write_u32_le(buf, word);
    }
}

/// Decode a shader module description.
pub fn decode_shader_module(r: &mut Reader<'_>) -> Result<ShaderModuleDesc, ReplayError> {
    let count = read_len(r, "shader code word")?;
    let mut code = Vec::with_capacity(count);
    for _ in 0..count {
        code.push(r.read_u32_le()?);
    }
    Ok(ShaderModuleDesc { code })
}

// ── Descriptor set layouts ──────────────────────────────────────

/// Encode a descriptor set layout, resolving immutable-sampler handles
/// to their content hashes and collecting them into `deps`.
pub fn encode_descriptor_set_layout(
    buf: &mut Vec<u8>,
    desc: &DescriptorSetLayoutDesc,
    resolver: &dyn HandleResolver,
    deps: &mut DepList,
) -> Result<(), RecordError> {
    write_u32_le(buf, desc.flags);

    write_u32_le(buf, desc.bindings.len() as u32);
    for binding in &desc.bindings {
        write_u32_le(buf, binding.binding);
        write_u32_le(buf, binding.descriptor_type as u32);
        write_u32_le(buf, binding.descriptor_count);
        write_u32_le(buf, binding.stages.0);
        write_u32_le(buf, binding.immutable_samplers.len() as u32);
        for &sampler in &binding.immutable_samplers {
            let hash =
                resolver
                    .resolve_sampler(sampler)
                    .ok_or(RecordError::UnresolvedHandle {
                        kind: ObjectKind::Sampler,
                        handle: sampler.0,
                    })?;
            write_u64_le(buf, hash.0);
            deps.push(hash);
        }
    }

    write_u32_le(buf, desc.extensions.len() as u32);
    for ext in &desc.extensions {
        match ext {
            SetLayoutExt::BindingFlags(flags) => {
                write_u32_le(buf, EXT_SET_LAYOUT_BINDING_FLAGS);
                write_u32_le(buf, flags.len() as u32);
                for &f in flags {
                    write_u32_le(buf, f);
                }
            }
        }
    }
    Ok(())
}

/// Decode a descriptor set layout, rewriting sampler dependency hashes
/// into live handles.
pub fn decode_descriptor_set_layout(
    r: &mut Reader<'_>,
    resolver: &dyn RefResolver,
) -> Result<Decoded<DescriptorSetLayoutDesc>, ReplayError> {
    let mut deps = DepList::new();
    let mut missing_dep = false;

    let flags = r.read_u32_le()?;

    let binding_count = read_len(r, "binding")?;
    let mut bindings = Vec::with_capacity(binding_count);
    for _ in 0..binding_count {
        let binding = r.read_u32_le()?;
        let descriptor_type = read_enum(r, "descriptor type", DescriptorType::from_raw)?;
        let descriptor_count = r.read_u32_le()?;
        let stages = ShaderStageFlags(r.read_u32_le()?);
        let sampler_count = read_len(r, "immutable sampler")?;
        let mut immutable_samplers = Vec::with_capacity(sampler_count);
        for _ in 0..sampler_count {
            let hash = Hash(r.read_u64_le()?);
            deps.push(hash);
            immutable_samplers.push(match resolver.sampler_ref(hash)? {
                DepRef::Live(h) => h,
                DepRef::Unavailable => {
                    missing_dep = true;
                    SamplerHandle(0)
                }
            });
        }
        bindings.push(DescriptorSetLayoutBinding {
            binding,
            descriptor_type,
            descriptor_count,
            stages,
            immutable_samplers,
        });
    }

    let ext_count = read_len(r, "set layout extension")?;
    let mut extensions = Vec::with_capacity(ext_count);
    for _ in 0..ext_count {
        let tag = r.read_u32_le()?;
        extensions.push(match tag {
            EXT_SET_LAYOUT_BINDING_FLAGS => {
                let count = read_len(r, "binding flag")?;
                let mut flags = Vec::with_capacity(count);
                for _ in 0..count {
                    flags.push(r.read_u32_le()?);
                }
                SetLayoutExt::BindingFlags(flags)
            }
            _ => {
                return Err(malformed(format!(
                    "unknown set layout extension tag {tag}"
                )))
            }
        });
    }

    Ok(Decoded {
        desc: DescriptorSetLayoutDesc {
            flags,
            bindings,
            extensions,
        },
        deps,
        missing_dep,
    })
}

// ── Pipeline layouts ────────────────────────────────────────────

/// Encode a pipeline layout, resolving set-layout handles to hashes.
pub fn encode_pipeline_layout(
    buf: &mut Vec<u8>,
    desc: &PipelineLayoutDesc,
    resolver: &dyn HandleResolver,
    deps: &mut DepList,
) -> Result<(), RecordError> {
    write_u32_le(buf, desc.flags);

    write_u32_le(buf, desc.set_layouts.len() as u32);
    for &layout in &desc.set_layouts {
        let hash = resolver.resolve_descriptor_set_layout(layout).ok_or(
            RecordError::UnresolvedHandle {
                kind: ObjectKind::DescriptorSetLayout,
                handle: layout.0,
            },
        )?;
        write_u64_le(buf, hash.0);
        deps.push(hash);
    }

    write_u32_le(buf, desc.push_constant_ranges.len() as u32);
    for range in &desc.push_constant_ranges {
        write_u32_le(buf, range.stages.0);
        write_u32_le(buf, range.offset);
        write_u32_le(buf, range.size);
    }
    Ok(())
}

/// Decode a pipeline layout, rewriting set-layout dependency hashes into
/// live handles.
pub fn decode_pipeline_layout(
    r: &mut Reader<'_>,
    resolver: &dyn RefResolver,
) -> Result<Decoded<PipelineLayoutDesc>, ReplayError> {
    let mut deps = DepList::new();
    let mut missing_dep = false;

    let flags = r.read_u32_le()?;

    let set_count = read_len(r, "set layout")?;
    let mut set_layouts = Vec::with_capacity(set_count);
    for _ in 0..set_count {
        let hash = Hash(r.read_u64_le()?);
        deps.push(hash);
        set_layouts.push(match resolver.descriptor_set_layout_ref(hash)? {
            DepRef::Live(h) => h,
            DepRef::Unavailable => {
                missing_dep = true;
                DescriptorSetLayoutHandle(0)
            }
        });
    }

    let range_count = read_len(r, "push constant range")?;
    let mut push_constant_ranges = Vec::with_capacity(range_count);
    for _ in 0..range_count {
        push_constant_ranges.push(PushConstantRange {
            stages: ShaderStageFlags(r.read_u32_le()?),
            offset: r.read_u32_le()?,
            size: r.read_u32_le()?,
        });
    }

    Ok(Decoded {
        desc: PipelineLayoutDesc {
            flags,
            set_layouts,
            push_constant_ranges,
        },
        deps,
        missing_dep,
    })
}

// ── Render passes ───────────────────────────────────────────────

fn encode_attachment_ref(buf: &mut Vec<u8>, r: &AttachmentRef) {
    write_opt_u32(buf, r.attachment);
    write_u32_le(buf, r.layout.0);
}

fn decode_attachment_ref(r: &mut Reader<'_>) -> Result<AttachmentRef, ReplayError> {
    Ok(AttachmentRef {
        attachment: r.read_opt_u32()?,
        layout: ImageLayout(r.read_u32_le()?),
    })
}

fn encode_attachment_refs(buf: &mut Vec<u8>, refs: &[AttachmentRef]) {
    write_u32_le(buf, refs.len() as u32);
    for r in refs {
        encode_attachment_ref(buf, r);
    }
}

fn decode_attachment_refs(r: &mut Reader<'_>) -> Result<Vec<AttachmentRef>, ReplayError> {
    let count = read_len(r, "attachment reference")?;
    let mut refs = Vec::with_capacity(count);
    for _ in 0..count {
        refs.push(decode_attachment_ref(r)?);
    }
    Ok(refs)
}

/// Encode a render pass description. Render passes reference no other
/// objects; all cross-references are indices into their own attachment
/// list.
pub fn encode_render_pass(buf: &mut Vec<u8>, desc: &RenderPassDesc) {
    write_u32_le(buf, desc.flags);

    write_u32_le(buf, desc.attachments.len() as u32);
    for a in &desc.attachments {
        write_u32_le(buf, a.flags);
        write_u32_le(buf, a.format.0);
        write_u32_le(buf, a.samples);
        write_u32_le(buf, a.load_op as u32);
        write_u32_le(buf, a.store_op as u32);
        write_u32_le(buf, a.stencil_load_op as u32);
        write_u32_le(buf, a.stencil_store_op as u32);
        write_u32_le(buf, a.initial_layout.0);
        write_u32_le(buf, a.final_layout.0);
    }

    write_u32_le(buf, desc.subpasses.len() as u32);
    for s in &desc.subpasses {
        encode_attachment_refs(buf, &s.input_attachments);
        encode_attachment_refs(buf, &s.color_attachments);
        encode_attachment_refs(buf, &s.resolve_attachments);
        match &s.depth_stencil_attachment {
            Some(ds) => {
                write_u8(buf, 1);
                encode_attachment_ref(buf, ds);
            }
            None => write_u8(buf, 0),
        }
        write_u32_le(buf, s.preserve_attachments.len() as u32);
        for &p in &s.preserve_attachments {
            write_u32_le(buf, p);
        }
    }

    write_u32_le(buf, desc.dependencies.len() as u32);
    for d in &desc.dependencies {
        write_opt_u32(buf, d.src_subpass);
        write_opt_u32(buf, d.dst_subpass);
        write_u32_le(buf, d.src_stage_mask);
        write_u32_le(buf, d.dst_stage_mask);
        write_u32_le(buf, d.src_access_mask);
        write_u32_le(buf, d.dst_access_mask);
        write_u32_le(buf, d.flags);
    }

    write_u32_le(buf, desc.extensions.len() as u32);
    for ext in &desc.extensions {
        match ext {
            RenderPassExt::Multiview {
                view_masks,
                correlation_masks,
            } => {
                write_u32_le(buf, EXT_RENDER_PASS_MULTIVIEW);
                write_u32_le(buf, view_masks.len() as u32);
                for &m in view_masks {
                    write_u32_le(buf, m);
                }
                write_u32_le(buf, correlation_masks.len() as u32);
                for &m in correlation_masks {
                    write_u32_le(buf, m);
                }
            }
        }
    }
}

/// Decode a render pass description.
pub fn decode_render_pass(r: &mut Reader<'_>) -> Result<RenderPassDesc, ReplayError> {
    let flags = r.read_u32_le()?;

    let attachment_count = read_len(r, "attachment")?;
    let mut attachments = Vec::with_capacity(attachment_count);
    for _ in 0..attachment_count {
        attachments.push(AttachmentDesc {
            flags: r.read_u32_le()?,
            format: Format(r.read_u32_le()?),
            samples: r.read_u32_le()?,
            load_op: read_enum(r, "load op", LoadOp::from_raw)?,
            store_op: read_enum(r, "store op", StoreOp::from_raw)?,
            stencil_load_op: read_enum(r, "load op", LoadOp::from_raw)?,
            stencil_store_op: read_enum(r, "store op", StoreOp::from_raw)?,
            initial_layout: ImageLayout(r.read_u32_le()?),
            final_layout: ImageLayout(r.read_u32_le()?),
        });
    }

    let subpass_count = read_len(r, "subpass")?;
    let mut subpasses = Vec::with_capacity(subpass_count);
    for _ in 0..subpass_count {
        let input_attachments = decode_attachment_refs(r)?;
        let color_attachments = decode_attachment_refs(r)?;
        let resolve_attachments = decode_attachment_refs(r)?;
        let depth_stencil_attachment = if r.read_flag()? {
            Some(decode_attachment_ref(r)?)
        } else {
            None
        };
        let preserve_count = read_len(r, "preserve attachment")?;
        let mut preserve_attachments = Vec::with_capacity(preserve_count);
        for _ in 0..preserve_count {
            preserve_attachments.push(r.read_u32_le()?);
        }
        subpasses.push(SubpassDesc {
            input_attachments,
            color_attachments,
            resolve_attachments,
            depth_stencil_attachment,
            preserve_attachments,
        });
    }

    let dependency_count = read_len(r, "subpass dependency")?;
    let mut dependencies = Vec::with_capacity(dependency_count);
    for _ in 0..dependency_count {
        dependencies.push(SubpassDependency {
            src_subpass: r.read_opt_u32()?,
            dst_subpass: r.read_opt_u32()?,
            src_stage_mask: r.read_u32_le()?,
            dst_stage_mask: r.read_u32_le()?,
            src_access_mask: r.read_u32_le()?,
            dst_access_mask: r.read_u32_le()?,
            flags: r.read_u32_le()?,
        });
    }

    let ext_count = read_len(r, "render pass extension")?;
    let mut extensions = Vec::with_capacity(ext_count);
    for _ in 0..ext_count {
        let tag = r.read_u32_le()?;
        extensions.push(match tag {
            EXT_RENDER_PASS_MULTIVIEW => {
                let vm_count = read_len(r, "view mask")?;
                let mut view_masks = Vec::with_capacity(vm_count);
                for _ in 0..vm_count {
                    view_masks.push(r.read_u32_le()?);
                }
                let cm_count = read_len(r, "correlation mask")?;
                let mut correlation_masks = Vec::with_capacity(cm_count);
                for _ in 0..cm_count {
                    correlation_masks.push(r.read_u32_le()?);
                }
                RenderPassExt::Multiview {
                    view_masks,
                    correlation_masks,
                }
            }
            _ => {
                return Err(malformed(format!(
                    "unknown render pass extension tag {tag}"
                )))
            }
        });
    }

    Ok(RenderPassDesc {
        flags,
        attachments,
        subpasses,
        dependencies,
        extensions,
    })
}

// ── Shader stages (shared by both pipeline kinds) ───────────────

fn encode_stage(
    buf: &mut Vec<u8>,
    stage: &StageDesc,
    resolver: &dyn HandleResolver,
    deps: &mut DepList,
) -> Result<(), RecordError> {
    write_u32_le(buf, stage.stage as u32);
    let hash =
        resolver
            .resolve_shader_module(stage.module)
            .ok_or(RecordError::UnresolvedHandle {
                kind: ObjectKind::ShaderModule,
                handle: stage.module.0,
            })?;
    write_u64_le(buf, hash.0);
    deps.push(hash);
    write_str(buf, &stage.entry_point);
    write_u32_le(buf, stage.spec_constants.len() as u32);
    for c in &stage.spec_constants {
        write_u32_le(buf, c.id);
        write_u64_le(buf, c.value);
    }
    Ok(())
}

fn decode_stage(
    r: &mut Reader<'_>,
    resolver: &dyn RefResolver,
    deps: &mut DepList,
    missing_dep: &mut bool,
) -> Result<StageDesc, ReplayError> {
    let stage = read_enum(r, "shader stage", ShaderStage::from_raw)?;
    let hash = Hash(r.read_u64_le()?);
    deps.push(hash);
    let module = match resolver.shader_module_ref(hash)? {
        DepRef::Live(h) => h,
        DepRef::Unavailable => {
            *missing_dep = true;
            ShaderModuleHandle(0)
        }
    };
    let entry_point = r.read_str()?;
    let const_count = read_len(r, "spec constant")?;
    let mut spec_constants = Vec::with_capacity(const_count);
    for _ in 0..const_count {
        spec_constants.push(SpecConstant {
            id: r.read_u32_le()?,
            value: r.read_u64_le()?,
        });
    }
    Ok(StageDesc {
        stage,
        module,
        entry_point,
        spec_constants,
    })
}

// ── Compute pipelines ───────────────────────────────────────────

/// Encode a compute pipeline, resolving its module and layout handles.
pub fn encode_compute_pipeline(
    buf: &mut Vec<u8>,
    desc: &ComputePipelineDesc,
    resolver: &dyn HandleResolver,
    deps: &mut DepList,
) -> Result<(), RecordError> {
    write_u32_le(buf, desc.flags);
    encode_stage(buf, &desc.stage, resolver, deps)?;
    let hash =
        resolver
            .resolve_pipeline_layout(desc.layout)
            .ok_or(RecordError::UnresolvedHandle {
                kind: ObjectKind::PipelineLayout,
                handle: desc.layout.0,
            })?;
    write_u64_le(buf, hash.0);
    deps.push(hash);
    Ok(())
}

/// Decode a compute pipeline, rewriting dependency hashes into live
/// handles.
pub fn decode_compute_pipeline(
    r: &mut Reader<'_>,
    resolver: &dyn RefResolver,
) -> Result<Decoded<ComputePipelineDesc>, ReplayError> {
    let mut deps = DepList::new();
    let mut missing_dep = false;

    let flags = r.read_u32_le()?;
    let stage = decode_stage(r, resolver, &mut deps, &mut missing_dep)?;
    let hash = Hash(r.read_u64_le()?);
    deps.push(hash);
    let layout = match resolver.pipeline_layout_ref(hash)? {
        DepRef::Live(h) => h,
        DepRef::Unavailable => {
            missing_dep = true;
            PipelineLayoutHandle(0)
        }
    };

    Ok(Decoded {
        desc: ComputePipelineDesc {
            flags,
            stage,
            layout,
        },
        deps,
        missing_dep,
    })
}

// ── Graphics pipelines ──────────────────────────────────────────

fn encode_stencil_op_state(buf: &mut Vec<u8>, s: &StencilOpState) {
    write_u32_le(buf, s.fail_op as u32);
    write_u32_le(buf, s.pass_op as u32);
    write_u32_le(buf, s.depth_fail_op as u32);
    write_u32_le(buf, s.compare_op as u32);
    write_u32_le(buf, s.compare_mask);
    write_u32_le(buf, s.write_mask);
    write_u32_le(buf, s.reference);
}

fn decode_stencil_op_state(r: &mut Reader<'_>) -> Result<StencilOpState, ReplayError> {
    Ok(StencilOpState {
        fail_op: read_enum(r, "stencil op", StencilOp::from_raw)?,
        pass_op: read_enum(r, "stencil op", StencilOp::from_raw)?,
        depth_fail_op: read_enum(r, "stencil op", StencilOp::from_raw)?,
        compare_op: read_enum(r, "compare op", CompareOp::from_raw)?,
        compare_mask: r.read_u32_le()?,
        write_mask: r.read_u32_le()?,
        reference: r.read_u32_le()?,
    })
}

/// Encode a graphics pipeline, resolving its stage modules, layout, and
/// render pass handles.
pub fn encode_graphics_pipeline(
    buf: &mut Vec<u8>,
    desc: &GraphicsPipelineDesc,
    resolver: &dyn HandleResolver,
    deps: &mut DepList,
) -> Result<(), RecordError> {
    write_u32_le(buf, desc.flags);

    write_u32_le(buf, desc.stages.len() as u32);
    for stage in &desc.stages {
        encode_stage(buf, stage, resolver, deps)?;
    }

    let vi = &desc.vertex_input;
    write_u32_le(buf, vi.bindings.len() as u32);
    for b in &vi.bindings {
        write_u32_le(buf, b.binding);
        write_u32_le(buf, b.stride);
        write_u32_le(buf, b.input_rate as u32);
    }
    write_u32_le(buf, vi.attributes.len() as u32);
    for a in &vi.attributes {
        write_u32_le(buf, a.location);
        write_u32_le(buf, a.binding);
        write_u32_le(buf, a.format.0);
        write_u32_le(buf, a.offset);
    }

    write_u32_le(buf, desc.input_assembly.topology as u32);
    write_bool(buf, desc.input_assembly.primitive_restart);

    write_opt_u32(buf, desc.tessellation_control_points);

    let vp = &desc.viewport;
    write_u32_le(buf, vp.viewport_count);
    write_u32_le(buf, vp.scissor_count);
    write_u32_le(buf, vp.viewports.len() as u32);
    for v in &vp.viewports {
        write_f32_le(buf, v.x);
        write_f32_le(buf, v.y);
        write_f32_le(buf, v.width);
        write_f32_le(buf, v.height);
        write_f32_le(buf, v.min_depth);
        write_f32_le(buf, v.max_depth);
    }
    write_u32_le(buf, vp.scissors.len() as u32);
    for s in &vp.scissors {
        write_i32_le(buf, s.x);
        write_i32_le(buf, s.y);
        write_u32_le(buf, s.width);
        write_u32_le(buf, s.height);
    }

    let rs = &desc.rasterization;
    write_bool(buf, rs.depth_clamp);
    write_bool(buf, rs.rasterizer_discard);
    write_u32_le(buf, rs.polygon_mode as u32);
    write_u32_le(buf, rs.cull_mode.0);
    write_u32_le(buf, rs.front_face as u32);
    match &rs.depth_bias {
        Some(db) => {
            write_u8(buf, 1);
            write_f32_le(buf, db.constant_factor);
            write_f32_le(buf, db.clamp);
            write_f32_le(buf, db.slope_factor);
        }
        None => write_u8(buf, 0),
    }
    write_f32_le(buf, rs.line_width);

    let ms = &desc.multisample;
    write_u32_le(buf, ms.rasterization_samples);
    write_opt_f32(buf, ms.sample_shading);
    write_opt_u64(buf, ms.sample_mask);
    write_bool(buf, ms.alpha_to_coverage);
    write_bool(buf, ms.alpha_to_one);

    match &desc.depth_stencil {
        Some(ds) => {
            write_u8(buf, 1);
            write_bool(buf, ds.depth_test);
            write_bool(buf, ds.depth_write);
            write_u32_le(buf, ds.depth_compare_op as u32);
            match &ds.depth_bounds {
                Some(b) => {
                    write_u8(buf, 1);
                    write_f32_le(buf, b.min);
                    write_f32_le(buf, b.max);
                }
                None => write_u8(buf, 0),
            }
            match &ds.stencil {
                Some(st) => {
                    write_u8(buf, 1);
                    encode_stencil_op_state(buf, &st.front);
                    encode_stencil_op_state(buf, &st.back);
                }
                None => write_u8(buf, 0),
            }
        }
        None => write_u8(buf, 0),
    }

    match &desc.color_blend {
        Some(cb) => {
            write_u8(buf, 1);
            write_opt_u32(buf, cb.logic_op.map(|op| op as u32));
            write_u32_le(buf, cb.attachments.len() as u32);
            for att in &cb.attachments {
                match &att.blend {
                    Some(eq) => {
                        write_u8(buf, 1);
                        write_u32_le(buf, eq.src_color_factor as u32);
                        write_u32_le(buf, eq.dst_color_factor as u32);
                        write_u32_le(buf, eq.color_op as u32);
                        write_u32_le(buf, eq.src_alpha_factor as u32);
                        write_u32_le(buf, eq.dst_alpha_factor as u32);
                        write_u32_le(buf, eq.alpha_op as u32);
                    }
                    None => write_u8(buf, 0),
                }
                write_u32_le(buf, att.color_write_mask.0);
            }
            for &c in &cb.blend_constants {
                write_f32_le(buf, c);
            }
        }
        None => write_u8(buf, 0),
    }

    write_u32_le(buf, desc.dynamic_states.len() as u32);
    for &d in &desc.dynamic_states {
        write_u32_le(buf, d as u32);
    }

    let layout_hash =
        resolver
            .resolve_pipeline_layout(desc.layout)
            .ok_or(RecordError::UnresolvedHandle {
                kind: ObjectKind::PipelineLayout,
                handle: desc.layout.0,
            })?;
    write_u64_le(buf, layout_hash.0);
    deps.push(layout_hash);

    let pass_hash =
        resolver
            .resolve_render_pass(desc.render_pass)
            .ok_or(RecordError::UnresolvedHandle {
                kind: ObjectKind::RenderPass,
                handle: desc.render_pass.0,
            })?;
    write_u64_le(buf, pass_hash.0);
    deps.push(pass_hash);

    write_u32_le(buf, desc.subpass);
    Ok(())
}

/// Decode a graphics pipeline, rewriting dependency hashes into live
/// handles.
pub fn decode_graphics_pipeline(
    r: &mut Reader<'_>,
    resolver: &dyn RefResolver,
) -> Result<Decoded<GraphicsPipelineDesc>, ReplayError> {
    let mut deps = DepList::new();
    let mut missing_dep = false;

    let flags = r.read_u32_le()?;

    let stage_count = read_len(r, "pipeline stage")?;
    let mut stages = Vec::with_capacity(stage_count);
    for _ in 0..stage_count {
        stages.push(decode_stage(r, resolver, &mut deps, &mut missing_dep)?);
    }

    let binding_count = read_len(r, "vertex binding")?;
    let mut bindings = Vec::with_capacity(binding_count);
    for _ in 0..binding_count {
        bindings.push(VertexBinding {
            binding: r.read_u32_le()?,
            stride: r.read_u32_le()?,
            input_rate: read_enum(r, "vertex input rate", VertexInputRate::from_raw)?,
        });
    }
    let attr_count = read_len(r, "vertex attribute")?;
    let mut attributes = Vec::with_capacity(attr_count);
    for _ in 0..attr_count {
        attributes.push(VertexAttribute {
            location: r.read_u32_le()?,
            binding: r.read_u32_le()?,
            format: Format(r.read_u32_le()?),
            offset: r.read_u32_le()?,
        });
    }
    let vertex_input = VertexInputState {
        bindings,
        attributes,
    };

    let input_assembly = InputAssemblyState {
        topology: read_enum(r, "primitive topology", PrimitiveTopology::from_raw)?,
        primitive_restart: r.read_flag()?,
    };

    let tessellation_control_points = r.read_opt_u32()?;

    let viewport_count = r.read_u32_le()?;
    let scissor_count = r.read_u32_le()?;
    let vp_len = read_len(r, "viewport")?;
    let mut viewports = Vec::with_capacity(vp_len);
    for _ in 0..vp_len {
        viewports.push(Viewport {
            x: r.read_f32_le()?,
            y: r.read_f32_le()?,
            width: r.read_f32_le()?,
            height: r.read_f32_le()?,
            min_depth: r.read_f32_le()?,
            max_depth: r.read_f32_le()?,
        });
    }
    let sc_len = read_len(r, "scissor")?;
    let mut scissors = Vec::with_capacity(sc_len);
    for _ in 0..sc_len {
        scissors.push(Rect2D {
            x: r.read_i32_le()?,
            y: r.read_i32_le()?,
            width: r.read_u32_le()?,
            height: r.read_u32_le()?,
        });
    }
    let viewport = ViewportState {
        viewport_count,
        scissor_count,
        viewports,
        scissors,
    };

    let depth_clamp = r.read_flag()?;
    let rasterizer_discard = r.read_flag()?;
    let polygon_mode = read_enum(r, "polygon mode", PolygonMode::from_raw)?;
    let cull_mode = CullMode(r.read_u32_le()?);
    let front_face = read_enum(r, "front face", FrontFace::from_raw)?;
    let depth_bias = if r.read_flag()? {
        Some(DepthBias {
            constant_factor: r.read_f32_le()?,
            clamp: r.read_f32_le()?,
            slope_factor: r.read_f32_le()?,
        })
    } else {
        None
    };
    let line_width = r.read_f32_le()?;
    let rasterization = RasterizationState {
        depth_clamp,
        rasterizer_discard,
        polygon_mode,
        cull_mode,
        front_face,
        depth_bias,
        line_width,
    };

    let multisample = MultisampleState {
        rasterization_samples: r.read_u32_le()?,
        sample_shading: r.read_opt_f32()?,
        sample_mask: r.read_opt_u64()?,
        alpha_to_coverage: r.read_flag()?,
        alpha_to_one: r.read_flag()?,
    };

    let depth_stencil = if r.read_flag()? {
        let depth_test = r.read_flag()?;
        let depth_write = r.read_flag()?;
        let depth_compare_op = read_enum(r, "compare op", CompareOp::from_raw)?;
        let depth_bounds = if r.read_flag()? {
            Some(DepthBounds {
                min: r.read_f32_le()?,
                max: r.read_f32_le()?,
            })
        } else {
            None
        };
        let stencil = if r.read_flag()? {
            Some(StencilTest {
                front: decode_stencil_op_state(r)?,
                back: decode_stencil_op_state(r)?,
            })
        } else {
            None
        };
        Some(DepthStencilState {
            depth_test,
            depth_write,
            depth_compare_op,
            depth_bounds,
            stencil,
        })
    } else {
        None
    };

    let color_blend = if r.read_flag()? {
        let logic_op = match r.read_opt_u32()? {
            Some(v) => Some(
                LogicOp::from_raw(v)
                    .ok_or_else(|| malformed(format!("invalid logic op discriminant {v}")))?,
            ),
            None => None,
        };
        let att_count = read_len(r, "blend attachment")?;
        let mut attachments = Vec::with_capacity(att_count);
        for _ in 0..att_count {
            let blend = if r.read_flag()? {
                Some(BlendEquation {
                    src_color_factor: read_enum(r, "blend factor", BlendFactor::from_raw)?,
                    dst_color_factor: read_enum(r, "blend factor", BlendFactor::from_raw)?,
                    color_op: read_enum(r, "blend op", BlendOp::from_raw)?,
                    src_alpha_factor: read_enum(r, "blend factor", BlendFactor::from_raw)?,
                    dst_alpha_factor: read_enum(r, "blend factor", BlendFactor::from_raw)?,
                    alpha_op: read_enum(r, "blend op", BlendOp::from_raw)?,
                })
            } else {
                None
            };
            attachments.push(BlendAttachment {
                blend,
                color_write_mask: ColorWriteMask(r.read_u32_le()?),
            });
        }
        let mut blend_constants = [0.0f32; 4];
        for c in &mut blend_constants {
            *c = r.read_f32_le()?;
        }
        Some(ColorBlendState {
            logic_op,
            attachments,
            blend_constants,
        })
    } else {
        None
    };

    let dyn_count = read_len(r, "dynamic state")?;
    let mut dynamic_states = Vec::with_capacity(dyn_count);
    for _ in 0..dyn_count {
        dynamic_states.push(read_enum(r, "dynamic state", DynamicState::from_raw)?);
    }

    let layout_hash = Hash(r.read_u64_le()?);
    deps.push(layout_hash);
    let layout = match resolver.pipeline_layout_ref(layout_hash)? {
        DepRef::Live(h) => h,
        DepRef::Unavailable => {
            missing_dep = true;
            PipelineLayoutHandle(0)
        }
    };

    let pass_hash = Hash(r.read_u64_le()?);
    deps.push(pass_hash);
    let render_pass = match resolver.render_pass_ref(pass_hash)? {
        DepRef::Live(h) => h,
        DepRef::Unavailable => {
            missing_dep = true;
            RenderPassHandle(0)
        }
    };

    let subpass = r.read_u32_le()?;

    Ok(Decoded {
        desc: GraphicsPipelineDesc {
            flags,
            stages,
            vertex_input,
            input_assembly,
            tessellation_control_points,
            viewport,
            rasterization,
            multisample,
            depth_stencil,
            color_blend,
            dynamic_states,
            layout,
            render_pass,
            subpass,
        },
        deps,
        missing_dep,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amber_test_utils::fixtures;

    /// Resolver that knows no handles at all.
    struct EmptyResolver;

    impl HandleResolver for EmptyResolver {
        fn resolve_sampler(&self, _: SamplerHandle) -> Option<Hash> {
            None
        }
        fn resolve_shader_module(&self, _: ShaderModuleHandle) -> Option<Hash> {
            None
        }
        fn resolve_descriptor_set_layout(&self, _: DescriptorSetLayoutHandle) -> Option<Hash> {
            None
        }
        fn resolve_pipeline_layout(&self, _: PipelineLayoutHandle) -> Option<Hash> {
            None
        }
        fn resolve_render_pass(&self, _: RenderPassHandle) -> Option<Hash> {
            None
        }
    }

    #[test]
    fn sampler_roundtrips() {
        let desc = fixtures::clamped_linear_sampler();
        let mut buf = Vec::new();
        encode_sampler(&mut buf, &desc);

        let mut r = Reader::new(&buf);
        let got = decode_sampler(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(desc, got);
    }

    #[test]
    fn sampler_with_extensions_roundtrips() {
        let mut desc = fixtures::clamped_linear_sampler();
        desc.extensions = vec![
            SamplerExt::ReductionMode(ReductionMode::Max),
            SamplerExt::CustomBorderColor {
                color: [0.25, 0.5, 0.75, 1.0],
            },
        ];
        let mut buf = Vec::new();
        encode_sampler(&mut buf, &desc);

        let got = decode_sampler(&mut Reader::new(&buf)).unwrap();
        assert_eq!(desc, got);
    }

    #[test]
    fn shader_module_roundtrips() {
        let desc = fixtures::shader_module(&[0x0723_0203, 42, 7, u32::MAX]);
        let mut buf = Vec::new();
        encode_shader_module(&mut buf, &desc);

        let got = decode_shader_module(&mut Reader::new(&buf)).unwrap();
        assert_eq!(desc, got);
    }

    #[test]
    fn render_pass_roundtrips() {
        let desc = fixtures::color_depth_render_pass();
        let mut buf = Vec::new();
        encode_render_pass(&mut buf, &desc);

        let mut r = Reader::new(&buf);
        let got = decode_render_pass(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(desc, got);
    }

    #[test]
    fn unknown_extension_tag_is_rejected() {
        let desc = fixtures::clamped_linear_sampler();
        let mut buf = Vec::new();
        encode_sampler(&mut buf, &desc);
        // Append one bogus extension entry.
        let chain_offset = buf.len() - 4;
        buf[chain_offset..].copy_from_slice(&1u32.to_le_bytes());
        write_u32_le(&mut buf, 0xBEEF);

        let err = decode_sampler(&mut Reader::new(&buf)).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedBlob { .. }));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let desc = fixtures::clamped_linear_sampler();
        let mut buf = Vec::new();
        encode_sampler(&mut buf, &desc);
        buf.truncate(buf.len() - 1);

        let err = decode_sampler(&mut Reader::new(&buf)).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedBlob { .. }));
    }

    #[test]
    fn invalid_enum_discriminant_is_rejected() {
        let desc = fixtures::clamped_linear_sampler();
        let mut buf = Vec::new();
        encode_sampler(&mut buf, &desc);
        // First field is mag_filter; 99 is not a valid Filter.
        buf[0..4].copy_from_slice(&99u32.to_le_bytes());

        let err = decode_sampler(&mut Reader::new(&buf)).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedBlob { .. }));
    }

    #[test]
    fn oversized_list_length_is_rejected_without_allocation() {
        // A shader module claiming u32::MAX code words in a 4-byte payload.
        let mut buf = Vec::new();
        write_u32_le(&mut buf, u32::MAX);

        let err = decode_shader_module(&mut Reader::new(&buf)).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedBlob { .. }));
    }

    #[test]
    fn unresolved_handle_fails_encoding() {
        let desc = fixtures::sampled_image_set_layout(vec![SamplerHandle(0x1234)]);
        let mut buf = Vec::new();
        let mut deps = DepList::new();
        let err =
            encode_descriptor_set_layout(&mut buf, &desc, &EmptyResolver, &mut deps).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnresolvedHandle {
                kind: ObjectKind::Sampler,
                handle: 0x1234,
            }
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_filter() -> impl Strategy<Value = Filter> {
            prop_oneof![Just(Filter::Nearest), Just(Filter::Linear)]
        }

        fn arb_address_mode() -> impl Strategy<Value = AddressMode> {
            prop_oneof![
                Just(AddressMode::Repeat),
                Just(AddressMode::MirroredRepeat),
                Just(AddressMode::ClampToEdge),
                Just(AddressMode::ClampToBorder),
            ]
        }

        fn arb_ext() -> impl Strategy<Value = SamplerExt> {
            prop_oneof![
                prop_oneof![
                    Just(ReductionMode::WeightedAverage),
                    Just(ReductionMode::Min),
                    Just(ReductionMode::Max),
                ]
                .prop_map(SamplerExt::ReductionMode),
                prop::array::uniform4(any::<f32>())
                    .prop_map(|color| SamplerExt::CustomBorderColor { color }),
            ]
        }

        prop_compose! {
            fn arb_sampler()(
                mag_filter in arb_filter(),
                min_filter in arb_filter(),
                mipmap_mode in prop_oneof![Just(MipmapMode::Nearest), Just(MipmapMode::Linear)],
                address_mode_u in arb_address_mode(),
                address_mode_v in arb_address_mode(),
                address_mode_w in arb_address_mode(),
                mip_lod_bias in any::<f32>(),
                max_anisotropy in prop::option::of(any::<f32>()),
                compare_op in prop::option::of(prop_oneof![
                    Just(CompareOp::Never),
                    Just(CompareOp::Less),
                    Just(CompareOp::GreaterOrEqual),
                    Just(CompareOp::Always),
                ]),
                min_lod in any::<f32>(),
                max_lod in any::<f32>(),
                border_color in prop_oneof![
                    Just(BorderColor::TransparentBlack),
                    Just(BorderColor::OpaqueBlack),
                    Just(BorderColor::OpaqueWhite),
                ],
                unnormalized_coordinates in any::<bool>(),
                extensions in prop::collection::vec(arb_ext(), 0..3),
            ) -> SamplerDesc {
                SamplerDesc {
                    mag_filter,
                    min_filter,
                    mipmap_mode,
                    address_mode_u,
                    address_mode_v,
                    address_mode_w,
                    mip_lod_bias,
                    max_anisotropy,
                    compare_op,
                    min_lod,
                    max_lod,
                    border_color,
                    unnormalized_coordinates,
                    extensions,
                }
            }
        }

        proptest! {
            /// Arbitrary sampler descriptions decode back to themselves
            /// bit-for-bit (floats compared through their encoding, so
            /// NaN payloads survive too).
            #[test]
            fn arbitrary_sampler_roundtrips(desc in arb_sampler()) {
                let mut buf = Vec::new();
                encode_sampler(&mut buf, &desc);

                let mut r = Reader::new(&buf);
                let got = decode_sampler(&mut r).unwrap();
                prop_assert_eq!(r.remaining(), 0);

                let mut reencoded = Vec::new();
                encode_sampler(&mut reencoded, &got);
                prop_assert_eq!(buf, reencoded);
            }

            /// The canonical encoding is a pure function of content.
            #[test]
            fn encoding_is_deterministic(desc in arb_sampler()) {
                let mut a = Vec::new();
                encode_sampler(&mut a, &desc);
                let mut b = Vec::new();
                encode_sampler(&mut b, &desc.clone());
                prop_assert_eq!(a, b);
            }

            /// Arbitrary shader payloads roundtrip through the codec.
            #[test]
            fn arbitrary_shader_module_roundtrips(
                code in prop::collection::vec(any::<u32>(), 0..512)
            ) {
                let desc = ShaderModuleDesc { code };
                let mut buf = Vec::new();
                encode_shader_module(&mut buf, &desc);
                let got = decode_shader_module(&mut Reader::new(&buf)).unwrap();
                prop_assert_eq!(desc, got);
            }
        }
    }
}
