//! Blob parsing and dependency-ordered replay.

use amber_arena::{ScratchArena, SliceRef};
use amber_core::id::{
    ComputePipelineHandle, DepList, DescriptorSetLayoutHandle, GraphicsPipelineHandle, Hash,
    ObjectKind, PipelineLayoutHandle, RenderPassHandle, SamplerHandle, ShaderModuleHandle,
};
use indexmap::IndexMap;

use crate::codec::{self, DepRef, Reader, RefResolver};
use crate::creator::Creator;
use crate::error::ReplayError;
use crate::hash::payload_hash;
use crate::{FORMAT_VERSION, MAGIC};

/// What happened to one record during replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome<H> {
    /// The backend created the object and assigned this handle.
    Created(H),
    /// The backend returned `None` for this object.
    Failed,
    /// A direct or transitive dependency failed, so the record was never
    /// passed to the backend.
    Skipped,
}

impl<H: Copy> ReplayOutcome<H> {
    /// The created handle, if any.
    pub fn handle(&self) -> Option<H> {
        match self {
            Self::Created(h) => Some(*h),
            Self::Failed | Self::Skipped => None,
        }
    }
}

/// One decoded record: its content hash, arena-backed payload, dependency
/// edges, and replay outcome.
#[derive(Debug)]
pub struct ReplayedRecord<H> {
    hash: Hash,
    payload: SliceRef,
    deps: DepList,
    outcome: ReplayOutcome<H>,
}

impl<H: Copy> ReplayedRecord<H> {
    /// Content hash of the record.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Dependency hashes in traversal order.
    pub fn deps(&self) -> &[Hash] {
        &self.deps
    }

    /// Replay outcome.
    pub fn outcome(&self) -> ReplayOutcome<H> {
        self.outcome
    }
}

#[derive(Default, Debug)]
struct Tables {
    samplers: IndexMap<Hash, ReplayedRecord<SamplerHandle>>,
    shader_modules: IndexMap<Hash, ReplayedRecord<ShaderModuleHandle>>,
    descriptor_set_layouts: IndexMap<Hash, ReplayedRecord<DescriptorSetLayoutHandle>>,
    pipeline_layouts: IndexMap<Hash, ReplayedRecord<PipelineLayoutHandle>>,
    render_passes: IndexMap<Hash, ReplayedRecord<RenderPassHandle>>,
    compute_pipelines: IndexMap<Hash, ReplayedRecord<ComputePipelineHandle>>,
    graphics_pipelines: IndexMap<Hash, ReplayedRecord<GraphicsPipelineHandle>>,
}

fn lookup<H: Copy>(
    table: &IndexMap<Hash, ReplayedRecord<H>>,
    kind: ObjectKind,
    hash: Hash,
) -> Result<DepRef<H>, ReplayError> {
    match table.get(&hash) {
        Some(record) => Ok(match record.outcome.handle() {
            Some(h) => DepRef::Live(h),
            None => DepRef::Unavailable,
        }),
        None => Err(ReplayError::UnresolvedReference { kind, hash }),
    }
}

impl RefResolver for Tables {
    fn sampler_ref(&self, hash: Hash) -> Result<DepRef<SamplerHandle>, ReplayError> {
        lookup(&self.samplers, ObjectKind::Sampler, hash)
    }
    fn shader_module_ref(&self, hash: Hash) -> Result<DepRef<ShaderModuleHandle>, ReplayError> {
        lookup(&self.shader_modules, ObjectKind::ShaderModule, hash)
    }
    fn descriptor_set_layout_ref(
        &self,
        hash: Hash,
    ) -> Result<DepRef<DescriptorSetLayoutHandle>, ReplayError> {
        lookup(
            &self.descriptor_set_layouts,
            ObjectKind::DescriptorSetLayout,
            hash,
        )
    }
    fn pipeline_layout_ref(
        &self,
        hash: Hash,
    ) -> Result<DepRef<PipelineLayoutHandle>, ReplayError> {
        lookup(&self.pipeline_layouts, ObjectKind::PipelineLayout, hash)
    }
    fn render_pass_ref(&self, hash: Hash) -> Result<DepRef<RenderPassHandle>, ReplayError> {
        lookup(&self.render_passes, ObjectKind::RenderPass, hash)
    }
}

/// Reads one record header and stages its payload into the arena,
/// verifying the payload against the stored content hash first.
fn stage_record(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    kind: ObjectKind,
    index: u32,
) -> Result<(Hash, SliceRef), ReplayError> {
    let hash = Hash(r.read_u64_le()?);
    let len = r.read_u32_le()? as usize;
    let bytes = r.read_bytes(len)?;

    let computed = payload_hash(bytes);
    if computed != hash {
        return Err(ReplayError::HashMismatch {
            kind,
            index,
            recorded: hash,
            computed,
        });
    }
    Ok((hash, arena.push(bytes)))
}

fn section_header(r: &mut Reader<'_>, expected: ObjectKind) -> Result<u32, ReplayError> {
    let tag = r.read_u8()?;
    let found = ObjectKind::from_tag(tag).ok_or_else(|| ReplayError::MalformedBlob {
        detail: format!("unknown section tag {tag}"),
    })?;
    if found != expected {
        return Err(ReplayError::UnexpectedKind { expected, found });
    }
    r.read_u32_le()
}

fn check_unique<H>(
    table: &IndexMap<Hash, ReplayedRecord<H>>,
    kind: ObjectKind,
    hash: Hash,
) -> Result<(), ReplayError> {
    if table.contains_key(&hash) {
        return Err(ReplayError::MalformedBlob {
            detail: format!("duplicate {kind} hash {hash}"),
        });
    }
    Ok(())
}

fn expect_consumed(r: &Reader<'_>, kind: ObjectKind, index: u32) -> Result<(), ReplayError> {
    if r.remaining() != 0 {
        return Err(ReplayError::MalformedBlob {
            detail: format!(
                "{} trailing bytes after {kind} record {index}",
                r.remaining()
            ),
        });
    }
    Ok(())
}

/// Replays a serialized blob against a [`Creator`] backend.
///
/// Construction happens entirely inside [`parse`](Self::parse); the
/// resulting value is the decoded record graph — hashes, dependency
/// edges, per-record outcomes, and the arena holding every payload — for
/// inspection after the backend has consumed the creations.
///
/// Parsing is a single forward pass in [`ObjectKind::DECODE_ORDER`].
/// Every record's payload is verified against its stored content hash,
/// staged into the replayer's arena, decoded with its dependency hashes
/// rewritten to the handles the backend returned, and enqueued on the
/// backend. [`Creator::wait_enqueue`] runs between dependency levels so
/// an asynchronous backend has finished constructing every object before
/// anything that references it is enqueued, and once more before `parse`
/// returns, after which the arena only needs to outlive the `Replayer`
/// itself.
#[derive(Debug)]
pub struct Replayer {
    arena: ScratchArena,
    tables: Tables,
}

impl Replayer {
    /// Parse `blob` and replay it against `creator`.
    ///
    /// Any structural problem — bad magic, unsupported version,
    /// truncation, unknown discriminants, forward references, hash
    /// mismatches, a rejected `set_num_*` — fails the whole parse with no
    /// partial result. Per-object creation failures do not: the failed
    /// object and its transitive dependents are recorded as
    /// [`ReplayOutcome::Failed`] / [`ReplayOutcome::Skipped`] and
    /// everything independent of them still replays.
    pub fn parse(creator: &mut dyn Creator, blob: &[u8]) -> Result<Self, ReplayError> {
        let mut r = Reader::new(blob);

        let magic = r.read_bytes(MAGIC.len())?;
        if magic != MAGIC {
            return Err(ReplayError::InvalidMagic);
        }
        let version = r.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(ReplayError::UnsupportedVersion { found: version });
        }

        let mut arena = ScratchArena::new();
        let mut tables = Tables::default();

        parse_samplers(&mut r, &mut arena, &mut tables, creator)?;
        parse_shader_modules(&mut r, &mut arena, &mut tables, creator)?;
        creator.wait_enqueue();

        parse_descriptor_set_layouts(&mut r, &mut arena, &mut tables, creator)?;
        creator.wait_enqueue();

        parse_pipeline_layouts(&mut r, &mut arena, &mut tables, creator)?;
        parse_render_passes(&mut r, &mut arena, &mut tables, creator)?;
        creator.wait_enqueue();

        parse_compute_pipelines(&mut r, &mut arena, &mut tables, creator)?;
        parse_graphics_pipelines(&mut r, &mut arena, &mut tables, creator)?;
        creator.wait_enqueue();

        if r.remaining() != 0 {
            return Err(ReplayError::MalformedBlob {
                detail: format!("{} trailing bytes after final section", r.remaining()),
            });
        }

        Ok(Self { arena, tables })
    }

    /// Number of decoded records of `kind`.
    pub fn record_count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Sampler => self.tables.samplers.len(),
            ObjectKind::ShaderModule => self.tables.shader_modules.len(),
            ObjectKind::DescriptorSetLayout => self.tables.descriptor_set_layouts.len(),
            ObjectKind::PipelineLayout => self.tables.pipeline_layouts.len(),
            ObjectKind::RenderPass => self.tables.render_passes.len(),
            ObjectKind::ComputePipeline => self.tables.compute_pipelines.len(),
            ObjectKind::GraphicsPipeline => self.tables.graphics_pipelines.len(),
        }
    }

    /// The sampler record at `index`, in decode order.
    pub fn sampler_record(&self, index: u32) -> Option<&ReplayedRecord<SamplerHandle>> {
        self.tables.samplers.get_index(index as usize).map(|(_, v)| v)
    }

    /// The shader module record at `index`.
    pub fn shader_module_record(&self, index: u32) -> Option<&ReplayedRecord<ShaderModuleHandle>> {
        self.tables
            .shader_modules
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// The descriptor set layout record at `index`.
    pub fn descriptor_set_layout_record(
        &self,
        index: u32,
    ) -> Option<&ReplayedRecord<DescriptorSetLayoutHandle>> {
        self.tables
            .descriptor_set_layouts
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// The pipeline layout record at `index`.
    pub fn pipeline_layout_record(
        &self,
        index: u32,
    ) -> Option<&ReplayedRecord<PipelineLayoutHandle>> {
        self.tables
            .pipeline_layouts
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// The render pass record at `index`.
    pub fn render_pass_record(&self, index: u32) -> Option<&ReplayedRecord<RenderPassHandle>> {
        self.tables
            .render_passes
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// The compute pipeline record at `index`.
    pub fn compute_pipeline_record(
        &self,
        index: u32,
    ) -> Option<&ReplayedRecord<ComputePipelineHandle>> {
        self.tables
            .compute_pipelines
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// The graphics pipeline record at `index`.
    pub fn graphics_pipeline_record(
        &self,
        index: u32,
    ) -> Option<&ReplayedRecord<GraphicsPipelineHandle>> {
        self.tables
            .graphics_pipelines
            .get_index(index as usize)
            .map(|(_, v)| v)
    }

    /// Canonical payload bytes of the record at (`kind`, `index`).
    pub fn payload(&self, kind: ObjectKind, index: u32) -> Option<&[u8]> {
        let payload = match kind {
            ObjectKind::Sampler => self.sampler_record(index)?.payload,
            ObjectKind::ShaderModule => self.shader_module_record(index)?.payload,
            ObjectKind::DescriptorSetLayout => self.descriptor_set_layout_record(index)?.payload,
            ObjectKind::PipelineLayout => self.pipeline_layout_record(index)?.payload,
            ObjectKind::RenderPass => self.render_pass_record(index)?.payload,
            ObjectKind::ComputePipeline => self.compute_pipeline_record(index)?.payload,
            ObjectKind::GraphicsPipeline => self.graphics_pipeline_record(index)?.payload,
        };
        Some(self.arena.get(payload))
    }

    /// The backing arena, for debug tooling.
    pub fn arena(&self) -> &ScratchArena {
        &self.arena
    }
}

fn parse_samplers(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::Sampler;
    let count = section_header(r, KIND)?;
    if !creator.set_num_samplers(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.samplers, KIND, hash)?;
        let desc = {
            let mut pr = Reader::new(arena.get(payload));
            let desc = codec::decode_sampler(&mut pr)?;
            expect_consumed(&pr, KIND, index)?;
            desc
        };
        let outcome = match creator.enqueue_create_sampler(hash, index, &desc) {
            Some(h) => ReplayOutcome::Created(h),
            None => ReplayOutcome::Failed,
        };
        tables.samplers.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: DepList::new(),
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_shader_modules(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::ShaderModule;
    let count = section_header(r, KIND)?;
    if !creator.set_num_shader_modules(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.shader_modules, KIND, hash)?;
        let desc = {
            let mut pr = Reader::new(arena.get(payload));
            let desc = codec::decode_shader_module(&mut pr)?;
            expect_consumed(&pr, KIND, index)?;
            desc
        };
        let outcome = match creator.enqueue_create_shader_module(hash, index, &desc) {
            Some(h) => ReplayOutcome::Created(h),
            None => ReplayOutcome::Failed,
        };
        tables.shader_modules.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: DepList::new(),
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_descriptor_set_layouts(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::DescriptorSetLayout;
    let count = section_header(r, KIND)?;
    if !creator.set_num_descriptor_set_layouts(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.descriptor_set_layouts, KIND, hash)?;
        let decoded = {
            let mut pr = Reader::new(arena.get(payload));
            let decoded = codec::decode_descriptor_set_layout(&mut pr, &*tables)?;
            expect_consumed(&pr, KIND, index)?;
            decoded
        };
        let outcome = if decoded.missing_dep {
            ReplayOutcome::Skipped
        } else {
            match creator.enqueue_create_descriptor_set_layout(hash, index, &decoded.desc) {
                Some(h) => ReplayOutcome::Created(h),
                None => ReplayOutcome::Failed,
            }
        };
        tables.descriptor_set_layouts.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: decoded.deps,
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_pipeline_layouts(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::PipelineLayout;
    let count = section_header(r, KIND)?;
    if !creator.set_num_pipeline_layouts(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.pipeline_layouts, KIND, hash)?;
        let decoded = {
            let mut pr = Reader::new(arena.get(payload));
            let decoded = codec::decode_pipeline_layout(&mut pr, &*tables)?;
            expect_consumed(&pr, KIND, index)?;
            decoded
        };
        let outcome = if decoded.missing_dep {
            ReplayOutcome::Skipped
        } else {
            match creator.enqueue_create_pipeline_layout(hash, index, &decoded.desc) {
                Some(h) => ReplayOutcome::Created(h),
                None => ReplayOutcome::Failed,
            }
        };
        tables.pipeline_layouts.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: decoded.deps,
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_render_passes(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::RenderPass;
    let count = section_header(r, KIND)?;
    if !creator.set_num_render_passes(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.render_passes, KIND, hash)?;
        let desc = {
            let mut pr = Reader::new(arena.get(payload));
            let desc = codec::decode_render_pass(&mut pr)?;
            expect_consumed(&pr, KIND, index)?;
            desc
        };
        let outcome = match creator.enqueue_create_render_pass(hash, index, &desc) {
            Some(h) => ReplayOutcome::Created(h),
            None => ReplayOutcome::Failed,
        };
        tables.render_passes.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: DepList::new(),
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_compute_pipelines(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::ComputePipeline;
    let count = section_header(r, KIND)?;
    if !creator.set_num_compute_pipelines(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.compute_pipelines, KIND, hash)?;
        let decoded = {
            let mut pr = Reader::new(arena.get(payload));
            let decoded = codec::decode_compute_pipeline(&mut pr, &*tables)?;
            expect_consumed(&pr, KIND, index)?;
            decoded
        };
        let outcome = if decoded.missing_dep {
            ReplayOutcome::Skipped
        } else {
            match creator.enqueue_create_compute_pipeline(hash, index, &decoded.desc) {
                Some(h) => ReplayOutcome::Created(h),
                None => ReplayOutcome::Failed,
            }
        };
        tables.compute_pipelines.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: decoded.deps,
                outcome,
            },
        );
    }
    Ok(())
}

fn parse_graphics_pipelines(
    r: &mut Reader<'_>,
    arena: &mut ScratchArena,
    tables: &mut Tables,
    creator: &mut dyn Creator,
) -> Result<(), ReplayError> {
    const KIND: ObjectKind = ObjectKind::GraphicsPipeline;
    let count = section_header(r, KIND)?;
    if !creator.set_num_graphics_pipelines(count) {
        return Err(ReplayError::CreatorRejected { kind: KIND, count });
    }
    for index in 0..count {
        let (hash, payload) = stage_record(r, arena, KIND, index)?;
        check_unique(&tables.graphics_pipelines, KIND, hash)?;
        let decoded = {
            let mut pr = Reader::new(arena.get(payload));
            let decoded = codec::decode_graphics_pipeline(&mut pr, &*tables)?;
            expect_consumed(&pr, KIND, index)?;
            decoded
        };
        let outcome = if decoded.missing_dep {
            ReplayOutcome::Skipped
        } else {
            match creator.enqueue_create_graphics_pipeline(hash, index, &decoded.desc) {
                Some(h) => ReplayOutcome::Created(h),
                None => ReplayOutcome::Failed,
            }
        };
        tables.graphics_pipelines.insert(
            hash,
            ReplayedRecord {
                hash,
                payload,
                deps: decoded.deps,
                outcome,
            },
        );
    }
    Ok(())
}
