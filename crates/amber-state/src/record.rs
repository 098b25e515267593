//! Deduplicating recorder for pipeline-state graphs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use amber_arena::{ScratchArena, SliceRef};
use amber_core::id::{
    ComputePipelineHandle, DepList, DescriptorSetLayoutHandle, GraphicsPipelineHandle, Hash,
    ObjectKind, PipelineLayoutHandle, RenderPassHandle, SamplerHandle, ShaderModuleHandle,
};
use amber_core::layout::{DescriptorSetLayoutDesc, PipelineLayoutDesc};
use amber_core::pipeline::{ComputePipelineDesc, GraphicsPipelineDesc};
use amber_core::render_pass::RenderPassDesc;
use amber_core::sampler::SamplerDesc;
use amber_core::shader::ShaderModuleDesc;
use indexmap::IndexMap;

use crate::codec::{self, HandleResolver};
use crate::error::RecordError;
use crate::{FORMAT_VERSION, MAGIC};

/// One registered object: its canonical payload in the arena plus its
/// dependency edges in traversal order.
struct RecordEntry {
    payload: SliceRef,
    deps: DepList,
}

/// Per-kind record table: hash→record in registration order (insertion
/// index is the record's dense index) plus the handle→hash reverse map.
struct KindTable<H> {
    records: IndexMap<Hash, RecordEntry>,
    by_handle: HashMap<H, Hash>,
}

impl<H: Copy + Eq + std::hash::Hash> KindTable<H> {
    fn new() -> Self {
        Self {
            records: IndexMap::new(),
            by_handle: HashMap::new(),
        }
    }

    fn index_of(&self, hash: Hash) -> Option<u32> {
        self.records.get_index_of(&hash).map(|i| i as u32)
    }

    fn insert(&mut self, hash: Hash, entry: RecordEntry) -> u32 {
        let (index, _) = self.records.insert_full(hash, entry);
        index as u32
    }

    fn set_handle(&mut self, kind: ObjectKind, index: u32, handle: H) -> Result<(), RecordError> {
        let (&hash, _) = self
            .records
            .get_index(index as usize)
            .ok_or(RecordError::UnknownIndex { kind, index })?;
        // A reused handle value rebinds to the most recent object; only
        // the latest binding can be live in the backend.
        self.by_handle.insert(handle, hash);
        Ok(())
    }

    fn hash_for(&self, handle: H) -> Option<Hash> {
        self.by_handle.get(&handle).copied()
    }
}

struct Inner {
    arena: ScratchArena,
    samplers: KindTable<SamplerHandle>,
    shader_modules: KindTable<ShaderModuleHandle>,
    descriptor_set_layouts: KindTable<DescriptorSetLayoutHandle>,
    pipeline_layouts: KindTable<PipelineLayoutHandle>,
    render_passes: KindTable<RenderPassHandle>,
    compute_pipelines: KindTable<ComputePipelineHandle>,
    graphics_pipelines: KindTable<GraphicsPipelineHandle>,
}

impl Inner {
    fn records(&self, kind: ObjectKind) -> &IndexMap<Hash, RecordEntry> {
        match kind {
            ObjectKind::Sampler => &self.samplers.records,
            ObjectKind::ShaderModule => &self.shader_modules.records,
            ObjectKind::DescriptorSetLayout => &self.descriptor_set_layouts.records,
            ObjectKind::PipelineLayout => &self.pipeline_layouts.records,
            ObjectKind::RenderPass => &self.render_passes.records,
            ObjectKind::ComputePipeline => &self.compute_pipelines.records,
            ObjectKind::GraphicsPipeline => &self.graphics_pipelines.records,
        }
    }
}

impl HandleResolver for Inner {
    fn resolve_sampler(&self, handle: SamplerHandle) -> Option<Hash> {
        self.samplers.hash_for(handle)
    }
    fn resolve_shader_module(&self, handle: ShaderModuleHandle) -> Option<Hash> {
        self.shader_modules.hash_for(handle)
    }
    fn resolve_descriptor_set_layout(&self, handle: DescriptorSetLayoutHandle) -> Option<Hash> {
        self.descriptor_set_layouts.hash_for(handle)
    }
    fn resolve_pipeline_layout(&self, handle: PipelineLayoutHandle) -> Option<Hash> {
        self.pipeline_layouts.hash_for(handle)
    }
    fn resolve_render_pass(&self, handle: RenderPassHandle) -> Option<Hash> {
        self.render_passes.hash_for(handle)
    }
}

/// Deduplicating recorder for the full creation-time state of pipeline
/// objects.
///
/// Callers compute each description's content hash up front with the
/// functions in [`crate::hash`] (using the recorder itself as the
/// [`HandleResolver`]) and pass it to the matching `register_*` call.
/// The recorder does not recompute hashes; it trusts the caller so the
/// common duplicate path stays a single map probe.
///
/// Registration deep-copies the canonical encoding of each new
/// description into the recorder's arena and assigns the next dense
/// per-kind index. Re-registering a hash returns the existing index and
/// copies nothing. After the caller actually creates an object, it
/// reports the resulting backend handle through `set_*_handle`, which is
/// what allows later registrations to resolve references to that handle.
///
/// # Concurrency
///
/// All state sits behind one mutex, so any number of threads may call
/// `register_*` and `set_*_handle` concurrently. Two threads racing to
/// register the same hash agree on a single winning index; at most one
/// record is ever created per hash. Calls never block on anything but
/// the mutex and never suspend.
pub struct Recorder {
    inner: Mutex<Inner>,
}

// Compile-time assertion: Recorder must be shareable across capture threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Recorder>();
};

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                arena: ScratchArena::new(),
                samplers: KindTable::new(),
                shader_modules: KindTable::new(),
                descriptor_set_layouts: KindTable::new(),
                pipeline_layouts: KindTable::new(),
                render_passes: KindTable::new(),
                compute_pipelines: KindTable::new(),
                graphics_pipelines: KindTable::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Poisoning requires a panic inside the critical section, which
        // nothing in this crate does; treat it as fatal.
        self.inner.lock().expect("recorder lock poisoned")
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a sampler. Returns its dense index, existing or new.
    pub fn register_sampler(&self, hash: Hash, desc: &SamplerDesc) -> u32 {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.samplers.index_of(hash) {
            return index;
        }
        let mut buf = Vec::new();
        codec::encode_sampler(&mut buf, desc);
        let payload = inner.arena.push(&buf);
        inner.samplers.insert(
            hash,
            RecordEntry {
                payload,
                deps: DepList::new(),
            },
        )
    }

    /// Register a shader module. Returns its dense index, existing or new.
    pub fn register_shader_module(&self, hash: Hash, desc: &ShaderModuleDesc) -> u32 {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.shader_modules.index_of(hash) {
            return index;
        }
        let mut buf = Vec::with_capacity(4 + desc.code.len() * 4);
        codec::encode_shader_module(&mut buf, desc);
        let payload = inner.arena.push(&buf);
        inner.shader_modules.insert(
            hash,
            RecordEntry {
                payload,
                deps: DepList::new(),
            },
        )
    }

    /// Register a render pass. Returns its dense index, existing or new.
    pub fn register_render_pass(&self, hash: Hash, desc: &RenderPassDesc) -> u32 {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.render_passes.index_of(hash) {
            return index;
        }
        let mut buf = Vec::new();
        codec::encode_render_pass(&mut buf, desc);
        let payload = inner.arena.push(&buf);
        inner.render_passes.insert(
            hash,
            RecordEntry {
                payload,
                deps: DepList::new(),
            },
        )
    }

    /// Register a descriptor set layout.
    ///
    /// Fails with [`RecordError::UnresolvedHandle`] if any immutable
    /// sampler handle has no recorded hash; nothing is registered in that
    /// case.
    pub fn register_descriptor_set_layout(
        &self,
        hash: Hash,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<u32, RecordError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.descriptor_set_layouts.index_of(hash) {
            return Ok(index);
        }
        let mut buf = Vec::new();
        let mut deps = DepList::new();
        codec::encode_descriptor_set_layout(&mut buf, desc, &*inner, &mut deps)?;
        let payload = inner.arena.push(&buf);
        Ok(inner
            .descriptor_set_layouts
            .insert(hash, RecordEntry { payload, deps }))
    }

    /// Register a pipeline layout.
    ///
    /// Fails with [`RecordError::UnresolvedHandle`] if any set-layout
    /// handle has no recorded hash.
    pub fn register_pipeline_layout(
        &self,
        hash: Hash,
        desc: &PipelineLayoutDesc,
    ) -> Result<u32, RecordError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.pipeline_layouts.index_of(hash) {
            return Ok(index);
        }
        let mut buf = Vec::new();
        let mut deps = DepList::new();
        codec::encode_pipeline_layout(&mut buf, desc, &*inner, &mut deps)?;
        let payload = inner.arena.push(&buf);
        Ok(inner
            .pipeline_layouts
            .insert(hash, RecordEntry { payload, deps }))
    }

    /// Register a compute pipeline.
    ///
    /// Fails with [`RecordError::UnresolvedHandle`] if the module or
    /// layout handle has no recorded hash.
    pub fn register_compute_pipeline(
        &self,
        hash: Hash,
        desc: &ComputePipelineDesc,
    ) -> Result<u32, RecordError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.compute_pipelines.index_of(hash) {
            return Ok(index);
        }
        let mut buf = Vec::new();
        let mut deps = DepList::new();
        codec::encode_compute_pipeline(&mut buf, desc, &*inner, &mut deps)?;
        let payload = inner.arena.push(&buf);
        Ok(inner
            .compute_pipelines
            .insert(hash, RecordEntry { payload, deps }))
    }

    /// Register a graphics pipeline.
    ///
    /// Fails with [`RecordError::UnresolvedHandle`] if any stage module,
    /// the layout, or the render pass handle has no recorded hash.
    pub fn register_graphics_pipeline(
        &self,
        hash: Hash,
        desc: &GraphicsPipelineDesc,
    ) -> Result<u32, RecordError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if let Some(index) = inner.graphics_pipelines.index_of(hash) {
            return Ok(index);
        }
        let mut buf = Vec::new();
        let mut deps = DepList::new();
        codec::encode_graphics_pipeline(&mut buf, desc, &*inner, &mut deps)?;
        let payload = inner.arena.push(&buf);
        Ok(inner
            .graphics_pipelines
            .insert(hash, RecordEntry { payload, deps }))
    }

    // ── Handle registration ─────────────────────────────────────

    /// Record the backend handle created for the sampler at `index`.
    pub fn set_sampler_handle(&self, index: u32, handle: SamplerHandle) -> Result<(), RecordError> {
        self.lock()
            .samplers
            .set_handle(ObjectKind::Sampler, index, handle)
    }

    /// Record the backend handle created for the shader module at `index`.
    pub fn set_shader_module_handle(
        &self,
        index: u32,
        handle: ShaderModuleHandle,
    ) -> Result<(), RecordError> {
        self.lock()
            .shader_modules
            .set_handle(ObjectKind::ShaderModule, index, handle)
    }

    /// Record the backend handle created for the descriptor set layout at
    /// `index`.
    pub fn set_descriptor_set_layout_handle(
        &self,
        index: u32,
        handle: DescriptorSetLayoutHandle,
    ) -> Result<(), RecordError> {
        self.lock().descriptor_set_layouts.set_handle(
            ObjectKind::DescriptorSetLayout,
            index,
            handle,
        )
    }

    /// Record the backend handle created for the pipeline layout at `index`.
    pub fn set_pipeline_layout_handle(
        &self,
        index: u32,
        handle: PipelineLayoutHandle,
    ) -> Result<(), RecordError> {
        self.lock()
            .pipeline_layouts
            .set_handle(ObjectKind::PipelineLayout, index, handle)
    }

    /// Record the backend handle created for the render pass at `index`.
    pub fn set_render_pass_handle(
        &self,
        index: u32,
        handle: RenderPassHandle,
    ) -> Result<(), RecordError> {
        self.lock()
            .render_passes
            .set_handle(ObjectKind::RenderPass, index, handle)
    }

    /// Record the backend handle created for the compute pipeline at `index`.
    pub fn set_compute_pipeline_handle(
        &self,
        index: u32,
        handle: ComputePipelineHandle,
    ) -> Result<(), RecordError> {
        self.lock()
            .compute_pipelines
            .set_handle(ObjectKind::ComputePipeline, index, handle)
    }

    /// Record the backend handle created for the graphics pipeline at `index`.
    pub fn set_graphics_pipeline_handle(
        &self,
        index: u32,
        handle: GraphicsPipelineHandle,
    ) -> Result<(), RecordError> {
        self.lock()
            .graphics_pipelines
            .set_handle(ObjectKind::GraphicsPipeline, index, handle)
    }

    // ── Handle lookup ───────────────────────────────────────────

    /// Hash of the sampler a handle was created from, or `None` if the
    /// handle never passed through
    /// [`set_sampler_handle`](Self::set_sampler_handle). `None` means
    /// "this object was not produced by us" and must be treated as a
    /// record-time error by callers, never as an ignorable dependency.
    pub fn hash_for_sampler(&self, handle: SamplerHandle) -> Option<Hash> {
        self.lock().samplers.hash_for(handle)
    }

    /// Hash of the shader module a handle was created from.
    pub fn hash_for_shader_module(&self, handle: ShaderModuleHandle) -> Option<Hash> {
        self.lock().shader_modules.hash_for(handle)
    }

    /// Hash of the descriptor set layout a handle was created from.
    pub fn hash_for_descriptor_set_layout(
        &self,
        handle: DescriptorSetLayoutHandle,
    ) -> Option<Hash> {
        self.lock().descriptor_set_layouts.hash_for(handle)
    }

    /// Hash of the pipeline layout a handle was created from.
    pub fn hash_for_pipeline_layout(&self, handle: PipelineLayoutHandle) -> Option<Hash> {
        self.lock().pipeline_layouts.hash_for(handle)
    }

    /// Hash of the render pass a handle was created from.
    pub fn hash_for_render_pass(&self, handle: RenderPassHandle) -> Option<Hash> {
        self.lock().render_passes.hash_for(handle)
    }

    /// Hash of the compute pipeline a handle was created from.
    pub fn hash_for_compute_pipeline(&self, handle: ComputePipelineHandle) -> Option<Hash> {
        self.lock().compute_pipelines.hash_for(handle)
    }

    /// Hash of the graphics pipeline a handle was created from.
    pub fn hash_for_graphics_pipeline(&self, handle: GraphicsPipelineHandle) -> Option<Hash> {
        self.lock().graphics_pipelines.hash_for(handle)
    }

    // ── Introspection ───────────────────────────────────────────

    /// Number of unique records of `kind`.
    pub fn record_count(&self, kind: ObjectKind) -> usize {
        self.lock().records(kind).len()
    }

    /// Dependency hashes of the record at (`kind`, `index`), in traversal
    /// order.
    pub fn dependencies(&self, kind: ObjectKind, index: u32) -> Option<Vec<Hash>> {
        let inner = self.lock();
        inner
            .records(kind)
            .get_index(index as usize)
            .map(|(_, e)| e.deps.to_vec())
    }

    /// Canonical payload bytes of the record at (`kind`, `index`).
    pub fn payload(&self, kind: ObjectKind, index: u32) -> Option<Vec<u8>> {
        let inner = self.lock();
        inner
            .records(kind)
            .get_index(index as usize)
            .map(|(_, e)| inner.arena.get(e.payload).to_vec())
    }

    /// Run `f` against the backing arena, for debug tooling.
    pub fn with_arena<R>(&self, f: impl FnOnce(&ScratchArena) -> R) -> R {
        f(&self.lock().arena)
    }

    // ── Serialization ───────────────────────────────────────────

    /// Serialize the full graph to a blob.
    ///
    /// Stable: the same recorder state always produces identical bytes,
    /// however many times this is called, so the blob itself can be
    /// content-addressed by its consumers.
    pub fn serialize(&self) -> Vec<u8> {
        let inner = self.lock();
        let payload_total: usize = ObjectKind::DECODE_ORDER
            .iter()
            .flat_map(|&kind| inner.records(kind).values())
            .map(|e| e.payload.len() + 12)
            .sum();
        let mut out = Vec::with_capacity(MAGIC.len() + 1 + 7 * 5 + payload_total);

        out.extend_from_slice(&MAGIC);
        codec::write_u8(&mut out, FORMAT_VERSION);
        for kind in ObjectKind::DECODE_ORDER {
            let records = inner.records(kind);
            codec::write_u8(&mut out, kind.tag());
            codec::write_u32_le(&mut out, records.len() as u32);
            for (hash, entry) in records {
                codec::write_u64_le(&mut out, hash.0);
                let payload = inner.arena.get(entry.payload);
                codec::write_u32_le(&mut out, payload.len() as u32);
                out.extend_from_slice(payload);
            }
        }
        out
    }
}

impl HandleResolver for Recorder {
    fn resolve_sampler(&self, handle: SamplerHandle) -> Option<Hash> {
        self.lock().resolve_sampler(handle)
    }
    fn resolve_shader_module(&self, handle: ShaderModuleHandle) -> Option<Hash> {
        self.lock().resolve_shader_module(handle)
    }
    fn resolve_descriptor_set_layout(&self, handle: DescriptorSetLayoutHandle) -> Option<Hash> {
        self.lock().resolve_descriptor_set_layout(handle)
    }
    fn resolve_pipeline_layout(&self, handle: PipelineLayoutHandle) -> Option<Hash> {
        self.lock().resolve_pipeline_layout(handle)
    }
    fn resolve_render_pass(&self, handle: RenderPassHandle) -> Option<Hash> {
        self.lock().resolve_render_pass(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use amber_test_utils::fixtures;

    #[test]
    fn registering_twice_returns_same_index_and_copies_once() {
        let recorder = Recorder::new();
        let desc = fixtures::clamped_linear_sampler();
        let h = hash::sampler_hash(&desc);

        let first = recorder.register_sampler(h, &desc);
        let used_after_first = recorder.with_arena(|a| a.bytes_used());
        let second = recorder.register_sampler(h, &desc);
        let used_after_second = recorder.with_arena(|a| a.bytes_used());

        assert_eq!(first, second);
        assert_eq!(recorder.record_count(ObjectKind::Sampler), 1);
        assert_eq!(used_after_first, used_after_second);
    }

    #[test]
    fn distinct_content_gets_distinct_indices() {
        let recorder = Recorder::new();
        let a = fixtures::clamped_linear_sampler();
        let mut b = a.clone();
        b.min_lod = 1.5;

        let ia = recorder.register_sampler(hash::sampler_hash(&a), &a);
        let ib = recorder.register_sampler(hash::sampler_hash(&b), &b);
        assert_eq!(ia, 0);
        assert_eq!(ib, 1);
    }

    #[test]
    fn set_handle_on_unknown_index_fails() {
        let recorder = Recorder::new();
        let err = recorder
            .set_sampler_handle(0, SamplerHandle(7))
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownIndex {
                kind: ObjectKind::Sampler,
                index: 0,
            }
        );
    }

    #[test]
    fn handle_resolution_follows_set_handle() {
        let recorder = Recorder::new();
        let desc = fixtures::clamped_linear_sampler();
        let h = hash::sampler_hash(&desc);
        let index = recorder.register_sampler(h, &desc);

        let handle = SamplerHandle(0xAB);
        assert_eq!(recorder.hash_for_sampler(handle), None);
        recorder.set_sampler_handle(index, handle).unwrap();
        assert_eq!(recorder.hash_for_sampler(handle), Some(h));
    }

    #[test]
    fn registration_referencing_unknown_handle_fails() {
        let recorder = Recorder::new();
        let layout = fixtures::sampled_image_set_layout(vec![SamplerHandle(0x99)]);
        let err = hash::descriptor_set_layout_hash(&recorder, &layout).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnresolvedHandle {
                kind: ObjectKind::Sampler,
                handle: 0x99,
            }
        );
    }

    #[test]
    fn dependency_edges_are_recorded_in_traversal_order() {
        let recorder = Recorder::new();

        let s = fixtures::clamped_linear_sampler();
        let hs = hash::sampler_hash(&s);
        let si = recorder.register_sampler(hs, &s);
        recorder.set_sampler_handle(si, SamplerHandle(1)).unwrap();

        let layout = fixtures::sampled_image_set_layout(vec![SamplerHandle(1)]);
        let hl = hash::descriptor_set_layout_hash(&recorder, &layout).unwrap();
        let li = recorder
            .register_descriptor_set_layout(hl, &layout)
            .unwrap();

        assert_eq!(
            recorder.dependencies(ObjectKind::DescriptorSetLayout, li),
            Some(vec![hs])
        );
    }

    #[test]
    fn serialize_is_stable_across_calls() {
        let recorder = Recorder::new();
        let s = fixtures::clamped_linear_sampler();
        recorder.register_sampler(hash::sampler_hash(&s), &s);
        let m = fixtures::shader_module(&[1, 2, 3]);
        recorder.register_shader_module(hash::shader_module_hash(&m), &m);

        assert_eq!(recorder.serialize(), recorder.serialize());
    }

    #[test]
    fn empty_recorder_serializes_seven_empty_sections() {
        let recorder = Recorder::new();
        let blob = recorder.serialize();
        // magic + version + 7 × (tag + zero count)
        assert_eq!(blob.len(), 4 + 1 + 7 * 5);
        assert_eq!(&blob[0..4], b"AMBR");
    }
}
