//! Test utilities and mock types for Amber development.
//!
//! Provides [`MockCreator`], a scripted [`Creator`] implementation that
//! logs every call it receives, and the [`fixtures`] module of
//! ready-made create-descriptions for tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, HashSet};

use amber_core::id::{
    ComputePipelineHandle, DescriptorSetLayoutHandle, GraphicsPipelineHandle, Hash, ObjectKind,
    PipelineLayoutHandle, RenderPassHandle, SamplerHandle, ShaderModuleHandle,
};
use amber_core::layout::{DescriptorSetLayoutDesc, PipelineLayoutDesc};
use amber_core::pipeline::{ComputePipelineDesc, GraphicsPipelineDesc};
use amber_core::render_pass::RenderPassDesc;
use amber_core::sampler::SamplerDesc;
use amber_core::shader::ShaderModuleDesc;
use amber_state::Creator;

/// One call observed by a [`MockCreator`], in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreatorCall {
    SetNum {
        kind: ObjectKind,
        count: u32,
    },
    Create {
        kind: ObjectKind,
        hash: Hash,
        index: u32,
        /// The assigned handle value, or `None` when the creation was
        /// scripted to fail.
        handle: Option<u64>,
    },
    WaitEnqueue,
}

/// Scripted creation backend for tests.
///
/// Assigns monotonically increasing handle values (starting at
/// `0x1000`, shared across kinds so every handle in a test run is
/// distinct), records every call in [`calls`](Self::calls), and keeps a
/// clone of each successfully created description for assertions.
///
/// Failure injection: content hashes in [`fail_hashes`](Self::fail_hashes)
/// fail creation (`enqueue_create_*` returns `None`); kinds in
/// [`reject_kinds`](Self::reject_kinds) refuse their capacity
/// announcement (`set_num_*` returns false).
#[derive(Default)]
pub struct MockCreator {
    pub calls: Vec<CreatorCall>,
    pub fail_hashes: HashSet<Hash>,
    pub reject_kinds: HashSet<ObjectKind>,
    next_handle: u64,
    handles: HashMap<(ObjectKind, Hash), u64>,
    pub samplers: Vec<(Hash, u32, SamplerDesc)>,
    pub shader_modules: Vec<(Hash, u32, ShaderModuleDesc)>,
    pub descriptor_set_layouts: Vec<(Hash, u32, DescriptorSetLayoutDesc)>,
    pub pipeline_layouts: Vec<(Hash, u32, PipelineLayoutDesc)>,
    pub render_passes: Vec<(Hash, u32, RenderPassDesc)>,
    pub compute_pipelines: Vec<(Hash, u32, ComputePipelineDesc)>,
    pub graphics_pipelines: Vec<(Hash, u32, GraphicsPipelineDesc)>,
}

impl MockCreator {
    pub fn new() -> Self {
        Self {
            next_handle: 0x1000,
            ..Self::default()
        }
    }

    /// A mock that fails creation of the given content hashes.
    pub fn failing(hashes: impl IntoIterator<Item = Hash>) -> Self {
        let mut mock = Self::new();
        mock.fail_hashes = hashes.into_iter().collect();
        mock
    }

    /// The handle value assigned to (`kind`, `hash`), if it was created.
    pub fn handle_for(&self, kind: ObjectKind, hash: Hash) -> Option<u64> {
        self.handles.get(&(kind, hash)).copied()
    }

    /// Number of `wait_enqueue` calls observed.
    pub fn wait_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, CreatorCall::WaitEnqueue))
            .count()
    }

    /// The `(kind, hash)` of every enqueued creation, in call order,
    /// successful or failed.
    pub fn create_order(&self) -> Vec<(ObjectKind, Hash)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CreatorCall::Create { kind, hash, .. } => Some((*kind, *hash)),
                _ => None,
            })
            .collect()
    }

    fn set_num(&mut self, kind: ObjectKind, count: u32) -> bool {
        self.calls.push(CreatorCall::SetNum { kind, count });
        !self.reject_kinds.contains(&kind)
    }

    fn create(&mut self, kind: ObjectKind, hash: Hash, index: u32) -> Option<u64> {
        let handle = if self.fail_hashes.contains(&hash) {
            None
        } else {
            let h = self.next_handle;
            self.next_handle += 1;
            self.handles.insert((kind, hash), h);
            Some(h)
        };
        self.calls.push(CreatorCall::Create {
            kind,
            hash,
            index,
            handle,
        });
        handle
    }
}

impl Creator for MockCreator {
    fn set_num_samplers(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::Sampler, count)
    }
    fn set_num_shader_modules(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::ShaderModule, count)
    }
    fn set_num_descriptor_set_layouts(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::DescriptorSetLayout, count)
    }
    fn set_num_pipeline_layouts(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::PipelineLayout, count)
    }
    fn set_num_render_passes(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::RenderPass, count)
    }
    fn set_num_compute_pipelines(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::ComputePipeline, count)
    }
    fn set_num_graphics_pipelines(&mut self, count: u32) -> bool {
        self.set_num(ObjectKind::GraphicsPipeline, count)
    }

    fn enqueue_create_sampler(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &SamplerDesc,
    ) -> Option<SamplerHandle> {
        let handle = self.create(ObjectKind::Sampler, hash, index)?;
        self.samplers.push((hash, index, desc.clone()));
        Some(SamplerHandle(handle))
    }

    fn enqueue_create_shader_module(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &ShaderModuleDesc,
    ) -> Option<ShaderModuleHandle> {
        let handle = self.create(ObjectKind::ShaderModule, hash, index)?;
        self.shader_modules.push((hash, index, desc.clone()));
        Some(ShaderModuleHandle(handle))
    }

    fn enqueue_create_descriptor_set_layout(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &DescriptorSetLayoutDesc,
    ) -> Option<DescriptorSetLayoutHandle> {
        let handle = self.create(ObjectKind::DescriptorSetLayout, hash, index)?;
        self.descriptor_set_layouts.push((hash, index, desc.clone()));
        Some(DescriptorSetLayoutHandle(handle))
    }

    fn enqueue_create_pipeline_layout(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &PipelineLayoutDesc,
    ) -> Option<PipelineLayoutHandle> {
        let handle = self.create(ObjectKind::PipelineLayout, hash, index)?;
        self.pipeline_layouts.push((hash, index, desc.clone()));
        Some(PipelineLayoutHandle(handle))
    }

    fn enqueue_create_render_pass(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &RenderPassDesc,
    ) -> Option<RenderPassHandle> {
        let handle = self.create(ObjectKind::RenderPass, hash, index)?;
        self.render_passes.push((hash, index, desc.clone()));
        Some(RenderPassHandle(handle))
    }

    fn enqueue_create_compute_pipeline(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &ComputePipelineDesc,
    ) -> Option<ComputePipelineHandle> {
        let handle = self.create(ObjectKind::ComputePipeline, hash, index)?;
        self.compute_pipelines.push((hash, index, desc.clone()));
        Some(ComputePipelineHandle(handle))
    }

    fn enqueue_create_graphics_pipeline(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &GraphicsPipelineDesc,
    ) -> Option<GraphicsPipelineHandle> {
        let handle = self.create(ObjectKind::GraphicsPipeline, hash, index)?;
        self.graphics_pipelines.push((hash, index, desc.clone()));
        Some(GraphicsPipelineHandle(handle))
    }

    fn wait_enqueue(&mut self) {
        self.calls.push(CreatorCall::WaitEnqueue);
    }
}
