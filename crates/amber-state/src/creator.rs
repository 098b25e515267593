//! The creation capability consumed by the replayer.

use amber_core::id::{
    ComputePipelineHandle, DescriptorSetLayoutHandle, GraphicsPipelineHandle, Hash,
    PipelineLayoutHandle, RenderPassHandle, SamplerHandle, ShaderModuleHandle,
};
use amber_core::layout::{DescriptorSetLayoutDesc, PipelineLayoutDesc};
use amber_core::pipeline::{ComputePipelineDesc, GraphicsPipelineDesc};
use amber_core::render_pass::RenderPassDesc;
use amber_core::sampler::SamplerDesc;
use amber_core::shader::ShaderModuleDesc;

/// Capability contract for materializing replayed objects.
///
/// The replayer drives one implementation of this trait per
/// [`parse`](crate::Replayer::parse) call. For each kind, in dependency
/// order, it announces the record count through `set_num_*` (returning
/// false aborts the parse), then enqueues every record's creation.
///
/// `enqueue_create_*` returns the handle the backend assigns to the
/// object, or `None` when that single object cannot be created — a
/// non-fatal, per-object failure: the replayer continues with independent
/// records and skips anything that depends on the failed one.
///
/// Creation may be asynchronous. A backend may return the handle it
/// *will* produce while construction is still in flight; the replayer
/// calls [`wait_enqueue`](Creator::wait_enqueue) before any kind whose
/// records reference previously enqueued objects, and once more before
/// `parse` returns. After a `wait_enqueue` returns, every handle
/// previously handed out must refer to a fully constructed object.
///
/// Description references passed to `enqueue_create_*` are valid for the
/// duration of the call. A backend that defers construction clones the
/// description (or the parts it needs); the descriptions are plain owned
/// data, so the clone is a deep copy with no ties to the replayer's
/// arena.
///
/// `set_num_*` and `wait_enqueue` have success/no-op defaults; a backend
/// overrides exactly the hooks it cares about.
pub trait Creator {
    /// Announce the number of sampler records. False aborts the parse.
    fn set_num_samplers(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of shader module records.
    fn set_num_shader_modules(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of descriptor set layout records.
    fn set_num_descriptor_set_layouts(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of pipeline layout records.
    fn set_num_pipeline_layouts(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of render pass records.
    fn set_num_render_passes(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of compute pipeline records.
    fn set_num_compute_pipelines(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Announce the number of graphics pipeline records.
    fn set_num_graphics_pipelines(&mut self, count: u32) -> bool {
        let _ = count;
        true
    }

    /// Create the sampler at `index` with content hash `hash`.
    fn enqueue_create_sampler(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &SamplerDesc,
    ) -> Option<SamplerHandle>;

    /// Create the shader module at `index`.
    fn enqueue_create_shader_module(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &ShaderModuleDesc,
    ) -> Option<ShaderModuleHandle>;

    /// Create the descriptor set layout at `index`.
    fn enqueue_create_descriptor_set_layout(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &DescriptorSetLayoutDesc,
    ) -> Option<DescriptorSetLayoutHandle>;

    /// Create the pipeline layout at `index`.
    fn enqueue_create_pipeline_layout(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &PipelineLayoutDesc,
    ) -> Option<PipelineLayoutHandle>;

    /// Create the render pass at `index`.
    fn enqueue_create_render_pass(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &RenderPassDesc,
    ) -> Option<RenderPassHandle>;

    /// Create the compute pipeline at `index`.
    fn enqueue_create_compute_pipeline(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &ComputePipelineDesc,
    ) -> Option<ComputePipelineHandle>;

    /// Create the graphics pipeline at `index`.
    fn enqueue_create_graphics_pipeline(
        &mut self,
        hash: Hash,
        index: u32,
        desc: &GraphicsPipelineDesc,
    ) -> Option<GraphicsPipelineHandle>;

    /// Synchronization point for asynchronous backends. Must not return
    /// until every previously enqueued creation has completed.
    fn wait_enqueue(&mut self) {}
}
