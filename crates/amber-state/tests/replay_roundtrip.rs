//! End-to-end record → serialize → parse tests against a mock backend.
//!
//! Each test builds a small dependency graph in a `Recorder` the way a
//! capture layer would (hash, register, create, set handle), serializes
//! it, replays the blob through `MockCreator`, and checks call order,
//! handle rewiring, and payload fidelity.

use amber_core::id::{
    DescriptorSetLayoutHandle, Hash, ObjectKind, PipelineLayoutHandle, RenderPassHandle,
    SamplerHandle, ShaderModuleHandle,
};
use amber_state::hash;
use amber_state::{Recorder, ReplayOutcome, Replayer};
use amber_test_utils::{fixtures, CreatorCall, MockCreator};

/// Graph used by most tests: two shader modules, one buffer set layout,
/// one pipeline layout over it, one render pass, one graphics pipeline
/// referencing all of them.
struct TriangleGraph {
    recorder: Recorder,
    h_vert: Hash,
    h_frag: Hash,
    h_set_layout: Hash,
    h_layout: Hash,
    h_pass: Hash,
    h_pipeline: Hash,
}

fn build_triangle_graph() -> TriangleGraph {
    let recorder = Recorder::new();

    let vert = fixtures::shader_module(&[0x11, 0x22, 0x33]);
    let h_vert = hash::shader_module_hash(&vert);
    let i_vert = recorder.register_shader_module(h_vert, &vert);
    recorder
        .set_shader_module_handle(i_vert, ShaderModuleHandle(0xA1))
        .unwrap();

    let frag = fixtures::shader_module(&[0x44, 0x55]);
    let h_frag = hash::shader_module_hash(&frag);
    let i_frag = recorder.register_shader_module(h_frag, &frag);
    recorder
        .set_shader_module_handle(i_frag, ShaderModuleHandle(0xA2))
        .unwrap();

    let set_layout = fixtures::buffer_set_layout();
    let h_set_layout = hash::descriptor_set_layout_hash(&recorder, &set_layout).unwrap();
    let i_set_layout = recorder
        .register_descriptor_set_layout(h_set_layout, &set_layout)
        .unwrap();
    recorder
        .set_descriptor_set_layout_handle(i_set_layout, DescriptorSetLayoutHandle(0xB1))
        .unwrap();

    let layout = fixtures::pipeline_layout(vec![DescriptorSetLayoutHandle(0xB1)]);
    let h_layout = hash::pipeline_layout_hash(&recorder, &layout).unwrap();
    let i_layout = recorder
        .register_pipeline_layout(h_layout, &layout)
        .unwrap();
    recorder
        .set_pipeline_layout_handle(i_layout, PipelineLayoutHandle(0xC1))
        .unwrap();

    let pass = fixtures::color_depth_render_pass();
    let h_pass = hash::render_pass_hash(&pass);
    let i_pass = recorder.register_render_pass(h_pass, &pass);
    recorder
        .set_render_pass_handle(i_pass, RenderPassHandle(0xD1))
        .unwrap();

    let pipeline = fixtures::triangle_graphics_pipeline(
        ShaderModuleHandle(0xA1),
        ShaderModuleHandle(0xA2),
        PipelineLayoutHandle(0xC1),
        RenderPassHandle(0xD1),
    );
    let h_pipeline = hash::graphics_pipeline_hash(&recorder, &pipeline).unwrap();
    recorder
        .register_graphics_pipeline(h_pipeline, &pipeline)
        .unwrap();

    TriangleGraph {
        recorder,
        h_vert,
        h_frag,
        h_set_layout,
        h_layout,
        h_pass,
        h_pipeline,
    }
}

#[test]
fn replay_creates_in_canonical_dependency_order() {
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    let mut mock = MockCreator::new();
    Replayer::parse(&mut mock, &blob).unwrap();

    assert_eq!(
        mock.create_order(),
        vec![
            (ObjectKind::ShaderModule, g.h_vert),
            (ObjectKind::ShaderModule, g.h_frag),
            (ObjectKind::DescriptorSetLayout, g.h_set_layout),
            (ObjectKind::PipelineLayout, g.h_layout),
            (ObjectKind::RenderPass, g.h_pass),
            (ObjectKind::GraphicsPipeline, g.h_pipeline),
        ]
    );

    // One synchronization point per dependency level.
    assert_eq!(mock.wait_count(), 4);

    // Every dependency was created strictly before its dependent.
    let order = mock.create_order();
    let pos = |h: Hash| order.iter().position(|&(_, oh)| oh == h).unwrap();
    assert!(pos(g.h_set_layout) < pos(g.h_layout));
    assert!(pos(g.h_vert) < pos(g.h_pipeline));
    assert!(pos(g.h_frag) < pos(g.h_pipeline));
    assert!(pos(g.h_layout) < pos(g.h_pipeline));
    assert!(pos(g.h_pass) < pos(g.h_pipeline));
}

#[test]
fn replay_announces_counts_before_each_kind() {
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    let mut mock = MockCreator::new();
    Replayer::parse(&mut mock, &blob).unwrap();

    let set_nums: Vec<_> = mock
        .calls
        .iter()
        .filter_map(|c| match c {
            CreatorCall::SetNum { kind, count } => Some((*kind, *count)),
            _ => None,
        })
        .collect();
    assert_eq!(
        set_nums,
        vec![
            (ObjectKind::Sampler, 0),
            (ObjectKind::ShaderModule, 2),
            (ObjectKind::DescriptorSetLayout, 1),
            (ObjectKind::PipelineLayout, 1),
            (ObjectKind::RenderPass, 1),
            (ObjectKind::ComputePipeline, 0),
            (ObjectKind::GraphicsPipeline, 1),
        ]
    );
}

#[test]
fn replayed_references_point_at_backend_handles() {
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    let mut mock = MockCreator::new();
    Replayer::parse(&mut mock, &blob).unwrap();

    // The pipeline layout's set-layout reference was rewritten to the
    // handle the mock returned for the set layout.
    let set_layout_handle = mock
        .handle_for(ObjectKind::DescriptorSetLayout, g.h_set_layout)
        .unwrap();
    let (_, _, layout_desc) = &mock.pipeline_layouts[0];
    assert_eq!(
        layout_desc.set_layouts,
        vec![DescriptorSetLayoutHandle(set_layout_handle)]
    );

    // Likewise for the graphics pipeline's module, layout, and render
    // pass references.
    let (_, _, pipeline_desc) = &mock.graphics_pipelines[0];
    assert_eq!(
        pipeline_desc.stages[0].module,
        ShaderModuleHandle(mock.handle_for(ObjectKind::ShaderModule, g.h_vert).unwrap())
    );
    assert_eq!(
        pipeline_desc.stages[1].module,
        ShaderModuleHandle(mock.handle_for(ObjectKind::ShaderModule, g.h_frag).unwrap())
    );
    assert_eq!(
        pipeline_desc.layout,
        PipelineLayoutHandle(
            mock.handle_for(ObjectKind::PipelineLayout, g.h_layout)
                .unwrap()
        )
    );
    assert_eq!(
        pipeline_desc.render_pass,
        RenderPassHandle(mock.handle_for(ObjectKind::RenderPass, g.h_pass).unwrap())
    );
}

#[test]
fn replayed_payloads_are_byte_identical_to_recorded() {
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    let mut mock = MockCreator::new();
    let replayer = Replayer::parse(&mut mock, &blob).unwrap();

    for kind in ObjectKind::DECODE_ORDER {
        let count = g.recorder.record_count(kind);
        assert_eq!(replayer.record_count(kind), count);
        for index in 0..count as u32 {
            assert_eq!(
                g.recorder.payload(kind, index).as_deref(),
                replayer.payload(kind, index),
                "payload mismatch for {kind} {index}"
            );
        }
    }
}

#[test]
fn immutable_samplers_rewire_through_replay() {
    let recorder = Recorder::new();

    let sampler = fixtures::clamped_linear_sampler();
    let h_sampler = hash::sampler_hash(&sampler);
    let i_sampler = recorder.register_sampler(h_sampler, &sampler);
    recorder
        .set_sampler_handle(i_sampler, SamplerHandle(0x51))
        .unwrap();

    let layout = fixtures::sampled_image_set_layout(vec![SamplerHandle(0x51)]);
    let h_layout = hash::descriptor_set_layout_hash(&recorder, &layout).unwrap();
    recorder
        .register_descriptor_set_layout(h_layout, &layout)
        .unwrap();

    let mut mock = MockCreator::new();
    Replayer::parse(&mut mock, &recorder.serialize()).unwrap();

    let sampler_handle = mock.handle_for(ObjectKind::Sampler, h_sampler).unwrap();
    let (_, _, decoded) = &mock.descriptor_set_layouts[0];
    assert_eq!(
        decoded.bindings[0].immutable_samplers,
        vec![SamplerHandle(sampler_handle)]
    );
}

#[test]
fn failed_object_skips_dependents_but_not_independents() {
    let g = build_triangle_graph();
    // An independent sampler rides along to prove unrelated records
    // survive the failure.
    let sampler = fixtures::clamped_linear_sampler();
    let h_sampler = hash::sampler_hash(&sampler);
    g.recorder.register_sampler(h_sampler, &sampler);

    let blob = g.recorder.serialize();
    let mut mock = MockCreator::failing([g.h_layout]);
    let replayer = Replayer::parse(&mut mock, &blob).unwrap();

    // The failed pipeline layout never produced a handle.
    assert_eq!(
        replayer.pipeline_layout_record(0).unwrap().outcome(),
        ReplayOutcome::Failed
    );
    // The graphics pipeline depends on it and was skipped: no creation
    // call reached the backend.
    assert_eq!(
        replayer.graphics_pipeline_record(0).unwrap().outcome(),
        ReplayOutcome::Skipped
    );
    assert!(mock.graphics_pipelines.is_empty());
    assert!(!mock
        .create_order()
        .contains(&(ObjectKind::GraphicsPipeline, g.h_pipeline)));

    // Everything independent of the failure still replayed.
    assert!(mock.handle_for(ObjectKind::Sampler, h_sampler).is_some());
    assert!(mock
        .handle_for(ObjectKind::ShaderModule, g.h_vert)
        .is_some());
    assert!(mock
        .handle_for(ObjectKind::RenderPass, g.h_pass)
        .is_some());
    assert!(mock
        .handle_for(ObjectKind::DescriptorSetLayout, g.h_set_layout)
        .is_some());
}

#[test]
fn failure_cascades_transitively() {
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    // Failing the set layout must skip the pipeline layout AND the
    // graphics pipeline two levels down.
    let mut mock = MockCreator::failing([g.h_set_layout]);
    let replayer = Replayer::parse(&mut mock, &blob).unwrap();

    assert_eq!(
        replayer.descriptor_set_layout_record(0).unwrap().outcome(),
        ReplayOutcome::Failed
    );
    assert_eq!(
        replayer.pipeline_layout_record(0).unwrap().outcome(),
        ReplayOutcome::Skipped
    );
    assert_eq!(
        replayer.graphics_pipeline_record(0).unwrap().outcome(),
        ReplayOutcome::Skipped
    );
    assert!(mock.pipeline_layouts.is_empty());
    assert!(mock.graphics_pipelines.is_empty());

    // Shader modules and the render pass have no path through the failed
    // record and still created.
    assert_eq!(
        replayer.render_pass_record(0).unwrap().outcome().handle(),
        mock.handle_for(ObjectKind::RenderPass, g.h_pass)
            .map(RenderPassHandle)
    );
}

#[test]
fn compute_pipeline_roundtrips_with_dependencies() {
    let recorder = Recorder::new();

    let module = fixtures::shader_module(&[0xC0, 0xDE]);
    let h_module = hash::shader_module_hash(&module);
    let i_module = recorder.register_shader_module(h_module, &module);
    recorder
        .set_shader_module_handle(i_module, ShaderModuleHandle(0xE1))
        .unwrap();

    let set_layout = fixtures::buffer_set_layout();
    let h_set_layout = hash::descriptor_set_layout_hash(&recorder, &set_layout).unwrap();
    let i_set_layout = recorder
        .register_descriptor_set_layout(h_set_layout, &set_layout)
        .unwrap();
    recorder
        .set_descriptor_set_layout_handle(i_set_layout, DescriptorSetLayoutHandle(0xE2))
        .unwrap();

    let layout = fixtures::pipeline_layout(vec![DescriptorSetLayoutHandle(0xE2)]);
    let h_layout = hash::pipeline_layout_hash(&recorder, &layout).unwrap();
    let i_layout = recorder
        .register_pipeline_layout(h_layout, &layout)
        .unwrap();
    recorder
        .set_pipeline_layout_handle(i_layout, PipelineLayoutHandle(0xE3))
        .unwrap();

    let pipeline =
        fixtures::compute_pipeline(ShaderModuleHandle(0xE1), PipelineLayoutHandle(0xE3));
    let h_pipeline = hash::compute_pipeline_hash(&recorder, &pipeline).unwrap();
    recorder
        .register_compute_pipeline(h_pipeline, &pipeline)
        .unwrap();

    assert_eq!(
        recorder.dependencies(ObjectKind::ComputePipeline, 0),
        Some(vec![h_module, h_layout])
    );

    let mut mock = MockCreator::new();
    let replayer = Replayer::parse(&mut mock, &recorder.serialize()).unwrap();

    let (_, _, decoded) = &mock.compute_pipelines[0];
    assert_eq!(
        decoded.stage.module,
        ShaderModuleHandle(mock.handle_for(ObjectKind::ShaderModule, h_module).unwrap())
    );
    assert_eq!(
        decoded.layout,
        PipelineLayoutHandle(mock.handle_for(ObjectKind::PipelineLayout, h_layout).unwrap())
    );
    assert_eq!(
        replayer.compute_pipeline_record(0).unwrap().deps(),
        &[h_module, h_layout]
    );
}

#[test]
fn reserialization_after_replay_is_identical() {
    // Replaying and re-recording the mock's descriptions must produce
    // the same blob: content identity is preserved end to end.
    let g = build_triangle_graph();
    let blob = g.recorder.serialize();

    let mut mock = MockCreator::new();
    Replayer::parse(&mut mock, &blob).unwrap();

    let second = Recorder::new();
    for (h, _, desc) in &mock.shader_modules {
        let i = second.register_shader_module(*h, desc);
        // Mirror the mock's handles so dependent registrations resolve.
        second
            .set_shader_module_handle(
                i,
                ShaderModuleHandle(mock.handle_for(ObjectKind::ShaderModule, *h).unwrap()),
            )
            .unwrap();
    }
    for (h, _, desc) in &mock.descriptor_set_layouts {
        let i = second.register_descriptor_set_layout(*h, desc).unwrap();
        second
            .set_descriptor_set_layout_handle(
                i,
                DescriptorSetLayoutHandle(
                    mock.handle_for(ObjectKind::DescriptorSetLayout, *h).unwrap(),
                ),
            )
            .unwrap();
    }
    for (h, _, desc) in &mock.pipeline_layouts {
        let i = second.register_pipeline_layout(*h, desc).unwrap();
        second
            .set_pipeline_layout_handle(
                i,
                PipelineLayoutHandle(mock.handle_for(ObjectKind::PipelineLayout, *h).unwrap()),
            )
            .unwrap();
    }
    for (h, _, desc) in &mock.render_passes {
        let i = second.register_render_pass(*h, desc);
        second
            .set_render_pass_handle(
                i,
                RenderPassHandle(mock.handle_for(ObjectKind::RenderPass, *h).unwrap()),
            )
            .unwrap();
    }
    for (h, _, desc) in &mock.graphics_pipelines {
        second.register_graphics_pipeline(*h, desc).unwrap();
    }

    assert_eq!(second.serialize(), blob);
}
