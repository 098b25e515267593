//! Benchmark profiles and utilities for the Amber capture system.
//!
//! Provides deterministic synthetic workloads for benchmarks:
//!
//! - [`synthetic_code_words`]: seeded pseudo-random shader payloads
//! - [`populate_graph`]: a recorder filled with a pipeline corpus of
//!   configurable size

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use amber_core::id::{
    DescriptorSetLayoutHandle, PipelineLayoutHandle, RenderPassHandle, ShaderModuleHandle,
};
use amber_state::{hash, Recorder};
use amber_test_utils::fixtures;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `len` pseudo-random shader code words from a fixed seed.
///
/// Identical seeds produce identical payloads, so benchmark inputs are
/// reproducible across runs and machines.
pub fn synthetic_code_words(seed: u64, len: usize) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.next_u32()).collect()
}

/// Fill a recorder with `pipelines` graphics pipelines, each with its own
/// vertex/fragment module pair, sharing one set layout, pipeline layout,
/// and render pass.
///
/// Returns the populated recorder. Handle values are synthetic and only
/// serve to wire the dependency graph together.
pub fn populate_graph(pipelines: usize, words_per_module: usize) -> Recorder {
    let recorder = Recorder::new();
    let mut next_handle = 1u64;
    let mut fresh = || {
        let h = next_handle;
        next_handle += 1;
        h
    };

    let set_layout = fixtures::buffer_set_layout();
    let h_set_layout = hash::descriptor_set_layout_hash(&recorder, &set_layout).unwrap();
    let i = recorder
        .register_descriptor_set_layout(h_set_layout, &set_layout)
        .unwrap();
    let set_layout_handle = DescriptorSetLayoutHandle(fresh());
    recorder
        .set_descriptor_set_layout_handle(i, set_layout_handle)
        .unwrap();

    let layout = fixtures::pipeline_layout(vec![set_layout_handle]);
    let h_layout = hash::pipeline_layout_hash(&recorder, &layout).unwrap();
    let i = recorder.register_pipeline_layout(h_layout, &layout).unwrap();
    let layout_handle = PipelineLayoutHandle(fresh());
    recorder.set_pipeline_layout_handle(i, layout_handle).unwrap();

    let pass = fixtures::color_depth_render_pass();
    let h_pass = hash::render_pass_hash(&pass);
    let i = recorder.register_render_pass(h_pass, &pass);
    let pass_handle = RenderPassHandle(fresh());
    recorder.set_render_pass_handle(i, pass_handle).unwrap();

    for p in 0..pipelines {
        let vert = fixtures::shader_module(&synthetic_code_words(
            p as u64 * 2,
            words_per_module,
        ));
        let i = recorder.register_shader_module(hash::shader_module_hash(&vert), &vert);
        let vert_handle = ShaderModuleHandle(fresh());
        recorder.set_shader_module_handle(i, vert_handle).unwrap();

        let frag = fixtures::shader_module(&synthetic_code_words(
            p as u64 * 2 + 1,
            words_per_module,
        ));
        let i = recorder.register_shader_module(hash::shader_module_hash(&frag), &frag);
        let frag_handle = ShaderModuleHandle(fresh());
        recorder.set_shader_module_handle(i, frag_handle).unwrap();

        let pipeline = fixtures::triangle_graphics_pipeline(
            vert_handle,
            frag_handle,
            layout_handle,
            pass_handle,
        );
        let h = hash::graphics_pipeline_hash(&recorder, &pipeline).unwrap();
        recorder.register_graphics_pipeline(h, &pipeline).unwrap();
    }

    recorder
}
