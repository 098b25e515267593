//! Criterion micro-benchmarks for content hashing.

use amber_bench::synthetic_code_words;
use amber_core::id::{PipelineLayoutHandle, RenderPassHandle, ShaderModuleHandle};
use amber_state::hash;
use amber_state::Recorder;
use amber_test_utils::fixtures;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Benchmark: hash a plain sampler description.
fn bench_sampler_hash(c: &mut Criterion) {
    let desc = fixtures::clamped_linear_sampler();
    c.bench_function("hash_sampler", |b| {
        b.iter(|| black_box(hash::sampler_hash(black_box(&desc))));
    });
}

/// Benchmark: hash a 64 KiB shader module (the dominant payload size).
fn bench_shader_module_hash(c: &mut Criterion) {
    let desc = fixtures::shader_module(&synthetic_code_words(7, 16 * 1024));
    c.bench_function("hash_shader_module_64k", |b| {
        b.iter(|| black_box(hash::shader_module_hash(black_box(&desc))));
    });
}

/// Benchmark: hash a full graphics pipeline description, resolver
/// lookups included.
fn bench_graphics_pipeline_hash(c: &mut Criterion) {
    let recorder = Recorder::new();

    let vert = fixtures::shader_module(&[1, 2, 3]);
    let i = recorder.register_shader_module(hash::shader_module_hash(&vert), &vert);
    recorder
        .set_shader_module_handle(i, ShaderModuleHandle(1))
        .unwrap();
    let frag = fixtures::shader_module(&[4, 5, 6]);
    let i = recorder.register_shader_module(hash::shader_module_hash(&frag), &frag);
    recorder
        .set_shader_module_handle(i, ShaderModuleHandle(2))
        .unwrap();

    let set_layout = fixtures::buffer_set_layout();
    let h = hash::descriptor_set_layout_hash(&recorder, &set_layout).unwrap();
    let i = recorder
        .register_descriptor_set_layout(h, &set_layout)
        .unwrap();
    recorder
        .set_descriptor_set_layout_handle(i, amber_core::id::DescriptorSetLayoutHandle(3))
        .unwrap();

    let layout = fixtures::pipeline_layout(vec![amber_core::id::DescriptorSetLayoutHandle(3)]);
    let h = hash::pipeline_layout_hash(&recorder, &layout).unwrap();
    let i = recorder.register_pipeline_layout(h, &layout).unwrap();
    recorder
        .set_pipeline_layout_handle(i, PipelineLayoutHandle(4))
        .unwrap();

    let pass = fixtures::color_depth_render_pass();
    let i = recorder.register_render_pass(hash::render_pass_hash(&pass), &pass);
    recorder.set_render_pass_handle(i, RenderPassHandle(5)).unwrap();

    let pipeline = fixtures::triangle_graphics_pipeline(
        ShaderModuleHandle(1),
        ShaderModuleHandle(2),
        PipelineLayoutHandle(4),
        RenderPassHandle(5),
    );

    c.bench_function("hash_graphics_pipeline", |b| {
        b.iter(|| {
            black_box(hash::graphics_pipeline_hash(&recorder, black_box(&pipeline)).unwrap())
        });
    });
}

/// Benchmark: the duplicate-registration fast path (hash probe only).
fn bench_dedup_register(c: &mut Criterion) {
    let recorder = Recorder::new();
    let desc = fixtures::clamped_linear_sampler();
    let h = hash::sampler_hash(&desc);
    recorder.register_sampler(h, &desc);

    c.bench_function("register_sampler_duplicate", |b| {
        b.iter(|| black_box(recorder.register_sampler(h, &desc)));
    });
}

criterion_group!(
    benches,
    bench_sampler_hash,
    bench_shader_module_hash,
    bench_graphics_pipeline_hash,
    bench_dedup_register
);
criterion_main!(benches);
