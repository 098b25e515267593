//! Ready-made create-descriptions for tests and benchmarks.

use amber_core::id::{
    DescriptorSetLayoutHandle, PipelineLayoutHandle, RenderPassHandle, SamplerHandle,
    ShaderModuleHandle,
};
use amber_core::layout::{
    DescriptorSetLayoutBinding, DescriptorSetLayoutDesc, DescriptorType, PipelineLayoutDesc,
    PushConstantRange, ShaderStageFlags,
};
use amber_core::pipeline::{
    BlendAttachment, BlendEquation, BlendFactor, BlendOp, ColorBlendState, ColorWriteMask,
    ComputePipelineDesc, CullMode, DepthStencilState, FrontFace, GraphicsPipelineDesc,
    InputAssemblyState, MultisampleState, PolygonMode, PrimitiveTopology, RasterizationState,
    Rect2D, VertexAttribute, VertexBinding, VertexInputRate, VertexInputState, Viewport,
    ViewportState,
};
use amber_core::render_pass::{
    AttachmentDesc, AttachmentRef, Format, ImageLayout, LoadOp, RenderPassDesc, StoreOp,
    SubpassDependency, SubpassDesc,
};
use amber_core::sampler::{AddressMode, BorderColor, CompareOp, Filter, MipmapMode, SamplerDesc};
use amber_core::shader::{ShaderModuleDesc, ShaderStage, SpecConstant, StageDesc};

/// A bilinear clamp-to-edge sampler with no extensions.
pub fn clamped_linear_sampler() -> SamplerDesc {
    SamplerDesc {
        mag_filter: Filter::Linear,
        min_filter: Filter::Linear,
        mipmap_mode: MipmapMode::Linear,
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        address_mode_w: AddressMode::ClampToEdge,
        mip_lod_bias: 0.0,
        max_anisotropy: Some(16.0),
        compare_op: None,
        min_lod: 0.0,
        max_lod: 12.0,
        border_color: BorderColor::OpaqueBlack,
        unnormalized_coordinates: false,
        extensions: vec![],
    }
}

/// A shader module with the given code words.
pub fn shader_module(code: &[u32]) -> ShaderModuleDesc {
    ShaderModuleDesc {
        code: code.to_vec(),
    }
}

/// A single-binding set layout holding one sampled image per immutable
/// sampler (or a lone combined-image-sampler binding when `samplers` is
/// empty).
pub fn sampled_image_set_layout(samplers: Vec<SamplerHandle>) -> DescriptorSetLayoutDesc {
    let descriptor_count = samplers.len().max(1) as u32;
    DescriptorSetLayoutDesc {
        flags: 0,
        bindings: vec![DescriptorSetLayoutBinding {
            binding: 0,
            descriptor_type: DescriptorType::CombinedImageSampler,
            descriptor_count,
            stages: ShaderStageFlags::FRAGMENT,
            immutable_samplers: samplers,
        }],
        extensions: vec![],
    }
}

/// A two-binding uniform/storage buffer set layout with no sampler
/// dependencies.
pub fn buffer_set_layout() -> DescriptorSetLayoutDesc {
    DescriptorSetLayoutDesc {
        flags: 0,
        bindings: vec![
            DescriptorSetLayoutBinding {
                binding: 0,
                descriptor_type: DescriptorType::UniformBuffer,
                descriptor_count: 1,
                stages: ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT,
                immutable_samplers: vec![],
            },
            DescriptorSetLayoutBinding {
                binding: 1,
                descriptor_type: DescriptorType::StorageBuffer,
                descriptor_count: 1,
                stages: ShaderStageFlags::COMPUTE,
                immutable_samplers: vec![],
            },
        ],
        extensions: vec![],
    }
}

/// A pipeline layout over the given set layouts with one push-constant
/// range.
pub fn pipeline_layout(set_layouts: Vec<DescriptorSetLayoutHandle>) -> PipelineLayoutDesc {
    PipelineLayoutDesc {
        flags: 0,
        set_layouts,
        push_constant_ranges: vec![PushConstantRange {
            stages: ShaderStageFlags::VERTEX,
            offset: 0,
            size: 64,
        }],
    }
}

/// A one-subpass render pass with a color attachment, a depth
/// attachment, and an external dependency.
pub fn color_depth_render_pass() -> RenderPassDesc {
    RenderPassDesc {
        flags: 0,
        attachments: vec![
            AttachmentDesc {
                flags: 0,
                format: Format::B8G8R8A8_UNORM,
                samples: 1,
                load_op: LoadOp::Clear,
                store_op: StoreOp::Store,
                stencil_load_op: LoadOp::DontCare,
                stencil_store_op: StoreOp::DontCare,
                initial_layout: ImageLayout::UNDEFINED,
                final_layout: ImageLayout::PRESENT,
            },
            AttachmentDesc {
                flags: 0,
                format: Format::D32_SFLOAT,
                samples: 1,
                load_op: LoadOp::Clear,
                store_op: StoreOp::DontCare,
                stencil_load_op: LoadOp::DontCare,
                stencil_store_op: StoreOp::DontCare,
                initial_layout: ImageLayout::UNDEFINED,
                final_layout: ImageLayout::DEPTH_STENCIL_ATTACHMENT,
            },
        ],
        subpasses: vec![SubpassDesc {
            input_attachments: vec![],
            color_attachments: vec![AttachmentRef {
                attachment: Some(0),
                layout: ImageLayout::COLOR_ATTACHMENT,
            }],
            resolve_attachments: vec![],
            depth_stencil_attachment: Some(AttachmentRef {
                attachment: Some(1),
                layout: ImageLayout::DEPTH_STENCIL_ATTACHMENT,
            }),
            preserve_attachments: vec![],
        }],
        dependencies: vec![SubpassDependency {
            src_subpass: None,
            dst_subpass: Some(0),
            src_stage_mask: 0x400,
            dst_stage_mask: 0x400,
            src_access_mask: 0,
            dst_access_mask: 0x100,
            flags: 0,
        }],
        extensions: vec![],
    }
}

/// A vertex+fragment triangle pipeline targeting subpass 0.
pub fn triangle_graphics_pipeline(
    vertex: ShaderModuleHandle,
    fragment: ShaderModuleHandle,
    layout: PipelineLayoutHandle,
    render_pass: RenderPassHandle,
) -> GraphicsPipelineDesc {
    GraphicsPipelineDesc {
        flags: 0,
        stages: vec![
            StageDesc {
                stage: ShaderStage::Vertex,
                module: vertex,
                entry_point: "main".to_string(),
                spec_constants: vec![],
            },
            StageDesc {
                stage: ShaderStage::Fragment,
                module: fragment,
                entry_point: "main".to_string(),
                spec_constants: vec![SpecConstant { id: 0, value: 4 }],
            },
        ],
        vertex_input: VertexInputState {
            bindings: vec![VertexBinding {
                binding: 0,
                stride: 20,
                input_rate: VertexInputRate::Vertex,
            }],
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    binding: 0,
                    format: Format::R32G32B32A32_SFLOAT,
                    offset: 0,
                },
                VertexAttribute {
                    location: 1,
                    binding: 0,
                    format: Format::R32G32_SFLOAT,
                    offset: 12,
                },
            ],
        },
        input_assembly: InputAssemblyState {
            topology: PrimitiveTopology::TriangleList,
            primitive_restart: false,
        },
        tessellation_control_points: None,
        viewport: ViewportState {
            viewport_count: 1,
            scissor_count: 1,
            viewports: vec![Viewport {
                x: 0.0,
                y: 0.0,
                width: 1920.0,
                height: 1080.0,
                min_depth: 0.0,
                max_depth: 1.0,
            }],
            scissors: vec![Rect2D {
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
            }],
        },
        rasterization: RasterizationState {
            depth_clamp: false,
            rasterizer_discard: false,
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::BACK,
            front_face: FrontFace::CounterClockwise,
            depth_bias: None,
            line_width: 1.0,
        },
        multisample: MultisampleState {
            rasterization_samples: 1,
            sample_shading: None,
            sample_mask: None,
            alpha_to_coverage: false,
            alpha_to_one: false,
        },
        depth_stencil: Some(DepthStencilState {
            depth_test: true,
            depth_write: true,
            depth_compare_op: CompareOp::LessOrEqual,
            depth_bounds: None,
            stencil: None,
        }),
        color_blend: Some(ColorBlendState {
            logic_op: None,
            attachments: vec![BlendAttachment {
                blend: Some(BlendEquation {
                    src_color_factor: BlendFactor::SrcAlpha,
                    dst_color_factor: BlendFactor::OneMinusSrcAlpha,
                    color_op: BlendOp::Add,
                    src_alpha_factor: BlendFactor::One,
                    dst_alpha_factor: BlendFactor::Zero,
                    alpha_op: BlendOp::Add,
                }),
                color_write_mask: ColorWriteMask::ALL,
            }],
            blend_constants: [0.0; 4],
        }),
        dynamic_states: vec![],
        layout,
        render_pass,
        subpass: 0,
    }
}

/// A compute pipeline over the given module and layout.
pub fn compute_pipeline(
    module: ShaderModuleHandle,
    layout: PipelineLayoutHandle,
) -> ComputePipelineDesc {
    ComputePipelineDesc {
        flags: 0,
        stage: StageDesc {
            stage: ShaderStage::Compute,
            module,
            entry_point: "main".to_string(),
            spec_constants: vec![],
        },
        layout,
    }
}
