//! Core types for the Amber pipeline-state capture system.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! content-hash and handle newtypes, the closed [`ObjectKind`] set, and
//! the create-description types for every object kind the capture format
//! understands.
//!
//! Descriptions are plain owned Rust data. Fields that reference another
//! object hold a backend handle at record time; the recorder translates
//! those handles into content hashes when it serializes, and the replayer
//! rewrites them back into live handles when it decodes. Handle *values*
//! therefore never influence an object's identity and never appear in a
//! serialized blob.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod layout;
pub mod pipeline;
pub mod render_pass;
pub mod sampler;
pub mod shader;

pub use id::{
    ComputePipelineHandle, DepList, DescriptorSetLayoutHandle, GraphicsPipelineHandle, Hash,
    ObjectKind, PipelineLayoutHandle, RenderPassHandle, SamplerHandle, ShaderModuleHandle,
};
pub use layout::{
    DescriptorSetLayoutBinding, DescriptorSetLayoutDesc, DescriptorType, PipelineLayoutDesc,
    PushConstantRange, SetLayoutExt, ShaderStageFlags,
};
pub use pipeline::{ComputePipelineDesc, GraphicsPipelineDesc};
pub use render_pass::{
    AttachmentDesc, AttachmentRef, Format, ImageLayout, LoadOp, RenderPassDesc, RenderPassExt,
    StoreOp, SubpassDependency, SubpassDesc,
};
pub use sampler::{AddressMode, BorderColor, CompareOp, Filter, MipmapMode, SamplerDesc, SamplerExt};
pub use shader::{ShaderModuleDesc, ShaderStage, SpecConstant, StageDesc};
