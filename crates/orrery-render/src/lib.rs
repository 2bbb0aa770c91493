//! wgpu rendering: surface management, the fixed multi-pass frame sequence,
//! per-light shadow maps, and the pipelines behind each pass.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod passes;
pub mod pipeline;
pub mod renderer;
pub mod sequencer;
pub mod uniforms;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalColor};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{CLEAR_BLACK, DepthAttachmentConfig, FrameEncoder, RenderPassBuilder};
pub use passes::ScenePasses;
pub use pipeline::{BasePipeline, LitPipeline, ShadingStyle, ShadowMapPipeline};
pub use renderer::Renderer;
pub use sequencer::FrameSequencer;
pub use uniforms::{FrameUniform, ModelSlab, ModelUniform};
