//! Core wgpu plumbing: device/surface ownership and texture helpers.

pub mod render_context;
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
pub use texture::{DepthTexture, MatcapTexture};
