//! GPU texture resources.
//!
//! Provides the backend-agnostic [`TextureSink`] seam that composite loads
//! publish into, an in-memory implementation, and a wgpu implementation.

/// Texture descriptions, handles, and the in-memory sink.
pub mod texture;
/// wgpu texture creation and upload.
pub mod upload;

pub use texture::{
    FilterMode, PixelFormat, StoredTexture, TextureDesc, TextureHandle,
    TextureKind, TextureSink, TextureStore, WrapMode,
};
pub use upload::{GpuTexture, GpuTextures};
