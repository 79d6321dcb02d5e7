//! Asynchronous loading of composite textures.
//!
//! - [`fetch`] - background byte fetching ([`FetchService`], [`ByteSource`])
//! - [`decode`] - in-memory image decoding to RGBA8
//! - [`loader`] - [`AssetLoader`], the per-part fan-out and finalize driver
//! - [`skybox`] - skybox face naming and selection
//! - [`cross`] - cutting cross-layout cubemap images into faces

pub mod cross;
pub mod decode;
pub mod fetch;
pub mod loader;
mod request;
pub mod skybox;

pub use cross::split_cross;
pub use decode::{decode_rgba, DecodedImage};
pub use fetch::{
    ByteSource, FetchCompletion, FetchError, FetchService, FetchTicket,
    Fetcher, FileSource, MemorySource,
};
pub use loader::{AssetLoader, LoadRequest, LoaderStats, RequestId};
pub use request::{CompositeKind, LoadCallbacks, LoadFailure, LoadOutcome};
pub use skybox::{CubemapPaths, SkyboxCycle};
