//! Backend-agnostic texture resource description and publication.
//!
//! Loaders never talk to a graphics API directly. They allocate a
//! [`TextureHandle`] up front and later publish every layer of a composite
//! texture through one [`TextureSink::initialize`] call.

use rustc_hash::FxHashMap;

use crate::assets::decode::CHANNELS;
use crate::error::VistaError;

/// Opaque identifier of a texture resource owned by a [`TextureSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Texture resource shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Single 2D image.
    D2,
    /// Six faces in +X, -X, +Y, -Y, +Z, -Z order.
    Cube,
    /// Stack of equally sized 2D layers.
    Array,
}

/// Texel format. Decoding always produces RGBA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA, unsigned normalized.
    #[default]
    Rgba8,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp to the edge texel.
    ClampToEdge,
    /// Tile with every other repetition mirrored.
    MirroredRepeat,
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

/// Everything needed to initialize a texture resource in one call.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    /// Resource shape.
    pub kind: TextureKind,
    /// Layer width in pixels.
    pub width: u32,
    /// Layer height in pixels.
    pub height: u32,
    /// Number of layers (1 for 2D, 6 for cube).
    pub layers: u32,
    /// Texel format of `pixels`.
    pub format: PixelFormat,
    /// Wrapping along u.
    pub wrap_u: WrapMode,
    /// Wrapping along v.
    pub wrap_v: WrapMode,
    /// Wrapping along w (cube sampling).
    pub wrap_w: WrapMode,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Debug label.
    pub label: &'a str,
    /// All layers, layer-major and tightly packed.
    pub pixels: &'a [u8],
}

impl TextureDesc<'_> {
    /// Byte size of one layer.
    #[must_use]
    pub fn layer_size(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    /// Check that dimensions, layer count and pixel data agree.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::Texture`] describing the first inconsistency.
    pub fn validate(&self) -> Result<(), VistaError> {
        if self.width == 0 || self.height == 0 {
            return Err(VistaError::Texture(format!(
                "'{}' has empty dimensions {}x{}",
                self.label, self.width, self.height
            )));
        }
        let layers_ok = match self.kind {
            TextureKind::D2 => self.layers == 1,
            TextureKind::Cube => self.layers == 6,
            TextureKind::Array => self.layers >= 1,
        };
        if self.kind == TextureKind::Cube && self.width != self.height {
            return Err(VistaError::Texture(format!(
                "'{}' cube faces are {}x{}, must be square",
                self.label, self.width, self.height
            )));
        }
        if !layers_ok {
            return Err(VistaError::Texture(format!(
                "'{}' has {} layers, invalid for {:?}",
                self.label, self.layers, self.kind
            )));
        }
        let expected = self.layer_size() * self.layers as usize;
        if self.pixels.len() != expected {
            return Err(VistaError::Texture(format!(
                "'{}' has {} bytes of pixel data, expected {expected}",
                self.label,
                self.pixels.len()
            )));
        }
        Ok(())
    }
}

/// Owner of texture resources that composite loads publish into.
pub trait TextureSink {
    /// Reserve a handle for a texture that will be initialized later.
    fn allocate(&mut self, label: &str) -> TextureHandle;

    /// Create the resource behind `handle` from `desc`.
    ///
    /// # Errors
    ///
    /// Fails when the handle is unknown or already initialized, or when
    /// `desc` is inconsistent.
    fn initialize(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc<'_>,
    ) -> Result<(), VistaError>;
}

/// CPU-side copy of an initialized texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTexture {
    /// Resource shape.
    pub kind: TextureKind,
    /// Layer width in pixels.
    pub width: u32,
    /// Layer height in pixels.
    pub height: u32,
    /// Number of layers.
    pub layers: u32,
    /// Wrapping along u, v and w.
    pub wrap: [WrapMode; 3],
    /// Minification and magnification filters.
    pub filter: [FilterMode; 2],
    /// Debug label.
    pub label: String,
    /// All layers, layer-major.
    pub pixels: Vec<u8>,
}

impl StoredTexture {
    /// Pixels of one layer.
    #[must_use]
    pub fn layer(&self, index: u32) -> Option<&[u8]> {
        if index >= self.layers {
            return None;
        }
        let size = self.width as usize * self.height as usize * CHANNELS;
        let start = index as usize * size;
        self.pixels.get(start..start + size)
    }
}

/// Keeps published textures in memory. Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: FxHashMap<TextureHandle, Option<StoredTexture>>,
    labels: FxHashMap<TextureHandle, String>,
    next_handle: u32,
}

impl TextureStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The texture behind `handle`, if it has been initialized.
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&StoredTexture> {
        self.textures.get(&handle).and_then(Option::as_ref)
    }

    /// Whether `handle` has been initialized.
    #[must_use]
    pub fn is_initialized(&self, handle: TextureHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Label given at allocation.
    #[must_use]
    pub fn label(&self, handle: TextureHandle) -> Option<&str> {
        self.labels.get(&handle).map(String::as_str)
    }

    /// Total bytes of pixel data held.
    #[must_use]
    pub fn resident_bytes(&self) -> usize {
        self.textures
            .values()
            .flatten()
            .map(|t| t.pixels.len())
            .sum()
    }
}

impl TextureSink for TextureStore {
    fn allocate(&mut self, label: &str) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let _ = self.textures.insert(handle, None);
        let _ = self.labels.insert(handle, label.to_owned());
        handle
    }

    fn initialize(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc<'_>,
    ) -> Result<(), VistaError> {
        let slot = self.textures.get_mut(&handle).ok_or_else(|| {
            VistaError::Texture(format!("unknown texture handle {}", handle.0))
        })?;
        if slot.is_some() {
            return Err(VistaError::Texture(format!(
                "texture handle {} already initialized",
                handle.0
            )));
        }
        desc.validate()?;

        *slot = Some(StoredTexture {
            kind: desc.kind,
            width: desc.width,
            height: desc.height,
            layers: desc.layers,
            wrap: [desc.wrap_u, desc.wrap_v, desc.wrap_w],
            filter: [desc.min_filter, desc.mag_filter],
            label: desc.label.to_owned(),
            pixels: desc.pixels.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc<'a>(kind: TextureKind, layers: u32, pixels: &'a [u8]) -> TextureDesc<'a> {
        TextureDesc {
            kind,
            width: 2,
            height: 2,
            layers,
            format: PixelFormat::Rgba8,
            wrap_u: WrapMode::ClampToEdge,
            wrap_v: WrapMode::ClampToEdge,
            wrap_w: WrapMode::ClampToEdge,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            label: "test",
            pixels,
        }
    }

    #[test]
    fn cube_needs_six_layers_of_data() {
        let pixels = vec![0u8; 2 * 2 * 4 * 6];
        assert!(desc(TextureKind::Cube, 6, &pixels).validate().is_ok());
        assert!(desc(TextureKind::Cube, 5, &pixels[..80]).validate().is_err());
        assert!(desc(TextureKind::Cube, 6, &pixels[..95]).validate().is_err());
    }

    #[test]
    fn cube_faces_must_be_square() {
        let pixels = vec![0u8; 4 * 2 * 4 * 6];
        let mut wide = desc(TextureKind::Cube, 6, &pixels);
        wide.width = 4;
        assert!(wide.validate().is_err());

        let mut store = TextureStore::new();
        let handle = store.allocate("sky");
        assert!(store.initialize(handle, &wide).is_err());
        assert!(!store.is_initialized(handle));

        wide.kind = TextureKind::Array;
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn store_initializes_each_handle_once() {
        let mut store = TextureStore::new();
        let handle = store.allocate("sky");
        assert_eq!(store.label(handle), Some("sky"));
        assert!(!store.is_initialized(handle));

        let pixels: Vec<u8> = (0..96).collect();
        store
            .initialize(handle, &desc(TextureKind::Cube, 6, &pixels))
            .unwrap();
        let stored = store.get(handle).unwrap();
        assert_eq!(stored.layer(1).unwrap(), &pixels[16..32]);
        assert_eq!(stored.layer(6), None);
        assert_eq!(store.resident_bytes(), 96);

        assert!(store
            .initialize(handle, &desc(TextureKind::Cube, 6, &pixels))
            .is_err());
        assert!(store
            .initialize(TextureHandle(99), &desc(TextureKind::Cube, 6, &pixels))
            .is_err());
    }
}
