//! wgpu-backed [`TextureSink`].

use rustc_hash::FxHashMap;

use super::texture::{
    FilterMode, PixelFormat, TextureDesc, TextureHandle, TextureKind,
    TextureSink, WrapMode,
};
use crate::error::VistaError;

/// A published GPU texture with its default view and sampler.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// Full view with the dimension matching the texture kind.
    pub view: wgpu::TextureView,
    /// Sampler built from the requested wrap and filter modes.
    pub sampler: wgpu::Sampler,
}

/// Creates wgpu textures for published composite loads.
pub struct GpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,
    textures: FxHashMap<TextureHandle, Option<GpuTexture>>,
    next_handle: u32,
}

impl GpuTextures {
    /// Publish into textures created on `device` and uploaded via `queue`.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            textures: FxHashMap::default(),
            next_handle: 0,
        }
    }

    /// The texture behind `handle`, if it has been initialized.
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle).and_then(Option::as_ref)
    }
}

/// Reject textures larger than the device supports.
pub(crate) fn check_limits(
    desc: &TextureDesc<'_>,
    limits: &wgpu::Limits,
) -> Result<(), VistaError> {
    let max_dimension = limits.max_texture_dimension_2d;
    if desc.width > max_dimension || desc.height > max_dimension {
        return Err(VistaError::Texture(format!(
            "'{}' is {}x{}, device maximum is {max_dimension}",
            desc.label, desc.width, desc.height
        )));
    }
    if desc.layers > limits.max_texture_array_layers {
        return Err(VistaError::Texture(format!(
            "'{}' has {} layers, device maximum is {}",
            desc.label, desc.layers, limits.max_texture_array_layers
        )));
    }
    Ok(())
}

pub(crate) fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
    }
}

pub(crate) fn view_dimension(kind: TextureKind) -> wgpu::TextureViewDimension {
    match kind {
        TextureKind::D2 => wgpu::TextureViewDimension::D2,
        TextureKind::Cube => wgpu::TextureViewDimension::Cube,
        TextureKind::Array => wgpu::TextureViewDimension::D2Array,
    }
}

pub(crate) fn address_mode(wrap: WrapMode) -> wgpu::AddressMode {
    match wrap {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

pub(crate) fn filter_mode(filter: FilterMode) -> wgpu::FilterMode {
    match filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}

impl TextureSink for GpuTextures {
    fn allocate(&mut self, label: &str) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let _ = self.textures.insert(handle, None);
        log::debug!("allocated texture {} ('{label}')", handle.0);
        handle
    }

    fn initialize(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc<'_>,
    ) -> Result<(), VistaError> {
        match self.textures.get(&handle) {
            None => {
                return Err(VistaError::Texture(format!(
                    "unknown texture handle {}",
                    handle.0
                )))
            }
            Some(Some(_)) => {
                return Err(VistaError::Texture(format!(
                    "texture handle {} already initialized",
                    handle.0
                )))
            }
            Some(None) => {}
        }
        check_limits(desc, &self.device.limits())?;
        desc.validate()?;

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: desc.layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(desc.format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let layer_size = desc.layer_size();
        for (layer, data) in desc.pixels.chunks_exact(layer_size).enumerate() {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(desc.width * 4),
                    rows_per_image: Some(desc.height),
                },
                wgpu::Extent3d {
                    width: desc.width,
                    height: desc.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(desc.label),
            dimension: Some(view_dimension(desc.kind)),
            array_layer_count: Some(desc.layers),
            ..Default::default()
        });

        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(desc.label),
            address_mode_u: address_mode(desc.wrap_u),
            address_mode_v: address_mode(desc.wrap_v),
            address_mode_w: address_mode(desc.wrap_w),
            mag_filter: filter_mode(desc.mag_filter),
            min_filter: filter_mode(desc.min_filter),
            ..Default::default()
        });

        let _ = self.textures.insert(
            handle,
            Some(GpuTexture {
                texture,
                view,
                sampler,
            }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_desc(size: u32, pixels: &[u8]) -> TextureDesc<'_> {
        TextureDesc {
            kind: TextureKind::Cube,
            width: size,
            height: size,
            layers: 6,
            format: PixelFormat::Rgba8,
            wrap_u: WrapMode::ClampToEdge,
            wrap_v: WrapMode::ClampToEdge,
            wrap_w: WrapMode::ClampToEdge,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            label: "sky",
            pixels,
        }
    }

    /// Device and queue from any adapter, or `None` on machines without one.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Default::default()
        }))
        .ok()
    }

    #[test]
    fn oversized_faces_exceed_device_limits() {
        let limits = wgpu::Limits::default();
        let edge = limits.max_texture_dimension_2d + 1;
        let desc = cube_desc(edge, &[]);
        assert!(matches!(check_limits(&desc, &limits), Err(VistaError::Texture(_))));

        let small = cube_desc(16, &[]);
        assert!(check_limits(&small, &limits).is_ok());

        let few_layers = wgpu::Limits {
            max_texture_array_layers: 4,
            ..wgpu::Limits::default()
        };
        assert!(check_limits(&small, &few_layers).is_err());
    }

    #[test]
    fn initialize_creates_cube_texture_when_adapter_available() {
        let Some((device, queue)) = headless_device() else {
            return;
        };
        let max = device.limits().max_texture_dimension_2d;
        let mut textures = GpuTextures::new(device, queue);

        let handle = textures.allocate("sky");
        let pixels = vec![128u8; 4 * 4 * 4 * 6];
        textures.initialize(handle, &cube_desc(4, &pixels)).unwrap();
        let texture = textures.get(handle).unwrap();
        assert_eq!(texture.texture.depth_or_array_layers(), 6);
        assert!(textures.initialize(handle, &cube_desc(4, &pixels)).is_err());

        let too_big = textures.allocate("huge");
        assert!(textures.initialize(too_big, &cube_desc(max + 1, &[])).is_err());
        assert!(textures.get(too_big).is_none());
    }

    #[test]
    fn kinds_map_to_view_dimensions() {
        assert_eq!(view_dimension(TextureKind::D2), wgpu::TextureViewDimension::D2);
        assert_eq!(view_dimension(TextureKind::Cube), wgpu::TextureViewDimension::Cube);
        assert_eq!(
            view_dimension(TextureKind::Array),
            wgpu::TextureViewDimension::D2Array
        );
    }

    #[test]
    fn sampler_modes_map_to_wgpu() {
        assert_eq!(address_mode(WrapMode::ClampToEdge), wgpu::AddressMode::ClampToEdge);
        assert_eq!(address_mode(WrapMode::MirroredRepeat), wgpu::AddressMode::MirrorRepeat);
        assert_eq!(filter_mode(FilterMode::Nearest), wgpu::FilterMode::Nearest);
        assert_eq!(
            texture_format(PixelFormat::Rgba8),
            wgpu::TextureFormat::Rgba8Unorm
        );
    }
}
