//! Per-request coordination record for multi-part texture loads.
//!
//! One [`CompositeRequest`] exists per composite texture. Each part's fetch
//! completion is recorded exactly once; the completion that brings the
//! finished count to the part count makes the record ready, after which it
//! is consumed by [`CompositeRequest::finalize`].

use std::fmt;

use web_time::Instant;

use super::decode::{decode_rgba, DecodedImage, CHANNELS};
use super::fetch::FetchError;
use crate::gpu::{
    FilterMode, PixelFormat, TextureDesc, TextureHandle, TextureKind,
    TextureSink, WrapMode,
};

/// Shape of a composite load and its per-kind validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    /// One image; decoded and published without cross-part checks.
    Texture2D {
        /// Wrapping along u.
        wrap_u: WrapMode,
        /// Wrapping along v.
        wrap_v: WrapMode,
    },
    /// Six faces in +X, -X, +Y, -Y, +Z, -Z order; faces must be square.
    Cube,
    /// Equally sized layers that must also match a fixed size.
    Array {
        /// Required layer width.
        layer_width: u32,
        /// Required layer height.
        layer_height: u32,
    },
}

impl CompositeKind {
    /// Texture resource shape this load publishes.
    #[must_use]
    pub fn texture_kind(self) -> TextureKind {
        match self {
            Self::Texture2D { .. } => TextureKind::D2,
            Self::Cube => TextureKind::Cube,
            Self::Array { .. } => TextureKind::Array,
        }
    }

    /// Wrap modes along u, v and w.
    #[must_use]
    pub fn wrap(self) -> [WrapMode; 3] {
        match self {
            Self::Texture2D { wrap_u, wrap_v } => [wrap_u, wrap_v, WrapMode::Repeat],
            Self::Cube => [WrapMode::ClampToEdge; 3],
            Self::Array { .. } => [WrapMode::Repeat; 3],
        }
    }
}

/// Why a composite load failed. Logged, never surfaced to callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// A part's fetch failed.
    Fetch {
        /// Part index.
        part: usize,
        /// Fetch error.
        error: FetchError,
    },
    /// A part's bytes did not decode as an image.
    Decode {
        /// Part index.
        part: usize,
    },
    /// A part decoded to a zero-sized image.
    EmptyDimensions {
        /// Part index.
        part: usize,
    },
    /// A part's size differs from the reference size.
    DimensionMismatch {
        /// Part index.
        part: usize,
        /// Reference `(width, height)`.
        expected: (u32, u32),
        /// Decoded `(width, height)`.
        found: (u32, u32),
    },
    /// Cube faces must be square.
    NonSquareCube {
        /// Face `(width, height)`.
        size: (u32, u32),
    },
    /// The texture sink rejected the assembled texture.
    Publish(String),
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { part, error } => {
                write!(f, "part {part} fetch failed: {error}")
            }
            Self::Decode { part } => write!(f, "part {part} is not a decodable image"),
            Self::EmptyDimensions { part } => {
                write!(f, "part {part} has empty dimensions")
            }
            Self::DimensionMismatch {
                part,
                expected,
                found,
            } => write!(
                f,
                "part {part} is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::NonSquareCube { size } => {
                write!(f, "cube faces are {}x{}, must be square", size.0, size.1)
            }
            Self::Publish(msg) => write!(f, "publish failed: {msg}"),
        }
    }
}

/// Terminal result of a finalized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Texture initialized, success callback invoked.
    Published,
    /// Nothing initialized, fail callback invoked.
    Failed,
}

/// Whether a recorded completion finished the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// Parts still outstanding (or the completion was ignored).
    Pending,
    /// Every part completed; the request must be finalized now.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartState {
    Pending,
    Fetched(usize),
    Failed,
}

/// Completion callbacks of one load. Exactly one of them runs.
pub struct LoadCallbacks {
    on_success: Box<dyn FnOnce()>,
    on_fail: Box<dyn FnOnce()>,
}

impl LoadCallbacks {
    /// Callbacks for the success and failure outcomes.
    #[must_use]
    pub fn new(
        on_success: impl FnOnce() + 'static,
        on_fail: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_fail: Box::new(on_fail),
        }
    }

    /// Callbacks that do nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::new(|| {}, || {})
    }
}

impl Default for LoadCallbacks {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for LoadCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadCallbacks").finish_non_exhaustive()
    }
}

/// Coordination record shared by every part of one composite load.
#[derive(Debug)]
pub(crate) struct CompositeRequest {
    label: String,
    kind: CompositeKind,
    target: TextureHandle,
    /// Fetch path of each part, in layer order.
    paths: Vec<String>,
    part_stride: usize,
    /// `parts.len() * part_stride` bytes; part `i` owns slice `i`.
    buffer: Vec<u8>,
    parts: Vec<PartState>,
    finished: usize,
    failure: Option<LoadFailure>,
    callbacks: LoadCallbacks,
    issued_at: Instant,
}

impl CompositeRequest {
    pub(crate) fn new(
        label: String,
        kind: CompositeKind,
        target: TextureHandle,
        paths: Vec<String>,
        part_stride: usize,
        callbacks: LoadCallbacks,
    ) -> Self {
        let part_count = paths.len();
        Self {
            label,
            kind,
            target,
            paths,
            part_stride,
            buffer: vec![0; part_count * part_stride],
            parts: vec![PartState::Pending; part_count],
            finished: 0,
            failure: None,
            callbacks,
            issued_at: Instant::now(),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn paths(&self) -> &[String] {
        &self.paths
    }

    pub(crate) fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished
    }

    #[cfg(test)]
    pub(crate) fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Record one part's completion. Duplicate and out-of-range completions
    /// are ignored so `finished` can never pass the part count.
    pub(crate) fn record_part(
        &mut self,
        index: usize,
        result: Result<Vec<u8>, FetchError>,
    ) -> Progress {
        let Some(state) = self.parts.get(index).copied() else {
            log::warn!(
                "'{}': ignoring completion for part {index} of {}",
                self.label,
                self.parts.len()
            );
            return Progress::Pending;
        };
        if state != PartState::Pending {
            log::warn!("'{}': ignoring repeated completion of part {index}", self.label);
            return Progress::Pending;
        }

        let next = match result {
            Ok(bytes) if bytes.len() <= self.part_stride => {
                let start = index * self.part_stride;
                self.buffer[start..start + bytes.len()].copy_from_slice(&bytes);
                log::debug!("'{}': part {index} fetched ({} bytes)", self.label, bytes.len());
                PartState::Fetched(bytes.len())
            }
            Ok(bytes) => {
                self.fail(LoadFailure::Fetch {
                    part: index,
                    error: FetchError::BufferTooSmall {
                        path: self.paths[index].clone(),
                        size: bytes.len() as u64,
                        capacity: self.part_stride,
                    },
                });
                PartState::Failed
            }
            Err(error) => {
                self.fail(LoadFailure::Fetch { part: index, error });
                PartState::Failed
            }
        };
        self.parts[index] = next;
        self.finished += 1;

        if self.finished == self.parts.len() {
            Progress::Complete
        } else {
            Progress::Pending
        }
    }

    fn fail(&mut self, reason: LoadFailure) {
        log::warn!("'{}': {reason}", self.label);
        if self.failure.is_none() {
            self.failure = Some(reason);
        }
    }

    fn part_bytes(&self, index: usize) -> Option<&[u8]> {
        match self.parts.get(index)? {
            PartState::Fetched(len) => {
                let start = index * self.part_stride;
                self.buffer.get(start..start + len)
            }
            PartState::Pending | PartState::Failed => None,
        }
    }

    /// Decode, validate and publish, or fail; then run the matching callback.
    ///
    /// Consumes the record, so its buffers are released on both paths and
    /// no callback can run twice.
    pub(crate) fn finalize(mut self, sink: &mut dyn TextureSink) -> LoadOutcome {
        let result = match self.failure.take() {
            Some(reason) => Err(reason),
            None => self.assemble(sink),
        };
        let LoadCallbacks {
            on_success,
            on_fail,
        } = self.callbacks;

        match result {
            Ok(()) => {
                log::info!(
                    "'{}' published as texture {} in {:.1} ms",
                    self.label,
                    self.target.0,
                    self.issued_at.elapsed().as_secs_f64() * 1000.0
                );
                on_success();
                LoadOutcome::Published
            }
            Err(reason) => {
                log::warn!("'{}' failed to load: {reason}", self.label);
                on_fail();
                LoadOutcome::Failed
            }
        }
    }

    fn assemble(&self, sink: &mut dyn TextureSink) -> Result<(), LoadFailure> {
        let decoded: Vec<Option<DecodedImage>> = (0..self.parts.len())
            .map(|i| self.part_bytes(i).and_then(decode_rgba))
            .collect();
        let (width, height) = validate_parts(self.kind, &decoded)?;

        let layer_size = width as usize * height as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(layer_size * decoded.len());
        for image in decoded.into_iter().flatten() {
            pixels.extend_from_slice(&image.pixels);
        }

        let [wrap_u, wrap_v, wrap_w] = self.kind.wrap();
        let desc = TextureDesc {
            kind: self.kind.texture_kind(),
            width,
            height,
            layers: self.parts.len() as u32,
            format: PixelFormat::Rgba8,
            wrap_u,
            wrap_v,
            wrap_w,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            label: &self.label,
            pixels: &pixels,
        };
        sink.initialize(self.target, &desc)
            .map_err(|e| LoadFailure::Publish(e.to_string()))
    }
}

/// Check every decoded part against part 0 (strict equality, no zero
/// sizes) and against the kind's own constraints. Returns the layer size.
pub(crate) fn validate_parts(
    kind: CompositeKind,
    decoded: &[Option<DecodedImage>],
) -> Result<(u32, u32), LoadFailure> {
    let mut reference: Option<(u32, u32)> = None;
    for (part, image) in decoded.iter().enumerate() {
        let Some(image) = image else {
            return Err(LoadFailure::Decode { part });
        };
        let found = (image.width, image.height);
        if found.0 == 0 || found.1 == 0 {
            return Err(LoadFailure::EmptyDimensions { part });
        }
        match reference {
            None => reference = Some(found),
            Some(expected) if expected != found => {
                return Err(LoadFailure::DimensionMismatch {
                    part,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
    }

    let size = reference.ok_or(LoadFailure::Decode { part: 0 })?;
    match kind {
        CompositeKind::Cube if size.0 != size.1 => {
            Err(LoadFailure::NonSquareCube { size })
        }
        CompositeKind::Array {
            layer_width,
            layer_height,
        } if size != (layer_width, layer_height) => {
            Err(LoadFailure::DimensionMismatch {
                part: 0,
                expected: (layer_width, layer_height),
                found: size,
            })
        }
        _ => Ok(size),
    }
}
