//! Multi-part texture loading.
//!
//! [`AssetLoader`] fans each composite load out into one fetch per part and
//! keeps the coordination records in an arena keyed by [`RequestId`]. Fetch
//! completions are drained by [`AssetLoader::do_work`] on the caller's
//! thread, so success and fail callbacks always run there too.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::fetch::{ByteSource, FetchError, FetchService, FetchTicket, Fetcher};
use super::request::{
    CompositeKind, CompositeRequest, LoadCallbacks, LoadOutcome, Progress,
};
use super::skybox::CubemapPaths;
use crate::error::VistaError;
use crate::gpu::{TextureHandle, TextureSink, WrapMode};
use crate::options::LoaderOptions;

/// Stable identifier of one composite load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// A composite load described independently of its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Debug label; also names the texture.
    pub label: String,
    /// Shape and validation rules.
    pub kind: CompositeKind,
    /// One path per part, in layer order.
    pub paths: Vec<String>,
    /// Maximum encoded size of one part in bytes.
    pub part_capacity: usize,
    /// Resource to initialize on success.
    pub target: TextureHandle,
}

/// Outcome counters since the loader was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Loads that published their texture.
    pub published: u64,
    /// Loads that ran their fail callback.
    pub failed: u64,
}

/// A part completion routed back to its request.
#[derive(Debug)]
struct PartCompletion {
    request: RequestId,
    part: usize,
    result: Result<Vec<u8>, FetchError>,
}

/// Coordinates composite texture loads over a [`Fetcher`].
pub struct AssetLoader<F: Fetcher = FetchService> {
    fetcher: F,
    options: LoaderOptions,
    requests: FxHashMap<RequestId, CompositeRequest>,
    tickets: FxHashMap<FetchTicket, (RequestId, usize)>,
    /// Part failures raised at send time, delivered on the next drain.
    deferred: Vec<PartCompletion>,
    /// Requests that have nothing to wait for.
    ready: Vec<RequestId>,
    next_id: u64,
    stats: LoaderStats,
}

impl AssetLoader<FetchService> {
    /// Loader backed by a [`FetchService`] reading from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::ThreadSpawn`] if the fetch workers cannot start.
    pub fn new(
        source: Arc<dyn ByteSource>,
        options: LoaderOptions,
    ) -> Result<Self, VistaError> {
        let fetcher = FetchService::new(source, &options)?;
        Ok(Self::with_fetcher(fetcher, options))
    }
}

impl<F: Fetcher> AssetLoader<F> {
    /// Loader issuing its fetches through `fetcher`.
    #[must_use]
    pub fn with_fetcher(fetcher: F, options: LoaderOptions) -> Self {
        Self {
            fetcher,
            options,
            requests: FxHashMap::default(),
            tickets: FxHashMap::default(),
            deferred: Vec::new(),
            ready: Vec::new(),
            next_id: 0,
            stats: LoaderStats::default(),
        }
    }

    /// The underlying fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Mutable access to the underlying fetcher.
    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// Loader settings.
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads that have not been finalized yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.requests.len()
    }

    /// Whether `id` is still waiting for parts.
    #[must_use]
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.requests.contains_key(&id)
    }

    /// `(finished, total)` parts of a pending load.
    #[must_use]
    pub fn progress(&self, id: RequestId) -> Option<(usize, usize)> {
        self.requests
            .get(&id)
            .map(|r| (r.finished(), r.part_count()))
    }

    /// Outcome counters.
    #[must_use]
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Load six faces into the cube texture `target`.
    pub fn load_cubemap(
        &mut self,
        label: impl Into<String>,
        paths: &CubemapPaths,
        target: TextureHandle,
        callbacks: LoadCallbacks,
    ) -> RequestId {
        let request = LoadRequest {
            label: label.into(),
            kind: CompositeKind::Cube,
            paths: paths.as_array().map(str::to_owned).to_vec(),
            part_capacity: self.options.cubemap_part_capacity,
            target,
        };
        self.submit(request, callbacks)
    }

    /// Load one layer per path into the array texture `target`.
    ///
    /// Every layer must decode to the configured array layer size.
    pub fn load_array_texture<S: AsRef<str>>(
        &mut self,
        label: impl Into<String>,
        paths: &[S],
        target: TextureHandle,
        callbacks: LoadCallbacks,
    ) -> RequestId {
        let request = LoadRequest {
            label: label.into(),
            kind: CompositeKind::Array {
                layer_width: self.options.array_layer_width,
                layer_height: self.options.array_layer_height,
            },
            paths: paths.iter().map(|p| p.as_ref().to_owned()).collect(),
            part_capacity: self.options.array_part_capacity,
            target,
        };
        self.submit(request, callbacks)
    }

    /// Load a single image into the 2D texture `target`.
    pub fn load_image(
        &mut self,
        path: &str,
        target: TextureHandle,
        wrap: (WrapMode, WrapMode),
        callbacks: LoadCallbacks,
    ) -> RequestId {
        let request = LoadRequest {
            label: path.to_owned(),
            kind: CompositeKind::Texture2D {
                wrap_u: wrap.0,
                wrap_v: wrap.1,
            },
            paths: vec![path.to_owned()],
            part_capacity: self.options.image_part_capacity,
            target,
        };
        self.submit(request, callbacks)
    }

    /// Register a load and issue one fetch per part.
    ///
    /// Parts that cannot be sent are recorded as failed on the next
    /// [`do_work`](Self::do_work), so the callbacks still fire exactly once
    /// and never before this call returns.
    pub fn submit(&mut self, request: LoadRequest, callbacks: LoadCallbacks) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let LoadRequest {
            label,
            kind,
            paths,
            part_capacity,
            target,
        } = request;
        log::debug!("'{label}': requesting {} parts", paths.len());

        if paths.is_empty() {
            self.ready.push(id);
        }
        let record = CompositeRequest::new(
            label,
            kind,
            target,
            paths,
            part_capacity,
            callbacks,
        );

        for (part, path) in record.paths().iter().enumerate() {
            match self.fetcher.send(path, part_capacity) {
                Ok(ticket) => {
                    let _ = self.tickets.insert(ticket, (id, part));
                }
                Err(error) => {
                    log::warn!("could not request '{path}': {error}");
                    self.deferred.push(PartCompletion {
                        request: id,
                        part,
                        result: Err(error),
                    });
                }
            }
        }
        let _ = self.requests.insert(id, record);
        id
    }

    /// Drain fetch completions and finalize every load they complete.
    ///
    /// Returns the number of loads finalized by this call.
    pub fn do_work(&mut self, sink: &mut dyn TextureSink) -> usize {
        let mut finalized = 0;

        for id in std::mem::take(&mut self.ready) {
            if let Some(request) = self.requests.remove(&id) {
                log::warn!("'{}': no parts to load", request.label());
                self.finish(request, sink);
                finalized += 1;
            }
        }

        let mut completions = std::mem::take(&mut self.deferred);
        for completion in self.fetcher.poll() {
            match self.tickets.remove(&completion.ticket) {
                Some((request, part)) => completions.push(PartCompletion {
                    request,
                    part,
                    result: completion.result,
                }),
                None => log::warn!(
                    "ignoring completion for unknown fetch {:?}",
                    completion.ticket
                ),
            }
        }

        for completion in completions {
            let Some(request) = self.requests.get_mut(&completion.request) else {
                log::warn!(
                    "ignoring part {} of finished load {:?}",
                    completion.part,
                    completion.request
                );
                continue;
            };
            if request.record_part(completion.part, completion.result) == Progress::Complete {
                if let Some(request) = self.requests.remove(&completion.request) {
                    self.finish(request, sink);
                    finalized += 1;
                }
            }
        }
        finalized
    }

    fn finish(&mut self, request: CompositeRequest, sink: &mut dyn TextureSink) {
        match request.finalize(sink) {
            LoadOutcome::Published => self.stats.published += 1,
            LoadOutcome::Failed => self.stats.failed += 1,
        }
    }
}
