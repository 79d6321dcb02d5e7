//! Asynchronous byte fetching.
//!
//! A [`FetchService`] reads asset bytes on a small pool of background
//! threads. Completions are queued on a channel and only surface when the
//! owning loop calls [`Fetcher::poll`], so everything downstream of a fetch
//! runs on the loop thread.

use std::fmt;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::VistaError;
use crate::options::LoaderOptions;

/// Why a single fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No resource exists at the path.
    NotFound(String),
    /// The resource exists but could not be read.
    Io {
        /// Requested path.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// The resource does not fit the part buffer.
    BufferTooSmall {
        /// Requested path.
        path: String,
        /// Resource size in bytes.
        size: u64,
        /// Buffer capacity in bytes.
        capacity: usize,
    },
    /// Too many fetches are already in flight.
    QueueFull,
    /// The worker pool is gone.
    Disconnected,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "'{path}' not found"),
            Self::Io { path, message } => {
                write!(f, "reading '{path}' failed: {message}")
            }
            Self::BufferTooSmall {
                path,
                size,
                capacity,
            } => write!(
                f,
                "'{path}' is {size} bytes, buffer holds {capacity}"
            ),
            Self::QueueFull => write!(f, "too many fetches in flight"),
            Self::Disconnected => write!(f, "fetch workers disconnected"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Identifies one issued fetch until its completion is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

/// Outcome of one fetch, delivered exactly once per accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    /// Ticket returned by [`Fetcher::send`].
    pub ticket: FetchTicket,
    /// Received bytes, or why none arrived.
    pub result: Result<Vec<u8>, FetchError>,
}

/// Issues byte fetches and hands back their completions.
pub trait Fetcher {
    /// Start fetching `path` into a buffer of at most `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the fetch cannot be issued at all; no
    /// completion will follow for it.
    fn send(&mut self, path: &str, capacity: usize) -> Result<FetchTicket, FetchError>;

    /// Drain every completion that is ready, without blocking.
    fn poll(&mut self) -> Vec<FetchCompletion>;

    /// Fetches sent but not yet returned by [`poll`](Self::poll).
    fn in_flight(&self) -> usize;
}

/// Where fetched bytes come from. Called on worker threads.
pub trait ByteSource: Send + Sync {
    /// Read the whole resource at `path`, failing if it exceeds `capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the resource is missing, unreadable or
    /// larger than `capacity`.
    fn read(&self, path: &str, capacity: usize) -> Result<Vec<u8>, FetchError>;
}

/// Reads files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Resolve fetch paths under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory fetch paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ByteSource for FileSource {
    fn read(&self, path: &str, capacity: usize) -> Result<Vec<u8>, FetchError> {
        let full = self.root.join(path);
        let io_error = |e: std::io::Error| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.to_owned())
            } else {
                FetchError::Io {
                    path: path.to_owned(),
                    message: e.to_string(),
                }
            }
        };

        let file = std::fs::File::open(&full).map_err(io_error)?;
        let size = file.metadata().map_err(io_error)?.len();
        if size > capacity as u64 {
            return Err(FetchError::BufferTooSmall {
                path: path.to_owned(),
                size,
                capacity,
            });
        }

        // The file may grow between stat and read; never read past capacity.
        let mut bytes = Vec::with_capacity(size as usize);
        let _ = file
            .take(capacity as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(io_error)?;
        if bytes.len() > capacity {
            return Err(FetchError::BufferTooSmall {
                path: path.to_owned(),
                size: bytes.len() as u64,
                capacity,
            });
        }
        Ok(bytes)
    }
}

/// Serves byte blobs registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    blobs: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`, replacing any previous blob.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        let _ = self.blobs.insert(path.into(), bytes);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl ByteSource for MemorySource {
    fn read(&self, path: &str, capacity: usize) -> Result<Vec<u8>, FetchError> {
        let bytes = self
            .blobs
            .get(path)
            .ok_or_else(|| FetchError::NotFound(path.to_owned()))?;
        if bytes.len() > capacity {
            return Err(FetchError::BufferTooSmall {
                path: path.to_owned(),
                size: bytes.len() as u64,
                capacity,
            });
        }
        Ok(bytes.clone())
    }
}

struct FetchJob {
    ticket: FetchTicket,
    path: String,
    capacity: usize,
}

/// Fixed pool of background threads serving [`Fetcher`] requests.
pub struct FetchService {
    job_tx: Option<mpsc::Sender<FetchJob>>,
    completion_rx: mpsc::Receiver<FetchCompletion>,
    workers: Vec<std::thread::JoinHandle<()>>,
    outstanding: FxHashSet<FetchTicket>,
    next_ticket: u64,
    max_requests: usize,
}

impl FetchService {
    /// Spawn the worker pool described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::ThreadSpawn`] if a worker thread fails to spawn.
    pub fn new(
        source: Arc<dyn ByteSource>,
        options: &LoaderOptions,
    ) -> Result<Self, VistaError> {
        let (job_tx, job_rx) = mpsc::channel::<FetchJob>();
        let (completion_tx, completion_rx) = mpsc::channel();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let worker_count = options.worker_threads.max(1);
        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let jobs = Arc::clone(&job_rx);
            let done = completion_tx.clone();
            let source = Arc::clone(&source);
            let handle = std::thread::Builder::new()
                .name(format!("fetch-worker-{i}"))
                .spawn(move || worker_loop(&jobs, &done, source.as_ref()))
                .map_err(VistaError::ThreadSpawn)?;
            workers.push(handle);
        }

        log::debug!("fetch service started with {worker_count} workers");

        Ok(Self {
            job_tx: Some(job_tx),
            completion_rx,
            workers,
            outstanding: FxHashSet::default(),
            next_ticket: 0,
            max_requests: options.max_requests.max(1),
        })
    }

    /// Stop accepting fetches and wait for the workers to finish.
    pub fn shutdown(&mut self) {
        drop(self.job_tx.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Fetcher for FetchService {
    fn send(&mut self, path: &str, capacity: usize) -> Result<FetchTicket, FetchError> {
        if self.outstanding.len() >= self.max_requests {
            return Err(FetchError::QueueFull);
        }
        let job_tx = self.job_tx.as_ref().ok_or(FetchError::Disconnected)?;

        let ticket = FetchTicket(self.next_ticket);
        job_tx
            .send(FetchJob {
                ticket,
                path: path.to_owned(),
                capacity,
            })
            .map_err(|_| FetchError::Disconnected)?;
        self.next_ticket += 1;
        let _ = self.outstanding.insert(ticket);
        Ok(ticket)
    }

    fn poll(&mut self) -> Vec<FetchCompletion> {
        let mut ready = Vec::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => {
                    if self.outstanding.remove(&completion.ticket) {
                        ready.push(completion);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // Every worker exited; whatever is still outstanding
                    // will never complete on its own.
                    let mut lost: Vec<FetchTicket> = self.outstanding.drain().collect();
                    lost.sort_unstable();
                    ready.extend(lost.into_iter().map(|ticket| FetchCompletion {
                        ticket,
                        result: Err(FetchError::Disconnected),
                    }));
                    break;
                }
            }
        }
        ready
    }

    fn in_flight(&self) -> usize {
        self.outstanding.len()
    }
}

impl Drop for FetchService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    jobs: &Mutex<mpsc::Receiver<FetchJob>>,
    done: &mpsc::Sender<FetchCompletion>,
    source: &dyn ByteSource,
) {
    loop {
        let job = {
            let Ok(rx) = jobs.lock() else { break };
            rx.recv()
        };
        let Ok(job) = job else { break };

        // Every job answers, even when the source panics.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            source.read(&job.path, job.capacity)
        }))
        .unwrap_or_else(|_| {
            Err(FetchError::Io {
                path: job.path.clone(),
                message: "byte source panicked".to_owned(),
            })
        });
        if let Err(e) = &result {
            log::debug!("fetch {:?} failed: {e}", job.ticket);
        }
        if done
            .send(FetchCompletion {
                ticket: job.ticket,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
