//! Asynchronous texture loading
//!
//! Texture files are decoded on a shared pool of worker threads so the
//! orchestrating thread can issue a whole batch of loads and then block on
//! individual results as it needs them. Workers only ever touch the file
//! system and the decoder; the GPU-uploadable [`Texture2D`] resource is
//! assembled on the thread that calls [`TextureFuture::wait`].
//!
//! Failed loads are logged and resolve to the empty [`TextureData`]; they
//! never abort the batch or other in-flight loads, and tasks are never
//! retried or cancelled.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use super::decode::{self, DecodedImage};
use super::{Texture2D, TextureData, TextureSettings};
use crate::config::PipelineConfig;

type Job = Box<dyn FnOnce() + Send + 'static>;
type LoadResult = Option<(DecodedImage, u32)>;

/// Shared bounded worker pool for texture load tasks
///
/// The process-wide instance from [`TexturePool::global`] is initialized
/// lazily on first use and lives for the rest of the process; individual
/// load tasks are stateless and may run on any worker. Dedicated pools from
/// [`TexturePool::new`] are mainly useful for tests and tools.
pub struct TexturePool {
    sender: Sender<Job>,
    _workers: Vec<thread::JoinHandle<()>>,
}

impl TexturePool {
    /// Create a pool with the given number of worker threads
    pub fn new(worker_threads: usize) -> Self {
        let worker_threads = worker_threads.max(1);
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();

        let workers = (0..worker_threads)
            .map(|index| {
                let receiver: Receiver<Job> = receiver.clone();
                thread::Builder::new()
                    .name(format!("texture-loader-{index}"))
                    .spawn(move || {
                        while let Ok(job) = receiver.recv() {
                            job();
                        }
                    })
                    .expect("failed to spawn texture loader thread")
            })
            .collect();

        Self {
            sender,
            _workers: workers,
        }
    }

    /// The process-wide shared pool
    pub fn global() -> &'static Self {
        static POOL: OnceLock<TexturePool> = OnceLock::new();
        POOL.get_or_init(|| Self::new(PipelineConfig::default().worker_threads))
    }

    /// Schedule an asynchronous load of `path` for the given texture slot
    ///
    /// Returns immediately; the returned future resolves once the worker
    /// has read and decoded the file. An empty path resolves to the empty
    /// descriptor without ever touching the pool. There is no ordering
    /// guarantee between sibling loads.
    pub fn load(&self, path: impl Into<PathBuf>, slot_key: impl Into<String>) -> TextureFuture {
        let path = path.into();
        let slot_key = slot_key.into();

        if path.as_os_str().is_empty() {
            return TextureFuture {
                path,
                slot_key,
                receiver: None,
            };
        }

        let (sender, receiver) = crossbeam_channel::bounded::<LoadResult>(1);
        let task_path = path.clone();
        let job = Box::new(move || {
            let result = match decode::load_image(&task_path) {
                Ok(loaded) => Some(loaded),
                Err(error) => {
                    log::error!("{error}");
                    None
                }
            };
            // The receiver may already be gone; nothing to do then.
            let _ = sender.send(result);
        });

        if self.sender.send(job).is_err() {
            log::error!("texture pool is shut down; load of {path:?} dropped");
            return TextureFuture {
                path,
                slot_key,
                receiver: None,
            };
        }

        TextureFuture {
            path,
            slot_key,
            receiver: Some(receiver),
        }
    }
}

/// Handle to one in-flight texture load
///
/// One-shot: waiting consumes the future. Once scheduled, the underlying
/// task always runs to completion whether or not the future is awaited.
pub struct TextureFuture {
    path: PathBuf,
    slot_key: String,
    receiver: Option<Receiver<LoadResult>>,
}

impl TextureFuture {
    /// Texture slot this load was scheduled for
    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Block until this task completes and produce its [`TextureData`]
    ///
    /// On success the texture resource is created here, on the calling
    /// thread, with color-space and compression flags chosen by slot
    /// convention. On any failure this returns the empty descriptor.
    pub fn wait(self) -> TextureData {
        let Some(receiver) = self.receiver else {
            return TextureData::default();
        };

        match receiver.recv() {
            Ok(Some((image, num_channels))) => {
                let settings = TextureSettings::for_slot(&self.slot_key, num_channels);
                let name = texture_name(&self.path);
                let texture = Texture2D::from_decoded(name, image, settings);
                TextureData::new(Arc::new(texture), num_channels)
            }
            _ => TextureData::default(),
        }
    }
}

fn texture_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("T_{stem}")
}
