// src/services/image_loader.rs
// Decodes the reference image off the main thread. The app polls once per
// frame and uploads the result as a texture when it arrives.

use nannou::image::{self, DynamicImage};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image loader stopped before finishing")]
    Disconnected,
}

#[derive(Debug)]
pub enum LoadStatus {
    Pending,
    Ready(DynamicImage),
    Failed(LoadError),
    /// Nothing requested, or the result was already taken.
    Idle,
}

pub struct ImageLoader {
    receiver: Option<Receiver<Result<DynamicImage, LoadError>>>,
}

impl ImageLoader {
    pub fn idle() -> Self {
        Self { receiver: None }
    }

    pub fn spawn(path: &Path) -> Self {
        Self::spawn_with(path.to_path_buf(), |path| {
            image::open(&path).map_err(|source| LoadError::Decode { path, source })
        })
    }

    fn spawn_with<F>(path: PathBuf, decode: F) -> Self
    where
        F: FnOnce(PathBuf) -> Result<DynamicImage, LoadError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        log::info!("Loading reference image {}", path.display());
        thread::spawn(move || {
            // the receiver is gone when the app cancelled; nothing to report
            let _ = sender.send(decode(path));
        });
        Self {
            receiver: Some(receiver),
        }
    }

    /// Non-blocking. A result is handed out once, after which the loader is
    /// idle; failures are never retried.
    pub fn poll(&mut self) -> LoadStatus {
        let Some(receiver) = &self.receiver else {
            return LoadStatus::Idle;
        };
        let status = match receiver.try_recv() {
            Ok(Ok(image)) => LoadStatus::Ready(image),
            Ok(Err(e)) => LoadStatus::Failed(e),
            Err(TryRecvError::Empty) => return LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => LoadStatus::Failed(LoadError::Disconnected),
        };
        self.receiver = None;
        status
    }

    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Drops the channel; a decode still running finishes into the void.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }
}
