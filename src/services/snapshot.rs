// src/services/snapshot.rs
// PNG export of the canvas alone. The canvas scene is redrawn into an
// offscreen texture of the canvas size, read back through nannou's
// TextureCapturer and written from the capture worker. Finished saves come
// back over a channel so the app only reports files that exist.

use nannou::image::{self, RgbaImage};
use nannou::prelude::*;
use nannou::wgpu;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

const SAMPLE_COUNT: u32 = 4;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not read back the canvas: {0}")]
    Readback(String),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type SaveResult = Result<PathBuf, SnapshotError>;

pub fn write_png(image: &RgbaImage, path: &Path) -> SaveResult {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("Exported {}", path.display());
    Ok(path.to_path_buf())
}

/// Saves running off the main thread.
pub struct PendingSaves {
    sender: Sender<SaveResult>,
    receiver: Receiver<SaveResult>,
    in_flight: usize,
}

impl Default for PendingSaves {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }
}

impl PendingSaves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one save; its job reports through the returned sender.
    pub fn begin(&mut self) -> Sender<SaveResult> {
        self.in_flight += 1;
        self.sender.clone()
    }

    /// Settles a save whose job never started.
    pub fn fail(&self, error: SnapshotError) {
        let _ = self.sender.send(Err(error));
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Non-blocking; finished saves in completion order.
    pub fn poll(&mut self) -> Vec<SaveResult> {
        let done: Vec<SaveResult> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Blocks until every registered save reported or `timeout` passed.
    pub fn wait(&mut self, timeout: Duration) -> Vec<SaveResult> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(left) {
                Ok(result) => {
                    self.in_flight -= 1;
                    done.push(result);
                }
                Err(_) => break,
            }
        }
        done
    }
}

pub struct CanvasCapture {
    device_queue_pair: Arc<wgpu::DeviceQueuePair>,
    texture: wgpu::Texture,
    renderer: nannou::draw::Renderer,
    capturer: wgpu::TextureCapturer,
    saves: PendingSaves,
}

impl CanvasCapture {
    pub fn new(device_queue_pair: Arc<wgpu::DeviceQueuePair>, width: u32, height: u32) -> Self {
        let device = device_queue_pair.device();
        let texture = wgpu::TextureBuilder::new()
            .size([width, height])
            // RENDER_ATTACHMENT for the Draw pass, sampled by the TextureCapturer
            .usage(wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING)
            .sample_count(SAMPLE_COUNT)
            .format(wgpu::TextureFormat::Rgba16Float)
            .build(device);
        let renderer = nannou::draw::RendererBuilder::new()
            .build_from_texture_descriptor(device, texture.descriptor());

        Self {
            device_queue_pair,
            texture,
            renderer,
            capturer: wgpu::TextureCapturer::default(),
            saves: PendingSaves::new(),
        }
    }

    /// Canvas size in pixels. Draws handed to `capture` use it as their window size.
    pub fn size(&self) -> Vec2 {
        let [w, h] = self.texture.size();
        vec2(w as f32, h as f32)
    }

    /// Renders `draw` into the canvas texture and writes it to `path` once
    /// the GPU hands the pixels back.
    pub fn capture(&mut self, draw: &Draw, path: PathBuf) {
        let device = self.device_queue_pair.device();
        let ce_desc = wgpu::CommandEncoderDescriptor {
            label: Some("Canvas capture"),
        };
        let mut encoder = device.create_command_encoder(&ce_desc);
        let texture_view = self.texture.view().build();

        self.renderer.encode_render_pass(
            device,
            &mut encoder,
            draw,
            1.0,
            self.texture.size(),
            &texture_view,
            None,
        );
        let snapshot = self.capturer.capture(device, &mut encoder, &self.texture);
        self.device_queue_pair.queue().submit(Some(encoder.finish()));

        let sender = self.saves.begin();
        let read = snapshot.read(move |result| {
            let saved = match result {
                Ok(buffer) => write_png(&buffer.to_owned(), &path),
                Err(e) => Err(SnapshotError::Readback(e.to_string())),
            };
            let _ = sender.send(saved);
        });
        if read.is_err() {
            self.saves
                .fail(SnapshotError::Readback("capture worker timed out".to_string()));
        }
        device.poll(wgpu::Maintain::Wait);
    }

    pub fn poll(&mut self) -> Vec<SaveResult> {
        self.saves.poll()
    }

    /// Lets outstanding readbacks and writes finish before the app closes.
    pub fn finish(&mut self, timeout: Duration) -> Vec<SaveResult> {
        let device = self.device_queue_pair.device();
        if self.capturer.await_active_snapshots(device).is_err() {
            log::warn!("Canvas capture worker did not finish in time");
        }
        self.saves.wait(timeout)
    }
}
