pub mod export;
pub mod image_loader;
pub mod snapshot;

pub use export::{ExportError, Exporter};
pub use image_loader::{ImageLoader, LoadError, LoadStatus};
pub use snapshot::{CanvasCapture, SnapshotError};
