pub mod editor;
pub mod feed;
pub mod interaction;

pub use editor::{Editor, EditorCommand, EditorMode};
pub use feed::FeedController;
pub use interaction::{DropEffect, EditorKey, InteractionController, InteractionState};
