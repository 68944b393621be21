// src/views/mod.rs
// Window chrome drawn straight onto the nannou Draw.

pub mod status;
pub mod toolbar;

pub use status::StatusBar;
pub use toolbar::{Toolbar, TOOLBAR_HEIGHT};
