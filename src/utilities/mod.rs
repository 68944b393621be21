pub mod spline;

pub use spline::{smooth, Smoothing};
