//! Collaborators the layout engine talks to about image files and text.
//!
//! | Concern | Trait | Production implementation |
//! |---|---|---|
//! | Image type, dimensions, camera metadata | [`ImageBackend`] | [`RustBackend`] |
//! | Caption height | [`TextMeasure`] | [`LineHeightMeasure`] |
//!
//! Neither trait touches pixels. Resampling, compositing and text rendering
//! happen downstream, driven by the layout the engine produces.

pub mod backend;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, Dimensions, ExposureTime, ImageBackend, ImageMetadata};
pub use rust_backend::RustBackend;
pub use text::{LineHeightMeasure, TextMeasure};
