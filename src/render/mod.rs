//! Figure rasterization and the PNG response pipeline.

pub mod figure;
pub mod pipeline;

pub use figure::{Canvas, Figure};
pub use pipeline::{render, PngImage};
