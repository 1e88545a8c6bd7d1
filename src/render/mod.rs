//! Drawing surfaces.
//!
//! The growth engine only sees the [`surface::Surface`] trait; [`cpu::CpuSurface`] rasterizes
//! with `vello_cpu`, the others record or count operations for tests and long headless runs.

/// CPU raster surface.
pub mod cpu;
/// Captured pixel frames.
pub mod frame;
/// The surface trait and non-raster implementations.
pub mod surface;
