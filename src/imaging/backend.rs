//! Raster capability trait and shared error type.
//!
//! The [`RasterImage`] trait is everything the compositor and the asset cache
//! need from an imaging library: create, decode, measure, resize, composite,
//! encode. The production implementation is
//! [`RgbaRaster`](super::rust_backend::RgbaRaster) over the `image` crate.
//! The coordinate mapper and position state never see this trait.

use crate::geometry::Dimensions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),
}

/// A raster the compositor can work with.
///
/// Every implementation must support all of these so the compositor stays
/// backend-agnostic.
pub trait RasterImage: Clone + Sized {
    /// Fully transparent image of the given size.
    fn blank(size: Dimensions) -> Self;

    /// Decode an encoded image (PNG, JPEG, ...).
    fn decode(bytes: &[u8]) -> Result<Self, BackendError>;

    /// Wrap a row-major, non-premultiplied RGBA8 buffer.
    fn from_rgba8(size: Dimensions, pixels: Vec<u8>) -> Result<Self, BackendError>;

    fn dimensions(&self) -> Dimensions;

    /// Resampled copy at exactly `size`.
    fn resized(&self, size: Dimensions) -> Self;

    /// Alpha-blend `top` over `self` with its top-left at `(x, y)`.
    ///
    /// Offsets may be negative or run past the edge; the overhang is clipped.
    fn composite(&mut self, top: &Self, x: i64, y: i64);

    fn encode_png(&self) -> Result<Vec<u8>, BackendError>;
}
