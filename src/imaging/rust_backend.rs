//! `image`-crate implementation of [`RasterImage`].
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::load_from_memory` |
//! | Identify | `image::image_dimensions` (header only) |
//! | Resize | `image::imageops::resize` with `Triangle` (bilinear) |
//! | Composite | `image::imageops::overlay` (alpha blend, clipped) |
//! | Encode | PNG via `DynamicImage::write_to` |

use super::backend::{BackendError, RasterImage};
use crate::geometry::Dimensions;
use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Photo file extensions that can be decoded.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has a decodable photo extension.
pub fn is_supported_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Read a photo's pixel size from its header without decoding it.
pub fn identify(path: &Path) -> Result<Dimensions, BackendError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        BackendError::Decode(format!("Failed to read dimensions of {}: {}", path.display(), e))
    })?;
    Ok(Dimensions { width, height })
}

/// Straight-alpha RGBA8 raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaRaster(pub RgbaImage);

impl RgbaRaster {
    /// Read and decode a file.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

impl RasterImage for RgbaRaster {
    fn blank(size: Dimensions) -> Self {
        Self(RgbaImage::new(size.width, size.height))
    }

    fn decode(bytes: &[u8]) -> Result<Self, BackendError> {
        let img = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Self(img.to_rgba8()))
    }

    fn from_rgba8(size: Dimensions, pixels: Vec<u8>) -> Result<Self, BackendError> {
        let len = pixels.len();
        RgbaImage::from_raw(size.width, size.height, pixels)
            .map(Self)
            .ok_or_else(|| {
                BackendError::InvalidBuffer(format!(
                    "{} bytes cannot hold {}x{} RGBA",
                    len, size.width, size.height
                ))
            })
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.0.width(), self.0.height())
    }

    fn resized(&self, size: Dimensions) -> Self {
        if size == self.dimensions() {
            return self.clone();
        }
        Self(image::imageops::resize(
            &self.0,
            size.width.max(1),
            size.height.max(1),
            FilterType::Triangle,
        ))
    }

    fn composite(&mut self, top: &Self, x: i64, y: i64) {
        image::imageops::overlay(&mut self.0, &top.0, x, y);
    }

    fn encode_png(&self) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        self.0
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaRaster {
        RgbaRaster(RgbaImage::from_pixel(w, h, Rgba(px)))
    }

    #[test]
    fn supported_extensions_include_common_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "webp"] {
            assert!(exts.contains(expected), "expected {expected}");
        }
        assert!(is_supported_photo(Path::new("me.JPG")));
        assert!(!is_supported_photo(Path::new("notes.txt")));
    }

    #[test]
    fn blank_is_transparent() {
        let raster = RgbaRaster::blank(Dimensions::new(4, 3));
        assert_eq!(raster.dimensions(), Dimensions::new(4, 3));
        assert!(raster.pixels().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn encode_then_decode_png() {
        let raster = solid(5, 7, [10, 20, 30, 255]);
        let png = raster.encode_png().unwrap();
        let back = RgbaRaster::decode(&png).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn decode_garbage_errors() {
        assert!(matches!(
            RgbaRaster::decode(b"not an image"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(RgbaRaster::from_rgba8(Dimensions::new(2, 2), vec![0; 16]).is_ok());
        assert!(matches!(
            RgbaRaster::from_rgba8(Dimensions::new(2, 2), vec![0; 15]),
            Err(BackendError::InvalidBuffer(_))
        ));
    }

    #[test]
    fn composite_clips_negative_offsets() {
        let mut canvas = RgbaRaster::blank(Dimensions::new(10, 10));
        let red = solid(6, 6, [255, 0, 0, 255]);
        canvas.composite(&red, -3, -3);

        assert_eq!(canvas.pixels().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(canvas.pixels().get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(canvas.pixels().get_pixel(3, 3).0[3], 0);
    }

    #[test]
    fn composite_past_far_edge_is_clipped() {
        let mut canvas = RgbaRaster::blank(Dimensions::new(10, 10));
        let blue = solid(6, 6, [0, 0, 255, 255]);
        canvas.composite(&blue, 8, 8);
        assert_eq!(canvas.pixels().get_pixel(9, 9).0, [0, 0, 255, 255]);
        assert_eq!(canvas.pixels().get_pixel(7, 7).0[3], 0);
    }

    #[test]
    fn resize_changes_dimensions() {
        let raster = solid(40, 20, [1, 2, 3, 255]);
        let resized = raster.resized(Dimensions::new(10, 5));
        assert_eq!(resized.dimensions(), Dimensions::new(10, 5));
        assert_eq!(resized.pixels().get_pixel(5, 2).0, [1, 2, 3, 255]);
    }

    #[test]
    fn identify_written_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo.png");
        std::fs::write(&path, solid(33, 21, [0, 0, 0, 255]).encode_png().unwrap()).unwrap();

        assert_eq!(identify(&path).unwrap(), Dimensions::new(33, 21));
        assert_eq!(
            RgbaRaster::open(&path).unwrap().dimensions(),
            Dimensions::new(33, 21)
        );
    }

    #[test]
    fn identify_missing_file_errors() {
        assert!(identify(Path::new("/nonexistent/photo.png")).is_err());
    }
}
