//! Shared test utilities for the cardsmith test suite.
//!
//! Provides a font-free typeface, an in-memory asset source, and asset
//! caches seeded with every key a card can ask for, so compositor and studio
//! tests never touch the filesystem or need real font files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut assets = seeded_cache();           // MockRaster assets, labelled by key
//! let card = compose_card(&mut assets, &photo, &CardData::default(), false, pos, &opts)?;
//! assert_eq!(card.composites_of("hp-30"), vec![(490, 76)]);
//! ```

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use crate::assets::{AssetCache, AssetKey, AssetSource, FontFace};
use crate::geometry::{CANVAS, Dimensions};
use crate::imaging::backend::tests::MockRaster;
use crate::imaging::text::{GlyphMask, HAlign, LayoutArea, Typeface, VAlign};
use crate::imaging::{RasterImage, RgbaRaster};

// =========================================================================
// Typeface
// =========================================================================

/// Monospace "font" where every glyph is a solid block `px/2` wide and `px`
/// tall. Wraps on spaces, honours `\n`, aligns like a real face.
#[derive(Debug, Clone)]
pub struct BlockFace {
    px: f32,
}

impl BlockFace {
    pub fn new(px: f32) -> Self {
        Self { px }
    }

    fn advance(&self) -> usize {
        (self.px / 2.0).round() as usize
    }

    fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let advance = self.advance() as f32;
        let mut lines = Vec::new();
        for hard in text.split('\n') {
            let mut line = String::new();
            for word in hard.split(' ') {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{line} {word}")
                };
                if !line.is_empty() && candidate.chars().count() as f32 * advance > max_width {
                    lines.push(std::mem::take(&mut line));
                    line = word.to_string();
                } else {
                    line = candidate;
                }
            }
            lines.push(line);
        }
        lines
    }
}

impl Typeface for BlockFace {
    fn px(&self) -> f32 {
        self.px
    }

    fn layout(&self, text: &str, area: &LayoutArea) -> Vec<GlyphMask> {
        let advance = self.advance();
        let line_height = self.px.round() as usize;
        let lines = self.wrap(text, area.width);
        let total = (lines.len() * line_height) as f32;
        let top = match area.v_align {
            VAlign::Top => 0.0,
            VAlign::Middle => ((area.height - total) / 2.0).floor(),
            VAlign::Bottom => area.height - total,
        };

        let mut glyphs = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let width = (line.chars().count() * advance) as f32;
            let left = match area.h_align {
                HAlign::Left => 0.0,
                HAlign::Center => ((area.width - width) / 2.0).floor(),
                HAlign::Right => area.width - width,
            };
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                glyphs.push(GlyphMask {
                    x: left as i32 + (col * advance) as i32,
                    y: top as i32 + (row * line_height) as i32,
                    width: advance,
                    height: line_height,
                    coverage: vec![255; advance * line_height],
                });
            }
        }
        glyphs
    }
}

// =========================================================================
// Asset sources and caches
// =========================================================================

/// Asset bytes held in memory, keyed by relative path.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn insert(&mut self, path: &str, bytes: &[u8]) {
        self.files.insert(path.to_string(), bytes.to_vec());
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

/// Label and size the seeded mock asset for `key` gets.
pub fn mock_asset(key: AssetKey) -> (String, Dimensions) {
    match key {
        AssetKey::FrameArt(t) => (format!("{t}-frame"), CANVAS),
        AssetKey::HpBadge(hp) => (format!("hp-{hp}"), Dimensions::new(200, 50)),
        AssetKey::EnergyLarge(t) => (format!("energy-large-{t}"), Dimensions::new(40, 40)),
        AssetKey::EnergySmall(t) => (format!("energy-small-{t}"), Dimensions::new(26, 26)),
        AssetKey::EnergyColorless => ("energy-colorless".to_string(), Dimensions::new(40, 40)),
        AssetKey::Placeholder => ("placeholder".to_string(), Dimensions::new(300, 300)),
    }
}

fn seed_fonts<R: RasterImage>(cache: &mut AssetCache<R>) {
    for face in FontFace::ALL {
        cache.insert_font(face, Arc::new(BlockFace::new(face.px())));
    }
}

/// Mock-raster cache holding every image key and block fonts.
///
/// The backing source is empty, so anything outside [`AssetKey::all`]
/// (e.g. an HP value with no badge) fails to load.
pub fn seeded_cache() -> AssetCache<MockRaster> {
    let mut cache = AssetCache::new(MemorySource::default(), "poke/missingno.png");
    for key in AssetKey::all() {
        let (label, size) = mock_asset(key);
        cache.insert_image(key, MockRaster::labelled(&label, size));
    }
    seed_fonts(&mut cache);
    cache
}

/// Real-pixel cache: transparent frame art, opaque icons, grey placeholder.
pub fn seeded_rgba_cache() -> AssetCache<RgbaRaster> {
    let mut cache = AssetCache::new(MemorySource::default(), "poke/missingno.png");
    for key in AssetKey::all() {
        let (_, size) = mock_asset(key);
        let image = match key {
            AssetKey::FrameArt(_) => RgbaRaster::blank(size),
            AssetKey::Placeholder => solid(size, [128, 128, 128, 255]),
            _ => solid(size, [250, 220, 0, 255]),
        };
        cache.insert_image(key, image);
    }
    seed_fonts(&mut cache);
    cache
}

// =========================================================================
// Pixels
// =========================================================================

fn solid(size: Dimensions, rgba: [u8; 4]) -> RgbaRaster {
    RgbaRaster(image::RgbaImage::from_pixel(
        size.width,
        size.height,
        image::Rgba(rgba),
    ))
}

/// PNG bytes of a solid-colour image.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    solid(Dimensions::new(width, height), rgba)
        .encode_png()
        .unwrap()
}
