//! Text layout and rasterisation into box-sized RGBA layers.
//!
//! A [`Typeface`] turns a string into positioned coverage masks inside a
//! layout area. [`render_text_layer`] draws those masks into a transparent
//! buffer exactly the size of the text box, so anything that wraps past the
//! box height is clipped instead of spilling over the card.
//!
//! Production faces are [`FontdueFace`] (TrueType/OpenType via `fontdue`).

use crate::geometry::Dimensions;
use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle, VerticalAlign, WrapStyle,
};
use fontdue::{Font, FontSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Area a typeface lays text out in, with its origin at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutArea {
    pub width: f32,
    pub height: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// Coverage bitmap for one glyph, positioned in layout-area pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major, one byte per pixel, 0 = empty, 255 = fully covered.
    pub coverage: Vec<u8>,
}

/// Something that can lay out and rasterise text.
pub trait Typeface: Send + Sync {
    /// Pixel size this face is drawn at.
    fn px(&self) -> f32;

    /// Lay out `text` inside `area`, wrapping on word boundaries.
    fn layout(&self, text: &str, area: &LayoutArea) -> Vec<GlyphMask>;
}

/// A TrueType/OpenType face at a fixed pixel size.
pub struct FontdueFace {
    font: Font,
    px: f32,
}

impl FontdueFace {
    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, String> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| e.to_string())?;
        Ok(Self { font, px })
    }
}

impl Typeface for FontdueFace {
    fn px(&self) -> f32 {
        self.px
    }

    fn layout(&self, text: &str, area: &LayoutArea) -> Vec<GlyphMask> {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width: Some(area.width),
            max_height: Some(area.height),
            horizontal_align: match area.h_align {
                HAlign::Left => HorizontalAlign::Left,
                HAlign::Center => HorizontalAlign::Center,
                HAlign::Right => HorizontalAlign::Right,
            },
            vertical_align: match area.v_align {
                VAlign::Top => VerticalAlign::Top,
                VAlign::Middle => VerticalAlign::Middle,
                VAlign::Bottom => VerticalAlign::Bottom,
            },
            line_height: 1.0,
            wrap_style: WrapStyle::Word,
            wrap_hard_breaks: true,
        });
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));

        layout
            .glyphs()
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| {
                let (_, coverage) = self.font.rasterize_config(g.key);
                GlyphMask {
                    x: g.x.round() as i32,
                    y: g.y.round() as i32,
                    width: g.width,
                    height: g.height,
                    coverage,
                }
            })
            .collect()
    }
}

/// A rendered text box ready to composite.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub size: Dimensions,
    /// Straight-alpha RGBA8, row-major.
    pub rgba: Vec<u8>,
}

/// Render `text` into a transparent layer of `size`.
///
/// Returns `None` for blank text or an empty box.
pub fn render_text_layer(
    face: &dyn Typeface,
    text: &str,
    size: Dimensions,
    h_align: HAlign,
    v_align: VAlign,
    color: [u8; 3],
) -> Option<TextLayer> {
    if text.trim().is_empty() || size.is_empty() {
        return None;
    }
    let area = LayoutArea {
        width: size.width as f32,
        height: size.height as f32,
        h_align,
        v_align,
    };
    let mut rgba = vec![0u8; size.width as usize * size.height as usize * 4];
    for glyph in face.layout(text, &area) {
        blend_glyph(&mut rgba, size, &glyph, color);
    }
    Some(TextLayer { size, rgba })
}

/// Draw one glyph mask into the layer, clipping at the layer edges.
///
/// Overlapping glyph edges keep the stronger coverage.
fn blend_glyph(rgba: &mut [u8], size: Dimensions, glyph: &GlyphMask, color: [u8; 3]) {
    let (w, h) = (size.width as i32, size.height as i32);
    for gy in 0..glyph.height {
        let py = glyph.y + gy as i32;
        if py < 0 || py >= h {
            continue;
        }
        for gx in 0..glyph.width {
            let px = glyph.x + gx as i32;
            if px < 0 || px >= w {
                continue;
            }
            let coverage = glyph.coverage[gy * glyph.width + gx];
            if coverage == 0 {
                continue;
            }
            let idx = ((py * w + px) * 4) as usize;
            if coverage > rgba[idx + 3] {
                rgba[idx..idx + 3].copy_from_slice(&color);
                rgba[idx + 3] = coverage;
            }
        }
    }
}
