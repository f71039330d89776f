//! Fixed card geometry and the plain value types shared by the mapper,
//! the position state and the compositor.
//!
//! Nothing here knows about pixels in memory: these are numbers describing
//! where things go. The imaging layer consumes them but never the reverse.
//!
//! ```text
//!  (0,0) ┌──────────────── 726 ────────────────┐
//!        │                                     │
//!        │  (82,122) ┌──── 558 ────┐           │
//!        │           │   frame     │ 390       │ 996
//!        │           └─────────────┘           │
//!        │                                     │
//!        └─────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Full-resolution card canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 726;
/// Full-resolution card canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 996;

/// Size assumed for a photo whose pixels have not been measured yet.
pub const PLACEHOLDER_SIZE: Dimensions = Dimensions {
    width: 300,
    height: 300,
};

/// Pixel dimensions of a raster (photo, badge, canvas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (not yet loaded, or a broken decode).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Substitute [`PLACEHOLDER_SIZE`] for unknown dimensions.
    pub fn or_placeholder(self) -> Self {
        if self.is_empty() {
            PLACEHOLDER_SIZE
        } else {
            self
        }
    }

    /// Longer edge, in pixels.
    pub fn longer_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

/// The full card canvas size.
pub const CANVAS: Dimensions = Dimensions::new(CANVAS_WIDTH, CANVAS_HEIGHT);

/// Where the photo window sits inside the card canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameGeometry {
    /// The one frame every card uses.
    pub const CARD: FrameGeometry = FrameGeometry {
        offset_x: 82.0,
        offset_y: 122.0,
        width: 558.0,
        height: 390.0,
    };

    /// Frame centre in frame-local units.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Frame size as whole pixels (the frame canvas the photo is clipped to).
    pub fn pixel_size(&self) -> Dimensions {
        Dimensions::new(self.width as u32, self.height as u32)
    }

    /// Frame offset as whole canvas pixels.
    pub fn pixel_offset(&self) -> (i64, i64) {
        (self.offset_x as i64, self.offset_y as i64)
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::CARD
    }
}

/// A 2-D point. Which space it lives in depends on who produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in floating point units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Currently displayed size of the preview surface.
///
/// Changes with the viewport, so it is remeasured on every layout change.
/// A zero or non-finite measurement means the surface could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderDimensions {
    pub width: f64,
    pub height: f64,
}

impl RenderDimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The nominal size: preview drawn 1:1 with the canvas.
    pub fn nominal() -> Self {
        Self::new(CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64)
    }

    /// Usable measurement, or the nominal canvas size if unmeasurable.
    pub fn or_nominal(self) -> Self {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            self
        } else {
            Self::nominal()
        }
    }
}

impl Default for RenderDimensions {
    fn default() -> Self {
        Self::nominal()
    }
}
