//! Pure placement math for the compositor.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::geometry::{Dimensions, FrameGeometry};
use crate::position::{LogicalPosition, fill_scale};

/// Where the resized photo goes on the frame canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoPlacement {
    /// Top-left on the frame canvas; negative when the photo overhangs.
    pub x: i64,
    pub y: i64,
    /// Size the photo is resized to.
    pub width: u32,
    pub height: u32,
}

impl PhotoPlacement {
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Floor that ignores float noise just below a whole number
/// (`300.0 * 1.86` is `557.9999…` or `558.0000…1` depending on the path).
fn floor_px(v: f64) -> f64 {
    (v + 1e-9).floor()
}

fn scaled_size(native: Dimensions, scale: f64) -> Dimensions {
    let side = |v: u32| floor_px(v as f64 * scale).max(1.0) as u32;
    Dimensions::new(side(native.width), side(native.height))
}

/// Cover the frame, centred: the default placement.
///
/// # Examples
/// ```
/// # use cardsmith::geometry::{Dimensions, FrameGeometry};
/// # use cardsmith::imaging::fill_placement;
/// let p = fill_placement(Dimensions::new(300, 300), &FrameGeometry::CARD);
/// assert_eq!((p.x, p.y, p.width, p.height), (0, -84, 558, 558));
/// ```
pub fn fill_placement(native: Dimensions, frame: &FrameGeometry) -> PhotoPlacement {
    let native = native.or_placeholder();
    let size = scaled_size(native, fill_scale(native, frame));
    PhotoPlacement {
        x: floor_px((frame.width - size.width as f64) / 2.0) as i64,
        y: floor_px((frame.height - size.height as f64) / 2.0) as i64,
        width: size.width,
        height: size.height,
    }
}

/// Centre the photo at the logical position, at its scale.
pub fn custom_placement(native: Dimensions, position: LogicalPosition) -> PhotoPlacement {
    let size = scaled_size(native.or_placeholder(), position.scale);
    PhotoPlacement {
        x: floor_px(position.x - size.width as f64 / 2.0) as i64,
        y: floor_px(position.y - size.height as f64 / 2.0) as i64,
        width: size.width,
        height: size.height,
    }
}

/// Pick the placement for a render.
pub fn photo_placement(
    native: Dimensions,
    frame: &FrameGeometry,
    use_custom: bool,
    position: LogicalPosition,
) -> PhotoPlacement {
    if use_custom {
        custom_placement(native, position.clamped_for(frame, native))
    } else {
        fill_placement(native, frame)
    }
}

/// X offsets of the retreat-cost icons. Costs with no layout draw nothing.
pub fn retreat_icon_offsets(cost: u8) -> &'static [i64] {
    match cost {
        0 => &[],
        1 => &[580],
        2 => &[563, 596],
        3 => &[547, 580, 612],
        _ => &[],
    }
}

/// Intermediate size for the final softening pass (half the canvas).
pub fn softening_size(canvas: Dimensions) -> Dimensions {
    Dimensions::new((canvas.width / 2).max(1), (canvas.height / 2).max(1))
}
