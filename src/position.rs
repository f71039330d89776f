//! Logical photo position and the default it is reset to.
//!
//! A [`LogicalPosition`] is resolution independent: `x`/`y` are the centre of
//! the photo in frame-local units and `scale` multiplies the photo's native
//! pixel size. The same value drives the live preview and the final render.
//!
//! [`PositionState`] keeps the live (editable) value next to the default that
//! was computed when the photo last changed. Comparing the two tells the
//! compositor whether the user has customised the placement at all.

use crate::geometry::{Dimensions, FrameGeometry};
use serde::{Deserialize, Serialize};

/// Smallest allowed photo scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed photo scale.
pub const MAX_SCALE: f64 = 3.0;
/// How far the photo centre may travel outside the frame on each side.
pub const OVERFLOW_MARGIN: f64 = 100.0;

/// Centre point + uniform scale of the photo inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalPosition {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl LogicalPosition {
    pub const fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    /// Centred in `frame` at the given scale.
    pub fn centered(frame: &FrameGeometry, scale: f64) -> Self {
        let c = frame.center();
        Self::new(c.x, c.y, scale)
    }

    /// Clamp into the allowed range for `frame`.
    ///
    /// This is the only bounds rule in the crate. Non-finite components are
    /// replaced with the frame centre (for `x`/`y`) or `1.0` (for `scale`)
    /// before clamping.
    pub fn clamped(self, frame: &FrameGeometry) -> Self {
        let (x, y) = clamp_center(self.x, self.y, frame);
        Self {
            x,
            y,
            scale: clamp_scale(self.scale, MIN_SCALE, MAX_SCALE),
        }
    }

    /// Clamp only the components that differ from `previous`.
    ///
    /// A component carried over unchanged (such as a fill scale below
    /// [`MIN_SCALE`] for a very large photo) passes through as is.
    pub fn clamped_against(self, previous: LogicalPosition, frame: &FrameGeometry) -> Self {
        let bounded = self.clamped(frame);
        let pick = |value: f64, before: f64, clamped: f64| {
            if value == before { value } else { clamped }
        };
        Self {
            x: pick(self.x, previous.x, bounded.x),
            y: pick(self.y, previous.y, bounded.y),
            scale: pick(self.scale, previous.scale, bounded.scale),
        }
    }

    /// Clamp for drawing a photo of `native` size.
    ///
    /// The scale range is widened to include the photo's fill scale, so the
    /// default position always draws as itself.
    pub fn clamped_for(self, frame: &FrameGeometry, native: Dimensions) -> Self {
        let (x, y) = clamp_center(self.x, self.y, frame);
        let (lo, hi) = scale_range(native, frame);
        Self {
            x,
            y,
            scale: clamp_scale(self.scale, lo, hi),
        }
    }

    /// Replace the given components. Only replacements that differ from the
    /// current value are clamped, so no overrides returns `self` unchanged.
    pub fn with_overrides(
        self,
        x: Option<f64>,
        y: Option<f64>,
        scale: Option<f64>,
        frame: &FrameGeometry,
    ) -> Self {
        Self::new(
            x.unwrap_or(self.x),
            y.unwrap_or(self.y),
            scale.unwrap_or(self.scale),
        )
        .clamped_against(self, frame)
    }

    /// Same centre, new scale. Only the scale is clamped.
    pub fn with_scale(self, scale: f64) -> Self {
        Self {
            scale: clamp_scale(scale, MIN_SCALE, MAX_SCALE),
            ..self
        }
    }

    /// Same scale, new centre. Only the centre is clamped.
    pub fn with_center(self, x: f64, y: f64, frame: &FrameGeometry) -> Self {
        let (x, y) = clamp_center(x, y, frame);
        Self { x, y, ..self }
    }
}

fn clamp_center(x: f64, y: f64, frame: &FrameGeometry) -> (f64, f64) {
    let center = frame.center();
    let x = if x.is_finite() { x } else { center.x };
    let y = if y.is_finite() { y } else { center.y };
    (
        x.clamp(-OVERFLOW_MARGIN, frame.width + OVERFLOW_MARGIN),
        y.clamp(-OVERFLOW_MARGIN, frame.height + OVERFLOW_MARGIN),
    )
}

fn clamp_scale(scale: f64, lo: f64, hi: f64) -> f64 {
    let scale = if scale.is_finite() { scale } else { 1.0 };
    scale.clamp(lo, hi)
}

/// Scale range a photo of `native` size may be drawn at: the normal
/// [`MIN_SCALE`]..[`MAX_SCALE`], stretched to take in its fill scale.
pub fn scale_range(native: Dimensions, frame: &FrameGeometry) -> (f64, f64) {
    let fill = fill_scale(native, frame);
    (MIN_SCALE.min(fill), MAX_SCALE.max(fill))
}

/// Smallest uniform scale at which a photo of `native` size covers the frame
/// on both axes. One axis may overflow.
///
/// Unknown (zero) native sizes use the placeholder size.
pub fn fill_scale(native: Dimensions, frame: &FrameGeometry) -> f64 {
    let native = native.or_placeholder();
    let sx = frame.width / native.width as f64;
    let sy = frame.height / native.height as f64;
    sx.max(sy)
}

/// What the card is currently showing in the photo window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// No photo chosen; the fallback placeholder is shown.
    Placeholder,
    /// A user photo with its native pixel size.
    Photo(Dimensions),
}

/// Default position for a source.
///
/// The placeholder sits centred at scale 1. A photo sits centred at its
/// [`fill_scale`].
pub fn default_position(source: SourceKind, frame: &FrameGeometry) -> LogicalPosition {
    match source {
        SourceKind::Placeholder => LogicalPosition::centered(frame, 1.0),
        SourceKind::Photo(native) => LogicalPosition::centered(frame, fill_scale(native, frame)),
    }
}

/// Live position plus the recorded default it can be reset to.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    frame: FrameGeometry,
    live: LogicalPosition,
    default: LogicalPosition,
}

impl PositionState {
    pub fn new(frame: FrameGeometry) -> Self {
        let default = default_position(SourceKind::Placeholder, &frame);
        Self {
            frame,
            live: default,
            default,
        }
    }

    pub fn frame(&self) -> &FrameGeometry {
        &self.frame
    }

    pub fn live(&self) -> LogicalPosition {
        self.live
    }

    pub fn default_position(&self) -> LogicalPosition {
        self.default
    }

    /// Recompute the default for a new source and move the live value to it.
    pub fn source_changed(&mut self, source: SourceKind) {
        self.default = default_position(source, &self.frame);
        self.live = self.default;
    }

    /// Store a new live position. Components that changed are clamped;
    /// the rest are kept. Returns the stored value.
    pub fn set(&mut self, position: LogicalPosition) -> LogicalPosition {
        self.live = position.clamped_against(self.live, &self.frame);
        self.live
    }

    /// Restore the recorded default exactly.
    pub fn reset(&mut self) -> LogicalPosition {
        self.live = self.default;
        self.live
    }

    /// Whether the live value differs from the default in any component.
    pub fn is_customized(&self) -> bool {
        is_customized(self.live, self.default)
    }
}

impl Default for PositionState {
    fn default() -> Self {
        Self::new(FrameGeometry::CARD)
    }
}

/// Exact comparison of a position against its default.
pub fn is_customized(position: LogicalPosition, default: LogicalPosition) -> bool {
    position != default
}
