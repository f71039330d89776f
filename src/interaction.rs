//! Drag and wheel handling over the live preview.
//!
//! The controller is a two-state machine:
//!
//! ```text
//!            set_enabled(true)
//!  Disabled ───────────────────▶ Enabled ──press──▶ Enabled + drag
//!     ▲                             │  ▲                 │
//!     └──── set_enabled(false) ─────┘  └──── release ────┘
//! ```
//!
//! While disabled every gesture is ignored. While enabled, a press on the
//! surface starts a drag session. The session captures the pointer, so move
//! events are accepted wherever they land, including outside the surface,
//! until release. Each move re-centres the photo under the pointer through the
//! [`mapper`](crate::mapper). Wheel ticks change the scale by a step sized to
//! move the photo edge by a roughly constant number of pixels.
//!
//! The controller never stores the position. It reads the current value and
//! returns the requested new one; the owner decides whether to apply it.

use crate::geometry::{Dimensions, FrameGeometry, Point, Rect, RenderDimensions};
use crate::mapper;
use crate::position::LogicalPosition;

/// Default target change, in native pixels, per wheel tick.
pub const DEFAULT_SCROLL_STEP_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Disabled,
    Enabled,
}

/// An in-progress drag. Exists between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pressed_at: Point,
    pub last_pointer: Point,
}

/// What the live overlay draws while positioning is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOverlay {
    /// Ghost of the photo, in preview pixels.
    pub ghost: Rect,
    /// Scale indicator text, e.g. `"1.9x"`.
    pub scale_label: String,
    /// Measured surface size the ghost was computed against.
    pub surface: RenderDimensions,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    frame: FrameGeometry,
    mode: Mode,
    drag: Option<DragSession>,
    surface: RenderDimensions,
    native: Dimensions,
    scroll_step_px: f64,
}

impl InteractionController {
    pub fn new(frame: FrameGeometry, scroll_step_px: f64) -> Self {
        Self {
            frame,
            mode: Mode::Disabled,
            drag: None,
            surface: RenderDimensions::nominal(),
            native: Dimensions::new(0, 0),
            scroll_step_px,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == Mode::Enabled
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn surface(&self) -> RenderDimensions {
        self.surface
    }

    /// Switch modes. Returns true if the mode changed.
    ///
    /// Leaving positioning mode ends any drag; the position itself is untouched.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let next = if enabled { Mode::Enabled } else { Mode::Disabled };
        if next == self.mode {
            return false;
        }
        self.mode = next;
        if next == Mode::Disabled {
            self.drag = None;
        }
        tracing::debug!(mode = ?next, "positioning mode changed");
        true
    }

    /// Record a new measurement of the displayed preview.
    pub fn remeasure(&mut self, surface: RenderDimensions) {
        self.surface = surface;
    }

    /// Record the native size of the photo being positioned (zero = unknown).
    pub fn set_native_size(&mut self, native: Dimensions) {
        self.native = native;
    }

    /// Native size used for ghost and wheel maths.
    pub fn native_size(&self) -> Dimensions {
        self.native.or_placeholder()
    }

    fn on_surface(&self, pointer: Point) -> bool {
        let surface = self.surface.or_nominal();
        (0.0..=surface.width).contains(&pointer.x) && (0.0..=surface.height).contains(&pointer.y)
    }

    /// Pointer pressed at `pointer` (surface-local pixels).
    ///
    /// Starts a drag if enabled and the press lands on the surface. Returns
    /// whether a drag started. The position does not change until the first move.
    pub fn press(&mut self, pointer: Point) -> bool {
        if !self.is_enabled() || !self.on_surface(pointer) {
            return false;
        }
        self.drag = Some(DragSession {
            pressed_at: pointer,
            last_pointer: pointer,
        });
        true
    }

    /// Pointer moved while captured. Returns the new centred position.
    pub fn pointer_moved(
        &mut self,
        pointer: Point,
        current: LogicalPosition,
    ) -> Option<LogicalPosition> {
        if !self.is_enabled() {
            return None;
        }
        let session = self.drag.as_mut()?;
        session.last_pointer = pointer;
        Some(mapper::pointer_to_position(
            pointer,
            self.surface,
            &self.frame,
            current,
        ))
    }

    /// Pointer released. Ends the drag session if one was active.
    pub fn release(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Scale change for one wheel tick: `step / longer native edge`.
    pub fn scroll_delta(&self) -> f64 {
        self.scroll_step_px / self.native_size().longer_edge() as f64
    }

    /// Wheel tick over the surface. `delta_y > 0` (scroll down) shrinks.
    ///
    /// Returns the new position with its scale clamped, or `None` when
    /// disabled or the wheel reported no vertical movement.
    pub fn wheel(&self, delta_y: f64, current: LogicalPosition) -> Option<LogicalPosition> {
        if !self.is_enabled() || delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }
        let step = self.scroll_delta();
        let delta = if delta_y > 0.0 { -step } else { step };
        Some(current.with_scale(current.scale + delta))
    }

    /// Overlay geometry for `position`, or `None` while disabled.
    ///
    /// Uses the same clamp as the compositor's custom placement, so the ghost
    /// is the final render at display scale.
    pub fn overlay(&self, position: LogicalPosition) -> Option<PreviewOverlay> {
        if !self.is_enabled() {
            return None;
        }
        let position = position.clamped_for(&self.frame, self.native_size());
        Some(PreviewOverlay {
            ghost: mapper::frame_to_preview(
                position,
                self.native_size(),
                self.surface,
                &self.frame,
            ),
            scale_label: format!("{:.1}x", position.scale),
            surface: self.surface.or_nominal(),
        })
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(FrameGeometry::CARD, DEFAULT_SCROLL_STEP_PX)
    }
}
