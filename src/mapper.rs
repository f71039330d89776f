//! Coordinate mapping between the three spaces a photo placement lives in.
//!
//! | Space | Units | Origin |
//! |---|---|---|
//! | preview | on-screen pixels of the displayed card | top-left of the preview surface |
//! | frame | canvas pixels | top-left of the photo window |
//! | canvas | full-resolution card pixels (726×996) | top-left of the card |
//!
//! All functions are pure. The compositor places the photo with
//! [`frame_to_canvas`]; the live overlay draws its ghost with
//! [`frame_to_preview`]. Both start from [`photo_rect_in_frame`], so the
//! preview is the final render scaled by the display factor and nothing else.

use crate::geometry::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Dimensions, FrameGeometry, Point, Rect, RenderDimensions,
};
use crate::position::LogicalPosition;

/// Factors converting preview pixels to canvas pixels, per axis.
///
/// An unmeasurable surface maps 1:1.
pub fn preview_to_canvas_factors(rendered: RenderDimensions) -> (f64, f64) {
    let rendered = rendered.or_nominal();
    (
        CANVAS_WIDTH as f64 / rendered.width,
        CANVAS_HEIGHT as f64 / rendered.height,
    )
}

/// Map a pointer on the preview surface to a frame-local point.
///
/// The result is a candidate centre; it has not been clamped.
pub fn screen_to_frame(pointer: Point, rendered: RenderDimensions, frame: &FrameGeometry) -> Point {
    let (sx, sy) = preview_to_canvas_factors(rendered);
    Point::new(pointer.x * sx - frame.offset_x, pointer.y * sy - frame.offset_y)
}

/// Move `current` so its centre sits under `pointer`, keeping its scale.
pub fn pointer_to_position(
    pointer: Point,
    rendered: RenderDimensions,
    frame: &FrameGeometry,
    current: LogicalPosition,
) -> LogicalPosition {
    let center = screen_to_frame(pointer, rendered, frame);
    current.with_center(center.x, center.y, frame)
}

/// Photo rectangle in frame-local units: top-left = centre − scaled size / 2.
pub fn photo_rect_in_frame(position: LogicalPosition, native: Dimensions) -> Rect {
    let native = native.or_placeholder();
    let width = native.width as f64 * position.scale;
    let height = native.height as f64 * position.scale;
    Rect {
        x: position.x - width / 2.0,
        y: position.y - height / 2.0,
        width,
        height,
    }
}

/// Photo rectangle in full-resolution canvas pixels.
pub fn frame_to_canvas(
    position: LogicalPosition,
    native: Dimensions,
    frame: &FrameGeometry,
) -> Rect {
    let local = photo_rect_in_frame(position, native);
    Rect {
        x: local.x + frame.offset_x,
        y: local.y + frame.offset_y,
        ..local
    }
}

/// Recover the logical position from a canvas-space top-left placement.
///
/// Inverse of [`frame_to_canvas`] for a known scale.
pub fn canvas_to_frame(
    top_left: Point,
    native: Dimensions,
    scale: f64,
    frame: &FrameGeometry,
) -> LogicalPosition {
    let native = native.or_placeholder();
    let width = native.width as f64 * scale;
    let height = native.height as f64 * scale;
    LogicalPosition::new(
        top_left.x - frame.offset_x + width / 2.0,
        top_left.y - frame.offset_y + height / 2.0,
        scale,
    )
}

/// Photo rectangle in preview pixels, for the drag ghost.
pub fn frame_to_preview(
    position: LogicalPosition,
    native: Dimensions,
    rendered: RenderDimensions,
    frame: &FrameGeometry,
) -> Rect {
    let (sx, sy) = preview_to_canvas_factors(rendered);
    let canvas = frame_to_canvas(position, native, frame);
    Rect {
        x: canvas.x / sx,
        y: canvas.y / sy,
        width: canvas.width / sx,
        height: canvas.height / sy,
    }
}

/// Map a preview-space point back to canvas pixels.
pub fn preview_to_canvas(point: Point, rendered: RenderDimensions) -> Point {
    let (sx, sy) = preview_to_canvas_factors(rendered);
    Point::new(point.x * sx, point.y * sy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameGeometry = FrameGeometry::CARD;
    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn screen_to_frame_at_half_size_preview() {
        // Preview drawn at 363x498: every preview pixel is 2 canvas pixels.
        let rendered = RenderDimensions::new(363.0, 498.0);
        let p = screen_to_frame(Point::new(100.0, 200.0), rendered, &FRAME);
        assert!(close(p.x, 200.0 - 82.0));
        assert!(close(p.y, 400.0 - 122.0));
    }

    #[test]
    fn screen_to_frame_zero_surface_uses_nominal_size() {
        let p = screen_to_frame(
            Point::new(100.0, 200.0),
            RenderDimensions::new(0.0, 0.0),
            &FRAME,
        );
        assert_eq!(p, Point::new(18.0, 78.0));
    }

    #[test]
    fn pointer_to_position_keeps_scale_and_clamps() {
        let current = LogicalPosition::new(279.0, 195.0, 1.7);
        let moved = pointer_to_position(
            Point::new(-500.0, 5000.0),
            RenderDimensions::nominal(),
            &FRAME,
            current,
        );
        assert_eq!(moved, LogicalPosition::new(-100.0, 490.0, 1.7));
    }

    #[test]
    fn placeholder_fill_example_overflows_vertically() {
        // 300x300 at 1.86 → 558x558 centred in a 558x390 frame.
        let position = LogicalPosition::new(279.0, 195.0, 1.86);
        let rect = photo_rect_in_frame(position, Dimensions::new(300, 300));
        assert!(close(rect.width, 558.0));
        assert!(close(rect.height, 558.0));
        assert!(close(rect.x, 0.0));
        assert!(close(rect.y, -84.0));

        let canvas = frame_to_canvas(position, Dimensions::new(300, 300), &FRAME);
        assert!(close(canvas.x, 82.0));
        assert!(close(canvas.y, 38.0));
    }

    #[test]
    fn unknown_native_size_uses_placeholder() {
        let position = LogicalPosition::new(0.0, 0.0, 1.0);
        let rect = photo_rect_in_frame(position, Dimensions::new(0, 0));
        assert_eq!(rect.width, 300.0);
        assert_eq!(rect.height, 300.0);
    }

    #[test]
    fn canvas_round_trip_recovers_position() {
        let natives = [
            Dimensions::new(300, 300),
            Dimensions::new(4032, 3024),
            Dimensions::new(17, 901),
        ];
        let positions = [
            LogicalPosition::new(279.0, 195.0, 1.0),
            LogicalPosition::new(-100.0, 490.0, 0.1),
            LogicalPosition::new(658.0, -100.0, 3.0),
            LogicalPosition::new(12.345, 67.891, 0.777),
        ];
        for native in natives {
            for position in positions {
                let rect = frame_to_canvas(position, native, &FRAME);
                let back =
                    canvas_to_frame(Point::new(rect.x, rect.y), native, position.scale, &FRAME);
                assert!(close(back.x, position.x), "{native:?} {position:?}");
                assert!(close(back.y, position.y), "{native:?} {position:?}");
                assert_eq!(back.scale, position.scale);
            }
        }
    }

    #[test]
    fn preview_is_canvas_scaled_by_display_factor() {
        let rendered = RenderDimensions::new(500.0, 686.0);
        let position = LogicalPosition::new(200.0, 100.0, 0.5);
        let native = Dimensions::new(800, 600);

        let canvas = frame_to_canvas(position, native, &FRAME);
        let preview = frame_to_preview(position, native, rendered, &FRAME);

        let top_left = preview_to_canvas(Point::new(preview.x, preview.y), rendered);
        let bottom_right = preview_to_canvas(
            Point::new(preview.x + preview.width, preview.y + preview.height),
            rendered,
        );
        assert!((top_left.x - canvas.x).abs() < 1e-6);
        assert!((top_left.y - canvas.y).abs() < 1e-6);
        assert!((bottom_right.x - (canvas.x + canvas.width)).abs() < 1e-6);
        assert!((bottom_right.y - (canvas.y + canvas.height)).abs() < 1e-6);
    }

    #[test]
    fn dragging_to_a_ghost_centre_is_stable() {
        // Pointer placed on the ghost's centre maps back to the same position.
        let rendered = RenderDimensions::new(363.0, 498.0);
        let position = LogicalPosition::new(150.0, 250.0, 1.2);
        let native = Dimensions::new(640, 480);
        let ghost = frame_to_preview(position, native, rendered, &FRAME);
        let centre = Point::new(ghost.x + ghost.width / 2.0, ghost.y + ghost.height / 2.0);
        let moved = pointer_to_position(centre, rendered, &FRAME, position);
        assert!((moved.x - position.x).abs() < 1e-6);
        assert!((moved.y - position.y).abs() < 1e-6);
    }
}
