//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Sparky.png → out/Sparky.png
//!     Photo: custom, 558x558 at (0, -84)
//!     Size: 48213 bytes
//!     SHA-256: 3f1c…
//! ```
//!
//! ## Position
//!
//! ```text
//! Photo 300x300
//!     Default: centre (279.0, 195.0), scale 1.86
//!     Fill: 558x558 at (0, -84)
//!     Pointer (141.0, 161.0) on 363x498 → frame (200.0, 200.0)
//! ```
//!
//! ## Check
//!
//! ```text
//! Assets in public/
//!     36 of 37 present
//!     Missing: poke/hp-120.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::assets::AssetReport;
use crate::geometry::{Dimensions, Point, RenderDimensions};
use crate::imaging::PhotoPlacement;
use crate::position::LogicalPosition;
use crate::studio::{RenderedCard, ReplaySummary};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn placement_line(placement: &PhotoPlacement) -> String {
    format!(
        "{}x{} at ({}, {})",
        placement.width, placement.height, placement.x, placement.y
    )
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// render
// ============================================================================

/// Format the result of writing one card.
pub fn format_render_report(card: &RenderedCard, written_to: &Path) -> Vec<String> {
    let mode = if card.use_custom { "custom" } else { "fill" };
    vec![
        format!("{} → {}", card.filename, written_to.display()),
        format!(
            "{}Photo: {}, {}",
            indent(1),
            mode,
            placement_line(&card.placement)
        ),
        format!("{}Size: {} bytes", indent(1), card.png.len()),
        format!("{}SHA-256: {}", indent(1), card.sha256),
    ]
}

pub fn print_render_report(card: &RenderedCard, written_to: &Path) {
    print_lines(format_render_report(card, written_to));
}

// ============================================================================
// position
// ============================================================================

/// Screen-to-frame mapping of one pointer sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub pointer: Point,
    pub surface: RenderDimensions,
    pub frame_point: Point,
}

/// Everything the `position` command shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    /// `None` for the placeholder.
    pub native: Option<Dimensions>,
    pub default: LogicalPosition,
    pub fill: PhotoPlacement,
    pub sample: Option<PointerSample>,
}

pub fn format_position_report(report: &PositionReport) -> Vec<String> {
    let mut lines = vec![match report.native {
        Some(d) => format!("Photo {}x{}", d.width, d.height),
        None => "Placeholder".to_string(),
    }];
    lines.push(format!(
        "{}Default: centre ({:.1}, {:.1}), scale {:.2}",
        indent(1),
        report.default.x,
        report.default.y,
        report.default.scale
    ));
    lines.push(format!("{}Fill: {}", indent(1), placement_line(&report.fill)));
    if let Some(s) = &report.sample {
        lines.push(format!(
            "{}Pointer ({:.1}, {:.1}) on {}x{} → frame ({:.1}, {:.1})",
            indent(1),
            s.pointer.x,
            s.pointer.y,
            s.surface.width,
            s.surface.height,
            s.frame_point.x,
            s.frame_point.y
        ));
    }
    lines
}

pub fn print_position_report(report: &PositionReport) {
    print_lines(format_position_report(report));
}

// ============================================================================
// check
// ============================================================================

pub fn format_asset_check(report: &AssetReport) -> Vec<String> {
    let total = report.present + report.missing.len();
    let mut lines = vec![
        format!("Assets in {}", report.root.display()),
        format!("{}{} of {} present", indent(1), report.present, total),
    ];
    lines.extend(
        report
            .missing
            .iter()
            .map(|path| format!("{}Missing: {}", indent(1), path)),
    );
    lines
}

pub fn print_asset_check(report: &AssetReport) {
    print_lines(format_asset_check(report));
}

// ============================================================================
// replay
// ============================================================================

pub fn format_replay_summary(summary: &ReplaySummary, last: Option<&RenderedCard>) -> Vec<String> {
    let mut lines = vec![format!(
        "Replayed {} events: {} rendered, {} discarded, {} failed",
        summary.events, summary.displayed, summary.discarded, summary.failed
    )];
    match last {
        Some(card) => lines.push(format!(
            "{}Final: {} (revision {})",
            indent(1),
            card.filename,
            card.revision
        )),
        None => lines.push(format!("{}No card rendered", indent(1))),
    }
    lines
}

pub fn print_replay_summary(summary: &ReplaySummary, last: Option<&RenderedCard>) {
    print_lines(format_replay_summary(summary, last));
}
