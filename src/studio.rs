//! The top-level controller: owns every piece of mutable state and decides
//! when a card gets rendered.
//!
//! ```text
//!  edit_card ──▶ card debouncer (500ms) ──┐
//!                                         ├─▶ revision += 1 ─▶ begin_generation ─▶ render ─▶ finish_generation
//!  drag/wheel ─▶ position debouncer (300ms)┘        ▲                 │
//!  set_photo, positioning off ──────────────────────┘   suppressed while positioning is on,
//!                                                       dropped while a generation is in flight
//! ```
//!
//! ## Generation slot
//!
//! At most one generation is in flight. Every committed change bumps the
//! revision and marks the studio dirty. A trigger that arrives while the slot
//! is busy is dropped, but the dirty flag survives it, so exactly one
//! follow-up generation starts once the slot frees up. A generation that
//! finishes for an older revision is discarded instead of displayed.
//!
//! Rendering is split into [`begin_generation`](CardStudio::begin_generation),
//! [`render`](CardStudio::render) and
//! [`finish_generation`](CardStudio::finish_generation) so a host can run the
//! render off its event loop and keep feeding input in between.
//! [`step`](CardStudio::step) runs all three inline.
//!
//! ## Failures
//!
//! A failed render (missing asset, encode error) is logged, the previous
//! output stays displayed and nothing is retried until the next change.

use crate::assets::{AssetCache, AssetKey};
use crate::config::StudioConfig;
use crate::debounce::Debouncer;
use crate::geometry::{Dimensions, FrameGeometry, Point, RenderDimensions};
use crate::imaging::{
    BackendError, ComposeError, PhotoPlacement, RasterImage, RenderOptions, compose_card,
    photo_placement,
};
use crate::interaction::{InteractionController, PreviewOverlay};
use crate::position::{LogicalPosition, PositionState, SourceKind, is_customized};
use crate::types::CardData;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid event script: {0}")]
    Script(#[from] serde_json::Error),
}

/// Snapshot of everything one render needs.
#[derive(Debug, Clone)]
pub struct GenerationRequest<R> {
    pub revision: u64,
    pub card: CardData,
    /// `None` renders the placeholder.
    pub photo: Option<Arc<R>>,
    pub use_custom: bool,
    pub position: LogicalPosition,
}

/// A finished, encoded card.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard {
    pub revision: u64,
    pub png: Vec<u8>,
    pub filename: String,
    /// Hex SHA-256 of `png`.
    pub sha256: String,
    pub use_custom: bool,
    pub placement: PhotoPlacement,
}

/// What happened to a finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Displayed { revision: u64 },
    DiscardedStale { revision: u64, current: u64 },
    Failed { revision: u64, error: String },
}

pub struct CardStudio<R: RasterImage> {
    assets: AssetCache<R>,
    options: RenderOptions,
    card: CardData,
    card_debounce: Debouncer<CardData>,
    position: PositionState,
    committed_position: LogicalPosition,
    position_debounce: Debouncer<LogicalPosition>,
    controller: InteractionController,
    photo: Option<Arc<R>>,
    revision: u64,
    dirty: bool,
    in_flight: Option<u64>,
    output: Option<RenderedCard>,
}

impl<R: RasterImage> CardStudio<R> {
    pub fn new(assets: AssetCache<R>, config: &StudioConfig) -> Self {
        let frame = FrameGeometry::CARD;
        let position = PositionState::new(frame);
        Self {
            assets,
            options: config.render_options(),
            card: CardData::default(),
            card_debounce: Debouncer::new(config.timing.card_debounce()),
            committed_position: position.live(),
            position,
            position_debounce: Debouncer::new(config.timing.position_debounce()),
            controller: InteractionController::new(frame, config.interaction.scroll_step_px),
            photo: None,
            revision: 0,
            dirty: true,
            in_flight: None,
            output: None,
        }
    }

    /// Load the shared fonts and icons. A failure is logged and rendering
    /// still proceeds; the missing asset fails each render that needs it.
    pub fn preload(&mut self) -> bool {
        match self.assets.preload() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "preload incomplete");
                false
            }
        }
    }

    pub fn assets(&self) -> &AssetCache<R> {
        &self.assets
    }

    pub fn card(&self) -> &CardData {
        &self.card
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn output(&self) -> Option<&RenderedCard> {
        self.output.as_ref()
    }

    pub fn live_position(&self) -> LogicalPosition {
        self.position.live()
    }

    pub fn default_position(&self) -> LogicalPosition {
        self.position.default_position()
    }

    /// Position the next render uses (the last debounced value).
    pub fn committed_position(&self) -> LogicalPosition {
        self.committed_position
    }

    /// Whether the next render places the photo at the custom position.
    pub fn uses_custom_position(&self) -> bool {
        is_customized(self.committed_position, self.position.default_position())
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn overlay(&self) -> Option<PreviewOverlay> {
        self.controller.overlay(self.position.live())
    }

    fn bump(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    /// A card-field edit. Takes effect once edits pause for the card window.
    pub fn edit_card(&mut self, card: CardData, now: Instant) {
        self.card_debounce.push(card, now);
    }

    /// Replace the photo (`None` = placeholder).
    ///
    /// Recomputes the default position and moves the live position to it.
    pub fn set_photo(&mut self, photo: Option<R>) {
        let source = match &photo {
            Some(p) => SourceKind::Photo(p.dimensions()),
            None => SourceKind::Placeholder,
        };
        self.position.source_changed(source);
        self.position_debounce.flush();
        self.committed_position = self.position.live();
        self.controller.set_native_size(match source {
            SourceKind::Photo(d) => d,
            SourceKind::Placeholder => Dimensions::new(0, 0),
        });
        self.photo = photo.map(Arc::new);
        self.bump();
    }

    fn position_changed(&mut self, position: LogicalPosition, now: Instant) -> LogicalPosition {
        let stored = self.position.set(position);
        self.position_debounce.push(stored, now);
        stored
    }

    pub fn press(&mut self, pointer: Point) -> bool {
        self.controller.press(pointer)
    }

    pub fn pointer_moved(&mut self, pointer: Point, now: Instant) -> Option<LogicalPosition> {
        let next = self.controller.pointer_moved(pointer, self.position.live())?;
        Some(self.position_changed(next, now))
    }

    pub fn release(&mut self) -> bool {
        self.controller.release()
    }

    pub fn wheel(&mut self, delta_y: f64, now: Instant) -> Option<LogicalPosition> {
        let next = self.controller.wheel(delta_y, self.position.live())?;
        Some(self.position_changed(next, now))
    }

    pub fn remeasure(&mut self, surface: RenderDimensions) {
        self.controller.remeasure(surface);
    }

    /// Restore the default position recorded for the current photo.
    pub fn reset_position(&mut self, now: Instant) -> LogicalPosition {
        let default = self.position.reset();
        self.position_debounce.push(default, now);
        default
    }

    /// Turn positioning mode on or off.
    ///
    /// Turning it off commits any pending position at once and schedules a
    /// full render.
    pub fn set_positioning(&mut self, enabled: bool) -> bool {
        if !self.controller.set_enabled(enabled) {
            return false;
        }
        if !enabled {
            if let Some(position) = self.position_debounce.flush() {
                self.committed_position = position;
            }
            self.bump();
        }
        true
    }

    // ---------------------------------------------------------------------
    // Generation
    // ---------------------------------------------------------------------

    /// Earliest time a pending edit settles.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.card_debounce.deadline(), self.position_debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Commit any settled edits and start a generation if one is due.
    pub fn pump(&mut self, now: Instant) -> Option<GenerationRequest<R>> {
        if let Some(card) = self.card_debounce.poll(now) {
            if card != self.card {
                self.card = card;
                self.bump();
            }
        }
        if let Some(position) = self.position_debounce.poll(now) {
            if position != self.committed_position {
                self.committed_position = position;
                self.bump();
            }
        }
        self.begin_generation()
    }

    /// Claim the generation slot if there is something to render.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest<R>> {
        if !self.dirty {
            return None;
        }
        if self.controller.is_enabled() {
            tracing::debug!(revision = self.revision, "render suppressed while positioning");
            return None;
        }
        if let Some(running) = self.in_flight {
            tracing::debug!(
                running,
                revision = self.revision,
                "trigger dropped, follow-up scheduled"
            );
            return None;
        }
        self.in_flight = Some(self.revision);
        self.dirty = false;
        Some(GenerationRequest {
            revision: self.revision,
            card: self.card.clone(),
            photo: self.photo.clone(),
            use_custom: self.uses_custom_position(),
            position: self.committed_position,
        })
    }

    /// Composite and encode a request.
    pub fn render(&mut self, request: &GenerationRequest<R>) -> Result<RenderedCard, StudioError> {
        let photo = match &request.photo {
            Some(p) => Arc::clone(p),
            None => self
                .assets
                .image(AssetKey::Placeholder)
                .map_err(ComposeError::from)?,
        };
        let canvas = compose_card(
            &mut self.assets,
            photo.as_ref(),
            &request.card,
            request.use_custom,
            request.position,
            &self.options,
        )?;
        let png = canvas.encode_png()?;
        let sha256 = format!("{:x}", Sha256::digest(&png));
        Ok(RenderedCard {
            revision: request.revision,
            filename: request.card.download_filename(),
            sha256,
            use_custom: request.use_custom,
            placement: photo_placement(
                photo.dimensions(),
                &self.options.frame,
                request.use_custom,
                request.position,
            ),
            png,
        })
    }

    /// Release the slot and display, discard or log the result.
    pub fn finish_generation(
        &mut self,
        revision: u64,
        result: Result<RenderedCard, StudioError>,
    ) -> Outcome {
        if self.in_flight == Some(revision) {
            self.in_flight = None;
        }
        if revision != self.revision {
            tracing::debug!(revision, current = self.revision, "stale render discarded");
            return Outcome::DiscardedStale {
                revision,
                current: self.revision,
            };
        }
        match result {
            Ok(card) => {
                tracing::info!(revision, file = %card.filename, "card rendered");
                self.output = Some(card);
                Outcome::Displayed { revision }
            }
            Err(e) => {
                tracing::error!(revision, error = %e, "render failed, keeping previous output");
                Outcome::Failed {
                    revision,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Pump, render and finish inline.
    pub fn step(&mut self, now: Instant) -> Option<Outcome> {
        let request = self.pump(now)?;
        let result = self.render(&request);
        Some(self.finish_generation(request.revision, result))
    }
}

// =============================================================================
// Event scripts
// =============================================================================

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StudioEvent {
    Press { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release,
    Wheel { delta_y: f64 },
    Positioning { enabled: bool },
    Reset,
    Remeasure { width: f64, height: f64 },
    Card { card: CardData },
}

/// An input at a time offset from the start of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: StudioEvent,
}

/// Parse a JSON array of timed events.
pub fn parse_script(json: &str) -> Result<Vec<TimedEvent>, StudioError> {
    let mut events: Vec<TimedEvent> = serde_json::from_str(json)?;
    events.sort_by_key(|e| e.at_ms);
    Ok(events)
}

pub fn load_script(path: &Path) -> Result<Vec<TimedEvent>, StudioError> {
    let json = std::fs::read_to_string(path)?;
    parse_script(&json)
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub displayed: usize,
    pub discarded: usize,
    pub failed: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::Displayed { .. }) => self.displayed += 1,
            Some(Outcome::DiscardedStale { .. }) => self.discarded += 1,
            Some(Outcome::Failed { .. }) => self.failed += 1,
            None => {}
        }
    }
}

impl<R: RasterImage> CardStudio<R> {
    /// Settle every debounce deadline up to and including `until`.
    fn advance_to(&mut self, until: Instant, summary: &mut ReplaySummary) {
        while let Some(deadline) = self.next_deadline().filter(|d| *d <= until) {
            let outcome = self.step(deadline);
            summary.record(outcome);
        }
        let outcome = self.step(until);
        summary.record(outcome);
    }

    pub fn apply(&mut self, event: &StudioEvent, now: Instant) {
        match event {
            StudioEvent::Press { x, y } => {
                self.press(Point::new(*x, *y));
            }
            StudioEvent::Move { x, y } => {
                self.pointer_moved(Point::new(*x, *y), now);
            }
            StudioEvent::Release => {
                self.release();
            }
            StudioEvent::Wheel { delta_y } => {
                self.wheel(*delta_y, now);
            }
            StudioEvent::Positioning { enabled } => {
                self.set_positioning(*enabled);
            }
            StudioEvent::Reset => {
                self.reset_position(now);
            }
            StudioEvent::Remeasure { width, height } => {
                self.remeasure(RenderDimensions::new(*width, *height));
            }
            StudioEvent::Card { card } => self.edit_card(card.clone(), now),
        }
    }

    /// Drive the studio through a script starting at `start`, then let every
    /// pending edit settle.
    pub fn replay(&mut self, events: &[TimedEvent], start: Instant) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for timed in events {
            let now = start + Duration::from_millis(timed.at_ms);
            self.advance_to(now, &mut summary);
            self.apply(&timed.event, now);
            summary.events += 1;
        }
        let end = events
            .last()
            .map_or(start, |e| start + Duration::from_millis(e.at_ms));
        let settle = end + self.card_debounce.window().max(self.position_debounce.window());
        self.advance_to(settle, &mut summary);
        summary
    }
}
