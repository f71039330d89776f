//! # Cardsmith
//!
//! Composes trading-card images: a user photo placed inside the card's photo
//! frame, with frame art, text, an HP badge and energy icons layered on top,
//! then encoded as a 726×996 PNG.
//!
//! # Architecture: Two Halves
//!
//! ```text
//! Interaction   pointer/wheel  →  LogicalPosition   (frame space, clamped)
//! Compositing   CardData + photo + position  →  PNG (canvas space)
//! ```
//!
//! The two halves only share [`position::LogicalPosition`]: a photo centre and
//! scale expressed in the frame's 558×390 coordinate space. Everything the
//! user does on screen is mapped into that space by [`mapper`], and the
//! compositor maps it back out to canvas pixels. The [`studio`] ties both
//! halves together with debouncing and a single generation slot.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Canvas and frame constants, sizes, points |
//! | [`mapper`] | Pure conversions between screen, preview, frame and canvas space |
//! | [`position`] | `LogicalPosition`, the clamp, default position per photo |
//! | [`interaction`] | Positioning mode, drag sessions, wheel scaling, preview ghost |
//! | [`debounce`] | Time-windowed debouncer |
//! | [`studio`] | Owns all state; decides when to render; replays event scripts |
//! | [`assets`] | Lazy, idempotent asset cache keyed by logical asset |
//! | [`types`] | `CardData`, energy types, field limits, slider text |
//! | [`imaging`] | Raster trait, `image`-crate backend, text layout, compositor |
//! | [`config`] | `cardsmith.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Clamp
//!
//! Scale and centre limits live in [`position::LogicalPosition`]. A gesture
//! clamps only what it changes: a drag bounds the centre, a wheel tick bounds
//! the scale. The preview ghost and the compositor's custom placement share
//! [`position::LogicalPosition::clamped_for`], whose scale range takes in the
//! photo's fill scale, so the default position always draws as the fill.
//!
//! ## Explicit Asset Cache
//!
//! Frame art, badges, icons and fonts are loaded through
//! [`assets::AssetCache`], which the studio owns. Nothing is global; tests
//! seed a cache with mock rasters and a block typeface and never touch disk.
//!
//! ## Backend Trait
//!
//! The compositor is generic over [`imaging::RasterImage`]. The real backend
//! wraps `image::RgbaImage`; tests use a recording mock so every placement
//! can be asserted exactly.

pub mod assets;
pub mod config;
pub mod debounce;
pub mod geometry;
pub mod imaging;
pub mod interaction;
pub mod mapper;
pub mod output;
pub mod position;
pub mod studio;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
