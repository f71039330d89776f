//! High-level card composition.
//!
//! [`compose_card`] combines the placement calculations, the fixed layout in
//! [`params`](super::params), the asset cache and a [`RasterImage`] backend:
//!
//! 1. Resize the photo and place it on a transparent frame-sized layer
//!    (fill-centred by default, or at the custom logical position).
//! 2. Put that layer on a transparent card canvas at the frame offset.
//! 3. Frame art for the card's type over the whole canvas.
//! 4. Text boxes.
//! 5. Badges: HP, move energy icons, weakness, resistance, retreat cost.
//! 6. Optional softening pass: down to half size and back up.
//!
//! Any asset that fails to load aborts the call; nothing partially drawn is
//! returned.

use super::backend::{BackendError, RasterImage};
use super::calculations::{PhotoPlacement, photo_placement, retreat_icon_offsets, softening_size};
use super::params::{
    DESCRIPTION_SLOT, FLAVOR_SLOT, HP_BADGE_AT, HP_BADGE_SIZE, MOVE1_DAMAGE_SLOT, MOVE1_ENERGY_AT,
    MOVE1_NAME_SLOT, MOVE2_COLORLESS_AT, MOVE2_DAMAGE_SLOT, MOVE2_ENERGY_AT, MOVE2_NAME_SLOT,
    NAME_SLOT, RESISTANCE_AT, RETREAT_Y, TEXT_COLOR, TextSlot, WEAKNESS_AT,
};
use super::text::render_text_layer;
use crate::assets::{AssetCache, AssetError, AssetKey};
use crate::geometry::{CANVAS, FrameGeometry};
use crate::position::LogicalPosition;
use crate::types::{Affinity, CardData, EnergyType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Required asset unavailable: {0}")]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Render-wide switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub frame: FrameGeometry,
    /// Run the half-size resample pass at the end.
    pub soften: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frame: FrameGeometry::CARD,
            soften: true,
        }
    }
}

/// Resize the photo and place it on a transparent frame-sized layer.
///
/// Whatever falls outside the frame is clipped by the layer bounds.
pub fn place_photo<R: RasterImage>(photo: &R, placement: PhotoPlacement, frame: &FrameGeometry) -> R {
    let resized = photo.resized(placement.size());
    let mut layer = R::blank(frame.pixel_size());
    layer.composite(&resized, placement.x, placement.y);
    layer
}

/// Draw one text box. Blank text draws nothing.
fn draw_text<R: RasterImage>(
    card: &mut R,
    assets: &mut AssetCache<R>,
    slot: &TextSlot,
    text: &str,
) -> Result<()> {
    let face = assets.font(slot.face)?;
    let Some(layer) = render_text_layer(
        face.as_ref(),
        text,
        slot.box_size(),
        slot.h_align,
        slot.v_align,
        TEXT_COLOR,
    ) else {
        return Ok(());
    };
    let raster = R::from_rgba8(layer.size, layer.rgba)?;
    card.composite(&raster, slot.x, slot.y);
    Ok(())
}

fn draw_icon<R: RasterImage>(
    card: &mut R,
    assets: &mut AssetCache<R>,
    key: AssetKey,
    (x, y): (i64, i64),
) -> Result<()> {
    let icon = assets.image(key)?;
    card.composite(icon.as_ref(), x, y);
    Ok(())
}

fn draw_affinity<R: RasterImage>(
    card: &mut R,
    assets: &mut AssetCache<R>,
    affinity: Affinity,
    at: (i64, i64),
) -> Result<()> {
    match affinity.energy() {
        Some(t) => draw_icon(card, assets, AssetKey::EnergySmall(t), at),
        None => Ok(()),
    }
}

/// Composite a full card.
///
/// `use_custom` selects the logical `position`; otherwise the photo fills the
/// frame centred and `position` is ignored.
#[tracing::instrument(skip_all, fields(name = %card.name, use_custom = use_custom))]
pub fn compose_card<R: RasterImage>(
    assets: &mut AssetCache<R>,
    photo: &R,
    card: &CardData,
    use_custom: bool,
    position: LogicalPosition,
    options: &RenderOptions,
) -> Result<R> {
    let frame = &options.frame;
    let placement = photo_placement(photo.dimensions(), frame, use_custom, position);
    tracing::debug!(
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        "photo placement"
    );

    let overlay = assets.image(AssetKey::FrameArt(card.energy_type))?;
    let photo_layer = place_photo(photo, placement, frame);
    let mut canvas = R::blank(CANVAS);
    let (fx, fy) = frame.pixel_offset();
    canvas.composite(&photo_layer, fx, fy);
    canvas.composite(overlay.as_ref(), 0, 0);

    let texts = [
        (&NAME_SLOT, card.name.clone()),
        (&DESCRIPTION_SLOT, card.description_line()),
        (&FLAVOR_SLOT, card.flavor_text.clone()),
        (&MOVE1_NAME_SLOT, card.move1.name.clone()),
        (&MOVE1_DAMAGE_SLOT, card.move1.damage.clone()),
        (&MOVE2_NAME_SLOT, card.move2.name.clone()),
        (&MOVE2_DAMAGE_SLOT, card.move2.damage.clone()),
    ];
    for (slot, text) in &texts {
        draw_text(&mut canvas, assets, slot, text)?;
    }

    let hp = assets.image(AssetKey::HpBadge(card.hp))?;
    canvas.composite(&hp.resized(HP_BADGE_SIZE), HP_BADGE_AT.0, HP_BADGE_AT.1);

    let energy = AssetKey::EnergyLarge(card.energy_type);
    draw_icon(&mut canvas, assets, energy, MOVE1_ENERGY_AT)?;
    draw_icon(&mut canvas, assets, energy, MOVE2_ENERGY_AT)?;
    draw_icon(&mut canvas, assets, AssetKey::EnergyColorless, MOVE2_COLORLESS_AT)?;

    draw_affinity(&mut canvas, assets, card.weakness, WEAKNESS_AT)?;
    draw_affinity(&mut canvas, assets, card.resistance, RESISTANCE_AT)?;

    let retreat = retreat_icon_offsets(card.retreat_cost);
    if !retreat.is_empty() {
        let icon = assets.image(AssetKey::EnergySmall(EnergyType::Colorless))?;
        for &x in retreat {
            canvas.composite(icon.as_ref(), x, RETREAT_Y);
        }
    }

    if options.soften {
        canvas = canvas.resized(softening_size(CANVAS)).resized(CANVAS);
    }
    Ok(canvas)
}
