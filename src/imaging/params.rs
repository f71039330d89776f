//! Fixed layout of the card: where every text box and badge goes.
//!
//! These describe *what* to draw and *where*; [`operations`](super::operations)
//! does the drawing. All coordinates are full-resolution canvas pixels.
//!
//! ```text
//!  name (72,60)                    HP badge (490,76) 118x32
//!  ┌ photo frame (82,122) 558x390 ┐
//!  └──────────────────────────────┘
//!  description line (100,529) 525x30, centred
//!  [E] move 1 name (114,600) 500x50       damage (570,600) 100x50
//!  [E][C] move 2 name (114,700)           damage (570,700)
//!  weakness (100,834)   resistance (340,834)   retreat (547..612, 834)
//!  flavor text (87,877) 590x55
//! ```

use super::text::{HAlign, VAlign};
use crate::assets::FontFace;
use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH, Dimensions};

/// Text colour for every slot.
pub const TEXT_COLOR: [u8; 3] = [0, 0, 0];

/// A text box on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSlot {
    pub face: FontFace,
    pub x: i64,
    pub y: i64,
    /// Box size; `None` runs to the canvas edge.
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl TextSlot {
    /// Pixel size of the box the text is clipped to.
    pub fn box_size(&self) -> Dimensions {
        let room = |edge: u32, at: i64| (edge as i64 - at).max(0) as u32;
        Dimensions::new(
            self.max_width.unwrap_or_else(|| room(CANVAS_WIDTH, self.x)),
            self.max_height.unwrap_or_else(|| room(CANVAS_HEIGHT, self.y)),
        )
    }
}

pub const NAME_SLOT: TextSlot = TextSlot {
    face: FontFace::Cb48,
    x: 72,
    y: 60,
    max_width: None,
    max_height: None,
    h_align: HAlign::Left,
    v_align: VAlign::Top,
};

pub const DESCRIPTION_SLOT: TextSlot = TextSlot {
    face: FontFace::Rbi22,
    x: 100,
    y: 529,
    max_width: Some(525),
    max_height: Some(30),
    h_align: HAlign::Center,
    v_align: VAlign::Top,
};

pub const FLAVOR_SLOT: TextSlot = TextSlot {
    face: FontFace::Rbi22,
    x: 87,
    y: 877,
    max_width: Some(590),
    max_height: Some(55),
    h_align: HAlign::Left,
    v_align: VAlign::Top,
};

const fn move_name_slot(y: i64) -> TextSlot {
    TextSlot {
        face: FontFace::Cb44,
        x: 114,
        y,
        max_width: Some(500),
        max_height: Some(50),
        h_align: HAlign::Center,
        v_align: VAlign::Middle,
    }
}

const fn move_damage_slot(y: i64) -> TextSlot {
    TextSlot {
        face: FontFace::Rp64,
        x: 570,
        y,
        max_width: Some(100),
        max_height: Some(50),
        h_align: HAlign::Center,
        v_align: VAlign::Middle,
    }
}

pub const MOVE1_NAME_SLOT: TextSlot = move_name_slot(600);
pub const MOVE1_DAMAGE_SLOT: TextSlot = move_damage_slot(600);
pub const MOVE2_NAME_SLOT: TextSlot = move_name_slot(700);
pub const MOVE2_DAMAGE_SLOT: TextSlot = move_damage_slot(700);

/// HP badge: resized to this size before placement.
pub const HP_BADGE_SIZE: Dimensions = Dimensions::new(118, 32);
pub const HP_BADGE_AT: (i64, i64) = (490, 76);

/// Large type icon for move 1.
pub const MOVE1_ENERGY_AT: (i64, i64) = (80, 609);
/// Large type icon for move 2.
pub const MOVE2_ENERGY_AT: (i64, i64) = (58, 709);
/// Colorless icon next to the move 2 type icon.
pub const MOVE2_COLORLESS_AT: (i64, i64) = (108, 709);

pub const WEAKNESS_AT: (i64, i64) = (100, 834);
pub const RESISTANCE_AT: (i64, i64) = (340, 834);
/// Shared y of every retreat icon; x comes from the retreat table.
pub const RETREAT_Y: i64 = 834;
