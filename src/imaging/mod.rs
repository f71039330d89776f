//! Raster work for the card: decoding, placement, text and composition.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / identify** | `image::load_from_memory`, `image::image_dimensions` |
//! | **Resize** | `image::imageops::resize` (Triangle) |
//! | **Composite** | `image::imageops::overlay` |
//! | **Text** | `fontdue` layout + rasterisation |
//! | **Encode** | PNG |
//!
//! The module is split into:
//! - **Calculations**: pure placement math (unit testable)
//! - **Parameters**: the fixed card layout (text boxes, badge offsets)
//! - **Backend**: [`RasterImage`] trait + [`RgbaRaster`]
//! - **Text**: [`Typeface`] trait + [`FontdueFace`], box-clipped text layers
//! - **Operations**: [`compose_card`], combining all of the above

pub mod backend;
mod calculations;
pub mod operations;
pub mod params;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, RasterImage};
pub use calculations::{
    PhotoPlacement, custom_placement, fill_placement, photo_placement, retreat_icon_offsets,
    softening_size,
};
pub use operations::{ComposeError, RenderOptions, compose_card, place_photo};
pub use rust_backend::{RgbaRaster, identify, is_supported_photo, supported_input_extensions};
pub use text::{FontdueFace, HAlign, Typeface, VAlign, render_text_layer};
