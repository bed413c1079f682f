//! Image composition: layout math, text fitting and a raster surface.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Scale + composite** | `imageops::resize` + source-over blend |
//! | **Text** | `rusttype` layout, DejaVu Sans bundled |
//! | **Encode → JPEG** | `JpegEncoder`, quality 95 by default |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for grid and placement math (unit testable)
//! - **Parameters**: Per-call style types (quality, opacity, text style)
//! - **Text**: Word wrap and font-size fitting over the [`TextMeasure`] trait
//! - **Backend**: [`Surface`] trait + [`RasterSurface`]
//! - **Operations**: High-level functions combining calculations + surface

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, Dimensions, Surface};
pub use calculations::{
    Cell, GRID_COLUMNS, Placement, Rect, caption_origin_y, compute_grid, fit_in_cell,
    watermark_placement,
};
pub use operations::{CaptionLayout, draw_backgrounds, draw_caption, draw_photos, draw_watermark};
pub use params::{Align, Opacity, Quality, TextStyle};
pub use rust_backend::{RasterSurface, decode_image, encode_jpeg, image_dimensions, load_image};
pub use text::{FittedText, FontError, FontFace, TextMeasure, fit_font_size, fit_text, wrap_words};
