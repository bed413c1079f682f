//! Pure geometry for the collage canvas.
//!
//! All functions here are pure and testable without any I/O or images.
//! Coordinates are in canvas pixels with the origin at the top-left corner.

/// Photos are always laid out two per row.
pub const GRID_COLUMNS: u32 = 2;

/// An axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// True when the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        self.x < other.right() - EPS
            && other.x < self.right() - EPS
            && self.y < other.bottom() - EPS
            && other.y < self.bottom() - EPS
    }
}

/// One slot of the photo grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Position in row-major order; equals the photo's index in the store.
    pub index: usize,
    pub row: u32,
    pub column: u32,
    pub rect: Rect,
}

/// Where a photo ends up inside its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Uniform scale applied to the source image.
    pub scale: f64,
    pub rect: Rect,
}

/// Compute the grid cells for `photo_count` photos.
///
/// The photo area is the canvas minus the caption band at the bottom. It is
/// split into [`GRID_COLUMNS`] columns and `ceil(n / 2)` rows of equal size,
/// filled row-major. An odd count leaves the last cell of the last row empty.
/// Zero photos yields no cells.
///
/// ```
/// # use delivery_collage::imaging::compute_grid;
/// let cells = compute_grid(3, 1200, 900, 80);
/// assert_eq!(cells.len(), 3);
/// assert_eq!(cells[2].rect.y, 410.0);
/// assert_eq!(cells[2].rect.x, 0.0);
/// ```
pub fn compute_grid(
    photo_count: usize,
    canvas_width: u32,
    canvas_height: u32,
    caption_band: u32,
) -> Vec<Cell> {
    if photo_count == 0 {
        return Vec::new();
    }

    let columns = GRID_COLUMNS as usize;
    let rows = photo_count.div_ceil(columns);
    let usable_height = canvas_height.saturating_sub(caption_band) as f64;
    let cell_width = canvas_width as f64 / columns as f64;
    let cell_height = usable_height / rows as f64;

    (0..photo_count)
        .map(|index| {
            let row = (index / columns) as u32;
            let column = (index % columns) as u32;
            Cell {
                index,
                row,
                column,
                rect: Rect::new(
                    column as f64 * cell_width,
                    row as f64 * cell_height,
                    cell_width,
                    cell_height,
                ),
            }
        })
        .collect()
}

/// Scale an image to fit inside `cell` without cropping and center it.
///
/// The scale is `min(cell_w / img_w, cell_h / img_h)`, so the image touches
/// the cell on the constraining axis and has equal margins on the other.
pub fn fit_in_cell(cell: &Rect, image_width: u32, image_height: u32) -> Placement {
    let (img_w, img_h) = (image_width.max(1) as f64, image_height.max(1) as f64);
    let scale = (cell.width / img_w).min(cell.height / img_h);
    let width = img_w * scale;
    let height = img_h * scale;

    Placement {
        scale,
        rect: Rect::new(
            cell.x + (cell.width - width) / 2.0,
            cell.y + (cell.height - height) / 2.0,
            width,
            height,
        ),
    }
}

/// Place a watermark scaled to `width_fraction` of the canvas width,
/// centered in the photo area (not the whole canvas).
pub fn watermark_placement(
    canvas_width: u32,
    photo_area_height: u32,
    watermark_width: u32,
    watermark_height: u32,
    width_fraction: f64,
) -> Placement {
    let desired_width = canvas_width as f64 * width_fraction;
    let scale = desired_width / watermark_width.max(1) as f64;
    let width = watermark_width as f64 * scale;
    let height = watermark_height as f64 * scale;

    Placement {
        scale,
        rect: Rect::new(
            (canvas_width as f64 - width) / 2.0,
            (photo_area_height as f64 - height) / 2.0,
            width,
            height,
        ),
    }
}

/// Top of the first caption line so the whole block is vertically centered
/// in the caption band.
pub fn caption_origin_y(
    band_top: u32,
    band_height: u32,
    line_count: usize,
    font_size: f32,
    line_height: f32,
) -> f64 {
    let block_height = line_count as f64 * (font_size * line_height) as f64;
    band_top as f64 + (band_height as f64 - block_height) / 2.0
}
