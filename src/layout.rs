//! Pure grid math: album index → tile rectangles.
//!
//! Everything here is pure and deterministic; no I/O, no hidden state. The
//! runner calls [`tile_geometry`] with the photo's position in the album and
//! the layout config, and gets back integer board rectangles for the three
//! elements of one tile.
//!
//! Tile anatomy, within one grid cell:
//!
//! ```text
//! ┌──────────────────────┐  ← cell top-left (image nudged 4px above it)
//! │                      │
//! │        image         │    height = cell_height - banner_height - banner_margin
//! │                      │
//! └──────────────────────┘
//!          (banner_margin)
//! ┌──────────────────────┐
//! │  ├─ text label ─┤    │    banner_height tall, text inset by text_padding_x
//! └──────────────────────┘
//! ```

use crate::config::LayoutConfig;

/// Pixels the image is shifted above its cell's top edge, giving the banner
/// breathing room without the image growing.
pub const IMAGE_NUDGE: i64 = 4;

/// An axis-aligned rectangle in board coordinates. Top-left anchored,
/// integer pixels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Center point, for APIs that position elements by center.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// The three rectangles making up one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    pub image: Rect,
    pub banner: Rect,
    pub text: Rect,
}

/// Compute the on-board geometry for the tile at `index`.
///
/// Placement is row-major: `index % columns` gives the column, integer
/// division the row. Calling this twice with the same inputs yields
/// identical rectangles.
pub fn tile_geometry(index: usize, config: &LayoutConfig) -> TileGeometry {
    let columns = config.columns as usize;
    let col = (index % columns) as i64;
    let row = (index / columns) as i64;

    let cell_x = config.origin_x + col * config.cell_width;
    let cell_y = config.origin_y + row * config.cell_height;

    let image = Rect {
        x: cell_x,
        y: cell_y - IMAGE_NUDGE,
        width: config.cell_width,
        height: config.cell_height - config.banner_height - config.banner_margin,
    };

    let banner = Rect {
        x: cell_x,
        y: image.y + image.height + config.banner_margin,
        width: config.cell_width,
        height: config.banner_height,
    };

    let text = Rect {
        x: banner.x + config.text_padding_x,
        y: banner.y,
        width: banner.width - 2 * config.text_padding_x,
        height: banner.height,
    };

    TileGeometry {
        image,
        banner,
        text,
    }
}
