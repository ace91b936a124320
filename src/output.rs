//! CLI output formatting.
//!
//! Each display has a `format_*` function (pure, returns strings) and a
//! `print_*` wrapper that writes to stdout. Format functions carry the unit
//! tests; print wrappers are one-liners.
//!
//! ## Progress
//!
//! ```text
//! [####################--------------------] 12/24 ok 53001234
//! ```
//!
//! Progress lines overwrite each other with a carriage return and the last
//! one ends with a newline, so a clean run occupies a single line.
//!
//! ## Summary
//!
//! ```text
//! Photos processed:  24/24
//! Elements created:  70
//! Tiles grouped:     22
//! Tiles with errors: 1
//! ```

use crate::config::LayoutConfig;
use crate::layout;
use crate::run::{RunSummary, TileEvent};
use crate::source::PhotoRecord;
use crate::tile::TileStatus;
use std::io::Write;

/// Progress bar width in characters.
const BAR_WIDTH: usize = 40;

/// Render a fixed-width progress bar: `[####----] 3/10`.
pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { done * width / total };
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        done,
        total
    )
}

fn status_word(status: TileStatus) -> &'static str {
    match status {
        TileStatus::Complete => "ok",
        TileStatus::Partial => "partial",
        TileStatus::Ungrouped => "ungrouped",
        TileStatus::Failed => "failed",
    }
}

/// One progress line for a finished tile.
pub fn format_tile_event(event: &TileEvent) -> String {
    format!(
        "{} {} {}",
        progress_bar(event.index, event.total, BAR_WIDTH),
        status_word(event.status),
        event.photo_id
    )
}

/// Print a progress line, overwriting the previous one. The final tile's
/// line ends with a newline so the summary starts fresh.
pub fn print_tile_event(event: &TileEvent) {
    let line = format_tile_event(event);
    if event.index == event.total {
        println!("{line}");
    } else {
        print!("{line}\r");
        std::io::stdout().flush().ok();
    }
}

/// Format the end-of-run summary.
///
/// Three shapes: an empty source (nothing to do, worth saying why that
/// might be), an aborted run (incomplete, say where it stopped), and a
/// completed run with counts. A non-empty batch that created zero elements
/// gets an extra pointer since every call failing the same way usually
/// means a board-side misconfiguration.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    if summary.total_photos == 0 {
        return vec!["No photos found (album may be private or IDs incorrect).".to_string()];
    }

    let mut lines = Vec::new();

    if summary.aborted() {
        lines.push(format!(
            "Run incomplete: stopped after {} of {} photos.",
            summary.outcomes.len(),
            summary.total_photos
        ));
    }

    lines.push(format!(
        "Photos processed:  {}/{}",
        summary.outcomes.len(),
        summary.total_photos
    ));
    lines.push(format!("Elements created:  {}", summary.elements_created()));
    lines.push(format!("Tiles grouped:     {}", summary.tiles_grouped()));
    lines.push(format!(
        "Tiles with errors: {}",
        summary.tiles_with_errors()
    ));

    if summary.elements_created() == 0 && !summary.outcomes.is_empty() {
        lines.push(
            "No elements were created; check MIRO_BOARD_ID and the token's scopes.".to_string(),
        );
    }

    for outcome in summary.outcomes.iter().filter(|o| !o.errors.is_empty()) {
        for error in &outcome.errors {
            lines.push(format!("    {} {}", outcome.photo_id, error));
        }
    }

    lines
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

/// Format the dry-run layout plan: one line per photo with its grid cell
/// and image rectangle.
pub fn format_plan(photos: &[PhotoRecord], config: &LayoutConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "{} photos, {} per row, cell {}x{}",
        photos.len(),
        config.columns,
        config.cell_width,
        config.cell_height
    )];

    for (index, photo) in photos.iter().enumerate() {
        let tile = layout::tile_geometry(index, config);
        let col = index % config.columns as usize;
        let row = index / config.columns as usize;
        let title = if photo.title.is_empty() {
            "(untitled)"
        } else {
            &photo.title
        };
        lines.push(format!(
            "{:0>3} {} [{},{}] image at ({}, {}) {}x{}",
            index + 1,
            title,
            row,
            col,
            tile.image.x,
            tile.image.y,
            tile.image.width,
            tile.image.height
        ));
        lines.push(format!("    Source: {}", photo.page_url));
    }

    lines
}

pub fn print_plan(photos: &[PhotoRecord], config: &LayoutConfig) {
    for line in format_plan(photos, config) {
        println!("{line}");
    }
}
