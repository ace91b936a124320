//! Tile building: one photo → three board elements.
//!
//! Creation is best-effort per element. A failed call is recorded on the
//! outcome and the remaining calls still run, so a flaky image URL doesn't
//! cost the photo its banner and caption. Only an auth failure propagates,
//! because it would fail identically for every element of every tile.

use crate::board::{BoardApi, BoardError, ElementRef};
use crate::config::LayoutConfig;
use crate::layout::TileGeometry;
use crate::source::PhotoRecord;

/// What happened to one photo's tile. Accumulated by the runner into the
/// run summary; never persisted.
#[derive(Debug)]
pub struct TileOutcome {
    pub photo_id: String,
    /// Elements that were actually created, in creation order.
    pub created: Vec<ElementRef>,
    /// Set by the grouping stage; stays false for skipped or exhausted tiles.
    pub grouped: bool,
    /// One message per failed element-creation call.
    pub errors: Vec<String>,
}

/// Coarse per-tile status for progress and summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStatus {
    /// All elements created and grouped.
    Complete,
    /// Some element-creation calls failed.
    Partial,
    /// Elements created but every grouping variant was rejected.
    Ungrouped,
    /// Nothing was created.
    Failed,
}

impl TileOutcome {
    pub fn status(&self) -> TileStatus {
        if self.created.is_empty() {
            TileStatus::Failed
        } else if !self.errors.is_empty() {
            TileStatus::Partial
        } else if !self.grouped {
            TileStatus::Ungrouped
        } else {
            TileStatus::Complete
        }
    }
}

/// Create the tile's three elements: image, banner shape, caption text.
///
/// The caption is the photo title with its permalink appended; the board
/// auto-linkifies the URL, which is what makes the tile clickable.
pub fn build_tile(
    board: &dyn BoardApi,
    photo: &PhotoRecord,
    geometry: &TileGeometry,
    config: &LayoutConfig,
) -> Result<TileOutcome, BoardError> {
    let mut outcome = TileOutcome {
        photo_id: photo.id.clone(),
        created: Vec::with_capacity(3),
        grouped: false,
        errors: Vec::new(),
    };

    record(
        &mut outcome,
        "image",
        board.create_image(&photo.image_url, &geometry.image),
    )?;
    record(
        &mut outcome,
        "banner",
        board.create_shape(&geometry.banner, &config.banner_color),
    )?;
    record(
        &mut outcome,
        "text",
        board.create_text(&label_text(photo), &geometry.text, config.text_size),
    )?;

    Ok(outcome)
}

/// Fold one element-creation result into the outcome. Auth failures
/// propagate; everything else becomes a recorded error.
fn record(
    outcome: &mut TileOutcome,
    element: &str,
    result: Result<ElementRef, BoardError>,
) -> Result<(), BoardError> {
    match result {
        Ok(element_ref) => outcome.created.push(element_ref),
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => outcome.errors.push(format!("{element}: {e}")),
    }
    Ok(())
}

/// Caption content: `title — permalink`, or just the permalink for
/// untitled photos.
fn label_text(photo: &PhotoRecord) -> String {
    if photo.title.is_empty() {
        photo.page_url.clone()
    } else {
        format!("{} — {}", photo.title, photo.page_url)
    }
}
