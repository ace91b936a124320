//! Batch runner: drives every photo through plan → build → group.
//!
//! Strictly sequential. Each photo's board calls complete before the next
//! photo starts, and a short pacing pause sits between tiles to stay under
//! the board API's rate limits. Per-tile failures are recorded and the loop
//! keeps going; the single exception is an auth failure, which would repeat
//! identically for every remaining call, so the loop stops and the summary
//! is marked incomplete.
//!
//! Progress is reported through an optional channel, mirroring how the
//! stages print: the runner stays free of I/O and a printer thread owns
//! stdout.

use crate::board::{BoardApi, BoardError};
use crate::config::LayoutConfig;
use crate::grouping::{self, GroupVariant, MIN_GROUP_SIZE};
use crate::layout;
use crate::source::PhotoRecord;
use crate::tile::{self, TileOutcome, TileStatus};
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Pause between tiles. Gentle pacing; the board API rate-limits bursts.
pub const DEFAULT_PACING: Duration = Duration::from_millis(120);

/// Progress event emitted after each tile.
#[derive(Debug, Clone)]
pub struct TileEvent {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub photo_id: String,
    pub status: TileStatus,
}

/// Everything a run produced. `fatal` is set when the loop aborted on an
/// auth failure; outcomes accumulated before the abort are kept.
#[derive(Debug)]
pub struct RunSummary {
    /// Photos the source handed over (the intended batch size).
    pub total_photos: usize,
    pub outcomes: Vec<TileOutcome>,
    pub fatal: Option<BoardError>,
}

impl RunSummary {
    pub fn aborted(&self) -> bool {
        self.fatal.is_some()
    }

    pub fn elements_created(&self) -> usize {
        self.outcomes.iter().map(|o| o.created.len()).sum()
    }

    pub fn tiles_grouped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.grouped).count()
    }

    pub fn tiles_with_errors(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.errors.is_empty()).count()
    }
}

/// Process the batch in source order.
///
/// The photo's position in `photos` is its grid index; the caller must pass
/// photos exactly as fetched or tiles land in the wrong cells.
pub fn sync_photos(
    board: &dyn BoardApi,
    photos: &[PhotoRecord],
    config: &LayoutConfig,
    variants: &[GroupVariant],
    pacing: Duration,
    progress: Option<Sender<TileEvent>>,
) -> RunSummary {
    let total = photos.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut fatal = None;

    for (index, photo) in photos.iter().enumerate() {
        let geometry = layout::tile_geometry(index, config);

        let mut outcome = match tile::build_tile(board, photo, &geometry, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                fatal = Some(e);
                break;
            }
        };

        if outcome.created.len() >= MIN_GROUP_SIZE {
            match grouping::reconcile(board, &outcome.created, variants) {
                Ok(grouped) => outcome.grouped = grouped,
                Err(e) => {
                    outcomes.push(outcome);
                    fatal = Some(e);
                    break;
                }
            }
        }

        if let Some(tx) = &progress {
            // Printer may have gone away; progress is best-effort
            let _ = tx.send(TileEvent {
                index: index + 1,
                total,
                photo_id: outcome.photo_id.clone(),
                status: outcome.status(),
            });
        }

        outcomes.push(outcome);

        if !pacing.is_zero() && index + 1 < total {
            std::thread::sleep(pacing);
        }
    }

    RunSummary {
        total_photos: total,
        outcomes,
        fatal,
    }
}
