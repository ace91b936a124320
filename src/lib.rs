//! # photoboard
//!
//! Copies a photo album from Flickr onto a Miro board as a grid of "tiles":
//! each photo becomes an image element, a banner rectangle below it, and a
//! text label (title + clickable permalink) on the banner, with all three
//! bound into one group so they move together.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! One run drives every photo through the same four stages, strictly in
//! album order:
//!
//! ```text
//! 1. Fetch    album listing  →  Vec<PhotoRecord>   (source)
//! 2. Plan     index + config →  TileGeometry       (layout, pure)
//! 3. Build    photo + rects  →  three elements     (tile, best-effort)
//! 4. Group    element ids    →  one group          (grouping, fallback)
//! ```
//!
//! The separation exists for three reasons:
//!
//! - **Testability**: planning is a pure function, and both remote services
//!   sit behind traits ([`source::PhotoApi`], [`board::BoardApi`]) so the
//!   whole pipeline runs against scripted mocks.
//! - **Dry runs**: the `plan` subcommand stops after stage 2 and prints the
//!   computed grid without touching the board.
//! - **Partial failure**: stages 3 and 4 are best-effort per tile; one bad
//!   photo never sinks the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layout options from `photoboard.toml`, credentials from env vars |
//! | [`layout`] | Pure grid math: album index → image/banner/text rectangles |
//! | [`source`] | Flickr photoset listing with pagination and the size-preference ladder |
//! | [`board`] | Miro v2 client: element creation and grouping, auth-aware errors |
//! | [`tile`] | Best-effort creation of one photo's three elements |
//! | [`grouping`] | Ordered payload-variant fallback for the group endpoint |
//! | [`run`] | Sequential batch driver, per-tile outcomes, run summary |
//! | [`output`] | Progress bar and summary formatting (pure, testable) |
//!
//! # Design Decisions
//!
//! ## Strictly Sequential Calls
//!
//! Photos are processed one at a time and every board call blocks before the
//! next one starts. The board API documents no ordering guarantee between an
//! element-creation response and that element being groupable, so the runner
//! never lets a group call race a create call. Throughput is bounded by the
//! API's rate limits anyway; a 120 ms pause between tiles keeps runs under
//! them.
//!
//! ## Grouping Variants as Data
//!
//! The group endpoint has accepted at least three different request shapes
//! over time. Rather than chasing the current one, [`grouping`] carries an
//! ordered list of payload builders and accepts the first shape the API
//! takes. A new shape is one new list entry, not new control flow. An
//! ungrouped tile is still visually correct and can be grouped by hand, so
//! exhausting the list is a warning, not a failure.
//!
//! ## No Rollback, Shifted-Origin Recovery
//!
//! Nothing is persisted between runs and nothing is deleted on failure.
//! Elements already placed stay on the board; the documented recovery path
//! for an interrupted run is re-running with `origin_y` shifted below the
//! previous grid.

pub mod board;
pub mod config;
pub mod grouping;
pub mod layout;
pub mod output;
pub mod run;
pub mod source;
pub mod tile;
