//! Grouping reconciliation: bind a tile's elements into one group.
//!
//! The board's group endpoint has accepted different request shapes across
//! API revisions, and which one the live service takes is not knowable up
//! front. The reconciler holds an ordered list of [`GroupVariant`]s, issues
//! them in turn, and accepts the first success. A rejected variant moves on
//! to the next; exhausting the list leaves the tile ungrouped, which is a
//! warning and not an error: the elements are still placed correctly and
//! can be grouped by hand.
//!
//! The variants are data. Supporting a new shape the API starts accepting
//! means appending one entry to [`default_variants`], not touching control
//! flow.

use crate::board::{BoardApi, BoardError, ElementRef};
use serde_json::{Value, json};

/// Groups need at least two members; singleton tiles are skipped without
/// consuming an attempt.
pub const MIN_GROUP_SIZE: usize = 2;

/// One candidate request shape for the group endpoint.
pub struct GroupVariant {
    /// Short name for logs and summaries, e.g. `data.items`.
    pub label: &'static str,
    build: fn(&[ElementRef]) -> Value,
}

impl GroupVariant {
    pub fn new(label: &'static str, build: fn(&[ElementRef]) -> Value) -> Self {
        Self { label, build }
    }

    pub fn payload(&self, refs: &[ElementRef]) -> Value {
        (self.build)(refs)
    }
}

/// The shapes the live API has been seen to accept, most recent first.
pub fn default_variants() -> Vec<GroupVariant> {
    vec![
        GroupVariant {
            label: "data.items",
            build: |refs| json!({ "data": { "items": coerced_ids(refs) } }),
        },
        GroupVariant {
            label: "data.itemIds",
            build: |refs| json!({ "data": { "itemIds": ids(refs) } }),
        },
        GroupVariant {
            label: "itemIds",
            build: |refs| json!({ "itemIds": ids(refs) }),
        },
    ]
}

/// Try each variant in order until one succeeds.
///
/// Returns `Ok(true)` when grouped, `Ok(false)` when skipped (fewer than
/// [`MIN_GROUP_SIZE`] refs) or every variant was rejected. Only an auth
/// failure surfaces as an error.
pub fn reconcile(
    board: &dyn BoardApi,
    refs: &[ElementRef],
    variants: &[GroupVariant],
) -> Result<bool, BoardError> {
    if refs.len() < MIN_GROUP_SIZE {
        return Ok(false);
    }
    for variant in variants {
        match board.create_group(variant.payload(refs)) {
            Ok(()) => return Ok(true),
            Err(e) if e.is_fatal() => return Err(e),
            Err(_) => continue,
        }
    }
    Ok(false)
}

fn ids(refs: &[ElementRef]) -> Vec<String> {
    refs.iter().map(|r| r.id.clone()).collect()
}

/// Ids as numbers where possible. One historical shape only accepted
/// numeric ids; digit-only strings are coerced, anything else passes
/// through unchanged.
fn coerced_ids(refs: &[ElementRef]) -> Vec<Value> {
    refs.iter()
        .map(|r| match r.id.parse::<u64>() {
            Ok(n) if r.id.chars().all(|c| c.is_ascii_digit()) => json!(n),
            _ => json!(r.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ElementKind;
    use crate::board::tests::{BoardCall, MockBoard, auth_failure, rejected};

    fn refs(ids: &[&str]) -> Vec<ElementRef> {
        ids.iter()
            .map(|id| ElementRef {
                id: id.to_string(),
                kind: ElementKind::Image,
            })
            .collect()
    }

    #[test]
    fn first_success_short_circuits() {
        let board = MockBoard::new();
        let variants = default_variants();

        let grouped = reconcile(&board, &refs(&["1", "2", "3"]), &variants).unwrap();
        assert!(grouped);
        assert_eq!(board.group_call_count(), 1);
    }

    #[test]
    fn stops_exactly_after_first_accepted_variant() {
        let board = MockBoard::new();
        board.script_groups(vec![Err(rejected(400)), Err(rejected(400)), Ok(())]);
        let variants = default_variants();

        let grouped = reconcile(&board, &refs(&["1", "2", "3"]), &variants).unwrap();
        assert!(grouped);
        assert_eq!(board.group_call_count(), 3);
    }

    #[test]
    fn exhausted_variants_report_ungrouped_without_error() {
        let board = MockBoard::new();
        board.script_groups(vec![
            Err(rejected(400)),
            Err(rejected(422)),
            Err(rejected(400)),
        ]);
        let variants = default_variants();

        let grouped = reconcile(&board, &refs(&["1", "2", "3"]), &variants).unwrap();
        assert!(!grouped);
        assert_eq!(board.group_call_count(), variants.len());
    }

    #[test]
    fn two_elements_are_enough() {
        let board = MockBoard::new();
        let grouped = reconcile(&board, &refs(&["1", "2"]), &default_variants()).unwrap();
        assert!(grouped);
        assert_eq!(board.group_call_count(), 1);
    }

    #[test]
    fn single_element_skips_without_api_call() {
        let board = MockBoard::new();
        let grouped = reconcile(&board, &refs(&["1"]), &default_variants()).unwrap();
        assert!(!grouped);
        assert_eq!(board.group_call_count(), 0);
    }

    #[test]
    fn auth_failure_propagates() {
        let board = MockBoard::new();
        board.script_groups(vec![Err(auth_failure())]);

        let result = reconcile(&board, &refs(&["1", "2"]), &default_variants());
        assert!(matches!(result, Err(BoardError::Auth { .. })));
        assert_eq!(board.group_call_count(), 1);
    }

    #[test]
    fn variants_tried_in_declared_order() {
        let board = MockBoard::new();
        board.script_groups(vec![Err(rejected(400)), Err(rejected(400)), Ok(())]);
        reconcile(&board, &refs(&["7", "8"]), &default_variants()).unwrap();

        let payloads: Vec<Value> = board
            .recorded_calls()
            .into_iter()
            .filter_map(|c| match c {
                BoardCall::Group { payload } => Some(payload),
                _ => None,
            })
            .collect();

        assert_eq!(payloads[0], json!({ "data": { "items": [7, 8] } }));
        assert_eq!(payloads[1], json!({ "data": { "itemIds": ["7", "8"] } }));
        assert_eq!(payloads[2], json!({ "itemIds": ["7", "8"] }));
    }

    #[test]
    fn digit_ids_coerced_non_digit_passed_through() {
        let coerced = coerced_ids(&refs(&["3458764517517818867", "uXjVM1-abc"]));
        assert_eq!(coerced[0], json!(3458764517517818867u64));
        assert_eq!(coerced[1], json!("uXjVM1-abc"));
    }
}
