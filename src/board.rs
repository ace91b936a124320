//! Board service client.
//!
//! The [`BoardApi`] trait defines the four operations every board backend
//! must support: create an image, create a shape, create a text item, and
//! group existing elements.
//!
//! The production implementation is [`MiroBoard`], a thin blocking wrapper
//! over the Miro v2 REST API. It does exactly four things beyond issuing
//! requests: converts top-left rectangles to the center positions Miro
//! expects, retries once after HTTP 429, maps 401/403 to [`BoardError::Auth`]
//! (the one batch-fatal condition), and surfaces the error body text for
//! everything else.

use crate::layout::Rect;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    /// 401/403 from the board service. Every subsequent call would fail the
    /// same way, so this aborts the whole batch.
    #[error("board auth failed (HTTP {status}) - check MIRO_TOKEN and its boards:write scope")]
    Auth { status: u16 },
    /// Any other non-success status. Per-element and per-variant failures
    /// land here; they are recorded on the tile and never abort the batch.
    #[error("board request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("board transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected board response: {0}")]
    Unexpected(String),
}

impl BoardError {
    /// True for the auth failures that abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BoardError::Auth { .. })
    }
}

/// What kind of element an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Image,
    Shape,
    Text,
}

/// Handle to an element created on the board. The id is all the grouping
/// endpoint needs; the kind exists for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub id: String,
    pub kind: ElementKind,
}

/// Trait for board backends.
///
/// Element-creation calls take the planner's top-left [`Rect`]s; converting
/// to whatever coordinate convention the wire format uses is the backend's
/// concern. `create_group` takes a ready-built payload because the grouping
/// endpoint's accepted shape varies (see [`crate::grouping`]).
pub trait BoardApi {
    /// Create an image element from a public URL.
    fn create_image(&self, url: &str, rect: &Rect) -> Result<ElementRef, BoardError>;

    /// Create a filled rectangle (the caption banner).
    fn create_shape(&self, rect: &Rect, fill: &str) -> Result<ElementRef, BoardError>;

    /// Create a text item. URLs in the content auto-linkify on the board.
    fn create_text(
        &self,
        content: &str,
        rect: &Rect,
        font_size: u32,
    ) -> Result<ElementRef, BoardError>;

    /// Issue one grouping request with the given payload.
    fn create_group(&self, payload: Value) -> Result<(), BoardError>;
}

const MIRO_BASE: &str = "https://api.miro.com/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(2);
const ERROR_BODY_LIMIT: usize = 400;

/// Blocking Miro v2 client for a single board.
pub struct MiroBoard {
    client: reqwest::blocking::Client,
    token: String,
    board_id: String,
    base_url: String,
}

impl MiroBoard {
    pub fn new(token: &str, board_id: &str) -> Result<Self, BoardError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            board_id: board_id.to_string(),
            base_url: MIRO_BASE.to_string(),
        })
    }

    /// POST a payload to a board endpoint, retrying once on HTTP 429.
    fn post(&self, path: &str, payload: &Value) -> Result<Value, BoardError> {
        let url = format!("{}/boards/{}/{}", self.base_url, self.board_id, path);

        let mut response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()?;
        if response.status().as_u16() == 429 {
            std::thread::sleep(RATE_LIMIT_PAUSE);
            response = self
                .client
                .post(&url)
                .bearer_auth(&self.token)
                .json(payload)
                .send()?;
        }

        let status = response.status();
        match status.as_u16() {
            401 | 403 => Err(BoardError::Auth {
                status: status.as_u16(),
            }),
            _ if !status.is_success() => {
                let body = response.text().unwrap_or_default();
                Err(BoardError::Rejected {
                    status: status.as_u16(),
                    body: truncate_body(&body),
                })
            }
            _ => Ok(response.json()?),
        }
    }

    fn post_element(
        &self,
        path: &str,
        payload: &Value,
        kind: ElementKind,
    ) -> Result<ElementRef, BoardError> {
        let response = self.post(path, payload)?;
        let id = element_id(&response)
            .ok_or_else(|| BoardError::Unexpected(format!("{path} response missing id")))?;
        Ok(ElementRef { id, kind })
    }
}

impl BoardApi for MiroBoard {
    fn create_image(&self, url: &str, rect: &Rect) -> Result<ElementRef, BoardError> {
        self.post_element("images", &image_payload(url, rect), ElementKind::Image)
    }

    fn create_shape(&self, rect: &Rect, fill: &str) -> Result<ElementRef, BoardError> {
        self.post_element("shapes", &shape_payload(rect, fill), ElementKind::Shape)
    }

    fn create_text(
        &self,
        content: &str,
        rect: &Rect,
        font_size: u32,
    ) -> Result<ElementRef, BoardError> {
        self.post_element(
            "texts",
            &text_payload(content, rect, font_size),
            ElementKind::Text,
        )
    }

    fn create_group(&self, payload: Value) -> Result<(), BoardError> {
        self.post("groups", &payload).map(|_| ())
    }
}

// ============================================================================
// Wire payloads
// ============================================================================
//
// Miro positions elements by center; the planner hands out top-left rects,
// so the conversion happens here and only here. Image and text take a width
// and keep their natural height; shapes take both dimensions.

fn position(rect: &Rect) -> Value {
    let (x, y) = rect.center();
    json!({ "x": x, "y": y })
}

fn image_payload(url: &str, rect: &Rect) -> Value {
    json!({
        "data": { "url": url },
        "position": position(rect),
        "geometry": { "width": rect.width },
    })
}

fn shape_payload(rect: &Rect, fill: &str) -> Value {
    json!({
        "data": { "shape": "rectangle" },
        "position": position(rect),
        "geometry": { "width": rect.width, "height": rect.height },
        "style": { "fillColor": fill },
    })
}

fn text_payload(content: &str, rect: &Rect, font_size: u32) -> Value {
    json!({
        "data": { "content": content },
        "position": position(rect),
        "geometry": { "width": rect.width },
        "style": { "textAlign": "center", "fontSize": font_size },
    })
}

/// Extract the element id from a creation response. Ids are documented as
/// strings but have shown up as bare numbers; accept both.
fn element_id(response: &Value) -> Option<String> {
    match response.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate_body(body: &str) -> String {
    let mut end = body.len().min(ERROR_BODY_LIMIT);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
