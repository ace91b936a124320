//! Photo source: Flickr photoset listing.
//!
//! Produces the ordered list of [`PhotoRecord`]s the rest of the pipeline
//! consumes. Order matters: the record's position in the returned Vec is the
//! grid index the planner uses, so records come back exactly in album order.
//!
//! ## Size-preference ladder
//!
//! The listing requests several direct-URL sizes as extras and picks the
//! first available of `url_c`, `url_l`, `url_z`, `url_m` (slightly larger
//! than medium down to medium), falling back to `url_h`, `url_k`, `url_o`
//! for albums that only expose the big originals. Videos and photos with no
//! usable URL are skipped before the batch, so grid indices match what ends
//! up on the board.
//!
//! ## Failure surface
//!
//! A private album, bad id, or unreachable service is [`SourceError`]. The
//! CLI reports it and proceeds with an empty batch; it is never a panic and
//! never aborts the process on its own.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("photo service transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("photo service returned HTTP {status}")]
    Status { status: u16 },
    #[error("photo listing failed: {0}")]
    Listing(String),
}

/// One photo, ready for tiling. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    pub id: String,
    pub title: String,
    /// Direct image URL chosen by the size-preference ladder.
    pub image_url: String,
    /// The photo's page on the source service (the tile's click target).
    pub page_url: String,
}

/// Trait for photo listing backends, so the pipeline and CLI can run
/// against scripted fixtures.
pub trait PhotoApi {
    /// List the album's photos, in album order.
    fn list_photos(&self) -> Result<Vec<PhotoRecord>, SourceError>;
}

const FLICKR_ENDPOINT: &str = "https://www.flickr.com/services/rest/";
const PER_PAGE: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Direct-URL extras requested from the listing, in preference order.
const URL_LADDER: [&str; 7] = [
    "url_c", "url_l", "url_z", "url_m", "url_h", "url_k", "url_o",
];

/// Flickr photoset listing via the REST endpoint.
pub struct FlickrSource {
    client: reqwest::blocking::Client,
    api_key: String,
    user_id: String,
    photoset_id: String,
}

impl FlickrSource {
    pub fn new(api_key: &str, user_id: &str, photoset_id: &str) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            user_id: user_id.to_string(),
            photoset_id: photoset_id.to_string(),
        })
    }

    fn fetch_page(&self, page: u32) -> Result<PhotosPage, SourceError> {
        let extras = format!("media,path_alias,{}", URL_LADDER.join(","));
        let per_page = PER_PAGE.to_string();
        let page = page.to_string();
        let response = self
            .client
            .get(FLICKR_ENDPOINT)
            .query(&[
                ("method", "flickr.photosets.getPhotos"),
                ("api_key", self.api_key.as_str()),
                ("user_id", self.user_id.as_str()),
                ("photoset_id", self.photoset_id.as_str()),
                ("extras", extras.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: ListingResponse = response.json()?;
        if body.stat != "ok" {
            return Err(SourceError::Listing(
                body.message
                    .unwrap_or_else(|| format!("stat={}", body.stat)),
            ));
        }
        body.photoset
            .ok_or_else(|| SourceError::Listing("response has no photoset".to_string()))
    }
}

impl PhotoApi for FlickrSource {
    fn list_photos(&self) -> Result<Vec<PhotoRecord>, SourceError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let photoset = self.fetch_page(page)?;
            records.extend(
                photoset
                    .photo
                    .iter()
                    .filter_map(|p| photo_record(p, &self.user_id)),
            );
            if page >= photoset.pages {
                break;
            }
            page += 1;
        }
        Ok(records)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    stat: String,
    #[serde(default)]
    message: Option<String>,
    photoset: Option<PhotosPage>,
}

#[derive(Debug, Deserialize)]
struct PhotosPage {
    #[serde(default)]
    photo: Vec<WirePhoto>,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    media: Option<String>,
    #[serde(default)]
    path_alias: Option<String>,
    url_c: Option<String>,
    url_l: Option<String>,
    url_z: Option<String>,
    url_m: Option<String>,
    url_h: Option<String>,
    url_k: Option<String>,
    url_o: Option<String>,
}

impl WirePhoto {
    fn url_for(&self, key: &str) -> Option<&String> {
        match key {
            "url_c" => self.url_c.as_ref(),
            "url_l" => self.url_l.as_ref(),
            "url_z" => self.url_z.as_ref(),
            "url_m" => self.url_m.as_ref(),
            "url_h" => self.url_h.as_ref(),
            "url_k" => self.url_k.as_ref(),
            "url_o" => self.url_o.as_ref(),
            _ => None,
        }
    }
}

/// First available URL on the preference ladder. Videos yield nothing.
fn best_image_url(photo: &WirePhoto) -> Option<&String> {
    if photo.media.as_deref() == Some("video") {
        return None;
    }
    URL_LADDER.iter().find_map(|key| photo.url_for(key))
}

/// The photo's page URL, from its path alias or the owner's NSID.
fn page_url(photo: &WirePhoto, fallback_user_id: &str) -> String {
    let user = photo
        .path_alias
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(fallback_user_id);
    format!("https://www.flickr.com/photos/{}/{}", user, photo.id)
}

/// Convert one wire photo into a record, or None when it has no usable
/// image (video entries, or no direct URL exposed).
fn photo_record(photo: &WirePhoto, fallback_user_id: &str) -> Option<PhotoRecord> {
    let image_url = best_image_url(photo)?;
    Some(PhotoRecord {
        id: photo.id.clone(),
        title: photo.title.trim().to_string(),
        image_url: image_url.clone(),
        page_url: page_url(photo, fallback_user_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_photo(value: serde_json::Value) -> WirePhoto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ladder_prefers_c_size() {
        let photo = wire_photo(json!({
            "id": "1",
            "url_m": "https://img/m.jpg",
            "url_c": "https://img/c.jpg",
            "url_o": "https://img/o.jpg",
        }));
        assert_eq!(best_image_url(&photo).unwrap(), "https://img/c.jpg");
    }

    #[test]
    fn ladder_falls_back_to_large_originals() {
        let photo = wire_photo(json!({
            "id": "1",
            "url_k": "https://img/k.jpg",
            "url_o": "https://img/o.jpg",
        }));
        assert_eq!(best_image_url(&photo).unwrap(), "https://img/k.jpg");
    }

    #[test]
    fn video_has_no_image_url() {
        let photo = wire_photo(json!({
            "id": "1",
            "media": "video",
            "url_c": "https://img/c.jpg",
        }));
        assert!(best_image_url(&photo).is_none());
    }

    #[test]
    fn no_urls_means_no_record() {
        let photo = wire_photo(json!({ "id": "1", "title": "Untitled" }));
        assert!(photo_record(&photo, "99@N00").is_none());
    }

    #[test]
    fn page_url_prefers_path_alias() {
        let photo = wire_photo(json!({
            "id": "53001",
            "path_alias": "janedoe",
            "url_m": "https://img/m.jpg",
        }));
        assert_eq!(
            page_url(&photo, "99@N00"),
            "https://www.flickr.com/photos/janedoe/53001"
        );
    }

    #[test]
    fn page_url_falls_back_to_user_id() {
        let photo = wire_photo(json!({
            "id": "53001",
            "path_alias": "",
            "url_m": "https://img/m.jpg",
        }));
        assert_eq!(
            page_url(&photo, "99@N00"),
            "https://www.flickr.com/photos/99@N00/53001"
        );
    }

    #[test]
    fn record_trims_title() {
        let photo = wire_photo(json!({
            "id": "7",
            "title": "  Dawn \n",
            "url_z": "https://img/z.jpg",
        }));
        let record = photo_record(&photo, "99@N00").unwrap();
        assert_eq!(record.title, "Dawn");
        assert_eq!(record.image_url, "https://img/z.jpg");
    }

    #[test]
    fn listing_response_parses_failure_stat() {
        let body: ListingResponse = serde_json::from_value(json!({
            "stat": "fail",
            "code": 1,
            "message": "Photoset not found",
        }))
        .unwrap();
        assert_eq!(body.stat, "fail");
        assert_eq!(body.message.as_deref(), Some("Photoset not found"));
        assert!(body.photoset.is_none());
    }

    #[test]
    fn photoset_page_parses_listing_shape() {
        let page: PhotosPage = serde_json::from_value(json!({
            "photo": [
                { "id": "1", "title": "a", "url_c": "https://img/1.jpg" },
                { "id": "2", "title": "b", "media": "video" },
                { "id": "3", "title": "c", "url_m": "https://img/3.jpg" },
            ],
            "pages": 2,
            "page": 1,
            "total": "3",
        }))
        .unwrap();

        assert_eq!(page.pages, 2);
        let records: Vec<_> = page
            .photo
            .iter()
            .filter_map(|p| photo_record(p, "99@N00"))
            .collect();

        // The video drops out; order of the survivors is preserved
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].id, "3");
    }

    #[test]
    fn pages_defaults_to_one() {
        let page: PhotosPage = serde_json::from_value(json!({ "photo": [] })).unwrap();
        assert_eq!(page.pages, 1);
    }
}
