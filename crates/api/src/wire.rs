// ABOUTME: Wire formats of the video backend and their conversion into feed models.
// ABOUTME: Accepts `{data: [...]}`, `{data: {docs: [...]}}` and bare list envelopes; anything else is malformed.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use vidstream_feed::{PageRequest, PageResult, VideoSummary};

use crate::error::ApiError;

/// Keys that may carry the total number of matching videos.
const TOTAL_KEYS: &[&str] = &["total", "totalCount", "totalDocs", "totalVideos"];

/// A video record as the backend serializes it.
///
/// Only `_id` is required. Content fields may be missing or `null`.
#[derive(Debug, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, rename = "videoFile")]
    pub video_file: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    /// Some backends serialize counters as floats (`12.0`).
    #[serde(default)]
    pub views: Option<f64>,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The owner field is either a bare id or a populated user document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl OwnerRef {
    fn into_id(self) -> String {
        match self {
            OwnerRef::Id(id) | OwnerRef::Populated { id } => id,
        }
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

impl From<VideoRecord> for VideoSummary {
    fn from(record: VideoRecord) -> Self {
        VideoSummary {
            id: record.id,
            title: record.title.unwrap_or_default(),
            thumbnail_url: record.thumbnail.unwrap_or_default(),
            media_url: record.video_file.unwrap_or_default(),
            duration_seconds: non_negative(record.duration),
            view_count: non_negative(record.views).floor() as u64,
            owner_id: record.owner.map(OwnerRef::into_id).unwrap_or_default(),
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}

/// Standard `{ statusCode, data, message, success }` response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Normalizes a video-list response body into a page.
///
/// More than `request.page_size` records are truncated to the page size.
pub fn decode_page(url: &str, body: Value, request: &PageRequest) -> Result<PageResult, ApiError> {
    const OP: &str = "DecodePage";

    let (list, total_count) = match body {
        Value::Array(list) => (list, None),
        Value::Object(mut envelope) => {
            let total = find_total(&envelope);
            match envelope.remove("data") {
                Some(Value::Array(list)) => (list, total),
                Some(Value::Object(mut paged)) => {
                    let nested_total = find_total(&paged).or(total);
                    match paged.remove("docs").or_else(|| paged.remove("videos")) {
                        Some(Value::Array(list)) => (list, nested_total),
                        _ => return Err(malformed(url, OP, "data holds no video list")),
                    }
                }
                Some(_) => return Err(malformed(url, OP, "data is not a list")),
                None => return Err(malformed(url, OP, "response has no data field")),
            }
        }
        _ => return Err(malformed(url, OP, "response is not an object or list")),
    };

    let mut items = Vec::with_capacity(list.len());
    for (index, raw) in list.into_iter().enumerate() {
        let record: VideoRecord = serde_json::from_value(raw).map_err(|e| {
            ApiError::decode(
                url,
                OP,
                Some(anyhow::anyhow!("invalid video record at index {}: {}", index, e)),
            )
        })?;
        items.push(VideoSummary::from(record));
    }

    let limit = request.page_size as usize;
    if items.len() > limit {
        warn!(
            url,
            received = items.len(),
            limit,
            "backend returned more items than requested; truncating"
        );
        items.truncate(limit);
    }

    Ok(PageResult {
        items,
        requested_limit: request.page_size,
        total_count,
    })
}

fn find_total(map: &Map<String, Value>) -> Option<u64> {
    TOTAL_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_u64))
}

fn malformed(url: &str, op: &str, reason: &str) -> ApiError {
    ApiError::decode(url, op, Some(anyhow::anyhow!("{}", reason)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(size: u32) -> PageRequest {
        PageRequest::new(1, size, "").unwrap()
    }

    fn record(id: &str) -> Value {
        json!({
            "_id": id,
            "title": format!("Video {}", id),
            "thumbnail": format!("https://cdn/{}.jpg", id),
            "videoFile": format!("https://cdn/{}.mp4", id),
            "duration": 125.4,
            "views": 42,
            "owner": "user-1",
            "createdAt": "2024-03-01T10:00:00.000Z"
        })
    }

    #[test]
    fn decodes_data_envelope() {
        let body = json!({
            "statusCode": 200,
            "data": [record("a"), record("b")],
            "message": "Videos fetched successfully",
            "success": true
        });
        let page = decode_page("u", body, &request(12)).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, None);
        assert_eq!(page.requested_limit, 12);

        let first = &page.items[0];
        assert_eq!(first.id, "a");
        assert_eq!(first.title, "Video a");
        assert_eq!(first.thumbnail_url, "https://cdn/a.jpg");
        assert_eq!(first.media_url, "https://cdn/a.mp4");
        assert_eq!(first.duration_seconds, 125.4);
        assert_eq!(first.view_count, 42);
        assert_eq!(first.owner_id, "user-1");
        assert_eq!(
            first.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn decodes_bare_list() {
        let page = decode_page("u", json!([record("a")]), &request(12)).unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn reads_total_count_variants() {
        let top = json!({ "data": [record("a")], "totalCount": 30 });
        assert_eq!(decode_page("u", top, &request(12)).unwrap().total_count, Some(30));

        let nested = json!({ "data": { "docs": [record("a")], "totalDocs": 7, "page": 1 } });
        let page = decode_page("u", nested, &request(12)).unwrap();
        assert_eq!(page.total_count, Some(7));
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn populated_owner_uses_its_id() {
        let mut rec = record("a");
        rec["owner"] = json!({ "_id": "owner-9", "username": "neo" });
        let page = decode_page("u", json!({ "data": [rec] }), &request(12)).unwrap();
        assert_eq!(page.items[0].owner_id, "owner-9");
    }

    #[test]
    fn minimal_record_gets_defaults() {
        let page = decode_page("u", json!({ "data": [{ "_id": "x", "duration": -3 }] }), &request(12))
            .unwrap();
        let item = &page.items[0];
        assert_eq!(item.id, "x");
        assert_eq!(item.duration_seconds, 0.0);
        assert_eq!(item.owner_id, "");
        assert_eq!(item.view_count, 0);
    }

    #[test]
    fn null_content_fields_get_defaults() {
        let body = json!({
            "data": [
                record("a"),
                {
                    "_id": "b",
                    "title": null,
                    "thumbnail": null,
                    "videoFile": null,
                    "duration": null,
                    "views": null,
                    "owner": null,
                    "createdAt": null
                }
            ]
        });
        let page = decode_page("u", body, &request(12)).unwrap();
        assert_eq!(page.items.len(), 2);

        let item = &page.items[1];
        assert_eq!(item.id, "b");
        assert_eq!(item.title, "");
        assert_eq!(item.thumbnail_url, "");
        assert_eq!(item.duration_seconds, 0.0);
        assert_eq!(item.view_count, 0);
        assert_eq!(item.owner_id, "");
    }

    #[test]
    fn float_view_count_is_accepted() {
        let body = json!({ "data": [{ "_id": "a", "views": 12.0 }] });
        let page = decode_page("u", body, &request(12)).unwrap();
        assert_eq!(page.items[0].view_count, 12);
    }

    #[test]
    fn null_id_is_malformed() {
        let err = decode_page("u", json!({ "data": [{ "_id": null }] }), &request(12)).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn non_list_data_is_malformed() {
        let err = decode_page("u", json!({ "data": "oops" }), &request(12)).unwrap_err();
        assert!(err.is_decode());

        let err = decode_page("u", json!({ "data": { "count": 3 } }), &request(12)).unwrap_err();
        assert!(err.is_decode());

        let err = decode_page("u", json!({ "message": "hi" }), &request(12)).unwrap_err();
        assert!(err.is_decode());

        let err = decode_page("u", json!(17), &request(12)).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn record_without_id_is_malformed() {
        let err = decode_page("u", json!({ "data": [{ "title": "no id" }] }), &request(12))
            .unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("index 0"), "got {}", err);
    }

    #[test]
    fn oversized_page_is_truncated() {
        let body = json!({ "data": [record("a"), record("b"), record("c")] });
        let page = decode_page("u", body, &request(2)).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
