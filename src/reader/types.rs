//! Reader state wire types
//!
//! The e-reader client persists three kinds of per-book state: the
//! current location, a bookmark list and a highlight list. All wire
//! names are camelCase. CFI strings are treated as opaque position
//! markers chosen by the client viewer.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fields a `currentLocation` payload must carry
const REQUIRED_LOCATION_FIELDS: &[&str] =
    &["currentPage", "totalPage", "startCfi", "endCfi", "base"];

/// Position of the reader within a book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_name: Option<String>,
    pub current_page: i64,
    pub total_page: i64,
    pub start_cfi: String,
    pub end_cfi: String,
    /// Spine base path the CFIs resolve against
    pub base: String,
}

/// A saved position marker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Client-generated key, usually the start CFI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub start_cfi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cfi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// A highlighted text span with optional note content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// CFI range covering the highlighted span
    pub cfi_range: String,
    /// The highlighted text
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_highlight_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_num: Option<i64>,
}

fn default_highlight_color() -> String {
    "yellow".to_string()
}

/// Body of `POST /reader/:id`
///
/// Carries at most one of the three sub-states; whichever is present
/// first (location, then bookmarks, then highlights) replaces that
/// part of the stored reader. `currentLocation` stays untyped here so
/// missing fields can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderUpdate {
    #[serde(default)]
    pub current_location: Option<serde_json::Value>,
    #[serde(default)]
    pub bookmarks: Option<Vec<Bookmark>>,
    #[serde(default)]
    pub highlights: Option<Vec<Highlight>>,
}

/// Validate a raw `currentLocation` payload and decode it
pub fn parse_current_location(value: &serde_json::Value) -> Result<CurrentLocation, AppError> {
    let Some(object) = value.as_object() else {
        return Err(AppError::BadRequest("Invalid currentLocation".to_string()));
    };

    for field in REQUIRED_LOCATION_FIELDS {
        if !object.contains_key(*field) {
            return Err(AppError::BadRequest(format!(
                "Missing field in currentLocation: {field}"
            )));
        }
    }

    serde_json::from_value(value.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid currentLocation: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_full_location() {
        let value = json!({
            "chapterName": "Chapter 1",
            "currentPage": 12,
            "totalPage": 300,
            "startCfi": "epubcfi(/6/4!/4/2/1:0)",
            "endCfi": "epubcfi(/6/4!/4/2/1:120)",
            "base": "/6/4",
        });

        let location = parse_current_location(&value).unwrap();
        assert_eq!(location.current_page, 12);
        assert_eq!(location.chapter_name.as_deref(), Some("Chapter 1"));
    }

    #[test]
    fn missing_start_cfi_is_named_in_error() {
        let value = json!({
            "currentPage": 1,
            "totalPage": 10,
            "endCfi": "epubcfi(/6/4!/4/2/1:120)",
            "base": "/6/4",
        });

        let err = parse_current_location(&value).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Missing field in currentLocation: startCfi");
    }

    #[test]
    fn chapter_name_is_optional() {
        let value = json!({
            "currentPage": 1,
            "totalPage": 10,
            "startCfi": "epubcfi(/6/4!/4/2/1:0)",
            "endCfi": "epubcfi(/6/4!/4/2/1:120)",
            "base": "/6/4",
        });

        let location = parse_current_location(&value).unwrap();
        assert!(location.chapter_name.is_none());
    }

    #[test]
    fn non_object_location_is_rejected() {
        let err = parse_current_location(&json!("epubcfi(/6/4)")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid currentLocation");
    }

    #[test]
    fn highlight_defaults_to_yellow() {
        let highlight: Highlight = serde_json::from_value(json!({
            "cfiRange": "epubcfi(/6/4!/4/2,/1:0,/1:42)",
            "content": "a memorable passage",
        }))
        .unwrap();

        assert_eq!(highlight.color, "yellow");
        assert!(highlight.key.is_none());
    }

    #[test]
    fn bookmark_round_trips_camel_case() {
        let bookmark = Bookmark {
            key: Some("epubcfi(/6/8!/4/2/1:0)".to_string()),
            start_cfi: "epubcfi(/6/8!/4/2/1:0)".to_string(),
            end_cfi: None,
            chapter_name: Some("Chapter 3".to_string()),
            current_page: Some(58),
            total_page: Some(300),
            base: Some("/6/8".to_string()),
        };

        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["startCfi"], "epubcfi(/6/8!/4/2/1:0)");
        assert_eq!(json["chapterName"], "Chapter 3");
        assert!(json.get("endCfi").is_none());

        let parsed: Bookmark = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.current_page, Some(58));
    }

    #[test]
    fn empty_update_has_no_recognized_field() {
        let update: ReaderUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.current_location.is_none());
        assert!(update.bookmarks.is_none());
        assert!(update.highlights.is_none());
    }
}
