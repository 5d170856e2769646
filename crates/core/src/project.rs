//! Project records as served by the catalog API

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project record from the catalog API.
///
/// Records are immutable once fetched; every transformation downstream
/// produces new collections instead of mutating these.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-delimited tag string, e.g. "react,web,tailwind"
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Relative media path or absolute URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Project {
    /// Raw tag string lowercased, the haystack for tab and search matching
    pub fn tags_lower(&self) -> String {
        self.tags.as_deref().unwrap_or("").to_lowercase()
    }

    /// Split tags on commas, trimming whitespace and dropping empties and
    /// case-insensitive repeats. Original order is preserved.
    pub fn tag_list(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for tag in self.tags.as_deref().unwrap_or("").split(',') {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            let key = tag.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            out.push(tag.to_string());
        }
        out
    }

    /// Creation time in epoch milliseconds; missing or unparseable dates
    /// sort as epoch zero.
    pub fn created_timestamp(&self) -> i64 {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(0)
    }
}

/// Parse a catalog timestamp into epoch milliseconds.
///
/// The upstream serializer emits RFC 3339, but fixtures and hand-edited
/// records also show up as bare dates, so both are accepted.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

/// Format a raw timestamp as a short display date (YYYY-MM-DD)
pub fn format_date(raw: &str) -> Option<String> {
    let millis = parse_timestamp(raw)?;
    let dt = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(dt.format("%Y-%m-%d").to_string())
}

/// Resolve a record image against the API host.
///
/// Absolute URLs pass through; relative media paths are joined onto the host.
pub fn resolve_image_url(image: &str, base: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        return image.to_string();
    }
    let base = base.trim_end_matches('/');
    if image.starts_with('/') {
        format!("{base}{image}")
    } else {
        format!("{base}/{image}")
    }
}
