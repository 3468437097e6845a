//! The post record and date handling.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single blog post as stored in `posts.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque unique identifier
    pub id: String,

    /// Post title
    pub title: String,

    /// Calendar date, normally `YYYY-MM-DD`
    pub date: String,

    /// Markdown body
    pub content: String,

    /// Short summary for the list view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Post {
    /// Parse this post's date, if it is in a recognized format.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Human-readable date for page metadata.
    ///
    /// Falls back to the raw stored string when the date cannot be parsed.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Parse a post date. Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.date_naive())
}

/// Sort posts newest-first.
///
/// The sort is stable, so posts sharing a date keep their order in the
/// collection. Posts with unparseable dates sort after dated ones.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Look up a post by id. Linear scan; ids are expected to be unique.
pub fn find_post<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.id == id)
}
