//! The `work.json` document the fetcher produces.

use crate::youtube_api::Video;
use eyre::Context;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One video as written to `work.json`.
///
/// Fields are serialized in declaration order. The `Option` fields are only filled in when full
/// data was requested and are left out of the output otherwise. Even then, zero counts, an empty
/// description or duration and a `false` Short flag are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    /// Publication day in UTC, `YYYY-MM-DD`.
    pub date: String,
    pub view_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The raw ISO 8601 duration, e.g. `PT4M13S`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_short: Option<bool>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl VideoMetadata {
    /// Extracts the exported fields from a `videos.list` resource.
    ///
    /// Counts that are missing or not numeric become 0.
    pub fn from_video(video: Video, is_short: bool, full_data: bool) -> Self {
        let statistics = video.statistics.unwrap_or_default();
        let count = |raw: Option<String>| {
            raw.and_then(|s| s.parse::<u64>().ok())
                .unwrap_or_default()
        };

        let mut meta = Self {
            date: publication_date(video.snippet.published_at),
            view_count: count(statistics.view_count),
            like_count: None,
            comment_count: None,
            description: None,
            duration: None,
            is_short: None,
            url: watch_url(&video.id),
            thumbnail: video.snippet.thumbnails.best_url().map(str::to_string),
            title: video.snippet.title,
        };

        if full_data {
            meta.like_count = Some(count(statistics.like_count)).filter(|&n| n > 0);
            meta.comment_count = Some(count(statistics.comment_count)).filter(|&n| n > 0);
            meta.description = Some(video.snippet.description).filter(|d| !d.is_empty());
            meta.duration = video
                .content_details
                .map(|cd| cd.duration)
                .filter(|d| !d.is_empty());
            meta.is_short = is_short.then_some(true);
        }

        meta
    }
}

/// `https://www.youtube.com/watch?v=<id>`
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

fn publication_date(published_at: Timestamp) -> String {
    published_at.strftime("%Y-%m-%d").to_string()
}

/// The complete `work.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkData {
    pub videos: Vec<VideoMetadata>,
    /// When the document was produced, RFC 3339 with the local UTC offset.
    pub last_updated: String,
}

impl WorkData {
    /// Wraps `videos`, stamping the document with the current local time.
    pub fn new(videos: Vec<VideoMetadata>) -> Self {
        Self {
            videos,
            last_updated: rfc3339(&Zoned::now()),
        }
    }

    /// Sorts newest first by publication day. Videos from the same day keep their order.
    pub fn sort_newest_first(&mut self) {
        self.videos.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Writes the document as pretty-printed JSON, replacing whatever is at `path`.
    pub async fn save_to_file(&self, path: &Path) -> eyre::Result<()> {
        let json = serde_json::to_vec_pretty(self).context("serialize work data as JSON")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        tracing::info!(path = %path.display(), videos = self.videos.len(), "saved work data");
        Ok(())
    }
}

fn rfc3339(zdt: &Zoned) -> String {
    zdt.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn video(value: serde_json::Value) -> Video {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Video {
        video(json!({
            "id": "abc123",
            "snippet": {
                "title": "Original Song",
                "description": "Lyrics below",
                "publishedAt": "2024-05-01T23:59:59Z",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg" }
                }
            },
            "statistics": { "viewCount": "1234", "likeCount": "56", "commentCount": "7" },
            "contentDetails": { "duration": "PT3M30S" }
        }))
    }

    #[test]
    fn serialize_basic_metadata() {
        let meta = VideoMetadata::from_video(sample(), false, false);
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({
                "title": "Original Song",
                "date": "2024-05-01",
                "viewCount": 1234,
                "url": "https://www.youtube.com/watch?v=abc123",
                "thumbnail": "https://i.ytimg.com/vi/abc123/hqdefault.jpg"
            })
        );
    }

    #[test]
    fn serialize_full_metadata() {
        let meta = VideoMetadata::from_video(sample(), false, true);
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({
                "title": "Original Song",
                "date": "2024-05-01",
                "viewCount": 1234,
                "likeCount": 56,
                "commentCount": 7,
                "description": "Lyrics below",
                "duration": "PT3M30S",
                "url": "https://www.youtube.com/watch?v=abc123",
                "thumbnail": "https://i.ytimg.com/vi/abc123/hqdefault.jpg"
            })
        );
    }

    #[test]
    fn field_order_matches_document_layout() {
        let meta = VideoMetadata::from_video(sample(), true, true);
        let text = serde_json::to_string(&meta).unwrap();
        let keys = [
            "\"title\"",
            "\"date\"",
            "\"viewCount\"",
            "\"likeCount\"",
            "\"commentCount\"",
            "\"description\"",
            "\"duration\"",
            "\"isShort\"",
            "\"url\"",
            "\"thumbnail\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn full_metadata_leaves_out_empty_values() {
        let meta = VideoMetadata::from_video(
            video(json!({
                "id": "x",
                "snippet": { "title": "t", "description": "", "publishedAt": "2023-01-02T03:04:05Z" },
                "statistics": { "viewCount": "0", "likeCount": "0", "commentCount": "0" },
                "contentDetails": { "duration": "" }
            })),
            false,
            true,
        );
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({
                "title": "t",
                "date": "2023-01-02",
                "viewCount": 0,
                "url": "https://www.youtube.com/watch?v=x"
            })
        );
        let short = VideoMetadata::from_video(sample(), true, true);
        assert_eq!(short.is_short, Some(true));
    }

    #[test]
    fn hidden_or_garbled_counts_are_zero() {
        let meta = VideoMetadata::from_video(
            video(json!({
                "id": "x",
                "snippet": { "title": "t", "publishedAt": "2023-01-02T03:04:05Z" },
                "statistics": { "viewCount": "n/a" }
            })),
            false,
            true,
        );
        assert_eq!(meta.view_count, 0);
        assert_eq!(meta.like_count, None);
        assert_eq!(meta.comment_count, None);
        assert_eq!(meta.duration, None);
        assert_eq!(meta.thumbnail, None);
    }

    #[test]
    fn date_is_taken_in_utc() {
        let meta = VideoMetadata::from_video(
            video(json!({
                "id": "x",
                "snippet": { "title": "t", "publishedAt": "2022-12-31T20:00:00-05:00" }
            })),
            false,
            false,
        );
        assert_eq!(meta.date, "2023-01-01");
    }

    #[test]
    fn sorting_is_newest_first_and_stable() {
        let entry = |title: &str, date: &str| VideoMetadata {
            title: title.to_string(),
            date: date.to_string(),
            view_count: 0,
            like_count: None,
            comment_count: None,
            description: None,
            duration: None,
            is_short: None,
            url: watch_url(title),
            thumbnail: None,
        };
        let mut work = WorkData {
            videos: vec![
                entry("old", "2021-06-01"),
                entry("same-day-1", "2023-02-02"),
                entry("new", "2024-01-01"),
                entry("same-day-2", "2023-02-02"),
            ],
            last_updated: String::new(),
        };
        work.sort_newest_first();
        let titles: Vec<&str> = work.videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["new", "same-day-1", "same-day-2", "old"]);
    }

    #[test]
    fn last_updated_is_rfc3339() {
        let work = WorkData::new(Vec::new());
        let parsed: Timestamp = work.last_updated.parse().unwrap();
        assert!(parsed <= Timestamp::now());
        let zdt: Zoned = "2024-05-01T12:30:05+09:00[+09:00]".parse().unwrap();
        assert_eq!(rfc3339(&zdt), "2024-05-01T12:30:05+09:00");
    }

    #[tokio::test]
    async fn saved_file_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work.json");
        std::fs::write(&path, "stale").unwrap();

        let work = WorkData {
            videos: vec![VideoMetadata::from_video(sample(), false, false)],
            last_updated: "2024-05-02T00:00:00+00:00".to_string(),
        };
        work.save_to_file(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"videos\": [\n    {\n      \"title\""));
        let back: WorkData = serde_json::from_str(&written).unwrap();
        assert_eq!(back, work);
    }

    #[tokio::test]
    async fn save_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("work.json");
        let err = WorkData::new(Vec::new())
            .save_to_file(&path)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("work.json"), "{err}");
    }
}
