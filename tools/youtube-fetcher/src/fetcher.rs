//! The channel export pipeline.
//!
//! resolve channel → enumerate upload IDs → fetch details in batches → drop Shorts → convert →
//! sort newest first. Each step runs to completion before the next starts, and the first error
//! aborts the whole run.

use crate::duration::is_short;
use crate::work::{VideoMetadata, WorkData};
use crate::youtube_api::{ChannelRef, MAX_RESULTS, VideoPart, YouTubeClient};
use eyre::Context;
use tokio_stream::StreamExt;
use tracing::instrument;

/// What to export and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Channel ID (`UC...`) or handle (`@name`).
    pub channel: String,
    /// Keep videos of at most a minute instead of dropping them.
    pub include_shorts: bool,
    /// Also export likes, comments, description, duration and Short status.
    pub full_data: bool,
}

impl FetchOptions {
    /// The `videos.list` parts needed for these options.
    ///
    /// Durations are only requested when they are exported or needed to filter out Shorts.
    pub fn video_parts(&self) -> Vec<VideoPart> {
        let mut parts = vec![VideoPart::Snippet, VideoPart::Statistics];
        if self.full_data || !self.include_shorts {
            parts.push(VideoPart::ContentDetails);
        }
        parts
    }
}

#[derive(Debug)]
pub struct VideoFetcher {
    yt: YouTubeClient,
    options: FetchOptions,
}

impl VideoFetcher {
    pub fn new(yt: YouTubeClient, options: FetchOptions) -> Self {
        Self { yt, options }
    }

    /// Runs the whole pipeline and returns the finished document.
    #[instrument(skip(self), fields(channel = %self.options.channel))]
    pub async fn fetch_all_videos(&self) -> eyre::Result<WorkData> {
        tracing::info!("fetching channel videos");

        let channel = ChannelRef::parse(&self.options.channel);
        let uploads = self
            .yt
            .get_uploads_playlist_id(channel)
            .await
            .context("resolve channel uploads playlist")?;

        let video_ids = self
            .upload_ids(&uploads)
            .await
            .context("enumerate channel uploads")?;
        tracing::info!(count = video_ids.len(), "found videos");

        let videos = self
            .video_details(&video_ids)
            .await
            .context("fetch video details")?;

        let mut work = WorkData::new(videos);
        work.sort_newest_first();
        tracing::info!(count = work.videos.len(), "successfully fetched videos");
        Ok(work)
    }

    async fn upload_ids(&self, playlist_id: &str) -> eyre::Result<Vec<String>> {
        let mut ids = Vec::new();
        let stream = self.yt.list_playlist_video_ids(playlist_id);
        let mut stream = std::pin::pin!(stream);
        while let Some(id) = stream.next().await {
            ids.push(id?);
        }
        tracing::debug!(total = ids.len(), "collected video IDs");
        Ok(ids)
    }

    async fn video_details(&self, video_ids: &[String]) -> eyre::Result<Vec<VideoMetadata>> {
        let parts = self.options.video_parts();
        let mut videos = Vec::with_capacity(video_ids.len());
        let mut filtered = 0usize;

        for (n, batch) in video_ids.chunks(MAX_RESULTS).enumerate() {
            let first = n * MAX_RESULTS + 1;
            let last = first + batch.len() - 1;
            let items = self
                .yt
                .list_videos(batch, &parts)
                .await
                .with_context(|| format!("look up videos {first}-{last}"))?;
            let returned = items.len();

            for video in items {
                let duration = video
                    .content_details
                    .as_ref()
                    .map(|cd| cd.duration.as_str())
                    .unwrap_or("");
                let short = is_short(duration);

                if short && !self.options.include_shorts {
                    tracing::debug!(
                        video_id = video.id,
                        title = video.snippet.title,
                        duration,
                        "filtered out short"
                    );
                    filtered += 1;
                    continue;
                }

                videos.push(VideoMetadata::from_video(
                    video,
                    short,
                    self.options.full_data,
                ));
            }

            tracing::debug!(first, last, returned, "processed batch");
        }

        if filtered > 0 {
            tracing::info!(filtered, "filtered out shorts");
        }
        Ok(videos)
    }
}
