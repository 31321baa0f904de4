//! Core YouTube API client functionality.

use crate::youtube_api::{
    channels::{ChannelListResponse, ChannelRef},
    playlist_items::PlaylistItemListResponse,
    types::PagedStream,
    videos::{Video, VideoListResponse, VideoPart},
};
use eyre::Context;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::time::Duration;
use tokio_stream::Stream;
use tracing::instrument;

/// Where the public YouTube Data API v3 lives.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// The most items any list endpoint hands out per page, and the most IDs `videos.list` accepts
/// in a single call.
pub const MAX_RESULTS: usize = 50;

/// Builds the HTTP client the fetcher uses for all API traffic.
///
/// Requests time out after 30 seconds, and redirects are not followed.
pub fn http_client() -> eyre::Result<reqwest::Client> {
    reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        // SSRF no thank you.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("build HTTP client")
}

/// Client for the read-only, API-key authenticated part of the YouTube Data API v3.
///
/// Every request carries the API key as the `key` query parameter. Only public data is
/// reachable this way, which is all a channel export needs.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for YouTubeClient {
    // never print the key
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a client that talks to the public API at [`DEFAULT_BASE_URL`].
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, client)
    }

    /// Creates a client that talks to an API-compatible server at `base_url`.
    ///
    /// `base_url` is the prefix the endpoint names (`channels`, `videos`, ...) are appended to.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Issues a GET against `endpoint` and decodes the JSON body.
    ///
    /// Non-2xx responses turn into errors carrying the status and the body text, which for the
    /// YouTube API holds the actual reason (bad key, quota exceeded, ...).
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> eyre::Result<R> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "making request");

        let response = self
            .client
            .get(&url)
            .query(query_params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            // the request URL carries the API key
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send request to YouTube API: {url}"))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            eyre::bail!(
                "YouTube API {} request failed with status {}: {}",
                endpoint,
                status_code,
                error_text
            );
        }

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("read YouTube {endpoint} API response body"))?;
        tracing::debug!(size = body.len(), "response received");

        serde_json::from_slice(&body)
            .with_context(|| format!("parse YouTube {endpoint} API response as JSON"))
    }

    /// Looks up the ID of the playlist holding every upload of a channel.
    ///
    /// Uses the `channels.list` API with `part=contentDetails`. The channel may be given by ID or
    /// by `@handle`.
    ///
    /// # Errors
    ///
    /// Fails with `channel not found` if the API knows no such channel.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self), ret)]
    pub async fn get_uploads_playlist_id(&self, channel: ChannelRef<'_>) -> eyre::Result<String> {
        let query_params = [("part", "contentDetails"), channel.query_param()];

        let channels: ChannelListResponse = self
            .get_json("channels", &query_params)
            .await
            .context("get channel info")?;

        let Some(found) = channels.items.into_iter().next() else {
            eyre::bail!("channel not found: {}", channel);
        };

        tracing::debug!(
            channel_id = found.id,
            uploads = found.content_details.related_playlists.uploads,
            "found uploads playlist"
        );
        Ok(found.content_details.related_playlists.uploads)
    }

    /// Returns a stream of the IDs of every video in a playlist, in playlist order.
    ///
    /// Uses the `playlistItems.list` API with the largest page size the API allows. Pages are
    /// fetched as the stream is consumed.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    #[instrument(skip(self))]
    pub fn list_playlist_video_ids<'a>(
        &'a self,
        playlist_id: &'a str,
    ) -> impl Stream<Item = eyre::Result<String>> + use<'a> {
        PagedStream::new(move |page_token| async move {
            let response = self
                .list_playlist_items_internal(playlist_id, MAX_RESULTS, page_token)
                .await?;
            let total_results = response.page_info.total_results;
            let ids: VecDeque<String> = response
                .items
                .into_iter()
                .map(|item| item.snippet.resource_id.video_id)
                .collect();
            tracing::debug!(
                returned_items = ids.len(),
                total_results,
                "fetched video IDs from page"
            );
            Ok((ids, response.next_page_token))
        })
    }

    /// Fetches the requested parts for up to [`MAX_RESULTS`] videos in one `videos.list` call.
    ///
    /// The API drops IDs it cannot resolve (deleted or private videos), so fewer videos than IDs
    /// may come back. An empty ID list makes no request at all.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn list_videos(
        &self,
        ids: &[String],
        parts: &[VideoPart],
    ) -> eyre::Result<VecDeque<Video>> {
        if ids.is_empty() {
            return Ok(VecDeque::new());
        }
        if ids.len() > MAX_RESULTS {
            eyre::bail!(
                "cannot look up {} videos at once, the limit is {}",
                ids.len(),
                MAX_RESULTS
            );
        }

        let part = VideoPart::join(parts);
        let id = ids.join(",");
        let query_params = [("part", part.as_str()), ("id", id.as_str())];

        let videos: VideoListResponse = self
            .get_json("videos", &query_params)
            .await
            .context("get video details")?;

        tracing::debug!(
            requested = ids.len(),
            returned_items = videos.items.len(),
            "fetched video details"
        );

        Ok(videos.items)
    }

    /// Internal method to call the `playlistItems.list` API for one page.
    async fn list_playlist_items_internal(
        &self,
        playlist_id: &str,
        max_results: usize,
        page_token: Option<String>,
    ) -> eyre::Result<PlaylistItemListResponse> {
        let max_results_string = max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results_string.as_str()),
        ];

        if let Some(ref token) = page_token {
            query_params.push(("pageToken", token.as_str()));
        }

        self.get_json("playlistItems", &query_params)
            .await
            .context("get playlist items")
    }
}
