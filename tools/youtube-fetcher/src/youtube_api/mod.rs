//! A read-only YouTube Data API v3 client, limited to what a channel export needs.
//!
//! Three endpoints are involved, always in this order:
//!
//! 1. `channels.list` maps a channel (ID or `@handle`) to its uploads playlist,
//! 2. `playlistItems.list` pages through that playlist for video IDs,
//! 3. `videos.list` returns details for up to [`MAX_RESULTS`] IDs per call.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_fetcher::youtube_api::{ChannelRef, YouTubeClient, http_client};
//! use tokio_stream::StreamExt;
//!
//! # async fn example() -> eyre::Result<()> {
//! let yt = YouTubeClient::new("my-api-key", http_client()?);
//! let uploads = yt.get_uploads_playlist_id(ChannelRef::parse("@Dulcets")).await?;
//! let mut ids = std::pin::pin!(yt.list_playlist_video_ids(&uploads));
//! while let Some(id) = ids.next().await {
//!     println!("https://www.youtube.com/watch?v={}", id?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod channels;
pub mod client;
pub mod playlist_items;
pub mod types;
pub mod videos;

pub use client::{DEFAULT_BASE_URL, MAX_RESULTS, YouTubeClient, http_client};
pub use types::{PageInfo, PagedStream};

pub use channels::{Channel, ChannelRef};
pub use playlist_items::PlaylistItem;
pub use videos::{Thumbnails, Video, VideoPart, VideoStatistics};
