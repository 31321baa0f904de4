//! Exports the public uploads of a YouTube channel to a `work.json` document.

pub mod cli;
pub mod duration;
pub mod fetcher;
pub mod work;
pub mod youtube_api;

#[cfg(test)]
mod mock_api;

pub use fetcher::{FetchOptions, VideoFetcher};
pub use work::{VideoMetadata, WorkData};
