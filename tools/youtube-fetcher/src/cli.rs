//! The `youtube-fetcher` command line.

use crate::youtube_api::{DEFAULT_BASE_URL, YouTubeClient, http_client};
use crate::{FetchOptions, VideoFetcher};
use clap::Parser;
use eyre::Context;
use std::io::Write;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CHANNEL_ID: &str = "UCDmQ1drrmdD-8OULooXEwaw";

/// Fetch a YouTube channel's videos and generate work.json
#[derive(Debug, Parser)]
#[command(name = "youtube-fetcher", version, about, long_about = None)]
#[command(after_help = "\
Examples:
  youtube-fetcher --api-key=your_key --verbose
  YOUTUBE_API_KEY=your_key youtube-fetcher --output=../work.json")]
pub struct Args {
    /// YouTube Data API v3 key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// YouTube channel ID, or a channel handle such as @name
    #[arg(long, default_value = DEFAULT_CHANNEL_ID)]
    pub channel_id: String,

    /// Output file path
    #[arg(short, long, default_value = "work.json")]
    pub output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Include YouTube Shorts in results
    #[arg(long)]
    pub include_shorts: bool,

    /// Include all available data (description, likes, comments, etc.)
    #[arg(long)]
    pub full_data: bool,

    #[arg(long, env = "YOUTUBE_API_BASE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub api_base_url: String,
}

/// The log filter for a run.
///
/// `rust_log` is the value of `RUST_LOG`, which replaces the defaults entirely when set. Without
/// it only warnings are shown, plus this crate's debug output under `--verbose`.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    match rust_log {
        Some(directives) => builder.parse_lossy(directives),
        None if verbose => builder.parse_lossy("warn,youtube_fetcher=debug"),
        None => builder.parse_lossy(""),
    }
}

/// Exports the channel to `args.output` and reports the result on `out`.
pub async fn run(args: Args, out: &mut impl Write) -> eyre::Result<()> {
    let Some(api_key) = args.api_key.filter(|key| !key.is_empty()) else {
        eyre::bail!(
            "YouTube API key is required. \
            Use --api-key or the YOUTUBE_API_KEY environment variable."
        );
    };

    let yt = YouTubeClient::with_base_url(api_key, args.api_base_url, http_client()?);
    let fetcher = VideoFetcher::new(
        yt,
        FetchOptions {
            channel: args.channel_id,
            include_shorts: args.include_shorts,
            full_data: args.full_data,
        },
    );

    let work = fetcher.fetch_all_videos().await.context("fetch videos")?;
    work.save_to_file(&args.output)
        .await
        .context("save work data")?;

    writeln!(
        out,
        "successfully updated {} with {} videos",
        args.output.display(),
        work.videos.len()
    )?;
    if !args.verbose {
        writeln!(out, "last updated: {}", work.last_updated)?;
    }

    Ok(())
}
