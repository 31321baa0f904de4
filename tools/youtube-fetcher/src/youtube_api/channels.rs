//! YouTube Channels API types.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `channels.list` API call.
///
/// An unknown channel ID or handle is not an HTTP error: the API answers with an empty (or
/// entirely absent) `items` array instead.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#channelListResponse`.
    #[serde(default)]
    pub kind: String,
    /// A list of channels that match the request criteria.
    #[serde(default)]
    pub items: VecDeque<Channel>,
}

/// A `channel` resource, restricted to the parts requested by this crate.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Channel {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: String,
    #[serde(rename = "contentDetails")]
    pub content_details: ChannelContentDetails,
}

/// See: <https://developers.google.com/youtube/v3/docs/channels#contentDetails>
#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: RelatedPlaylists,
}

/// Playlists associated with the channel.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    /// The ID of the playlist that contains the channel's uploaded videos.
    pub uploads: String,
}

/// How a channel is identified in a `channels.list` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRef<'a> {
    /// A channel ID such as `UCDmQ1drrmdD-8OULooXEwaw`.
    Id(&'a str),
    /// A handle such as `@Dulcets`.
    Handle(&'a str),
}

impl<'a> ChannelRef<'a> {
    /// Anything starting with `@` is a handle, everything else is taken to be a channel ID.
    pub fn parse(input: &'a str) -> Self {
        if input.starts_with('@') {
            Self::Handle(input)
        } else {
            Self::Id(input)
        }
    }

    /// The query parameter that selects this channel.
    pub(crate) fn query_param(&self) -> (&'static str, &'a str) {
        match *self {
            Self::Id(id) => ("id", id),
            Self::Handle(handle) => ("forHandle", handle),
        }
    }
}

impl std::fmt::Display for ChannelRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(s) | Self::Handle(s) => f.write_str(s),
        }
    }
}
