//! Core domain types produced by the extraction engine.
//!
//! Identifier types can only be built through their shape predicate, so an
//! invalid id is never representable. Record types are plain owned data,
//! created per extraction call.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Base for canonical channel and watch URLs.
pub const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[A-Za-z0-9_-]{22}$").expect("channel id regex"));

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id regex"));

/// Video URL shapes, tried in order.
static VIDEO_URL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/)([A-Za-z0-9_-]{11})",
        r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"youtube\.com/v/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video url regex"))
    .collect()
});

// ---------------------------------------------------------------------------
// ChannelId
// ---------------------------------------------------------------------------

/// A YouTube channel identifier (UCID): `UC` followed by 22 characters of
/// `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Shape predicate shared by every resolution strategy.
    pub fn is_valid(candidate: &str) -> bool {
        CHANNEL_ID_RE.is_match(candidate)
    }

    /// Validate and wrap a channel id.
    pub fn parse(candidate: &str) -> Result<Self> {
        if Self::is_valid(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(ExtractError::validation(format!(
                "invalid channel id {candidate:?}: must start with 'UC' and be 24 characters of [A-Za-z0-9_-]"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `https://www.youtube.com/channel/<id>`
    pub fn channel_url(&self) -> String {
        format!("{YOUTUBE_ORIGIN}/channel/{}", self.0)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ChannelId {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ExtractError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// VideoId
// ---------------------------------------------------------------------------

/// An 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    pub fn is_valid(candidate: &str) -> bool {
        VIDEO_ID_RE.is_match(candidate)
    }

    pub fn parse(candidate: &str) -> Result<Self> {
        if Self::is_valid(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(ExtractError::validation(format!(
                "invalid video id {candidate:?}: must be 11 characters of [A-Za-z0-9_-]"
            )))
        }
    }

    /// Accept either a bare id or a watch/short/embed URL.
    pub fn from_url_or_id(input: &str) -> Result<Self> {
        let input = input.trim();
        if Self::is_valid(input) {
            return Ok(Self(input.to_string()));
        }

        VIDEO_URL_RES
            .iter()
            .find_map(|re| re.captures(input))
            .map(|caps| Self(caps[1].to_string()))
            .ok_or_else(|| {
                ExtractError::validation(
                    "invalid video URL or ID: provide a YouTube URL or an 11-character video id",
                )
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `https://www.youtube.com/watch?v=<id>`
    pub fn watch_url(&self) -> String {
        watch_url(&self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = ExtractError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Watch URL for a raw video id string (feed entries carry unvalidated ids).
pub fn watch_url(video_id: &str) -> String {
    format!("{YOUTUBE_ORIGIN}/watch?v={video_id}")
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// One timed caption line. Times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    /// Never negative; out-of-order cue times clamp to 0.
    pub duration: f64,
    pub text: String,
}

/// A transcript for one video, in source cue order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub video_url: String,
    /// Language tag of the subtitle track that produced this transcript.
    pub language: String,
    /// Segment texts joined by single spaces, whitespace collapsed.
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// One `<entry>` of a channel's Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedVideoEntry {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    /// `None` means unknown, which is distinct from zero views.
    pub views: Option<u64>,
}

/// Channel summary plus its most recent entries, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelFeed {
    pub channel_id: ChannelId,
    pub channel_title: Option<String>,
    pub channel_url: String,
    pub channel_author: Option<String>,
    pub channel_published: Option<String>,
    pub video_count: usize,
    pub videos: Vec<FeedVideoEntry>,
}

impl ChannelFeed {
    /// The newest entry (feeds list newest first).
    pub fn latest(&self) -> Option<&FeedVideoEntry> {
        self.videos.first()
    }
}
