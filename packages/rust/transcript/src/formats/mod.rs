//! Subtitle format decoders.
//!
//! Each decoder turns one caption document into ordered segments. Decoders
//! never reorder cues and drop cues whose text ends up empty.

mod json3;
mod srt;
mod vtt;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use ytextract_shared::{ExtractError, Result, TranscriptSegment};

// ---------------------------------------------------------------------------
// Format discriminator
// ---------------------------------------------------------------------------

/// Supported caption serializations, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Json3,
    Vtt,
    Srt,
}

impl SubtitleFormat {
    /// Order in which formats are tried when selecting a transcript.
    pub const PREFERENCE: [SubtitleFormat; 3] = [Self::Json3, Self::Vtt, Self::Srt];

    /// File extension, which doubles as the format tag.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json3 => "json3",
            Self::Vtt => "vtt",
            Self::Srt => "srt",
        }
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = ExtractError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "json3" => Ok(Self::Json3),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "srt" => Ok(Self::Srt),
            other => Err(ExtractError::unsupported(format!(
                "subtitle format {other:?} (expected json3, vtt or srt)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Decoded caption document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedSubtitle {
    pub segments: Vec<TranscriptSegment>,
    /// Segment texts joined by single spaces, whitespace collapsed.
    pub text: String,
}

impl ParsedSubtitle {
    fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        let text = normalize_text(segments.iter().map(|seg| seg.text.as_str()));
        Self { segments, text }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Decode a caption document of the given format.
///
/// Only the json3 format can fail outright (its container must be valid
/// JSON). Malformed cues in any format are skipped or get a zero timestamp.
#[instrument(skip(content), fields(len = content.len()))]
pub fn parse_subtitle(content: &str, format: SubtitleFormat) -> Result<ParsedSubtitle> {
    let segments = match format {
        SubtitleFormat::Json3 => json3::parse(content)?,
        SubtitleFormat::Vtt => vtt::parse(content),
        SubtitleFormat::Srt => srt::parse(content),
    };

    debug!(segments = segments.len(), "subtitle decoded");
    Ok(ParsedSubtitle::from_segments(segments))
}

/// Join pieces with spaces, collapse whitespace runs, trim the ends.
pub fn normalize_text<'a>(pieces: impl IntoIterator<Item = &'a str>) -> String {
    pieces
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a segment, clamping a negative start or duration to zero.
fn segment(start: f64, duration: f64, text: String) -> TranscriptSegment {
    TranscriptSegment {
        start: start.max(0.0),
        duration: duration.max(0.0),
        text,
    }
}
