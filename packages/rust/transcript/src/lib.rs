//! Caption decoding and transcript selection.
//!
//! Turns json3, WebVTT and SRT caption documents into a uniform list of
//! [`TranscriptSegment`](ytextract_shared::TranscriptSegment)s, and picks the
//! best available caption track for a video.

mod formats;
mod select;
mod timestamp;

pub use formats::{ParsedSubtitle, SubtitleFormat, normalize_text, parse_subtitle};
pub use select::{SubtitleSource, language_candidates, select_transcript};
pub use timestamp::parse_timestamp;
