//! Transcript selection across languages and formats.
//!
//! Caption downloads produce one file per (language, format) pair, and any
//! of them may be missing or empty. Candidates are tried in a fixed order and
//! the first one that yields text wins.

use tracing::{debug, info, instrument};
use ytextract_shared::{ExtractError, Result, Transcript, TranscriptOptions, VideoId};

use crate::formats::{SubtitleFormat, parse_subtitle};

/// Fallback language when the requested one has no captions.
const FALLBACK_LANGUAGE: &str = "en";

/// Suffix of auto-translated-from-original tracks (`es-orig`).
const ORIGINAL_SUFFIX: &str = "-orig";

/// Provides raw subtitle documents by language and format.
///
/// Implementations read from wherever the captions were saved; returning
/// `None` means "no such file".
pub trait SubtitleSource {
    fn fetch(&self, language: &str, format: SubtitleFormat) -> Option<String>;
}

impl<F> SubtitleSource for F
where
    F: Fn(&str, SubtitleFormat) -> Option<String>,
{
    fn fetch(&self, language: &str, format: SubtitleFormat) -> Option<String> {
        self(language, format)
    }
}

/// Languages to try, most preferred first, without duplicates.
///
/// `es` → `[es, es-orig, en, en-orig]`; no language → `[en, en-orig]`.
pub fn language_candidates(requested: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(4);
    let requested = requested.map(str::trim).filter(|lang| !lang.is_empty());

    for lang in requested.into_iter().chain([FALLBACK_LANGUAGE]) {
        for candidate in [lang.to_string(), format!("{lang}{ORIGINAL_SUFFIX}")] {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Pick the first (format, language) candidate that yields a non-empty
/// transcript.
///
/// Formats are tried in [`SubtitleFormat::PREFERENCE`] order and, within a
/// format, languages in [`language_candidates`] order. A candidate that fails
/// to decode is skipped.
#[instrument(skip_all, fields(video_id = %video_id))]
pub fn select_transcript(
    video_id: &VideoId,
    source: &impl SubtitleSource,
    opts: &TranscriptOptions,
) -> Result<Transcript> {
    let languages = language_candidates(opts.language.as_deref());

    for format in SubtitleFormat::PREFERENCE {
        for language in &languages {
            let Some(raw) = source.fetch(language, format) else {
                continue;
            };

            match parse_subtitle(&raw, format) {
                Ok(parsed) if !parsed.is_empty() => {
                    info!(
                        %format,
                        language = %language,
                        segments = parsed.segments.len(),
                        "transcript selected"
                    );
                    return Ok(Transcript {
                        video_id: video_id.clone(),
                        video_url: video_id.watch_url(),
                        language: language.clone(),
                        text: parsed.text,
                        segments: parsed.segments,
                    });
                }
                Ok(_) => debug!(%format, language = %language, "candidate has no text"),
                Err(e) => debug!(%format, language = %language, error = %e, "candidate failed to decode"),
            }
        }
    }

    Err(ExtractError::NoTranscript {
        video_id: video_id.to_string(),
    })
}
