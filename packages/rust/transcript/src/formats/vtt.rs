//! WebVTT.

use std::sync::LazyLock;

use regex::Regex;
use ytextract_shared::TranscriptSegment;

use crate::timestamp::parse_timestamp;

/// Inline cue markup: `<c.colorE5E5E5>`, `<00:00:01.000>`, `</c>`, `<i>` ...
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

pub(super) fn parse(content: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut lines = content.lines().map(str::trim);

    while let Some(line) = lines.next() {
        let Some((start, end)) = line.split_once("-->") else {
            continue;
        };
        let start = parse_timestamp(start);
        // Cue settings (`align:start position:0%`) follow the end time.
        let end = parse_timestamp(end.split_whitespace().next().unwrap_or_default());

        let text_lines: Vec<&str> = lines.by_ref().take_while(|l| !l.is_empty()).collect();

        let joined = text_lines.join(" ");
        let text = TAG_RE.replace_all(&joined, "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        segments.push(super::segment(start, end - start, text.to_string()));
    }

    segments
}
