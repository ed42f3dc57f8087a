//! SubRip (`.srt`).

use std::sync::LazyLock;

use regex::Regex;
use ytextract_shared::TranscriptSegment;

use crate::timestamp::parse_timestamp;

/// One or more blank (or whitespace-only) lines between blocks.
static BLOCK_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("block separator regex"));

pub(super) fn parse(content: &str) -> Vec<TranscriptSegment> {
    let content = content.replace("\r\n", "\n");

    BLOCK_SEPARATOR_RE
        .split(content.trim())
        .filter_map(parse_block)
        .collect()
}

/// `index`, `start --> end`, then one or more text lines.
fn parse_block(block: &str) -> Option<TranscriptSegment> {
    let lines: Vec<&str> = block.trim().lines().map(str::trim).collect();
    let [_, timing, text @ ..] = lines.as_slice() else {
        return None;
    };
    if text.is_empty() {
        return None;
    }

    let (start, end) = timing.split_once("-->")?;
    let start = parse_timestamp(start);
    let end = parse_timestamp(end.split_whitespace().next().unwrap_or_default());

    let text = text.join(" ");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(super::segment(start, end - start, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_cues() {
        let srt = "1\n00:00:01,000 --> 00:00:02,500\nHello world\n\n2\n00:00:03,000 --> 00:00:04,000\nSecond line\n";
        assert_eq!(
            parse(srt),
            vec![
                TranscriptSegment {
                    start: 1.0,
                    duration: 1.5,
                    text: "Hello world".into(),
                },
                TranscriptSegment {
                    start: 3.0,
                    duration: 1.0,
                    text: "Second line".into(),
                },
            ]
        );
    }

    #[test]
    fn multi_line_text_and_extra_blank_lines() {
        let srt = "1\r\n00:00:00,500 --> 00:00:01,000\r\nfirst\r\nsecond\r\n\r\n\r\n  \r\n2\r\n00:00:01,000 --> 00:00:02,000\r\nthird\r\n";
        let segments = parse(srt);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "first second");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[1].text, "third");
    }

    #[test]
    fn short_or_untimed_blocks_are_skipped() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\n\n\
                   2\nnot a timing line\ntext\n\n\
                   3\n00:00:05,000 --> 00:00:06,000\nkept\n";
        let segments = parse(srt);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "kept");
    }

    #[test]
    fn malformed_timestamp_is_zero() {
        let srt = "1\nbogus --> 00:00:02,000\ntext\n";
        let segments = parse(srt);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].duration, 2.0);
    }

    #[test]
    fn empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n").is_empty());
    }
}
