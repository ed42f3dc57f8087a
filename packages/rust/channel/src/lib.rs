//! Channel id (UCID) resolution from already-fetched channel pages.
//!
//! Channel pages reached through `/@handle`, `/c/name` or `/user/name` URLs do
//! not carry the id in the URL. The id is recovered from the page markup by a
//! list of strategies tried in priority order:
//!
//! 1. a `/channel/UC...` link anywhere in the text
//! 2. the embedded `ytInitialData` (or `ytInitialPlayerResponse`) JSON, first
//!    through known-good paths, then by majority vote over every `channelId`
//! 3. the `<link rel="canonical">` tag

mod locator;
mod path;
mod scan;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;
use ytextract_shared::{ChannelId, ExtractError, Result};

pub use locator::extract_json_object;
pub use path::{Path, PathSegment, get_path, get_str_path};

use self::path::PathSegment::{Index, Key};

/// Markers preceding the embedded page state, tried in order.
pub const JSON_MARKERS: [&str; 2] = ["ytInitialData", "ytInitialPlayerResponse"];

/// Paths that hold the page owner's id directly when present.
const PRIORITY_PATHS: [&Path<'static>; 3] = [
    &[Key("header"), Key("c4TabbedHeaderRenderer"), Key("channelId")],
    &[Key("metadata"), Key("channelMetadataRenderer"), Key("externalId")],
    &[
        Key("header"),
        Key("pageHeaderRenderer"),
        Key("content"),
        Key("pageHeaderViewModel"),
        Key("actions"),
        Key("flexibleActionsViewModel"),
        Key("actionsRows"),
        Index(0),
        Key("actions"),
        Index(0),
        Key("buttonViewModel"),
        Key("onTap"),
        Key("innertubeCommand"),
        Key("browseEndpoint"),
        Key("browseId"),
    ],
];

static CHANNEL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/channel/(UC[A-Za-z0-9_-]{22})").expect("channel url regex")
});

static CANONICAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link[^>]+rel="canonical"[^>]+href="https://[^"/]+/channel/([^"]+)""#)
        .expect("canonical link regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which strategy produced the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedVia {
    UrlPattern,
    PriorityPath,
    MajorityVote,
    CanonicalLink,
}

/// A resolved channel id plus its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelLookup {
    pub channel_id: ChannelId,
    pub channel_url: String,
    pub resolved_via: ResolvedVia,
}

impl ChannelLookup {
    fn new(channel_id: ChannelId, resolved_via: ResolvedVia) -> Self {
        Self {
            channel_url: channel_id.channel_url(),
            channel_id,
            resolved_via,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// One way of recovering the id from page text.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    UrlPattern,
    EmbeddedJson,
    CanonicalLink,
}

impl Strategy {
    const ORDER: [Strategy; 3] = [Self::UrlPattern, Self::EmbeddedJson, Self::CanonicalLink];

    fn attempt(self, html: &str) -> Option<ChannelLookup> {
        match self {
            Self::UrlPattern => channel_id_from_url(html)
                .map(|id| ChannelLookup::new(id, ResolvedVia::UrlPattern)),
            Self::EmbeddedJson => from_embedded_json(html),
            Self::CanonicalLink => from_canonical_link(html)
                .map(|id| ChannelLookup::new(id, ResolvedVia::CanonicalLink)),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve the channel id from raw channel-page HTML.
///
/// Fails with [`ExtractError::Unrecognized`] when the text carries none of the
/// page-state markers (the page was blocked, or is not a channel page), and
/// with [`ExtractError::NotFound`] when it looks like a channel page but no
/// strategy produced an id.
#[instrument(skip_all, fields(len = html.len()))]
pub fn resolve_channel_id(html: &str) -> Result<ChannelLookup> {
    for strategy in Strategy::ORDER {
        if let Some(lookup) = strategy.attempt(html) {
            info!(
                channel_id = %lookup.channel_id,
                via = ?lookup.resolved_via,
                "channel id resolved"
            );
            return Ok(lookup);
        }
        debug!(?strategy, "strategy produced no channel id");
    }

    if JSON_MARKERS.iter().any(|marker| html.contains(marker)) {
        Err(ExtractError::not_found(
            "channel id not found in page source; make sure the URL is a valid YouTube channel page",
        ))
    } else {
        Err(ExtractError::unrecognized(
            "page did not look like a channel page; it may be blocked or the URL is invalid",
        ))
    }
}

/// Return the id when the text already contains a `/channel/UC...` path.
pub fn channel_id_from_url(text: &str) -> Option<ChannelId> {
    CHANNEL_URL_RE
        .captures(text)
        .and_then(|caps| ChannelId::parse(&caps[1]).ok())
}

/// Normalize `input` and resolve it without a page fetch when it already
/// names the channel. `Ok(None)` means the page must be fetched and passed
/// to [`resolve_channel_id`].
pub fn resolve_from_url(input: &str) -> Result<Option<ChannelLookup>> {
    let url = normalize_channel_url(input)?;
    Ok(channel_id_from_url(&url).map(|id| ChannelLookup::new(id, ResolvedVia::UrlPattern)))
}

/// Normalize a user-supplied channel URL.
///
/// Trims whitespace, percent-decodes (automation tools often pass the URL
/// encoded) and prepends `https://` when no scheme is given.
pub fn normalize_channel_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::validation("channel URL is required"));
    }

    let decoded = urlencoding::decode(trimmed)
        .map_err(|e| ExtractError::validation(format!("channel URL is not valid UTF-8: {e}")))?;

    let candidate = if decoded.starts_with("http://") || decoded.starts_with("https://") {
        decoded.into_owned()
    } else {
        format!("https://{decoded}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| ExtractError::validation(format!("invalid channel URL {candidate:?}: {e}")))?;
    if parsed.host_str().is_none() {
        return Err(ExtractError::validation(format!(
            "channel URL has no host: {candidate}"
        )));
    }

    debug!(input = %trimmed, normalized = %candidate, "normalized channel URL");
    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Strategy implementations
// ---------------------------------------------------------------------------

/// Locate, parse, then query the embedded page state.
fn from_embedded_json(html: &str) -> Option<ChannelLookup> {
    let (marker, json_text) = JSON_MARKERS
        .iter()
        .find_map(|marker| extract_json_object(html, marker).map(|text| (*marker, text)))?;

    let data = match parse_page_state(json_text) {
        Ok(data) => data,
        Err(e) => {
            debug!(marker, error = %e, "embedded page state is not valid JSON");
            return None;
        }
    };

    if let Some(id) = from_priority_paths(&data) {
        return Some(ChannelLookup::new(id, ResolvedVia::PriorityPath));
    }

    scan::majority_channel_id(&data).map(|id| ChannelLookup::new(id, ResolvedVia::MajorityVote))
}

/// Parse located page state without serde_json's nesting limit. The stack
/// grows on the heap as needed instead.
fn parse_page_state(json_text: &str) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

fn from_priority_paths(data: &Value) -> Option<ChannelId> {
    PRIORITY_PATHS
        .iter()
        .filter_map(|path| get_str_path(data, path))
        .find_map(|candidate| ChannelId::parse(candidate).ok())
}

fn from_canonical_link(html: &str) -> Option<ChannelId> {
    let caps = CANONICAL_LINK_RE.captures(html)?;
    ChannelId::parse(&caps[1]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const X: &str = "UCXXXXXXXXXXXXXXXXXXXXXX";
    const Y: &str = "UCYYYYYYYYYYYYYYYYYYYYYY";
    const REAL: &str = "UCuAXFkgsw1L7xaCfnd5JJOw";

    fn page_with(data: &Value) -> String {
        format!(
            "<html><head><title>Channel</title></head><body>\
             <script>var ytInitialData = {data};</script></body></html>"
        )
    }

    #[test]
    fn url_pattern_is_tried_first() {
        let html = format!(
            r#"<a href="/channel/{X}">x</a><script>var ytInitialData = {{"header":{{"c4TabbedHeaderRenderer":{{"channelId":"{Y}"}}}}}};</script>"#
        );
        let lookup = resolve_channel_id(&html).unwrap();
        assert_eq!(lookup.channel_id.as_str(), X);
        assert_eq!(lookup.resolved_via, ResolvedVia::UrlPattern);
    }

    #[test]
    fn priority_path_beats_majority() {
        let data = json!({
            "header": { "c4TabbedHeaderRenderer": { "channelId": X } },
            "contents": [ { "channelId": Y }, { "channelId": Y }, { "channelId": Y } ]
        });
        let lookup = resolve_channel_id(&page_with(&data)).unwrap();
        assert_eq!(lookup.channel_id.as_str(), X);
        assert_eq!(lookup.resolved_via, ResolvedVia::PriorityPath);
        assert_eq!(lookup.channel_url, format!("https://www.youtube.com/channel/{X}"));
    }

    #[test]
    fn majority_vote_when_priority_path_absent() {
        let data = json!({
            "header": { "someOtherRenderer": { "channelId": X } },
            "contents": [ { "channelId": Y }, { "channelId": Y }, { "channelId": Y } ]
        });
        let lookup = resolve_channel_id(&page_with(&data)).unwrap();
        assert_eq!(lookup.channel_id.as_str(), Y);
        assert_eq!(lookup.resolved_via, ResolvedVia::MajorityVote);
    }

    #[test]
    fn deeply_nested_page_state_still_parses() {
        let depth = 1_000;
        let deep = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let html = format!(
            r#"<script>var ytInitialData = {{"header":{{"c4TabbedHeaderRenderer":{{"channelId":"{REAL}"}}}},"contents":{deep}}};</script>"#
        );
        let lookup = resolve_channel_id(&html).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::PriorityPath);
    }

    #[test]
    fn metadata_external_id_path() {
        let data = json!({
            "metadata": { "channelMetadataRenderer": { "externalId": REAL } }
        });
        let lookup = resolve_channel_id(&page_with(&data)).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::PriorityPath);
    }

    #[test]
    fn page_header_browse_endpoint_path() {
        let data = json!({
            "header": { "pageHeaderRenderer": { "content": { "pageHeaderViewModel": {
                "actions": { "flexibleActionsViewModel": { "actionsRows": [
                    { "actions": [ { "buttonViewModel": { "onTap": { "innertubeCommand": {
                        "browseEndpoint": { "browseId": REAL }
                    } } } } ] }
                ] } }
            } } } }
        });
        let lookup = resolve_channel_id(&page_with(&data)).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::PriorityPath);
    }

    #[test]
    fn invalid_priority_value_falls_through() {
        let data = json!({
            "header": { "c4TabbedHeaderRenderer": { "channelId": "bogus" } },
            "metadata": { "channelMetadataRenderer": { "externalId": REAL } }
        });
        let lookup = resolve_channel_id(&page_with(&data)).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
    }

    #[test]
    fn player_response_marker_is_second_choice() {
        let html = format!(
            r#"<script>var ytInitialPlayerResponse = {{"videoDetails":{{"channelId":"{REAL}"}}}};</script>"#
        );
        let lookup = resolve_channel_id(&html).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::MajorityVote);
    }

    #[test]
    fn malformed_json_still_resolves_from_markup() {
        let html = format!(
            r#"<link rel="canonical" href="https://www.youtube.com/channel/{REAL}">
               <script>var ytInitialData = {{"header": tru}};</script>"#
        );
        let lookup = resolve_channel_id(&html).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
    }

    #[test]
    fn canonical_link_pattern() {
        let html = format!(
            r#"<link itemprop="x" rel="canonical" data-a="b" href="https://m.youtube.com/channel/{REAL}">"#
        );
        assert_eq!(from_canonical_link(&html).unwrap().as_str(), REAL);

        let bad = r#"<link rel="canonical" href="https://www.youtube.com/channel/UCshort">"#;
        assert!(from_canonical_link(bad).is_none());
        assert!(from_canonical_link(r#"<link rel="canonical" href="https://www.youtube.com/@h">"#).is_none());
    }

    #[test]
    fn unrecognized_page() {
        let err = resolve_channel_id("<html><body>Before you continue</body></html>").unwrap_err();
        assert!(matches!(err, ExtractError::Unrecognized { .. }), "got {err}");
    }

    #[test]
    fn channel_page_without_id() {
        let data = json!({ "contents": { "text": "no ids here" } });
        let err = resolve_channel_id(&page_with(&data)).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }), "got {err}");
    }

    #[test]
    fn resolves_fixture_page() {
        let html = std::fs::read_to_string("../../../fixtures/html/channel-handle-page.html")
            .expect("read fixture");
        let lookup = resolve_channel_id(&html).unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::PriorityPath);
    }

    #[test]
    fn url_shortcut() {
        let id = channel_id_from_url(&format!("https://www.youtube.com/channel/{REAL}/videos"));
        assert_eq!(id.unwrap().as_str(), REAL);
        assert!(channel_id_from_url("https://www.youtube.com/@somehandle").is_none());
    }

    #[test]
    fn url_resolution_skips_fetch_only_for_channel_urls() {
        let lookup = resolve_from_url(&format!("www.youtube.com%2Fchannel%2F{REAL}"))
            .unwrap()
            .unwrap();
        assert_eq!(lookup.channel_id.as_str(), REAL);
        assert_eq!(lookup.resolved_via, ResolvedVia::UrlPattern);
        assert_eq!(lookup.channel_url, format!("https://www.youtube.com/channel/{REAL}"));

        assert_eq!(resolve_from_url("https://www.youtube.com/@somehandle").unwrap(), None);
        assert!(resolve_from_url("   ").is_err());
    }

    #[test]
    fn normalize_decodes_and_adds_scheme() {
        assert_eq!(
            normalize_channel_url("  www.youtube.com/%40somehandle ").unwrap(),
            "https://www.youtube.com/@somehandle"
        );
        assert_eq!(
            normalize_channel_url("https%3A%2F%2Fwww.youtube.com%2Fc%2Fname").unwrap(),
            "https://www.youtube.com/c/name"
        );
        assert_eq!(
            normalize_channel_url("http://youtube.com/user/legacy").unwrap(),
            "http://youtube.com/user/legacy"
        );
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(normalize_channel_url("   ").is_err());
    }
}
