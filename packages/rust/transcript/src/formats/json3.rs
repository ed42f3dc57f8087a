//! YouTube's `json3` timed-text format.
//!
//! ```json
//! {"events": [{"tStartMs": 1500, "dDurationMs": 2000,
//!              "segs": [{"utf8": "foo "}, {"utf8": "bar"}]}]}
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use ytextract_shared::{ExtractError, Result, TranscriptSegment};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    #[serde(default)]
    t_start_ms: f64,
    #[serde(default)]
    d_duration_ms: f64,
    segs: Option<Vec<Seg>>,
}

#[derive(Debug, Deserialize)]
struct Seg {
    #[serde(default)]
    utf8: String,
}

pub(super) fn parse(content: &str) -> Result<Vec<TranscriptSegment>> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| ExtractError::parse(format!("json3 subtitle is not valid JSON: {e}")))?;

    let Some(events) = document.get("events").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut segments = Vec::new();
    for (index, raw) in events.iter().enumerate() {
        let event = match Event::deserialize(raw) {
            Ok(event) => event,
            Err(e) => {
                debug!(index, error = %e, "skipping malformed json3 event");
                continue;
            }
        };

        // Window/style events carry no `segs` at all.
        let Some(segs) = event.segs else {
            continue;
        };

        let text: String = segs
            .iter()
            .map(|seg| seg.utf8.as_str())
            .filter(|piece| !piece.trim().is_empty())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        segments.push(super::segment(
            event.t_start_ms / 1000.0,
            event.d_duration_ms / 1000.0,
            text.to_string(),
        ));
    }

    Ok(segments)
}
