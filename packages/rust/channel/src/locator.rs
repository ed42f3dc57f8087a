//! Locate a JSON object embedded in arbitrary text.
//!
//! Pages ship their initial state as `var ytInitialData = {...};` inside a
//! `<script>` tag. We find the marker, then walk forward from the first `{`
//! counting braces until the object closes.

/// Scanner state, advanced one character at a time.
#[derive(Debug, Default)]
struct BraceScanner {
    depth: usize,
    in_string: bool,
    escape_pending: bool,
}

impl BraceScanner {
    /// Feed one character. Returns `true` when the outermost object closes.
    fn step(&mut self, ch: char) -> bool {
        if self.escape_pending {
            self.escape_pending = false;
            return false;
        }

        match ch {
            '\\' => self.escape_pending = true,
            '"' => self.in_string = !self.in_string,
            _ if self.in_string => {}
            '{' => self.depth += 1,
            '}' => {
                self.depth = self.depth.saturating_sub(1);
                return self.depth == 0;
            }
            _ => {}
        }
        false
    }
}

/// Return the balanced JSON object that starts at the first `{` after the
/// first occurrence of `marker`.
///
/// Returns `None` when the marker is missing, no `{` follows it, or the
/// object never closes. A partial slice is never returned.
pub fn extract_json_object<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let marker_pos = text.find(marker)?;
    let start = marker_pos + text[marker_pos..].find('{')?;

    let mut scanner = BraceScanner::default();
    for (offset, ch) in text[start..].char_indices() {
        if scanner.step(ch) {
            let end = start + offset + ch.len_utf8();
            return Some(&text[start..end]);
        }
    }

    None
}
