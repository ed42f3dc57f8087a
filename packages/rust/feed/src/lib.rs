//! Channel Atom feed parsing.
//!
//! `https://www.youtube.com/feeds/videos.xml?channel_id=UC...` serves an Atom
//! document extended with the `yt:` and `media:` namespaces. We read the
//! channel summary from the root and up to `max_entries` `<entry>` elements.

mod entry;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::{debug, info, instrument};
use ytextract_shared::{ChannelFeed, ChannelId, ExtractError, FeedOptions, Result, YOUTUBE_ORIGIN};

use entry::EntryFields;

const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";
const YT_NS: &[u8] = b"http://www.youtube.com/xml/schemas/2015";
const MEDIA_NS: &[u8] = b"http://search.yahoo.com/mrss/";

/// Feed URL for a channel.
pub fn feed_url(channel_id: &ChannelId) -> String {
    format!("{YOUTUBE_ORIGIN}/feeds/videos.xml?channel_id={channel_id}")
}

// ---------------------------------------------------------------------------
// Element tags
// ---------------------------------------------------------------------------

/// The elements we care about, resolved by namespace + local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Feed,
    Entry,
    Title,
    Link,
    Author,
    Name,
    Uri,
    Published,
    Updated,
    VideoId,
    Group,
    Description,
    Thumbnail,
    Community,
    Statistics,
    Other,
}

impl Tag {
    fn resolve(ns: &ResolveResult<'_>, local: &[u8]) -> Self {
        let ns = match ns {
            ResolveResult::Bound(Namespace(ns)) => *ns,
            _ => return Self::Other,
        };

        match (ns, local) {
            (ATOM_NS, b"feed") => Self::Feed,
            (ATOM_NS, b"entry") => Self::Entry,
            (ATOM_NS, b"title") => Self::Title,
            (ATOM_NS, b"link") => Self::Link,
            (ATOM_NS, b"author") => Self::Author,
            (ATOM_NS, b"name") => Self::Name,
            (ATOM_NS, b"uri") => Self::Uri,
            (ATOM_NS, b"published") => Self::Published,
            (ATOM_NS, b"updated") => Self::Updated,
            (YT_NS, b"videoId") => Self::VideoId,
            (MEDIA_NS, b"group") => Self::Group,
            (MEDIA_NS, b"description") => Self::Description,
            (MEDIA_NS, b"thumbnail") => Self::Thumbnail,
            (MEDIA_NS, b"community") => Self::Community,
            (MEDIA_NS, b"statistics") => Self::Statistics,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Parser state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ChannelFields {
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    published: Option<String>,
}

/// Streaming state: the open-element path plus whatever is being collected.
#[derive(Debug, Default)]
struct FeedState {
    path: Vec<Tag>,
    text: String,
    channel: ChannelFields,
    entry: Option<EntryFields>,
    entries: Vec<EntryFields>,
    entries_seen: usize,
}

impl FeedState {
    /// Handle the attributes of a start or empty element at the current path.
    fn on_element(&mut self, tag: Tag, element: &BytesStart<'_>) -> Result<()> {
        use Tag::*;

        match (self.path.as_slice(), tag) {
            ([Feed], Link) if attr(element, b"rel")?.as_deref() == Some("alternate") => {
                self.channel.url = attr(element, b"href")?;
            }
            ([Feed, Entry], Link) if attr(element, b"rel")?.as_deref() == Some("alternate") => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.url = attr(element, b"href")?;
                }
            }
            ([Feed, Entry, Group], Thumbnail) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.thumbnail = attr(element, b"url")?;
                }
            }
            ([Feed, Entry, Group, Community], Statistics) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.views = attr(element, b"views")?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Assign collected text when an element closes. `path` still includes it.
    fn on_close(&mut self) {
        use Tag::*;

        let text = std::mem::take(&mut self.text).trim().to_string();
        let value = (!text.is_empty()).then_some(text);

        let channel = &mut self.channel;
        match self.path.as_slice() {
            [Feed, Title] => channel.title = value,
            [Feed, Author, Name] => channel.author = value,
            [Feed, Published] => channel.published = value,
            [Feed, Entry, rest @ ..] => {
                let Some(entry) = self.entry.as_mut() else {
                    return;
                };
                match rest {
                    [VideoId] => entry.video_id = value,
                    [Title] => entry.title = value,
                    [Published] => entry.published = value,
                    [Updated] => entry.updated = value,
                    [Author, Name] => entry.author = value,
                    [Author, Uri] => entry.author_url = value,
                    [Group, Description] => entry.description = value,
                    [] => {
                        if let Some(done) = self.entry.take() {
                            self.entries.push(done);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

/// Read an attribute by (unprefixed) local name, unescaped.
fn attr(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|e| ExtractError::parse(format!("malformed feed attribute: {e}")))?;
        if attribute.key.local_name().as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(|e| ExtractError::parse(format!("malformed feed attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a channel's Atom feed, keeping at most `opts.max_entries` entries.
///
/// Entries beyond the limit are skipped without being parsed. An entry with
/// no video id or title, or with a non-numeric view count, is dropped; the
/// rest of the feed still parses. A document that is not well-formed XML or
/// not an Atom feed fails as a whole.
#[instrument(skip_all, fields(channel_id = %channel_id, len = xml.len(), max_entries = opts.max_entries))]
pub fn parse_feed(channel_id: &ChannelId, xml: &str, opts: &FeedOptions) -> Result<ChannelFeed> {
    let mut reader = NsReader::from_str(xml);
    let mut state = FeedState::default();
    let mut saw_feed = false;

    loop {
        let (resolved, event) = match reader.read_resolved_event() {
            Ok(pair) => pair,
            Err(e) => return Err(ExtractError::parse(format!("feed XML is malformed: {e}"))),
        };

        match event {
            Event::Start(element) => {
                let tag = Tag::resolve(&resolved, element.local_name().as_ref());

                if state.path.is_empty() {
                    if tag != Tag::Feed {
                        return Err(ExtractError::unrecognized(
                            "document is not an Atom feed (root element is not atom:feed)",
                        ));
                    }
                    saw_feed = true;
                }

                if state.path == [Tag::Feed] && tag == Tag::Entry {
                    if state.entries_seen >= opts.max_entries {
                        reader.read_to_end(element.name()).map_err(|e| {
                            ExtractError::parse(format!("feed XML is malformed: {e}"))
                        })?;
                        continue;
                    }
                    state.entries_seen += 1;
                    state.entry = Some(EntryFields::default());
                }

                state.on_element(tag, &element)?;
                state.path.push(tag);
                state.text.clear();
            }
            Event::Empty(element) => {
                let tag = Tag::resolve(&resolved, element.local_name().as_ref());
                if state.path.is_empty() {
                    return Err(ExtractError::unrecognized(
                        "document is not an Atom feed (root element is empty)",
                    ));
                }
                if state.path == [Tag::Feed] && tag == Tag::Entry {
                    // Has no fields, so it can never build; it still uses a slot.
                    if state.entries_seen < opts.max_entries {
                        state.entries_seen += 1;
                        debug!("skipping empty feed entry");
                    }
                    continue;
                }
                state.on_element(tag, &element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ExtractError::parse(format!("malformed feed text: {e}")))?;
                state.text.push_str(&text);
            }
            Event::CData(data) => {
                state.text.push_str(&String::from_utf8_lossy(&data));
            }
            Event::End(_) => {
                state.on_close();
                state.path.pop();
            }
            Event::Eof if state.path.is_empty() => break,
            Event::Eof => {
                return Err(ExtractError::parse("feed XML ended inside an open element"));
            }
            _ => {}
        }
    }

    if !saw_feed {
        return Err(ExtractError::unrecognized("document is empty or has no atom:feed root"));
    }

    let entries_seen = state.entries_seen;
    let videos: Vec<_> = state
        .entries
        .into_iter()
        .filter_map(|fields| match fields.build() {
            Ok(video) => Some(video),
            Err(e) => {
                debug!(error = %e, "skipping feed entry");
                None
            }
        })
        .collect();

    info!(
        entries = entries_seen,
        videos = videos.len(),
        "feed parsed"
    );

    Ok(ChannelFeed {
        channel_url: state.channel.url.unwrap_or_else(|| channel_id.channel_url()),
        channel_id: channel_id.clone(),
        channel_title: state.channel.title,
        channel_author: state.channel.author,
        channel_published: state.channel.published,
        video_count: videos.len(),
        videos,
    })
}
