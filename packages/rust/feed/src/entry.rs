//! Per-entry field collection and validation.

use ytextract_shared::{ExtractError, FeedVideoEntry, Result, watch_url};

/// Raw values collected from one `<entry>` before validation.
#[derive(Debug, Default)]
pub(crate) struct EntryFields {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub views: Option<String>,
}

impl EntryFields {
    /// Validate into a [`FeedVideoEntry`].
    ///
    /// Requires a video id and a non-empty title. A non-empty views attribute
    /// must be a non-negative integer; an empty one means unknown.
    pub(crate) fn build(self) -> Result<FeedVideoEntry> {
        let video_id = self
            .video_id
            .ok_or_else(|| ExtractError::validation("feed entry has no yt:videoId"))?;
        let title = self.title.ok_or_else(|| {
            ExtractError::validation(format!("feed entry {video_id} has no title"))
        })?;

        let views = self
            .views
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    ExtractError::validation(format!(
                        "feed entry {video_id} has non-numeric views {raw:?}"
                    ))
                })
            })
            .transpose()?;

        let url = self
            .url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| watch_url(&video_id));

        Ok(FeedVideoEntry {
            url,
            published: self.published,
            updated: self.updated,
            author: self.author,
            author_url: self.author_url,
            description: self.description,
            thumbnail: self.thumbnail,
            views,
            title,
            video_id,
        })
    }
}
