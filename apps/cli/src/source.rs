//! Caption files saved on disk by a downloader.

use std::path::PathBuf;

use tracing::debug;
use ytextract_transcript::{SubtitleFormat, SubtitleSource};

/// Reads `<dir>/<stem>.<language>.<ext>`, the layout yt-dlp writes with
/// `--write-subs --write-auto-subs -o "<stem>"`.
#[derive(Debug, Clone)]
pub(crate) struct DirectorySource {
    dir: PathBuf,
    stem: String,
}

impl DirectorySource {
    pub(crate) fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    fn path_for(&self, language: &str, format: SubtitleFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{language}.{}", self.stem, format.extension()))
    }
}

impl SubtitleSource for DirectorySource {
    fn fetch(&self, language: &str, format: SubtitleFormat) -> Option<String> {
        let path = self.path_for(language, format);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "caption file unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = "../../fixtures/subtitles";

    #[test]
    fn builds_downloader_file_names() {
        let source = DirectorySource::new("/tmp/subs", "dQw4w9WgXcQ");
        assert_eq!(
            source.path_for("es-orig", SubtitleFormat::Json3),
            PathBuf::from("/tmp/subs/dQw4w9WgXcQ.es-orig.json3")
        );
        assert_eq!(
            source.path_for("en", SubtitleFormat::Srt),
            PathBuf::from("/tmp/subs/dQw4w9WgXcQ.en.srt")
        );
    }

    #[test]
    fn reads_existing_files_only() {
        let source = DirectorySource::new(FIXTURES, "sample");
        assert!(source.fetch("en", SubtitleFormat::Vtt).is_some());
        assert!(source.fetch("de", SubtitleFormat::Vtt).is_none());
    }
}
