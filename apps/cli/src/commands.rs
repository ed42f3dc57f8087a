//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use tracing::info;
use ytextract_channel::{resolve_channel_id, resolve_from_url};
use ytextract_feed::{feed_url, parse_feed};
use ytextract_shared::{
    AppConfig, ChannelId, FeedOptions, TranscriptOptions, VideoId, init_config, load_config,
};
use ytextract_transcript::{ParsedSubtitle, SubtitleFormat, parse_subtitle, select_transcript};

use crate::source::DirectorySource;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ytextract: pull text out of YouTube pages, captions, and feeds.
#[derive(Parser)]
#[command(
    name = "ytextract",
    version,
    about = "Extract channel ids, transcripts, and feed entries from already-fetched YouTube documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Resolve a channel id from a channel URL or a saved channel page.
    ChannelId {
        /// Channel URL; resolved directly when it contains /channel/UC...
        #[arg(long)]
        url: Option<String>,

        /// Saved channel page HTML (reads stdin when omitted).
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Decode a caption file, or pick the best one from a download directory.
    Transcript {
        /// Single caption file to decode.
        #[arg(long, conflicts_with = "dir", requires = "format")]
        file: Option<PathBuf>,

        /// Caption format of --file: json3, vtt, or srt.
        #[arg(long)]
        format: Option<String>,

        /// Directory of downloaded caption files.
        #[arg(long, required_unless_present = "file", requires = "video")]
        dir: Option<PathBuf>,

        /// Video URL or id the captions belong to.
        #[arg(long)]
        video: Option<String>,

        /// File name stem of the caption files (defaults to the video id).
        #[arg(long)]
        stem: Option<String>,

        /// Preferred caption language (falls back to English).
        #[arg(long)]
        lang: Option<String>,
    },

    /// Parse a channel's Atom feed.
    Feed {
        /// Channel id (UC...) the feed belongs to.
        #[arg(long)]
        channel: String,

        /// Saved feed XML (reads stdin when omitted).
        #[arg(long)]
        file: Option<PathBuf>,

        /// Maximum number of entries to keep.
        #[arg(long)]
        max: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 5] = [
    "ytextract",
    "ytextract_shared",
    "ytextract_channel",
    "ytextract_transcript",
    "ytextract_feed",
];

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::ChannelId { url, file } => cmd_channel_id(url.as_deref(), file.as_deref()),
        Command::Transcript {
            file,
            format,
            dir,
            video,
            stem,
            lang,
        } => match (file, dir) {
            (Some(file), _) => cmd_transcript_file(&file, format.as_deref()),
            (None, Some(dir)) => cmd_transcript_dir(
                &dir,
                video.as_deref(),
                stem.as_deref(),
                lang.as_deref(),
            ),
            (None, None) => Err(eyre!("either --file or --dir is required")),
        },
        Command::Feed { channel, file, max } => cmd_feed(&channel, file.as_deref(), max),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_channel_id(url: Option<&str>, file: Option<&Path>) -> Result<()> {
    let config = load_config()?;

    if let Some(url) = url {
        if let Some(lookup) = resolve_from_url(url)? {
            return print_json(&lookup, &config);
        }
        info!(url, "URL does not name the channel; resolving from page source");
    }

    let html = read_input(file)?;
    let lookup = resolve_channel_id(&html)?;
    print_json(&lookup, &config)
}

/// Single decoded caption file.
#[derive(Serialize)]
struct DecodedFile {
    format: SubtitleFormat,
    #[serde(flatten)]
    parsed: ParsedSubtitle,
}

fn cmd_transcript_file(file: &Path, format: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let format: SubtitleFormat = format
        .ok_or_else(|| eyre!("--format is required with --file"))?
        .parse()?;

    let content = read_input(Some(file))?;
    let parsed = parse_subtitle(&content, format)?;
    info!(
        file = %file.display(),
        segments = parsed.segments.len(),
        "caption file decoded"
    );

    print_json(&DecodedFile { format, parsed }, &config)
}

fn cmd_transcript_dir(
    dir: &Path,
    video: Option<&str>,
    stem: Option<&str>,
    lang: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let video = video.ok_or_else(|| eyre!("--video is required with --dir"))?;
    let video_id = VideoId::from_url_or_id(video)?;

    let mut opts = TranscriptOptions::from(&config);
    if let Some(lang) = lang {
        opts.language = Some(lang.to_string());
    }

    let source = DirectorySource::new(dir, stem.unwrap_or(video_id.as_str()));
    let transcript = select_transcript(&video_id, &source, &opts)?;
    print_json(&transcript, &config)
}

fn cmd_feed(channel: &str, file: Option<&Path>, max: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let channel_id = ChannelId::parse(channel)?;

    let mut opts = FeedOptions::from(&config);
    if let Some(max) = max {
        if max == 0 {
            return Err(eyre!("--max must be at least 1"));
        }
        opts.max_entries = max;
    }

    info!(channel_id = %channel_id, feed = %feed_url(&channel_id), "parsing channel feed");
    let xml = read_input(file)?;
    let feed = parse_feed(&channel_id, &xml, &opts)?;
    print_json(&feed, &config)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// I/O helpers
// ---------------------------------------------------------------------------

/// Read a whole file, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T, config: &AppConfig) -> Result<()> {
    let rendered = if config.defaults.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
