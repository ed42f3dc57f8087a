//! Shared types, error model, and configuration for ytextract.
//!
//! This crate is the foundation depended on by all other ytextract crates.
//! It provides:
//! - [`ExtractError`]: the unified error type
//! - Domain types ([`ChannelId`], [`VideoId`], [`Transcript`], [`ChannelFeed`])
//! - Configuration ([`AppConfig`], [`FeedOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, FeedOptions, TranscriptOptions, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{ExtractError, Result};
pub use types::{
    ChannelFeed, ChannelId, FeedVideoEntry, Transcript, TranscriptSegment, VideoId,
    YOUTUBE_ORIGIN, watch_url,
};
