//! Notion adapter for blockdown.
//!
//! Provides a [`BlockSource`](blockdown::BlockSource) over the Notion REST API,
//! a [`Materializer`](blockdown::Materializer) that downloads pre-signed file
//! URLs, and the configuration used by the `blockdown` binary.

mod client;
mod config;
mod download;
mod parser;

pub use client::NotionClient;
pub use config::{ApiSettings, CollisionSetting, Config, ExportConfig, Overrides, Settings};
pub use download::HttpMaterializer;

use std::path::PathBuf;

/// Error type for configuration loading and resolution
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No root page given (use --root or NOTION_ROOT_PAGE_ID)")]
    MissingRootPage,

    #[error("No API token given (use --token or NOTION_TOKEN)")]
    MissingToken,

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
