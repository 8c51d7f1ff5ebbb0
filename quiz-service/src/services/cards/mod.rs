//! Card database lookups.
//!
//! [`CardLookup`] turns a card name into a [`CardRecord`]; the production
//! implementation talks to Scryfall.

pub mod scryfall;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use scryfall::ScryfallClient;

/// Error type for card lookups.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Card not found: {0}")]
    NotFound(String),

    #[error("Card database error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Card database returned malformed data: {0}")]
    Malformed(String),

    #[error("Card '{0}' has no large image")]
    MissingImage(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Image URLs of one card at each resolution Scryfall renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub art_crop: Option<String>,
    #[serde(default)]
    pub border_crop: Option<String>,
}

/// A looked-up card. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Canonical name as printed.
    pub name: String,
    /// URL of the highest-resolution rendering, the one the quiz shows.
    pub large_image_url: String,
    pub image_uris: ImageUris,
}

/// Trait for card database backends.
#[async_trait]
pub trait CardLookup: Send + Sync {
    /// Exact-name lookup; one remote round trip per call.
    async fn lookup(&self, name: &str) -> Result<CardRecord, LookupError>;
}
