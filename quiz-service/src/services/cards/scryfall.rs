//! Scryfall card database client.
//!
//! Uses the `cards/named` endpoint with `exact=` so only a card whose name
//! matches exactly is returned. Nothing is cached.

use super::{CardLookup, CardRecord, ImageUris, LookupError};
use crate::config::ScryfallConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Scryfall asks API clients to identify themselves.
const USER_AGENT: &str = concat!("quiz-service/", env!("CARGO_PKG_VERSION"));

/// Scryfall card lookup client.
#[derive(Clone)]
pub struct ScryfallClient {
    client: Client,
    config: ScryfallConfig,
}

impl ScryfallClient {
    pub fn new(config: ScryfallConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    fn named_url(&self) -> String {
        format!("{}/cards/named", self.config.base_url)
    }
}

#[async_trait]
impl CardLookup for ScryfallClient {
    async fn lookup(&self, name: &str) -> Result<CardRecord, LookupError> {
        let url = self.named_url();

        tracing::debug!(card = %name, "Looking up card on Scryfall");

        let response = self
            .client
            .traced_get(&url)
            .query(&[("order", "released"), ("dir", "asc"), ("exact", name)])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| LookupError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                let details = serde_json::from_slice::<ScryfallError>(&body)
                    .map(|e| e.details)
                    .unwrap_or_else(|_| name.to_string());
                return Err(LookupError::NotFound(details));
            }

            return Err(LookupError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let card: ScryfallCard = serde_json::from_slice(&body)
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        card.into_record()
    }
}

// ============================================================================
// Scryfall API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ScryfallCard {
    name: String,
    #[serde(default)]
    image_uris: Option<ImageUris>,
    #[serde(default)]
    card_faces: Vec<CardFace>,
}

/// One face of a double-faced or split card.
#[derive(Debug, Deserialize)]
struct CardFace {
    #[serde(default)]
    image_uris: Option<ImageUris>,
}

#[derive(Debug, Deserialize)]
struct ScryfallError {
    details: String,
}

impl ScryfallCard {
    fn into_record(self) -> Result<CardRecord, LookupError> {
        // Transforming cards carry their images per face.
        let image_uris = self
            .image_uris
            .or_else(|| {
                self.card_faces
                    .iter()
                    .find_map(|face| face.image_uris.clone())
            })
            .unwrap_or_default();

        let large_image_url = image_uris
            .large
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| LookupError::MissingImage(self.name.clone()))?;

        Ok(CardRecord {
            name: self.name,
            large_image_url,
            image_uris,
        })
    }
}
