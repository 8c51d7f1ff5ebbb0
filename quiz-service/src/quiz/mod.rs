//! The quiz pipeline: pick a card, look it up, have the model describe it.
//!
//! The five quiz routes share one pipeline and differ only in the
//! [`PromptConfiguration`] they run it with.

use crate::services::{CardRecord, GenerationError, LookupError};
use crate::AppState;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use thiserror::Error;

pub const BASE_PROMPT: &str = "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief.";

/// One quiz variant: the route it is served on and the instruction added
/// after [`BASE_PROMPT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptConfiguration {
    pub path: &'static str,
    pub suffix: Option<&'static str>,
}

impl PromptConfiguration {
    /// `BASE_PROMPT`, the suffix if any, then the card name, space separated.
    pub fn prompt_for(&self, card_name: &str) -> String {
        match self.suffix {
            Some(suffix) => format!("{} {} {}", BASE_PROMPT, suffix, card_name),
            None => format!("{} {}", BASE_PROMPT, card_name),
        }
    }
}

pub static QUIZ_VARIANTS: [PromptConfiguration; 5] = [
    PromptConfiguration {
        path: "/1",
        suffix: None,
    },
    PromptConfiguration {
        path: "/2",
        suffix: Some("Do not mention power / toughness."),
    },
    PromptConfiguration {
        path: "/3",
        suffix: Some("Ignore the artwork."),
    },
    PromptConfiguration {
        path: "/4",
        suffix: Some("Describe only the artwork."),
    },
    PromptConfiguration {
        path: "/5",
        suffix: Some("Describe only the artwork, but rap the answer."),
    },
];

/// Path of the lookup-only diagnostic route.
pub const DIAGNOSTIC_PATH: &str = "/scryfall";

/// Body of every successful quiz and diagnostic response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Url")]
    pub url: String,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("card lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("description failed: {0}")]
    Generation(#[from] GenerationError),
}

impl QuizError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            QuizError::Lookup(_) => "lookup_error",
            QuizError::Generation(_) => "generation_error",
        }
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        AppError::BadGateway(err.to_string())
    }
}

/// Look up `card_name`, logging failures.
async fn lookup(state: &AppState, card_name: &str) -> Result<CardRecord, QuizError> {
    state.card_lookup.lookup(card_name).await.map_err(|e| {
        tracing::error!(card = %card_name, error = %e, "Card lookup failed");
        QuizError::from(e)
    })
}

/// Run the full pipeline for one quiz variant. The prompt names the card
/// as it appears in the catalog.
pub async fn run_quiz(
    state: &AppState,
    variant: &PromptConfiguration,
) -> Result<QuizResponse, QuizError> {
    let card_name = state.catalog.pick_random();
    let prompt = variant.prompt_for(card_name);
    let card = lookup(state, card_name).await?;

    let text = state
        .describer
        .describe(&prompt, &card.large_image_url)
        .await
        .map_err(|e| {
            tracing::error!(card = %card_name, variant = variant.path, error = %e, "Card description failed");
            QuizError::from(e)
        })?;

    tracing::info!(card = %card_name, variant = variant.path, "Quiz question generated");

    Ok(QuizResponse {
        text,
        url: card.large_image_url,
    })
}

/// Pick and look up only: canonical name plus image URL, no model call.
pub async fn run_lookup(state: &AppState) -> Result<QuizResponse, QuizError> {
    let card = lookup(state, state.catalog.pick_random()).await?;

    tracing::info!(card = %card.name, "Card lookup succeeded");

    Ok(QuizResponse {
        text: card.name,
        url: card.large_image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "Mother of Runes";

    #[test]
    fn test_prompt_literals() {
        let prompts: Vec<String> = QUIZ_VARIANTS.iter().map(|v| v.prompt_for(CARD)).collect();

        assert_eq!(
            prompts,
            vec![
                "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief. Mother of Runes",
                "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief. Do not mention power / toughness. Mother of Runes",
                "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief. Ignore the artwork. Mother of Runes",
                "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief. Describe only the artwork. Mother of Runes",
                "Please describe the following magic card to me, without using its name. This is for a quiz, so please be brief. Describe only the artwork, but rap the answer. Mother of Runes",
            ]
        );
    }

    #[test]
    fn test_variant_paths_are_distinct() {
        let paths: Vec<&str> = QUIZ_VARIANTS.iter().map(|v| v.path).collect();
        assert_eq!(paths, ["/1", "/2", "/3", "/4", "/5"]);
    }

    #[test]
    fn test_response_field_names() {
        let body = serde_json::to_value(QuizResponse {
            text: "A tiny cleric.".to_string(),
            url: "https://img/large.jpg".to_string(),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "Text": "A tiny cleric.", "Url": "https://img/large.jpg" })
        );
    }

    #[test]
    fn test_errors_map_to_bad_gateway() {
        let err = AppError::from(QuizError::from(GenerationError::RateLimited));
        assert!(matches!(err, AppError::BadGateway(msg) if msg.contains("Rate limited")));
    }
}
