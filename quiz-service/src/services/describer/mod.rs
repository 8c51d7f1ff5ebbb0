//! Generative descriptions of card images.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiDescriber;

/// Error type for description requests.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Model returned no description")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for vision models that describe an image under a text prompt.
#[async_trait]
pub trait CardDescriber: Send + Sync {
    /// Send `prompt` together with a reference to the image at `image_url`
    /// and return the first generated answer.
    async fn describe(&self, prompt: &str, image_url: &str) -> Result<String, GenerationError>;
}
