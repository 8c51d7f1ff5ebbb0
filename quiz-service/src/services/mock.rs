//! In-memory collaborators for tests.
//!
//! Both mocks count their calls and remember what they were asked, so
//! tests can assert which remote calls a route would have made.

use super::cards::{CardLookup, CardRecord, ImageUris, LookupError};
use super::describer::{CardDescriber, GenerationError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Build a record whose image URLs are derived from `name`.
pub fn sample_record(name: &str) -> CardRecord {
    let slug = name.to_lowercase().replace(' ', "-");
    let large = format!("https://cards.example.test/large/{}.jpg", slug);

    CardRecord {
        name: name.to_string(),
        large_image_url: large.clone(),
        image_uris: ImageUris {
            small: Some(format!("https://cards.example.test/small/{}.jpg", slug)),
            normal: Some(format!("https://cards.example.test/normal/{}.jpg", slug)),
            large: Some(large),
            ..ImageUris::default()
        },
    }
}

/// Mock card lookup.
///
/// Returns a fixed record when one is given, otherwise a
/// [`sample_record`] for whatever name was asked.
pub struct MockCardLookup {
    record: Option<CardRecord>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockCardLookup {
    pub fn new() -> Self {
        Self {
            record: None,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_record(record: CardRecord) -> Self {
        Self {
            record: Some(record),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Sleep for `delay` before answering, like a slow card database.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requested(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

impl Default for MockCardLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardLookup for MockCardLookup {
    async fn lookup(&self, name: &str) -> Result<CardRecord, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().await.push(name.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(LookupError::Api {
                status: 503,
                body: "mock lookup failure".to_string(),
            });
        }

        Ok(self
            .record
            .clone()
            .unwrap_or_else(|| sample_record(name)))
    }
}

/// Mock describer that echoes a fixed answer and records every prompt.
pub struct MockDescriber {
    answer: String,
    fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockDescriber {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            fail: false,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(prompt, image_url)` pairs in call order.
    pub async fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl CardDescriber for MockDescriber {
    async fn describe(&self, prompt: &str, image_url: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .await
            .push((prompt.to_string(), image_url.to_string()));

        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(self.answer.clone())
    }
}
