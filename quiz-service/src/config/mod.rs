use secrecy::Secret;
use serde::Serialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Output cap for generated descriptions.
const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub scryfall: ScryfallConfig,
    pub http: HttpConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Vision-capable chat model (e.g., gpt-4o)
    pub model: String,
    pub max_tokens: u32,
    pub image_detail: ImageDetail,
}

#[derive(Debug, Clone)]
pub struct ScryfallConfig {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Transport timeout applied to each call to a remote API.
    pub outbound_timeout: Duration,
    /// Deadline for serving one inbound request end to end.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// Resolution hint sent along with the card image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    #[default]
    Auto,
    Low,
    High,
}

impl ImageDetail {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageDetail::Auto => "auto",
            ImageDetail::Low => "low",
            ImageDetail::High => "high",
        }
    }
}

impl fmt::Display for ImageDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageDetail {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ImageDetail::Auto),
            "low" => Ok(ImageDetail::Low),
            "high" => Ok(ImageDetail::High),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown image detail '{}', expected auto, low or high",
                other
            ))),
        }
    }
}

impl QuizConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service section from any key lookup. `load` uses the
    /// process environment.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").as_deref() == Some("prod");
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        Ok(QuizConfig {
            common,
            openai: OpenAiConfig {
                api_key: Secret::new(get("OPENAI_API", None)?),
                base_url: trim_base_url(get("OPENAI_BASE_URL", Some("https://api.openai.com/v1"))?),
                model: get("OPENAI_MODEL", Some("gpt-4o"))?,
                max_tokens: parse_value(
                    "QUIZ_MAX_TOKENS",
                    &get("QUIZ_MAX_TOKENS", Some(&DEFAULT_MAX_TOKENS.to_string()))?,
                )?,
                image_detail: get("QUIZ_IMAGE_DETAIL", Some("auto"))?.parse()?,
            },
            scryfall: ScryfallConfig {
                base_url: trim_base_url(get("SCRYFALL_BASE_URL", Some("https://api.scryfall.com"))?),
            },
            http: HttpConfig {
                outbound_timeout: Duration::from_secs(parse_value(
                    "OUTBOUND_TIMEOUT_SECS",
                    &get(
                        "OUTBOUND_TIMEOUT_SECS",
                        Some(&DEFAULT_OUTBOUND_TIMEOUT_SECS.to_string()),
                    )?,
                )?),
                request_timeout: Duration::from_secs(parse_value(
                    "REQUEST_TIMEOUT_SECS",
                    &get(
                        "REQUEST_TIMEOUT_SECS",
                        Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                    )?,
                )?),
            },
            observability: ObservabilityConfig {
                log_level: get("LOG_LEVEL", Some("info"))?,
                otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            },
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
