//! Configuration types for camb-sdk

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "CAMB_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "CAMB_BASE_URL";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://client.camb.ai/apis";

/// Environment variable holding the Baseten API key
pub const BASETEN_API_KEY_ENV: &str = "BASETEN_API_KEY";

/// Environment variable holding the Baseten MARS Pro deployment URL
pub const BASETEN_URL_ENV: &str = "BASETEN_URL";

/// Backend that serves text-to-speech requests
///
/// Every other endpoint always goes to the Camb.ai API. Reference-audio
/// synthesis ([`TtsRequest::from_reference_audio`](crate::TtsRequest::from_reference_audio))
/// is only served by a Baseten deployment.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TtsProvider {
    /// The Camb.ai `tts-stream` endpoint, authenticated with the client's API key
    #[default]
    Camb,
    /// A self-hosted MARS Pro model on Baseten
    Baseten {
        /// Baseten API key, sent as `Authorization: Api-Key <key>`
        api_key: String,
        /// Full URL of the deployment's predict endpoint
        mars_pro_url: String,
    },
}

impl std::fmt::Debug for TtsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsProvider::Camb => f.write_str("Camb"),
            TtsProvider::Baseten { mars_pro_url, .. } => f
                .debug_struct("Baseten")
                .field("api_key", &"<redacted>")
                .field("mars_pro_url", mars_pro_url)
                .finish(),
        }
    }
}

/// Polling behavior for long-running tasks
///
/// Timeout is expressed as an attempt budget, not a wall-clock deadline. With
/// the defaults a task is given roughly a minute (30 checks, 2 seconds apart).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of status checks before giving up (default: 30)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between status checks (default: 2 seconds)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval: default_poll_interval(),
        }
    }
}

impl PollConfig {
    /// Budget suited to dubbing jobs, which run considerably longer
    /// (60 checks, 5 seconds apart)
    pub fn dubbing() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

/// Main configuration for [`CambClient`](crate::CambClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as the `x-api-key` header
    #[serde(default)]
    pub api_key: String,

    /// Base URL all endpoint paths are joined onto (default: [`DEFAULT_BASE_URL`])
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 60 seconds)
    ///
    /// Applies to whole requests, including streamed bodies, so long audio
    /// downloads may need a larger value.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Polling behavior for text-to-audio tasks
    #[serde(default)]
    pub poll: PollConfig,

    /// Polling behavior for dubbing tasks (default: [`PollConfig::dubbing`])
    #[serde(default = "PollConfig::dubbing")]
    pub dubbing_poll: PollConfig,

    /// Backend for text-to-speech (default: [`TtsProvider::Camb`])
    #[serde(default)]
    pub tts_provider: TtsProvider,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            poll: PollConfig::default(),
            dubbing_poll: PollConfig::dubbing(),
            tts_provider: TtsProvider::default(),
        }
    }
}

// Keep the key out of logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("poll", &self.poll)
            .field("dubbing_poll", &self.dubbing_poll)
            .field("tts_provider", &self.tts_provider)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config with the given API key and defaults for everything else
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Config that sends text-to-speech to a Baseten deployment
    ///
    /// The Camb.ai API key stays empty; set [`ClientConfig::api_key`] as well
    /// to use the other endpoints from the same client.
    pub fn baseten(api_key: impl Into<String>, mars_pro_url: impl Into<String>) -> Self {
        Self {
            tts_provider: TtsProvider::Baseten {
                api_key: api_key.into(),
                mars_pro_url: mars_pro_url.into(),
            },
            ..Default::default()
        }
    }

    /// Build a Baseten config from `BASETEN_API_KEY` and `BASETEN_URL`
    ///
    /// `CAMB_API_KEY` is picked up too when set.
    pub fn baseten_from_env() -> Result<Self> {
        let api_key = std::env::var(BASETEN_API_KEY_ENV).map_err(|_| {
            Error::config(format!("{BASETEN_API_KEY_ENV} is not set"), "tts_provider.api_key")
        })?;
        let url = std::env::var(BASETEN_URL_ENV).map_err(|_| {
            Error::config(format!("{BASETEN_URL_ENV} is not set"), "tts_provider.mars_pro_url")
        })?;

        let mut config = Self::baseten(api_key, url);
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.api_key = key;
        }
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `CAMB_API_KEY` and the optional `CAMB_BASE_URL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::config(format!("{API_KEY_ENV} is not set"), "api_key"))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can produce a working client
    ///
    /// The Camb.ai key may only be empty when text-to-speech goes to Baseten.
    pub fn validate(&self) -> Result<()> {
        match &self.tts_provider {
            TtsProvider::Camb => {
                if self.api_key.trim().is_empty() {
                    return Err(Error::config("API key must not be empty", "api_key"));
                }
            }
            TtsProvider::Baseten {
                api_key,
                mars_pro_url,
            } => {
                if api_key.trim().is_empty() {
                    return Err(Error::config(
                        "Baseten API key must not be empty",
                        "tts_provider.api_key",
                    ));
                }
                check_http_url(mars_pro_url, "tts_provider.mars_pro_url")?;
            }
        }

        check_http_url(&self.base_url, "base_url")?;

        if self.request_timeout.is_zero() {
            return Err(Error::config(
                "request timeout must be greater than zero",
                "request_timeout",
            ));
        }

        Ok(())
    }

    /// Join an endpoint path onto the base URL
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn check_http_url(value: &str, key: &str) -> Result<()> {
    let url = url::Url::parse(value).map_err(|e| Error::config(format!("invalid URL: {e}"), key))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(
            format!("URL must be http or https, got {}", url.scheme()),
            key,
        ));
    }
    Ok(())
}

fn default_max_attempts() -> u32 {
    30
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    concat!("camb-sdk/", env!("CARGO_PKG_VERSION")).to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_text_to_audio_budget() {
        let poll = PollConfig::default();
        assert_eq!(poll.max_attempts, 30);
        assert_eq!(poll.interval, Duration::from_secs(2));

        let dub = PollConfig::dubbing();
        assert_eq!(dub.max_attempts, 60);
        assert_eq!(dub.interval, Duration::from_secs(5));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"api_key": "k", "poll": {"interval": 0.5}}"#,
        )
        .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.poll.interval, Duration::from_millis(500));
        assert_eq!(config.dubbing_poll, PollConfig::dubbing());
    }

    #[test]
    fn negative_durations_are_rejected() {
        let result: std::result::Result<PollConfig, _> =
            serde_json::from_str(r#"{"interval": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let err = ClientConfig::default().validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("api_key")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = ClientConfig::new("k");
        config.base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "base_url"));

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn baseten_config_needs_its_own_key_and_url() {
        let config = ClientConfig::baseten("bt-key", "https://model-abc.api.baseten.co/predict");
        assert!(config.api_key.is_empty());
        config.validate().unwrap();

        let err = ClientConfig::baseten("", "https://model-abc.api.baseten.co/predict")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "tts_provider.api_key"));

        let err = ClientConfig::baseten("bt-key", "model-abc")
            .validate()
            .unwrap_err();
        assert!(
            matches!(err, Error::Config { key: Some(ref k), .. } if k == "tts_provider.mars_pro_url")
        );
    }

    #[test]
    fn provider_deserializes_from_tagged_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"api_key": "k", "tts_provider": {"kind": "baseten", "api_key": "b", "mars_pro_url": "http://localhost/predict"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.tts_provider,
            TtsProvider::Baseten {
                api_key: "b".to_string(),
                mars_pro_url: "http://localhost/predict".to_string(),
            }
        );

        let config: ClientConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.tts_provider, TtsProvider::Camb);
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let mut config = ClientConfig::new("k");
        config.base_url = "http://localhost:1234/apis/".to_string();
        assert_eq!(
            config.endpoint("/tts-stream"),
            "http://localhost:1234/apis/tts-stream"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut config = ClientConfig::new("super-secret");
        config.tts_provider = TtsProvider::Baseten {
            api_key: "baseten-secret".to_string(),
            mars_pro_url: "https://model.example/predict".to_string(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("baseten-secret"));
        assert!(rendered.contains("https://model.example/predict"));
        assert!(rendered.contains("<redacted>"));
    }
}
