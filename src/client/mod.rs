//! HTTP client for the Camb.ai API
//!
//! [`CambClient`] wraps the endpoints used by the speech, voice-cloning,
//! dubbing, and text-to-audio workflows. Streaming responses are handed back
//! as [`ByteSource`]s, and the asynchronous task endpoints are composed with
//! [`PollingTaskRunner`] and [`persist`].
//!
//! # Example
//!
//! ```no_run
//! use camb_sdk::{CambClient, TextToAudioRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> camb_sdk::Result<()> {
//! let client = CambClient::from_env()?;
//! let request = TextToAudioRequest::new("A futuristic sci-fi laser sound effect", 3.0);
//! let bytes = client
//!     .text_to_audio_to_file(&request, "laser.mp3", CancellationToken::new())
//!     .await?;
//! println!("saved {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod requests;

pub use requests::{
    AudioFormat, AudioType, CustomVoice, CustomVoiceRequest, DubbingRequest, Gender,
    InferenceOptions, OutputConfiguration, TextToAudioRequest, TtsRequest, Voice, VoiceSettings,
};

use crate::config::{ClientConfig, PollConfig, TtsProvider};
use crate::error::{Error, Result};
use crate::persist::{ByteSource, persist};
use crate::polling::PollingTaskRunner;
use crate::types::{RunId, TaskCreated, TaskId, TaskKind, TaskStatusResponse};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-api-key";

/// Async client for the Camb.ai API
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct CambClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    tts_route: Arc<TtsRoute>,
}

/// Where [`CambClient::tts`] sends requests
#[derive(Debug)]
struct TtsRoute {
    url: String,
    // Extra auth header for providers other than Camb.ai
    authorization: Option<HeaderValue>,
}

impl TtsRoute {
    fn for_config(config: &ClientConfig) -> Result<Self> {
        match &config.tts_provider {
            TtsProvider::Camb => Ok(Self {
                url: config.endpoint("tts-stream"),
                authorization: None,
            }),
            TtsProvider::Baseten {
                api_key,
                mars_pro_url,
            } => {
                let mut authorization = HeaderValue::from_str(&format!("Api-Key {api_key}"))
                    .map_err(|_| {
                        Error::config(
                            "Baseten API key contains invalid header characters",
                            "tts_provider.api_key",
                        )
                    })?;
                authorization.set_sensitive(true);
                Ok(Self {
                    url: mars_pro_url.clone(),
                    authorization: Some(authorization),
                })
            }
        }
    }
}

impl CambClient {
    /// Create a client from `config`
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the config is invalid and [`Error::Http`]
    /// if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let tts_route = TtsRoute::for_config(&config)?;

        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
                Error::config("API key contains invalid header characters", "api_key")
            })?;
            api_key.set_sensitive(true);
            headers.insert(API_KEY_HEADER, api_key);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            tts_route: Arc::new(tts_route),
        })
    }

    /// Create a client configured from `CAMB_API_KEY` / `CAMB_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Synthesize speech, streaming the audio as it is generated
    ///
    /// Goes to the configured [`TtsProvider`].
    pub async fn tts(&self, request: &TtsRequest) -> Result<ByteSource> {
        debug!(
            voice_id = ?request.voice_id,
            language = %request.language,
            url = %self.tts_route.url,
            "Requesting speech"
        );
        let mut builder = self.http.post(&self.tts_route.url).json(request);
        if let Some(authorization) = &self.tts_route.authorization {
            builder = builder.header(AUTHORIZATION, authorization.clone());
        }
        let response = self.send(builder).await?;
        Ok(ByteSource::from_response(response))
    }

    /// Voices available to the account
    pub async fn list_voices(&self) -> Result<Vec<Voice>> {
        let response = self
            .send(self.http.get(self.config.endpoint("list-voices")))
            .await?;
        Ok(response.json().await?)
    }

    /// Clone a voice from a reference recording
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the reference file cannot be read, before any
    /// request is made.
    pub async fn create_custom_voice(&self, request: CustomVoiceRequest) -> Result<CustomVoice> {
        let audio = tokio::fs::read(&request.file).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to read reference audio '{}': {}",
                    request.file.display(),
                    e
                ),
            ))
        })?;
        let file_name = request
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference.wav")
            .to_string();

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio).file_name(file_name),
            )
            .text("voice_name", request.voice_name)
            .text("gender", request.gender.code().to_string())
            .text("language", request.language.to_string())
            .text("enhance_audio", request.enhance_audio.to_string());
        if let Some(description) = request.description {
            form = form.text("description", description);
        }

        let response = self
            .send(
                self.http
                    .post(self.config.endpoint("create-custom-voice"))
                    .multipart(form),
            )
            .await?;
        let voice: CustomVoice = response.json().await?;
        info!(voice_id = voice.voice_id, "Custom voice created");
        Ok(voice)
    }

    /// Start a text-to-audio task
    pub async fn create_text_to_audio(&self, request: &TextToAudioRequest) -> Result<TaskId> {
        self.create_task(TaskKind::TextToAudio, "text-to-sound", request)
            .await
    }

    /// Current status of a text-to-audio task
    pub async fn text_to_audio_status(&self, task_id: &TaskId) -> Result<TaskStatusResponse> {
        self.task_status(TaskKind::TextToAudio, task_id).await
    }

    /// Stream the audio produced by a finished text-to-audio run
    pub async fn text_to_audio_result(&self, run_id: &RunId) -> Result<ByteSource> {
        let url = self.config.endpoint(&format!(
            "text-to-sound-result/{}",
            urlencoding::encode(run_id.as_str())
        ));
        let response = self.send(self.http.get(url)).await?;
        Ok(ByteSource::from_response(response))
    }

    /// Start an end-to-end dubbing task
    pub async fn create_dubbing(&self, request: &DubbingRequest) -> Result<TaskId> {
        self.create_task(TaskKind::Dubbing, "end-to-end-dubbing", request)
            .await
    }

    /// Current status of a dubbing task
    pub async fn dubbing_status(&self, task_id: &TaskId) -> Result<TaskStatusResponse> {
        self.task_status(TaskKind::Dubbing, task_id).await
    }

    /// Details of a finished dubbing run (output URLs, transcripts)
    pub async fn dubbed_run_info(&self, run_id: &RunId) -> Result<serde_json::Value> {
        let url = self.config.endpoint(&format!(
            "dubbed-run-info/{}",
            urlencoding::encode(run_id.as_str())
        ));
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Current status of any task kind
    pub async fn task_status(&self, kind: TaskKind, task_id: &TaskId) -> Result<TaskStatusResponse> {
        let url = self.config.endpoint(&format!(
            "{}/{}",
            kind.status_path(),
            urlencoding::encode(task_id.as_str())
        ));
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Poll a task until it succeeds, returning the final status payload
    ///
    /// # Errors
    /// [`Error::TaskFailed`], [`Error::TaskTimeout`] or [`Error::Cancelled`]
    /// for the corresponding polling outcomes; transport errors as-is.
    pub async fn wait_for_task(
        &self,
        kind: TaskKind,
        task_id: &TaskId,
        poll: &PollConfig,
        cancel: CancellationToken,
    ) -> Result<TaskStatusResponse> {
        let runner = PollingTaskRunner::new(poll.clone()).with_cancellation(cancel);
        let report = runner
            .run(
                task_id,
                |id| async move { self.task_status(kind, &id).await },
                |_id, report| async move { Ok(report) },
            )
            .await?;
        Ok(report)
    }

    /// Generate audio from a prompt and save it to `target`
    ///
    /// Creates the task, polls it with the client's [`PollConfig`], then
    /// streams the result to disk. Returns the number of bytes written.
    pub async fn text_to_audio_to_file(
        &self,
        request: &TextToAudioRequest,
        target: impl AsRef<Path>,
        cancel: CancellationToken,
    ) -> Result<u64> {
        let task_id = self.create_text_to_audio(request).await?;
        let runner = PollingTaskRunner::new(self.config.poll.clone()).with_cancellation(cancel);

        let source = runner
            .run(
                &task_id,
                |id| async move { self.text_to_audio_status(&id).await },
                |_id, report| async move {
                    let run_id = report
                        .run_id
                        .ok_or(Error::MissingField { field: "run_id" })?;
                    self.text_to_audio_result(&run_id).await
                },
            )
            .await?;

        let written = persist(source, target).await?;
        info!(task_id = %task_id, bytes = written, "Text-to-audio result saved");
        Ok(written)
    }

    /// Dub a video and return the run info of the finished job
    ///
    /// Uses [`ClientConfig::dubbing_poll`], since dubbing takes much longer than
    /// audio generation.
    pub async fn dub(
        &self,
        request: &DubbingRequest,
        cancel: CancellationToken,
    ) -> Result<serde_json::Value> {
        let task_id = self.create_dubbing(request).await?;
        let runner =
            PollingTaskRunner::new(self.config.dubbing_poll.clone()).with_cancellation(cancel);

        let info = runner
            .run(
                &task_id,
                |id| async move { self.dubbing_status(&id).await },
                |_id, report| async move {
                    let run_id = report
                        .run_id
                        .ok_or(Error::MissingField { field: "run_id" })?;
                    self.dubbed_run_info(&run_id).await
                },
            )
            .await?;

        info!(task_id = %task_id, "Dubbing finished");
        Ok(info)
    }

    async fn create_task<B: serde::Serialize + ?Sized>(
        &self,
        kind: TaskKind,
        path: &str,
        body: &B,
    ) -> Result<TaskId> {
        let response = self
            .send(self.http.post(self.config.endpoint(path)).json(body))
            .await?;
        let created: TaskCreated = response.json().await?;
        info!(task_id = %created.task_id, kind = %kind, "Task created");
        Ok(created.task_id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(api_error(status, response.text().await))
    }
}

/// Build [`Error::Api`] from a non-success status and the attempt to read its body
///
/// An empty or unreadable body falls back to the canonical reason; a read
/// failure is appended to it.
fn api_error<E: std::fmt::Display>(
    status: StatusCode,
    body: std::result::Result<String, E>,
) -> Error {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let message = match body {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => reason.to_string(),
        Err(e) => {
            debug!(status = status.as_u16(), error = %e, "Failed to read error response body");
            format!("{reason} (failed to read response body: {e})")
        }
    };
    Error::Api {
        status: status.as_u16(),
        message,
    }
}
