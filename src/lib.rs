//! # camb-sdk
//!
//! Async Rust client for the Camb.ai speech and audio generation API:
//! text-to-speech (including reference-audio synthesis on Baseten), voice
//! cloning, dubbing, and text-to-audio.
//!
//! The crate has two building blocks that work without the HTTP client:
//! - [`persist`] writes a streamed response ([`ByteSource`]) to a file, one
//!   chunk at a time
//! - [`PollingTaskRunner`] waits for a long-running server-side task by polling
//!   its status, with an attempt budget and cooperative cancellation
//!
//! [`CambClient`] composes both with the API's endpoints.
//!
//! ## Quick Start
//!
//! ```no_run
//! use camb_sdk::{AudioFormat, CambClient, ClientConfig, TtsRequest, persist};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CambClient::new(ClientConfig::new("your-api-key"))?;
//!
//!     let request = TtsRequest::new("Hello from Rust!", "en-us", 20303)
//!         .speech_model("mars-pro")
//!         .format(AudioFormat::Wav);
//!     let audio = client.tts(&request).await?;
//!
//!     let bytes = persist(audio, "hello.wav").await?;
//!     println!("saved {bytes} bytes");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP client for the API
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Saving byte streams to disk
pub mod persist;
/// Polling loop for long-running tasks
pub mod polling;
/// Core types
pub mod types;

// Re-export commonly used types
pub use client::{
    AudioFormat, AudioType, CambClient, CustomVoice, CustomVoiceRequest, DubbingRequest, Gender,
    InferenceOptions, TextToAudioRequest, TtsRequest, Voice, VoiceSettings,
};
pub use config::{ClientConfig, PollConfig, TtsProvider};
pub use error::{Error, PersistError, PollError, Result};
pub use persist::{ByteSource, ChunkReader, PullSource, persist};
pub use polling::{Clock, PollingTaskRunner, TokioClock};
pub use types::{RunId, StatusReport, TaskId, TaskKind, TaskStatus, TaskStatusResponse};
