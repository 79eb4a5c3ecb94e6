//! Request and response payloads for the endpoints the client wraps
//!
//! Only the fields the workflows need are modelled; unknown response fields
//! are ignored.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Encoding of generated speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV format
    #[default]
    Wav,
    /// MP3 format
    Mp3,
    /// FLAC format
    Flac,
    /// AAC format
    Aac,
    /// Raw PCM samples
    Pcm,
}

impl AudioFormat {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Aac => "aac",
            Self::Pcm => "pcm",
        }
    }
}

/// Output settings for speech synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfiguration {
    /// Audio encoding
    pub format: AudioFormat,
}

/// Voice handling for reference-audio synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Denoise the reference recording before cloning from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhance_reference_audio_quality: Option<bool>,
    /// Keep the reference speaker's accent instead of the target language's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintain_source_accent: Option<bool>,
}

/// Sampling knobs for the speech model, each in `0.0..=1.0`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// Higher is more consistent, lower more expressive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    /// How closely to match the reference speaker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_similarity: Option<f64>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Streaming text-to-speech request
///
/// Speaks either with a stored voice ([`TtsRequest::new`]) or with a voice
/// cloned on the fly from a reference recording
/// ([`TtsRequest::from_reference_audio`]). The latter needs the Baseten
/// provider (see [`TtsProvider`](crate::config::TtsProvider)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsRequest {
    /// Text to speak
    pub text: String,
    /// Language tag, e.g. `en-us`
    pub language: String,
    /// Stored voice to speak with; unset when speaking from reference audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<i64>,
    /// Model name, e.g. `mars-pro`; server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_model: Option<String>,
    /// Output settings; server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_configuration: Option<OutputConfiguration>,
    /// Reference-voice handling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
    /// Model sampling options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_options: Option<InferenceOptions>,
    /// Extra top-level body fields, sent verbatim
    ///
    /// Holds `reference_audio` / `reference_language` for reference-audio
    /// synthesis, and anything else a provider accepts that is not modelled.
    #[serde(flatten)]
    pub additional_body_parameters: Map<String, Value>,
}

impl TtsRequest {
    /// Request speech for `text` in `language` with `voice_id`
    pub fn new(text: impl Into<String>, language: impl Into<String>, voice_id: i64) -> Self {
        Self {
            voice_id: Some(voice_id),
            ..Self::bare(text.into(), language.into())
        }
    }

    /// Request speech in the voice heard in `reference_audio`
    ///
    /// The recording (10-30 seconds of clean speech works best) is sent
    /// base64-encoded; `reference_language` is the language spoken in it.
    pub fn from_reference_audio(
        text: impl Into<String>,
        language: impl Into<String>,
        reference_audio: &[u8],
        reference_language: impl Into<String>,
    ) -> Self {
        Self::bare(text.into(), language.into())
            .additional_parameter("reference_audio", BASE64.encode(reference_audio))
            .additional_parameter("reference_language", reference_language.into())
    }

    fn bare(text: String, language: String) -> Self {
        Self {
            text,
            language,
            voice_id: None,
            speech_model: None,
            output_configuration: None,
            voice_settings: None,
            inference_options: None,
            additional_body_parameters: Map::new(),
        }
    }

    /// Select the speech model
    #[must_use]
    pub fn speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = Some(model.into());
        self
    }

    /// Select the output encoding
    #[must_use]
    pub fn format(mut self, format: AudioFormat) -> Self {
        self.output_configuration = Some(OutputConfiguration { format });
        self
    }

    /// Set reference-voice handling
    #[must_use]
    pub fn voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = Some(settings);
        self
    }

    /// Set model sampling options
    #[must_use]
    pub fn inference_options(mut self, options: InferenceOptions) -> Self {
        self.inference_options = Some(options);
        self
    }

    /// Add a top-level body field, replacing any previous value for `key`
    #[must_use]
    pub fn additional_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_body_parameters.insert(key.into(), value.into());
        self
    }
}

/// Kind of audio produced by text-to-audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioType {
    /// Sound effect
    #[default]
    Sound,
    /// Music
    Music,
}

/// Text-to-audio (sound effect / music) generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToAudioRequest {
    /// Description of the audio to generate
    pub prompt: String,
    /// Length in seconds
    pub duration: f64,
    /// Sound or music
    pub audio_type: AudioType,
}

impl TextToAudioRequest {
    /// Generate `duration` seconds of sound effect from `prompt`
    pub fn new(prompt: impl Into<String>, duration: f64) -> Self {
        Self {
            prompt: prompt.into(),
            duration,
            audio_type: AudioType::Sound,
        }
    }

    /// Select sound or music
    #[must_use]
    pub fn audio_type(mut self, audio_type: AudioType) -> Self {
        self.audio_type = audio_type;
        self
    }
}

/// End-to-end dubbing request
///
/// Languages are numeric ids from the service's dubbing language list
/// (e.g. 47 = English (US), 39 = Hindi (India)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DubbingRequest {
    /// Public URL of the video to dub
    pub video_url: String,
    /// Spoken language of the source video
    pub source_language: u32,
    /// Language to dub into
    pub target_language: u32,
}

/// A voice available to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Voice id to pass to TTS requests
    pub id: i64,
    /// Display name
    #[serde(default, alias = "voiceName")]
    pub voice_name: Option<String>,
}

/// Speaker gender for a custom voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    /// Not specified
    #[default]
    NotSpecified,
    /// Male
    Male,
    /// Female
    Female,
}

impl Gender {
    pub(crate) fn code(self) -> u8 {
        match self {
            Gender::NotSpecified => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

/// Voice-cloning request built from a reference recording
#[derive(Debug, Clone)]
pub struct CustomVoiceRequest {
    /// Reference audio, ideally 10-30 seconds of clean speech
    pub file: PathBuf,
    /// Name for the new voice
    pub voice_name: String,
    /// Speaker gender
    pub gender: Gender,
    /// Language id of the recording, from the voice-cloning language list
    /// (1 = English, the default)
    pub language: u32,
    /// Free-form description
    pub description: Option<String>,
    /// Let the service denoise the reference before cloning
    pub enhance_audio: bool,
}

impl CustomVoiceRequest {
    /// Clone a voice named `voice_name` from the recording at `file`
    pub fn new(file: impl Into<PathBuf>, voice_name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            voice_name: voice_name.into(),
            gender: Gender::default(),
            language: 1,
            description: None,
            enhance_audio: false,
        }
    }
}

/// Voice created by a cloning request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoice {
    /// Id of the new voice
    #[serde(alias = "voiceId")]
    pub voice_id: i64,
    /// Name the service stored, if echoed back
    #[serde(default, alias = "voiceName")]
    pub voice_name: Option<String>,
}
