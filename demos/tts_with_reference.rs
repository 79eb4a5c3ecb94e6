//! TTS with reference audio example
//!
//! Speaks in the voice heard in a reference recording without creating a
//! stored custom voice. Reference-audio synthesis is served by a MARS Pro
//! deployment on Baseten.
//!
//! ```bash
//! BASETEN_API_KEY=... BASETEN_URL=... REFERENCE_AUDIO=audio.wav \
//!     cargo run --example tts_with_reference
//! ```
//!
//! `TEXT` overrides the sentence to speak.

use camb_sdk::{CambClient, ClientConfig, InferenceOptions, TtsRequest, VoiceSettings, persist};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let reference = PathBuf::from(
        std::env::var("REFERENCE_AUDIO").unwrap_or_else(|_| "reference.wav".to_string()),
    );
    if !reference.exists() {
        eprintln!("Reference audio file not found: {}", reference.display());
        eprintln!("\nEnvironment variables:");
        eprintln!("  BASETEN_API_KEY  - Your Baseten API key");
        eprintln!("  BASETEN_URL      - Your Baseten MARS Pro deployment URL");
        eprintln!("  REFERENCE_AUDIO  - Path to reference audio file (default: reference.wav)");
        std::process::exit(1);
    }

    let config = match ClientConfig::baseten_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Missing Baseten credentials: {e}");
            std::process::exit(1);
        }
    };
    let client = CambClient::new(config)?;

    println!("=== TTS with Reference Audio ===\n");
    println!("Reference audio: {}", reference.display());
    let audio = tokio::fs::read(&reference).await?;
    println!("Audio size: {:.2} KB\n", audio.len() as f64 / 1024.0);

    let text = std::env::var("TEXT").unwrap_or_else(|_| {
        "Hello! This speech is generated using voice cloning with a reference audio file."
            .to_string()
    });
    println!("Text to synthesize:\n\"{}\"\n", text);

    let request = TtsRequest::from_reference_audio(text, "en-us", &audio, "en-us")
        .speech_model("mars-pro")
        .voice_settings(VoiceSettings {
            enhance_reference_audio_quality: Some(true),
            maintain_source_accent: Some(true),
        })
        .inference_options(InferenceOptions {
            stability: Some(0.7),
            speaker_similarity: Some(0.85),
            temperature: Some(0.8),
        });

    println!("Generating speech with reference audio...");
    let output = "reference_audio_output.wav";
    let bytes = persist(client.tts(&request).await?, output).await?;
    println!("✓ Audio saved to {} ({} bytes)", output, bytes);

    Ok(())
}
