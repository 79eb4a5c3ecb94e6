//! Voice cloning example
//!
//! Creates a custom voice from a reference recording, speaks with it, and
//! lists the account's cloned voices.
//!
//! ```bash
//! REFERENCE_AUDIO=path/to/audio.wav VOICE_NAME=my-voice cargo run --example clone_voice
//! ```
//!
//! The reference should be 10-30 seconds of clear speech (WAV, MP3, FLAC or
//! OGG) with little background noise.

use camb_sdk::{AudioFormat, CambClient, CustomVoiceRequest, Gender, TtsRequest, persist};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let client = CambClient::from_env()?;

    let reference = PathBuf::from(
        std::env::var("REFERENCE_AUDIO").unwrap_or_else(|_| "reference.wav".to_string()),
    );
    if !reference.exists() {
        eprintln!("Reference audio file not found: {}", reference.display());
        eprintln!("Usage: REFERENCE_AUDIO=path/to/audio.wav cargo run --example clone_voice");
        std::process::exit(1);
    }
    let voice_name = std::env::var("VOICE_NAME").unwrap_or_else(|_| "cloned-voice".to_string());

    println!("=== Voice Cloning Example ===\n");
    println!("Reference audio: {}", reference.display());
    println!("Voice name: {}\n", voice_name);

    let mut request = CustomVoiceRequest::new(&reference, voice_name.as_str());
    request.gender = Gender::Male;
    request.description = Some("Custom cloned voice from reference audio".to_string());
    request.enhance_audio = true;

    println!("Creating custom voice from reference audio...");
    let voice = client.create_custom_voice(request).await?;
    println!("Custom voice created! Voice ID: {}", voice.voice_id);

    println!("\nGenerating speech with the cloned voice...");
    let tts = TtsRequest::new(
        "Hello! This is my cloned voice speaking.",
        "en-us",
        voice.voice_id,
    )
    .speech_model("mars-flash")
    .format(AudioFormat::Wav);
    let output = "cloned_voice_output.wav";
    let bytes = persist(client.tts(&tts).await?, output).await?;
    println!("Audio saved to: {} ({} bytes)", output, bytes);

    println!("\n--- Your Custom Voices ---");
    for v in client.list_voices().await? {
        let name = v.voice_name.as_deref().unwrap_or("");
        if name.contains("cloned") || v.id == voice.voice_id {
            println!("  - {} (ID: {})", name, v.id);
        }
    }

    Ok(())
}
