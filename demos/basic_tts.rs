//! Basic text-to-speech example
//!
//! Picks the first voice on the account, streams speech for a sentence, and
//! saves it as WAV.
//!
//! ```bash
//! CAMB_API_KEY=... cargo run --example basic_tts
//! ```

use camb_sdk::{AudioFormat, CambClient, TtsRequest, persist};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let client = CambClient::from_env()?;

    println!("Fetching available voices...");
    let voices = client.list_voices().await?;
    let Some(voice) = voices.first() else {
        eprintln!("No voices available");
        std::process::exit(1);
    };
    println!(">>> Using voice ID: {}", voice.id);

    println!("Streaming TTS generation...");
    let request = TtsRequest::new(
        "Experience high quality text to speech generation using MARS Pro Model.",
        "en-us",
        voice.id,
    )
    .speech_model("mars-pro")
    .format(AudioFormat::Wav);
    let audio = client.tts(&request).await?;

    let output = "tts_output.wav";
    let bytes = persist(audio, output).await?;
    println!("✓ Audio saved to {} ({} bytes)", output, bytes);

    Ok(())
}
