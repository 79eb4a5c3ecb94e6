//! Text-to-audio example
//!
//! Generates a short sound effect from a prompt. The task runs server-side,
//! so the client polls its status before downloading the result. Ctrl+C stops
//! waiting.
//!
//! ```bash
//! CAMB_API_KEY=... cargo run --example text_to_audio
//! ```

use camb_sdk::{AudioType, CambClient, TextToAudioRequest};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let client = CambClient::from_env()?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let request = TextToAudioRequest::new("A futuristic sci-fi laser sound effect", 3.0)
        .audio_type(AudioType::Sound);
    let output = "text_to_audio_output.mp3";

    println!("Creating text-to-audio task and waiting for the result...");
    match client.text_to_audio_to_file(&request, output, cancel).await {
        Ok(bytes) => {
            println!("✓ Audio saved to {} ({} bytes)", output, bytes);
            Ok(())
        }
        Err(e) if e.is_timeout() => {
            eprintln!("Timeout waiting for task completion: {e}");
            std::process::exit(1);
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Stopped waiting: {e}");
            std::process::exit(130);
        }
        Err(e) => Err(e.into()),
    }
}
