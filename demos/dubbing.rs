//! End-to-end dubbing example
//!
//! Submits a video for dubbing, waits for the job with the dubbing polling
//! budget (60 checks, 5 seconds apart), then prints the run info.
//!
//! ```bash
//! CAMB_API_KEY=... VIDEO_URL=https://... cargo run --example dubbing
//! ```

use camb_sdk::{CambClient, DubbingRequest, PollingTaskRunner, TaskStatusResponse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let client = CambClient::from_env()?;

    // Dubbing language ids: 47 = English (US), 39 = Hindi (India)
    let request = DubbingRequest {
        video_url: std::env::var("VIDEO_URL")
            .unwrap_or_else(|_| "https://example.com/talk.mp4".to_string()),
        source_language: 47,
        target_language: 39,
    };

    println!("Creating dubbing task...");
    let task_id = client.create_dubbing(&request).await?;
    println!("Dubbing task created with ID: {}", task_id);

    // Drive the loop by hand to print every status as it arrives
    let runner = PollingTaskRunner::new(client.config().dubbing_poll.clone());
    let report: TaskStatusResponse = runner
        .run(
            &task_id,
            |id| {
                let client = client.clone();
                async move {
                    let status = client.dubbing_status(&id).await?;
                    println!("Current Status: {}", status.status);
                    Ok::<_, camb_sdk::Error>(status)
                }
            },
            |_id, report| async move { Ok(report) },
        )
        .await
        .map_err(camb_sdk::Error::from)?;

    let Some(run_id) = report.run_id else {
        eprintln!("Dubbing finished without a run ID");
        std::process::exit(1);
    };
    println!("Dubbing completed! Run ID: {}", run_id);

    let info = client.dubbed_run_info(&run_id).await?;
    println!("Dubbed video info: {}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
