//! Audio fixtures and mock API responses

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 44-byte canonical WAV header followed by eight bytes of silence
pub fn tiny_wav() -> Vec<u8> {
    let data_len: u32 = 8;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&16_000u32.to_le_bytes()); // sample rate
    wav.extend_from_slice(&32_000u32.to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

/// Mount a text-to-audio task that reports PENDING `pending` times, then
/// SUCCESS with `run_id`, and serves `audio` as the result
pub async fn mount_text_to_audio_task(
    server: &MockServer,
    task_id: i64,
    run_id: i64,
    pending: u64,
    audio: Vec<u8>,
) {
    let status_path = format!("/text-to-sound/{task_id}");

    Mock::given(method("POST"))
        .and(path("/text-to-sound"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": task_id })))
        .up_to_n_times(1)
        .mount(server)
        .await;

    if pending > 0 {
        Mock::given(method("GET"))
            .and(path(status_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
            .up_to_n_times(pending)
            .expect(pending)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "SUCCESS", "run_id": run_id })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/text-to-sound-result/{run_id}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio))
        .expect(1)
        .mount(server)
        .await;
}
