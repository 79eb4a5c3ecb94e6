//! End-to-end text-to-audio workflow against a mock API
//!
//! Exercises task creation, status polling, result streaming, and persistence
//! together, the way an application would call them.

mod common;

use camb_sdk::{Error, TextToAudioRequest};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn prompt_to_file_after_pending_polls() {
    let server = MockServer::start().await;
    let audio = common::tiny_wav();
    common::mount_text_to_audio_task(&server, 1001, 2002, 3, audio.clone()).await;

    let client = common::mock_client(&server, 10);
    let dir = tempdir().unwrap();
    let target = dir.path().join("laser.wav");

    let written = client
        .text_to_audio_to_file(
            &TextToAudioRequest::new("A futuristic sci-fi laser sound effect", 3.0),
            &target,
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(written, audio.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), audio);
}

#[tokio::test]
async fn exhausted_budget_is_a_timeout_and_writes_nothing() {
    let server = MockServer::start().await;
    // Never leaves PENDING within the budget of 2
    common::mount_text_to_audio_task(&server, 5, 6, 10, common::tiny_wav()).await;

    let client = common::mock_client(&server, 2);
    let dir = tempdir().unwrap();
    let target = dir.path().join("never.wav");

    let err = client
        .text_to_audio_to_file(
            &TextToAudioRequest::new("slow thunder", 10.0),
            &target,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(!err.is_task_failed());
    assert!(!target.exists());

    // The mounted expectations (10 pending checks, 1 result fetch) are not
    // meant to be met here
    server.reset().await;
}

#[tokio::test]
async fn cancelled_wait_is_distinct_from_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-sound"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"task_id": 77})))
        .mount(&server)
        .await;

    let client = common::mock_client(&server, 10);
    let token = CancellationToken::new();
    token.cancel();

    let err = client
        .text_to_audio_to_file(
            &TextToAudioRequest::new("birdsong", 4.0),
            tempdir().unwrap().path().join("birds.wav"),
            token,
        )
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "unexpected error: {err}");
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn transport_error_from_result_fetch_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-sound"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"task_id": 8})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/text-to-sound/8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "SUCCESS", "run_id": 80})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/text-to-sound-result/80"))
        .respond_with(ResponseTemplate::new(404).set_body_string("run not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::mock_client(&server, 10);
    let dir = tempdir().unwrap();

    let err = client
        .text_to_audio_to_file(
            &TextToAudioRequest::new("door creak", 1.5),
            dir.path().join("door.wav"),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, .. }), "unexpected error: {err}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn independent_workflows_run_concurrently() {
    let first_server = MockServer::start().await;
    let second_server = MockServer::start().await;
    let first_audio = b"first-task-audio".to_vec();
    let second_audio = b"second-task-audio-is-longer".to_vec();
    common::mount_text_to_audio_task(&first_server, 1, 10, 2, first_audio.clone()).await;
    common::mount_text_to_audio_task(&second_server, 2, 20, 1, second_audio.clone()).await;

    let first = common::mock_client(&first_server, 10);
    let second = common::mock_client(&second_server, 10);
    let dir = tempdir().unwrap();
    let first_target = dir.path().join("first.bin");
    let second_target = dir.path().join("second.bin");
    let first_request = TextToAudioRequest::new("one", 1.0);
    let second_request = TextToAudioRequest::new("two", 2.0);

    let (a, b) = tokio::join!(
        first.text_to_audio_to_file(&first_request, &first_target, CancellationToken::new()),
        second.text_to_audio_to_file(&second_request, &second_target, CancellationToken::new()),
    );

    assert_eq!(a.unwrap(), first_audio.len() as u64);
    assert_eq!(b.unwrap(), second_audio.len() as u64);
    assert_eq!(std::fs::read(&first_target).unwrap(), first_audio);
    assert_eq!(std::fs::read(&second_target).unwrap(), second_audio);
}
