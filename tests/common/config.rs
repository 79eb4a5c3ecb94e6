//! Test configuration helpers for loading .env credentials and building clients

use camb_sdk::{CambClient, ClientConfig, PollConfig};
use std::time::Duration;
use wiremock::MockServer;

/// Client pointed at a mock server, with a fast polling budget
pub fn mock_client(server: &MockServer, max_attempts: u32) -> CambClient {
    let mut config = ClientConfig::new("integration-key");
    config.base_url = server.uri();
    config.poll = PollConfig {
        max_attempts,
        interval: Duration::from_millis(5),
    };
    config.dubbing_poll = config.poll.clone();
    CambClient::new(config).expect("mock client config is valid")
}

/// Check whether live API credentials are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var(camb_sdk::config::API_KEY_ENV).is_ok()
}

/// Skip the current test if live credentials are not configured
#[macro_export]
macro_rules! skip_if_no_credentials {
    () => {
        if !$crate::common::has_live_credentials() {
            eprintln!("Skipping test: CAMB_API_KEY not found in environment or .env");
            return;
        }
    };
}
