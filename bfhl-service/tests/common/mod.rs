#![allow(dead_code)]

use bfhl_service::config::{BfhlConfig, IdentityConfig};
use bfhl_service::startup::Application;
use service_core::config::Config as CoreConfig;

pub const TEST_USER_ID: &str = "jane_doe_01011990";
pub const TEST_EMAIL: &str = "jane@example.com";
pub const TEST_ROLL_NUMBER: &str = "ABCD123";

pub fn test_config() -> BfhlConfig {
    BfhlConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        identity: IdentityConfig {
            user_id: TEST_USER_ID.to_string(),
            email: TEST_EMAIL.to_string(),
            roll_number: TEST_ROLL_NUMBER.to_string(),
        },
        body_limit_bytes: 1024 * 1024,
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let app = Application::build(test_config())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let probe_url = format!("{}/bfhl", address);
        for _ in 0..50 {
            if client.get(&probe_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn bfhl_url(&self) -> String {
        format!("{}/bfhl", self.address)
    }

    pub async fn post_json(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.bfhl_url())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
