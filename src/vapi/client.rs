//! Vapi call API client. Polls a call until it has ended.
//!
//! Not used by the webhook routes; transcripts are fetched out of band
//! after the call.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::VapiConfig;
use crate::error::CallError;

/// Remote status marking a finished call.
const ENDED_STATUS: &str = "ended";

/// The subset of call metadata kept after polling. Missing remote fields
/// stay `None` / `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallSummary {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(rename = "type")]
    pub call_type: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub analysis: Value,
    pub transcript: Option<String>,
    pub assistant_id: Option<String>,
}

impl CallSummary {
    pub fn has_ended(&self) -> bool {
        self.status.as_deref() == Some(ENDED_STATUS)
    }
}

/// Outcome of a call lookup. `found` is set only once the call has ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallDetails {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CallSummary>,
}

impl CallDetails {
    fn ended(summary: CallSummary) -> Self {
        Self {
            found: true,
            data: Some(summary),
        }
    }

    fn not_found() -> Self {
        Self {
            found: false,
            data: None,
        }
    }
}

/// HTTP client for the Vapi call endpoint.
pub struct VapiClient {
    client: reqwest::Client,
    api_url: String,
    private_key: SecretString,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl VapiClient {
    pub fn new(config: &VapiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            private_key: config.private_key.clone(),
            poll_attempts: config.poll_attempts.max(1),
            poll_interval: config.poll_interval,
        }
    }

    fn call_url(&self, call_id: &str) -> String {
        format!("{}/call/{call_id}", self.api_url)
    }

    /// Fetch the current state of a call once.
    pub async fn fetch_call(&self, call_id: &str) -> Result<CallSummary, CallError> {
        let resp = self
            .client
            .get(self.call_url(call_id))
            .bearer_auth(self.private_key.expose_secret())
            .send()
            .await
            .map_err(|e| CallError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<CallSummary>()
            .await
            .map_err(|e| CallError::InvalidResponse(e.to_string()))
    }

    /// Poll a call up to the configured number of attempts, sleeping between
    /// attempts and returning as soon as the call has ended.
    pub async fn get_call_details(&self, call_id: &str) -> Result<CallDetails, CallError> {
        let started = Instant::now();

        for attempt in 1..=self.poll_attempts {
            let call = self.fetch_call(call_id).await?;
            debug!(call_id, attempt, status = ?call.status, "Polled call status");

            if call.has_ended() {
                info!(call_id, attempt, "Call details retrieved");
                return Ok(CallDetails::ended(call));
            }
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        info!(
            call_id,
            attempts = self.poll_attempts,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Call has not ended, giving up"
        );
        Ok(CallDetails::not_found())
    }
}
