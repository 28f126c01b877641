//! LED options read from and written to the controller's web API

use serde::Deserialize;
use tracing::debug;

use super::LedOptionsStore;
use crate::error::{LedConfigError, Result};
use crate::model::LedOptionsRecord;
use crate::pins::UsedPins;

#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsedPinsResponse {
    #[serde(default)]
    used_pins: Vec<i32>,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }
}

fn request_failed(endpoint: &str, e: reqwest::Error) -> LedConfigError {
    LedConfigError::Persistence(format!("{} failed: {}", endpoint, e))
}

impl LedOptionsStore for HttpStore {
    async fn load(&self) -> Result<LedOptionsRecord> {
        let url = self.url("getLedOptions");
        debug!("GET {}", url);

        self.client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| request_failed("getLedOptions", e))?
            .json::<LedOptionsRecord>()
            .await
            .map_err(|e| request_failed("getLedOptions", e))
    }

    async fn save(&self, record: &LedOptionsRecord) -> Result<()> {
        let url = self.url("setLedOptions");
        debug!("POST {}", url);

        self.client
            .post(&url)
            .json(record)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| request_failed("setLedOptions", e))?;
        Ok(())
    }

    async fn used_pins(&self) -> Result<UsedPins> {
        let url = self.url("getUsedPins");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| request_failed("getUsedPins", e))?
            .json::<UsedPinsResponse>()
            .await
            .map_err(|e| request_failed("getUsedPins", e))?;

        Ok(response.used_pins.into_iter().collect())
    }
}
