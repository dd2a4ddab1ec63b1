//! HTTP client for the external vehicle-detection record store.

use crate::config::SalesforceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use common::records::{RecordStore, VehicleRecord};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Path of the vehicle-detection record collection on the store.
const RECORDS_PATH: &str = "/services/records/Vehicle_Detection__c";

/// Thin REST client for the record store. Credentials travel on every call;
/// session management stays on the store's side of the boundary.
pub struct RestRecordStore {
    base_url: String,
    client: Client,
    config: SalesforceConfig,
}

impl RestRecordStore {
    /// Build a client from credentials. The configured domain selects the
    /// production (`login`) or sandbox (`test`) host.
    pub fn connect(config: &SalesforceConfig) -> Result<Self> {
        Self::with_base_url(
            config,
            format!("https://{}.salesforce.com", config.domain),
        )
    }

    /// Build a client against an explicit base URL. Used for local stubs.
    pub fn with_base_url(config: &SalesforceConfig, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build record store client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            config: config.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    total_size: u32,
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn plate_logged_today(&self, plate: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.url(RECORDS_PATH))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("X-Security-Token", &self.config.security_token)
            .query(&[("plate", plate), ("created", "today"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let result = response.json::<QueryResponse>().await?;
        Ok(result.total_size > 0)
    }

    async fn create_detection(&self, record: &VehicleRecord) -> Result<()> {
        self.client
            .post(self.url(RECORDS_PATH))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("X-Security-Token", &self.config.security_token)
            .json(record)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
