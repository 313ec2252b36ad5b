//! Latest-release lookup against the HashiCorp checkpoint feed

use crate::config::Settings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Resolves the latest released version of a product
pub trait VersionResolver {
    fn latest_version(&self, product: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    current_version: String,
}

/// HTTP/JSON client for `GET {base}/v1/check/{product}`
pub struct CheckpointClient {
    base_url: String,
    timeout: Duration,
}

impl CheckpointClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.checkpoint_url, settings.checkpoint_timeout)
    }

    fn check_url(&self, product: &str) -> String {
        format!("{}/v1/check/{}", self.base_url, product)
    }
}

impl VersionResolver for CheckpointClient {
    fn latest_version(&self, product: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("hashiup/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let url = self.check_url(product);
        tracing::debug!(%url, "checking latest version");

        let response = client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("version feed returned {} for {}", status, product);
        }

        let body: CheckResponse = response
            .json()
            .context("Failed to parse version feed JSON")?;
        parse_version(&body.current_version)
            .with_context(|| format!("version feed returned no version for {}", product))
    }
}

fn parse_version(raw: &str) -> Option<String> {
    let version = raw.trim().trim_start_matches('v');
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
