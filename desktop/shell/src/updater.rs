//! Release check against the GitHub releases API.

use crate::server::{ServerError, ServerResult};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use studio_config::UpdateConfig;
use tracing::{debug, info};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("slidev-studio/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub available: bool,
    pub version: String,
    /// Installer for this platform, empty when the release has none
    pub download_url: String,
    pub release_url: String,
    pub notes: String,
}

pub struct UpdateChecker {
    client: reqwest::Client,
    config: UpdateConfig,
}

impl UpdateChecker {
    pub fn new(config: UpdateConfig) -> ServerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.repo_owner,
            self.config.repo_name
        )
    }

    pub async fn check(&self) -> ServerResult<UpdateInfo> {
        let url = self.latest_release_url();
        debug!("Checking for updates at {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::update_check_failed(format!(
                "failed to fetch release info: HTTP {status}"
            )));
        }

        let release: Release = response.json().await?;
        if is_current(&release.tag_name, &self.config.current_version) {
            info!("Up to date ({})", self.config.current_version);
            return Ok(UpdateInfo::default());
        }

        let suffix = platform_asset_suffix();
        let download_url = release
            .assets
            .iter()
            .find(|asset| asset.name.to_lowercase().contains(suffix))
            .map(|asset| asset.browser_download_url.clone())
            .unwrap_or_default();

        info!("Update available: {}", release.tag_name);
        Ok(UpdateInfo {
            available: true,
            version: release.tag_name,
            download_url,
            release_url: release.html_url,
            notes: release.body.unwrap_or_default(),
        })
    }
}

/// Tags match with or without a leading `v`.
pub fn is_current(tag: &str, current_version: &str) -> bool {
    let strip = |s: &str| s.trim().trim_start_matches(['v', 'V']).to_string();
    strip(tag) == strip(current_version)
}

/// Installer asset naming per platform.
pub fn platform_asset_suffix() -> &'static str {
    if cfg!(target_os = "windows") {
        ".exe"
    } else if cfg!(target_os = "macos") {
        ".zip"
    } else {
        ".tar.gz"
    }
}
