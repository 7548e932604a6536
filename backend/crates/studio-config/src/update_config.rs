use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_UPDATE_API_BASE_URL, DEFAULT_UPDATE_REPO_NAME,
    DEFAULT_UPDATE_REPO_OWNER,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub api_base_url: String,
    pub repo_owner: String,
    pub repo_name: String,
    /// Version compared against the latest release tag
    pub current_version: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from(DEFAULT_UPDATE_API_BASE_URL),
            repo_owner: String::from(DEFAULT_UPDATE_REPO_OWNER),
            repo_name: String::from(DEFAULT_UPDATE_REPO_NAME),
            current_version: String::from(env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UpdateConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.repo_owner.trim().is_empty() || self.repo_name.trim().is_empty() {
            return Err(ConfigError::updates(
                "updates.repo_owner and updates.repo_name cannot be empty",
            ));
        }

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::updates(format!(
                "updates.api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        Ok(())
    }
}
