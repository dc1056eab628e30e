use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Persisted client settings, `client.json` in the config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Store used when a command does not pass `--store`
    #[serde(default)]
    pub current_store: Option<Uuid>,
    #[serde(default)]
    pub last_ping: Option<DateTime<Utc>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            current_store: None,
            last_ping: None,
        }
    }
}

impl ClientConfig {
    /// Apply `STOREFRONT_API_URL` and `STOREFRONT_TOKEN` on top of the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            if !url.trim().is_empty() {
                self.server_url = url;
            }
        }
        if let Ok(token) = std::env::var("STOREFRONT_TOKEN") {
            if !token.trim().is_empty() {
                self.token = Some(token);
            }
        }
        self
    }

    pub fn require_store(&self, explicit: Option<Uuid>) -> anyhow::Result<Uuid> {
        explicit.or(self.current_store).ok_or_else(|| {
            anyhow::anyhow!("No store selected; pass --store or run `storefront stores use <id>`")
        })
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("STOREFRONT_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("storefront")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// File settings only; see [`load`] for the effective configuration
pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let config_file = get_config_dir()?.join("client.json");

    if !config_file.exists() {
        return Ok(ClientConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: ClientConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_client_config(config: &ClientConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("client.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_file, content)?;
    Ok(())
}

pub fn load() -> anyhow::Result<ClientConfig> {
    Ok(load_client_config()?.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_store_wins_over_current() {
        let current = Uuid::new_v4();
        let explicit = Uuid::new_v4();
        let config = ClientConfig {
            current_store: Some(current),
            ..Default::default()
        };
        assert_eq!(config.require_store(Some(explicit)).unwrap(), explicit);
        assert_eq!(config.require_store(None).unwrap(), current);
        assert!(ClientConfig::default().require_store(None).is_err());
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let config: ClientConfig = serde_json::from_str(r#"{"server_url":"http://api:8080"}"#).unwrap();
        assert_eq!(config.server_url, "http://api:8080");
        assert!(config.token.is_none());
    }
}
