use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a sync pass does with queue entries once every one of them has been attempted.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Clear every drained queue kind, failed replays included.
    #[default]
    ClearAll,
    /// Remove succeeded and permanently failed entries; keep `Unavailable` failures queued.
    RetainRetryable,
}

impl CommitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitPolicy::ClearAll => "clear_all",
            CommitPolicy::RetainRetryable => "retain_retryable",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear_all" | "clear-all" => Some(CommitPolicy::ClearAll),
            "retain_retryable" | "retain-retryable" => Some(CommitPolicy::RetainRetryable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    #[serde(default)]
    pub commit_policy: CommitPolicy,
    pub auto_save_mirror: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database: DatabaseConfig {
                url: format!("sqlite:{}/offline.db?mode=rwc", data_dir.display()),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                auto_sync: true,
                commit_policy: CommitPolicy::ClearAll,
                auto_save_mirror: false,
            },
            remote: RemoteConfig {
                base_url: "http://localhost:8787/api".to_string(),
                request_timeout_secs: 15,
                auth_token: None,
            },
            storage: StorageConfig {
                data_dir: data_dir.display().to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Some(v) = env_non_empty("EDUDASH_DATA_DIR") {
            cfg.database.url = format!("sqlite:{}/offline.db?mode=rwc", v);
            cfg.storage.data_dir = v;
        }
        if let Some(v) = env_non_empty("EDUDASH_DATABASE_URL") {
            cfg.database.url = v;
        }
        if let Ok(v) = std::env::var("EDUDASH_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u64(&v) {
                cfg.database.max_connections = value.min(u32::MAX as u64) as u32;
            }
        }

        if let Ok(v) = std::env::var("EDUDASH_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("EDUDASH_COMMIT_POLICY") {
            if let Some(policy) = CommitPolicy::parse(&v) {
                cfg.sync.commit_policy = policy;
            }
        }
        if let Ok(v) = std::env::var("EDUDASH_AUTO_SAVE_MIRROR") {
            cfg.sync.auto_save_mirror = parse_bool(&v, cfg.sync.auto_save_mirror);
        }

        if let Some(v) = env_non_empty("EDUDASH_REMOTE_URL") {
            cfg.remote.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = std::env::var("EDUDASH_REMOTE_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.remote.request_timeout_secs = value;
            }
        }
        if let Ok(v) = std::env::var("EDUDASH_REMOTE_TOKEN") {
            let token = v.trim().to_string();
            cfg.remote.auth_token = if token.is_empty() { None } else { Some(token) };
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if !self.remote.base_url.starts_with("http://")
            && !self.remote.base_url.starts_with("https://")
        {
            return Err(format!(
                "Remote base_url must be an http(s) URL: {}",
                self.remote.base_url
            ));
        }
        if self.remote.request_timeout_secs == 0 {
            return Err("Remote request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("edudash"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
