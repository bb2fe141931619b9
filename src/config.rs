use crate::error::{LensError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const BACKEND_URL_ENV: &str = "PHOTO_LENS_BACKEND_URL";
const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LensError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-lens").join("config.json"))
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        self.backend_url = url;
        self.save()
    }

    /// 接続先を決める（コマンドライン > 環境変数 > 設定ファイル）
    pub fn resolve_backend_url(&self, cli_override: Option<&str>) -> String {
        let env = std::env::var(BACKEND_URL_ENV).ok();
        pick_backend_url(cli_override, env.as_deref(), &self.backend_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn pick_backend_url(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(configured)
        .to_string()
}
