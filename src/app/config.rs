use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// ステータス取得コマンド設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// 実行ファイル（Windows では sf.cmd）
    #[serde(default = "default_program")]
    pub program: String,
    /// 引数（JSON 出力を要求すること）
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> String {
    if cfg!(windows) {
        "sf.cmd".to_string()
    } else {
        "sf".to_string()
    }
}

fn default_args() -> Vec<String> {
    vec![
        "package:version:create:list".to_string(),
        "--json".to_string(),
    ]
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

/// ポーリング設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// 試行間隔（秒）
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// --timeout 未指定時のタイムアウト（秒）
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    1200
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            default_timeout_secs: default_timeout_secs(),
        }
    }
}

impl PollConfig {
    /// 試行間隔（0 は 1 秒に切り上げ）
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// デスクトップ通知設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 通知を出すか
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 通知音を鳴らすか
    #[serde(default = "default_true")]
    pub sound: bool,
    /// 表示時間（秒）
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u32,
    /// アイコン（未設定時は実行ファイル隣の assets/package.png）
    #[serde(default)]
    pub icon_path: Option<PathBuf>,
    /// 通知タイトル
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_true() -> bool {
    true
}

fn default_notification_timeout() -> u32 {
    30
}

fn default_title() -> String {
    "Latest Packaging Version Creation Complete".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            timeout_secs: default_notification_timeout(),
            icon_path: None,
            title: default_title(),
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    /// 指定パスから読み込み
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// 値の妥当性チェック（CLI で上書きした後にも呼ぶ）
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_secs == 0 {
            anyhow::bail!("poll.interval_secs must be at least 1");
        }
        Ok(())
    }

    /// 設定ファイルパスを取得
    pub fn config_path() -> Result<PathBuf> {
        // ~/.config/pkgvsn-monitor/config.toml を使用
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
        Ok(base_dirs.home_dir().join(".config/pkgvsn-monitor/config.toml"))
    }

    /// 指定パスに保存
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
