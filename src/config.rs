use std::path::PathBuf;
use std::{env, fs};

use serde::Deserialize;

use crate::leaderboard::renderer::ChangeIcons;
use crate::util::dates;

#[derive(Debug, Deserialize, Clone)]
struct FileConfig {
    pub api_key: String,
    pub webhook: String,
    pub bind_addr: String,
    pub snapshot_dir: String,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub player_groups: Vec<PlayerGroup>,
    #[serde(default)]
    pub custom_emoji: CustomEmoji,
    pub log: FileLogConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct FileLogConfig {
    pub level: String,
    pub path: String,
    pub json_path: String,
}

/// One named tracking group; its emoji is rendered next to every member.
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerGroup {
    pub group: String,
    pub emoji: String,
    pub players: Vec<String>,
}

/// Overrides for the new/up/down change icons. Unset entries keep the
/// defaults; the unchanged marker is intentionally not listed here.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CustomEmoji {
    pub up: Option<String>,
    pub down: Option<String>,
    pub new: Option<String>,
}

impl CustomEmoji {
    pub fn to_icons(&self) -> ChangeIcons {
        let defaults = ChangeIcons::default();
        ChangeIcons {
            up: self.up.clone().unwrap_or(defaults.up),
            down: self.down.clone().unwrap_or(defaults.down),
            new: self.new.clone().unwrap_or(defaults.new),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_minutes: u64,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub path: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub webhook: String,
    pub bind_addr: String,
    pub snapshot_dir: PathBuf,
    pub players: Vec<String>,
    pub player_groups: Vec<PlayerGroup>,
    pub custom_emoji: CustomEmoji,
    pub log: LogConfig,
    pub scheduler: SchedulerConfig,
}

fn expand_tilde(path: &str) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    if path.starts_with("~/") {
        let home = env::var("HOME")?;
        Ok(PathBuf::from(path.replacen("~", &home, 1)))
    } else {
        Ok(PathBuf::from(path))
    }
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
    let exe_path = env::current_exe()?;
    let config_path = match exe_path.parent() {
        Some(dir) => dir.join("rankcord.toml"),
        _ => return Err("failed to determine executable directory".into()),
    };

    if !config_path.exists() || !config_path.is_file() {
        return Err(format!(
            "Config file does not exist or is not a file: {}",
            config_path.display()
        )
        .into());
    }
    let s = fs::read_to_string(&config_path)?;
    let cfg: FileConfig = toml::from_str(&s)?;

    if cfg.webhook.is_empty() {
        return Err("webhook URL must be configured".into());
    }

    Ok(AppConfig {
        api_key: cfg.api_key,
        webhook: cfg.webhook,
        bind_addr: cfg.bind_addr,
        snapshot_dir: expand_tilde(&cfg.snapshot_dir)?,
        players: cfg.players,
        player_groups: cfg.player_groups,
        custom_emoji: cfg.custom_emoji,
        log: build_log_config(cfg.log)?,
        scheduler: cfg.scheduler,
    })
}

fn build_log_config(
    file_log: FileLogConfig,
) -> Result<LogConfig, Box<dyn std::error::Error + Send + Sync>> {
    let path = log_file_replacements(&file_log.path)?;
    if path.exists() && !path.is_file() {
        return Err(format!("Log path exists but is not a file: {}", &file_log.path).into());
    }

    let json_path = log_file_replacements(&file_log.json_path)?;
    if json_path.exists() && !json_path.is_file() {
        return Err(format!("Log path exists but is not a file: {}", &file_log.json_path).into());
    }

    Ok(LogConfig {
        level: file_log.level,
        path,
        json_path,
    })
}

fn log_file_replacements(
    cfg_path: &str,
) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    let date_str = dates::local_date_yyyy_mm_dd();
    let replaced = cfg_path.replace("{DATE}", &date_str);
    expand_tilde(&replaced)
}
