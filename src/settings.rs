//! Runtime settings.
//!
//! Loaded once at startup from a config file (`levelwatch.json` unless
//! `--config` says otherwise) layered with `LEVELWATCH_*` environment
//! variables. Key names from older `config.json` deployments
//! (`DISCORD_TOKEN`, `checkInterval`, `monitoredPlayers`, ...) are accepted
//! as aliases.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};

use crate::schedule::{CheckSchedule, ScheduleError};
use crate::store::Seed;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "levelwatch.json";

#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(alias = "DISCORD_TOKEN")]
    pub discord_token: String,

    #[serde(
        alias = "DISCORD_CHANNEL_ID",
        alias = "discord_channel_id",
        deserialize_with = "id"
    )]
    pub broadcast_channel_id: String,

    #[serde(
        alias = "DISCORD_CHANNEL_COMMAND_ID",
        alias = "discord_channel_command_id",
        deserialize_with = "id"
    )]
    pub command_channel_id: String,

    #[serde(
        default = "default_check_interval",
        alias = "checkInterval",
        alias = "checkinterval"
    )]
    pub check_interval: String,

    /// Only used to seed a fresh state file.
    #[serde(
        default,
        alias = "monitoredPlayers",
        alias = "monitoredplayers",
        deserialize_with = "names"
    )]
    pub monitored_players: Vec<String>,

    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    #[serde(default)]
    pub legacy_levels_path: Option<PathBuf>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_command_poll_secs")]
    pub command_poll_secs: u64,

    #[serde(default = "default_discord_api_base")]
    pub discord_api_base: String,
}

fn default_check_interval() -> String {
    "*/5 * * * *".to_string()
}

fn default_listing_url() -> String {
    levelwatch_adapters::listing::DEFAULT_LISTING_URL.to_string()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("levelwatch-state.json")
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_command_poll_secs() -> u64 {
    3
}

fn default_discord_api_base() -> String {
    levelwatch_adapters::discord::DEFAULT_API_BASE.to_string()
}

/// Channel ids are snowflakes; accept them quoted or as bare numbers.
fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s.trim().to_string(),
        Id::Number(n) => n.to_string(),
    })
}

/// A list of names, or one comma-separated string (handy in env vars).
fn names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        List(Vec<String>),
        Joined(String),
    }

    let names = match Names::deserialize(deserializer)? {
        Names::List(list) => list,
        Names::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

impl Settings {
    /// Load settings from `path` (or [`DEFAULT_CONFIG_FILE`] if it exists)
    /// and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("LEVELWATCH"))
            .build()
            .context("Failed to read configuration")?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already built [`Config`].
    pub fn from_config(config: Config) -> Result<Self> {
        let settings: Self = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.check_schedule()?;
        Ok(settings)
    }

    /// The parsed check interval.
    pub fn check_schedule(&self) -> Result<CheckSchedule, ScheduleError> {
        CheckSchedule::parse(&self.check_interval)
    }

    /// Initial contents for a state file that does not exist yet.
    pub fn seed(&self) -> Seed {
        Seed {
            monitored: self.monitored_players.clone(),
            legacy_levels: self.legacy_levels_path.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn command_poll_interval(&self) -> Duration {
        Duration::from_secs(self.command_poll_secs.max(1))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("discord_token", &"<redacted>")
            .field("broadcast_channel_id", &self.broadcast_channel_id)
            .field("command_channel_id", &self.command_channel_id)
            .field("check_interval", &self.check_interval)
            .field("monitored_players", &self.monitored_players)
            .field("listing_url", &self.listing_url)
            .field("state_path", &self.state_path)
            .field("legacy_levels_path", &self.legacy_levels_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("command_poll_secs", &self.command_poll_secs)
            .field("discord_api_base", &self.discord_api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_json(json: &str) -> Result<Settings> {
        let config = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?;
        Settings::from_config(config)
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = from_json(
            r#"{
                "discord_token": "abc",
                "broadcast_channel_id": "100",
                "command_channel_id": "200"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.check_interval, "*/5 * * * *");
        assert_eq!(settings.state_path, PathBuf::from("levelwatch-state.json"));
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.command_poll_interval(), Duration::from_secs(3));
        assert!(settings.monitored_players.is_empty());
        assert!(settings.listing_url.ends_with("onlinelist.php"));
    }

    #[test]
    fn test_legacy_key_names() {
        let settings = from_json(
            r#"{
                "DISCORD_TOKEN": "abc",
                "DISCORD_CHANNEL_ID": 100,
                "DISCORD_CHANNEL_COMMAND_ID": "200",
                "checkInterval": "*/10 * * * *",
                "monitoredPlayers": ["Knight", " Mage "]
            }"#,
        )
        .unwrap();

        assert_eq!(settings.discord_token, "abc");
        assert_eq!(settings.broadcast_channel_id, "100");
        assert_eq!(settings.command_channel_id, "200");
        assert_eq!(settings.check_interval, "*/10 * * * *");
        assert_eq!(settings.monitored_players, vec!["Knight", "Mage"]);
    }

    #[test]
    fn test_comma_separated_players() {
        let settings = from_json(
            r#"{
                "discord_token": "abc",
                "broadcast_channel_id": "100",
                "command_channel_id": "200",
                "monitored_players": "Knight, Mage,,"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.seed().monitored, vec!["Knight", "Mage"]);
    }

    #[test]
    fn test_invalid_schedule_is_rejected() {
        let result = from_json(
            r#"{
                "discord_token": "abc",
                "broadcast_channel_id": "100",
                "command_channel_id": "200",
                "check_interval": "whenever"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let result = from_json(r#"{ "broadcast_channel_id": "100", "command_channel_id": "200" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let settings = from_json(
            r#"{
                "discord_token": "very-secret",
                "broadcast_channel_id": "100",
                "command_channel_id": "200"
            }"#,
        )
        .unwrap();
        assert!(!format!("{:?}", settings).contains("very-secret"));
    }
}
