use std::collections::HashMap;
use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::pipeline::Thresholds;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Esports data API base URL
    pub pandascore_api_url: String,

    /// Esports data API bearer token
    pub pandascore_api_token: String,

    /// Interval in seconds for polling running matches
    pub match_poll_interval: u64,

    /// SQLite database path
    pub database_url: String,

    /// Telegram delivery settings; absent = log tips only
    pub telegram: Option<TelegramConfig>,

    /// Global threshold defaults, overridable per league
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let telegram = match (env::var("TELEGRAM_BOT_TOKEN"), env::var("TELEGRAM_CHAT_ID")) {
            (Ok(bot_token), Ok(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id: chat_id
                    .parse()
                    .context("TELEGRAM_CHAT_ID must be a valid number")?,
            }),
            _ => None,
        };

        Ok(Config {
            pandascore_api_url: env::var("PANDASCORE_API_URL")
                .unwrap_or_else(|_| "https://api.pandascore.co".to_string()),

            pandascore_api_token: env::var("PANDASCORE_API_TOKEN")
                .context("PANDASCORE_API_TOKEN must be set")?,

            match_poll_interval: env::var("MATCH_POLL_INTERVAL")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("MATCH_POLL_INTERVAL must be a valid number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/tips.db".to_string()),

            telegram,

            thresholds: thresholds_from_env()?,
        })
    }
}

fn thresholds_from_env() -> Result<Thresholds> {
    let defaults = Thresholds::default();

    let parse = |name: &str, fallback: f64| -> Result<f64> {
        match env::var(name) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("{name} must be a valid number")),
            Err(_) => Ok(fallback),
        }
    };

    Ok(Thresholds {
        min_confidence: parse("MIN_CONFIDENCE", defaults.min_confidence)?,
        min_expected_value_percent: parse(
            "MIN_EXPECTED_VALUE_PERCENT",
            defaults.min_expected_value_percent,
        )?,
        min_data_quality: parse("MIN_DATA_QUALITY", defaults.min_data_quality)?,
    })
}

/// Per-league series format and threshold overrides, with a global fallback.
///
/// Best-of-5 is the default; qualifier stages run best-of-1 and best-of-3, so
/// the format has to be configurable per league.
#[derive(Debug, Clone)]
pub struct LeagueBook {
    default_max_games: u32,
    defaults: Thresholds,
    overrides: HashMap<String, LeagueOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueOverride {
    pub max_games: Option<u32>,
    pub min_confidence: Option<f64>,
    pub min_expected_value_percent: Option<f64>,
    pub min_data_quality: Option<f64>,
}

/// JSON file shape for `data/league_formats.json`
#[derive(Debug, Deserialize)]
struct LeagueBookFile {
    #[serde(default = "default_max_games")]
    default_max_games: u32,
    #[serde(default)]
    leagues: HashMap<String, LeagueOverride>,
}

fn default_max_games() -> u32 {
    5
}

impl LeagueBook {
    /// Book with no per-league overrides
    pub fn new(defaults: Thresholds) -> Self {
        Self {
            default_max_games: default_max_games(),
            defaults,
            overrides: HashMap::new(),
        }
    }

    /// Load overrides from a JSON file
    pub fn load_from_file(path: &Path, defaults: Thresholds) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context("Failed to read league formats file")?;

        let file: LeagueBookFile =
            serde_json::from_str(&content).context("Failed to parse league formats JSON")?;

        let overrides = file
            .leagues
            .into_iter()
            .map(|(league, entry)| (league.to_lowercase(), entry))
            .collect::<HashMap<_, _>>();

        info!("Loaded {} league format overrides", overrides.len());

        Ok(Self {
            default_max_games: file.default_max_games,
            defaults,
            overrides,
        })
    }

    /// Series format and thresholds for a league, falling back to defaults
    pub fn rules_for(&self, league_name: &str) -> (u32, Thresholds) {
        match self.overrides.get(&league_name.trim().to_lowercase()) {
            Some(entry) => {
                let thresholds = Thresholds {
                    min_confidence: entry.min_confidence.unwrap_or(self.defaults.min_confidence),
                    min_expected_value_percent: entry
                        .min_expected_value_percent
                        .unwrap_or(self.defaults.min_expected_value_percent),
                    min_data_quality: entry
                        .min_data_quality
                        .unwrap_or(self.defaults.min_data_quality),
                };
                (entry.max_games.unwrap_or(self.default_max_games), thresholds)
            }
            None => (self.default_max_games, self.defaults),
        }
    }
}
