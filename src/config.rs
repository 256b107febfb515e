use crate::cli::Cli;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "BAZOS_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("minimum price {min} is above maximum price {max}")]
    PriceWindow { min: u64, max: u64 },
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Telegram credentials, kept out of the CLI/env settings.
#[derive(Debug, Deserialize)]
pub struct NotifierConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
}

pub fn load_notifier_config(path: &Path) -> Result<NotifierConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: NotifierConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub query: String,
    pub zip_code: u32,
    pub distance_km: u32,
    pub min_price: u64,
    pub max_price: u64,
    pub n_ads: usize,
    pub wanted_years: Vec<u16>,
    pub send_report: bool,
    pub workers: usize,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub template: Option<PathBuf>,
    pub notifier_config: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            query: "macbook".to_string(),
            zip_code: 10400,
            distance_km: 50,
            min_price: 15000,
            max_price: 25000,
            n_ads: 100,
            wanted_years: vec![2019, 2020],
            send_report: false,
            workers: std::thread::available_parallelism().map_or(4, |n| n.get()),
            data_dir: PathBuf::from("data"),
            db_path: PathBuf::from("data.db"),
            template: None,
            notifier_config: PathBuf::from("notifier.json"),
        }
    }
}

/// Raw `BAZOS_*` environment values, parsed lazily by [`resolve`].
#[derive(Debug, Default)]
pub struct EnvArgs {
    pub query: Option<String>,
    pub zip_code: Option<String>,
    pub dist: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub n_ads: Option<String>,
    pub years: Option<String>,
    pub send_report: Option<String>,
    pub workers: Option<String>,
    pub data_dir: Option<String>,
    pub db_path: Option<String>,
    pub template: Option<String>,
    pub notifier_config: Option<String>,
}

impl EnvArgs {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every setting through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty());
        Self {
            query: get("QUERY"),
            zip_code: get("ZIP_CODE"),
            dist: get("DIST"),
            min_price: get("MIN_P"),
            max_price: get("MAX_P"),
            n_ads: get("N_ADS"),
            years: get("MB_YEARS"),
            send_report: get("SEND_MAIL"),
            workers: get("WORKERS"),
            data_dir: get("DATA_DIR"),
            db_path: get("DB_PATH"),
            template: get("TEMPLATE"),
            notifier_config: get("NOTIFIER_CONFIG"),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: Option<&str>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: format!("{ENV_PREFIX}{key}"),
                value: v.to_string(),
            })
        })
        .transpose()
}

fn parse_env_years(value: Option<&str>) -> Result<Option<Vec<u16>>, ConfigError> {
    value
        .map(|v| {
            v.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                        key: format!("{ENV_PREFIX}MB_YEARS"),
                        value: v.to_string(),
                    })
                })
                .collect::<Result<Vec<u16>, _>>()
        })
        .transpose()
}

fn parse_env_flag(value: Option<&str>) -> Result<Option<bool>, ConfigError> {
    value
        .map(|v| match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: format!("{ENV_PREFIX}SEND_MAIL"),
                value: v.to_string(),
            }),
        })
        .transpose()
}

/// Coalesces command line, environment and defaults, in that order.
pub fn resolve(cli: Cli, env: &EnvArgs) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let config = AppConfig {
        query: cli.query.or_else(|| env.query.clone()).unwrap_or(defaults.query),
        zip_code: cli
            .zip_code
            .or(parse_env("ZIP_CODE", env.zip_code.as_deref())?)
            .unwrap_or(defaults.zip_code),
        distance_km: cli.dist.or(parse_env("DIST", env.dist.as_deref())?).unwrap_or(defaults.distance_km),
        min_price: cli
            .min_price
            .or(parse_env("MIN_P", env.min_price.as_deref())?)
            .unwrap_or(defaults.min_price),
        max_price: cli
            .max_price
            .or(parse_env("MAX_P", env.max_price.as_deref())?)
            .unwrap_or(defaults.max_price),
        n_ads: cli.n_ads.or(parse_env("N_ADS", env.n_ads.as_deref())?).unwrap_or(defaults.n_ads),
        wanted_years: cli
            .years
            .filter(|years| !years.is_empty())
            .or(parse_env_years(env.years.as_deref())?)
            .unwrap_or(defaults.wanted_years),
        send_report: cli.send_report
            || parse_env_flag(env.send_report.as_deref())?.unwrap_or(defaults.send_report),
        workers: cli
            .workers
            .or(parse_env("WORKERS", env.workers.as_deref())?)
            .unwrap_or(defaults.workers)
            .max(1),
        data_dir: cli.data_dir.or_else(|| env.data_dir.as_ref().map(PathBuf::from)).unwrap_or(defaults.data_dir),
        db_path: cli.db_path.or_else(|| env.db_path.as_ref().map(PathBuf::from)).unwrap_or(defaults.db_path),
        template: cli.template.or_else(|| env.template.as_ref().map(PathBuf::from)),
        notifier_config: cli
            .notifier_config
            .or_else(|| env.notifier_config.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.notifier_config),
    };

    if config.min_price > config.max_price {
        return Err(ConfigError::PriceWindow {
            min: config.min_price,
            max: config.max_price,
        });
    }

    Ok(config)
}
