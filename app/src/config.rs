// castcart/app/src/config.rs

use crate::errors::{AppError, Result};
use castcart::command::validate_rate;
use castcart::Settings;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub db_acquire_timeout_secs: u64,
  pub run_migrations: bool,
  pub seed_db: bool,
  pub log_format: LogFormat,
  pub settings: Settings,
}

/// Reads `name`, falling back to `default` when unset, and parses it.
fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  let raw = env::var(name).unwrap_or_else(|_| default.to_string());
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_var::<u16>("SERVER_PORT", "8080")?;
    let database_url = get_env("DATABASE_URL")?;

    let db_max_connections = parse_var::<u32>("DB_MAX_CONNECTIONS", "10")?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    let db_acquire_timeout_secs = parse_var::<u64>("DB_ACQUIRE_TIMEOUT_SECS", "5")?;
    let run_migrations = parse_var::<bool>("RUN_MIGRATIONS", "true")?;
    let seed_db = parse_var::<bool>("SEED_DB", "false")?;

    let log_format = match get_env("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()).as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT value '{}': expected 'pretty' or 'json'",
          other
        )))
      }
    };

    let defaults = Settings::default();
    let default_commission_rate = validate_rate(parse_var::<Decimal>("DEFAULT_COMMISSION_RATE", "0.20")?)
      .map_err(|e| AppError::Config(format!("Invalid DEFAULT_COMMISSION_RATE: {}", e)))?;
    let default_analytics_window_days = parse_var::<u32>("ANALYTICS_WINDOW_DAYS", "30")?;
    if default_analytics_window_days == 0 || default_analytics_window_days > defaults.max_analytics_window_days {
      return Err(AppError::Config(format!(
        "ANALYTICS_WINDOW_DAYS must be between 1 and {}",
        defaults.max_analytics_window_days
      )));
    }
    let max_page_size = parse_var::<i64>("MAX_PAGE_SIZE", "100")?;
    if max_page_size < 1 {
      return Err(AppError::Config("MAX_PAGE_SIZE must be at least 1".to_string()));
    }

    let settings = Settings {
      default_commission_rate,
      default_analytics_window_days,
      max_page_size,
      default_page_size: defaults.default_page_size.min(max_page_size),
      ..defaults
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      db_acquire_timeout_secs,
      run_migrations,
      seed_db,
      log_format,
      settings,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 8] = [
    "DATABASE_URL",
    "SERVER_PORT",
    "DB_MAX_CONNECTIONS",
    "LOG_FORMAT",
    "DEFAULT_COMMISSION_RATE",
    "ANALYTICS_WINDOW_DAYS",
    "MAX_PAGE_SIZE",
    "SEED_DB",
  ];

  fn reset() {
    for var in VARS {
      env::remove_var(var);
    }
    env::set_var("DATABASE_URL", "postgres://castcart@localhost/castcart");
  }

  #[test]
  #[serial]
  fn defaults_apply() {
    reset();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.db_max_connections, 10);
    assert!(config.run_migrations);
    assert!(!config.seed_db);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(config.settings.default_commission_rate, Decimal::new(20, 2));
    assert_eq!(config.settings.max_page_size, 100);
  }

  #[test]
  #[serial]
  fn database_url_is_required() {
    reset();
    env::remove_var("DATABASE_URL");
    assert!(matches!(AppConfig::from_env(), Err(AppError::Config(m)) if m.contains("DATABASE_URL")));
  }

  #[test]
  #[serial]
  fn invalid_values_fail() {
    for (var, value) in [
      ("SERVER_PORT", "eighty"),
      ("LOG_FORMAT", "xml"),
      ("DEFAULT_COMMISSION_RATE", "1.5"),
      ("DEFAULT_COMMISSION_RATE", "0.125"),
      ("ANALYTICS_WINDOW_DAYS", "0"),
      ("MAX_PAGE_SIZE", "0"),
      ("SEED_DB", "yes"),
    ] {
      reset();
      env::set_var(var, value);
      assert!(AppConfig::from_env().is_err(), "{}={} accepted", var, value);
    }
    reset();
  }

  #[test]
  #[serial]
  fn commission_rate_follows_podcast_rule() {
    reset();
    env::set_var("DEFAULT_COMMISSION_RATE", "0.125");
    assert!(matches!(AppConfig::from_env(), Err(AppError::Config(m)) if m.contains("two decimal places")));
    env::set_var("DEFAULT_COMMISSION_RATE", "0.35");
    assert_eq!(AppConfig::from_env().unwrap().settings.default_commission_rate, Decimal::new(35, 2));
    reset();
  }

  #[test]
  #[serial]
  fn page_size_cap_lowers_default() {
    reset();
    env::set_var("MAX_PAGE_SIZE", "10");
    env::set_var("LOG_FORMAT", "json");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.settings.default_page_size, 10);
    assert_eq!(config.log_format, LogFormat::Json);
    reset();
  }
}
