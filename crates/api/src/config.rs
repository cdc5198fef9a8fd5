//! Application configuration loaded from environment variables.

use std::time::Duration;

use dashboard::DashboardConfig;
use orchestration::OrchestratorConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres ledger; unset runs on a seeded in-memory ledger
/// - `MAX_DELEGATION_HOPS`: role transitions allowed per turn (default: `16`)
/// - `INVENTORY_MAX_AGE_SECS`: if set, a snapshot younger than this is used
///   for checkout without re-reading the ledger (default: unset, always re-read)
/// - `DASHBOARD_INTERVAL_SECS`: dashboard poll interval (default: `5`)
/// - `DASHBOARD_MAX_REFRESHES`: polls before the dashboard stops (default: `1000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub max_delegation_hops: usize,
    pub inventory_max_age_secs: Option<i64>,
    pub dashboard_interval_secs: u64,
    pub dashboard_max_refreshes: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_delegation_hops: env_or("MAX_DELEGATION_HOPS", defaults.max_delegation_hops),
            inventory_max_age_secs: std::env::var("INVENTORY_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.inventory_max_age_secs),
            dashboard_interval_secs: env_or("DASHBOARD_INTERVAL_SECS", defaults.dashboard_interval_secs),
            dashboard_max_refreshes: env_or("DASHBOARD_MAX_REFRESHES", defaults.dashboard_max_refreshes),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_hops: self.max_delegation_hops,
            inventory_max_age: self.inventory_max_age_secs.map(chrono::Duration::seconds),
            ..OrchestratorConfig::default()
        }
    }

    pub fn dashboard(&self) -> DashboardConfig {
        DashboardConfig {
            interval: Duration::from_secs(self.dashboard_interval_secs),
            max_refreshes: self.dashboard_max_refreshes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            max_delegation_hops: 16,
            inventory_max_age_secs: None,
            dashboard_interval_secs: 5,
            dashboard_max_refreshes: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.max_delegation_hops, 16);
        assert!(config.orchestrator().inventory_max_age.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_orchestrator_config() {
        let config = Config {
            max_delegation_hops: 4,
            inventory_max_age_secs: Some(10),
            ..Config::default()
        };
        let orchestrator = config.orchestrator();
        assert_eq!(orchestrator.max_hops, 4);
        assert_eq!(orchestrator.inventory_max_age, Some(chrono::Duration::seconds(10)));
    }

    #[test]
    fn test_dashboard_config() {
        let dashboard = Config::default().dashboard();
        assert_eq!(dashboard.interval, Duration::from_secs(5));
        assert_eq!(dashboard.max_refreshes, 1000);
    }
}
