//! Server configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the match server process.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub matches: MatchSettings,
    /// Capacity of the orchestrator command channel.
    pub command_buffer: usize,
    /// Directory holding `config.toml`, `cards.toml` and `classes.ron`.
    /// The built-in content is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Directory for the rolling log file. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::DEFAULT_BIND_ADDR.to_string(),
            matches: MatchSettings::default(),
            command_buffer: Self::DEFAULT_COMMAND_BUFFER,
            content_dir: None,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "127.0.0.1:3000";
    pub const DEFAULT_COMMAND_BUFFER: usize = 64;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUEL_BIND_ADDR` - Listen address (default: 127.0.0.1:3000)
    /// - `DUEL_TURN_TIMEOUT_MS` - Turn timeout, 0 disables (default: 60000)
    /// - `DUEL_RESULT_GRACE_MS` - How long finished matches are kept (default: 60000)
    /// - `DUEL_COMMAND_BUFFER` - Orchestrator queue size (default: 64)
    /// - `DUEL_CONTENT_DIR` - Content data directory (default: built-in content)
    /// - `DUEL_LOG_DIR` - Log file directory (default: stderr only)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("DUEL_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(ms) = read_env::<u64>("DUEL_TURN_TIMEOUT_MS") {
            config.matches.turn_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(ms) = read_env::<u64>("DUEL_RESULT_GRACE_MS") {
            config.matches.result_grace = Duration::from_millis(ms);
        }

        if let Some(capacity) = read_env::<usize>("DUEL_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }

        config.content_dir = env::var("DUEL_CONTENT_DIR").ok().map(PathBuf::from);
        config.log_dir = env::var("DUEL_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

/// Timing rules applied to every match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSettings {
    /// Idle time after which the current side's turn is ended for them.
    pub turn_timeout: Option<Duration>,
    /// How long a finished match stays addressable before disposal.
    pub result_grace: Duration,
}

impl MatchSettings {
    pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_RESULT_GRACE: Duration = Duration::from_secs(60);
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            turn_timeout: Some(Self::DEFAULT_TURN_TIMEOUT),
            result_grace: Self::DEFAULT_RESULT_GRACE,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.matches.turn_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.matches.result_grace, Duration::from_secs(60));
        assert!(config.content_dir.is_none());
    }
}
