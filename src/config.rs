//! Runtime configuration read from the environment
//!
//! ## Server (`vote-monitor`)
//! ```bash
//! COCON_HOST=10.20.30.40        # CoCon room server
//! COCON_PORT=8890
//! COLUMN_LINES=16               # delegates per column
//! ROOM_NAME="ROOM 00"           # page title
//! MONITOR_BIND=0.0.0.0:8000
//! COCON_POLL_TIMEOUT_SECS=35
//! ```
//!
//! ## Display (`vote-display`)
//! ```bash
//! MONITOR_URL=http://127.0.0.1:8000/     # or /noautoprint to disable printing
//! MONITOR_PRINT_CMD="lp /tmp/board.html"
//! MONITOR_HTML_OUT=/tmp/board.html
//! ```

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::error::{MonitorError, MonitorResult};

pub const DEFAULT_COCON_HOST: &str = "10.20.30.40";
pub const DEFAULT_COCON_PORT: u16 = 8890;
pub const DEFAULT_COLUMN_LINES: usize = 16;
pub const DEFAULT_ROOM_NAME: &str = "ROOM 00";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 35;
pub const DEFAULT_MONITOR_URL: &str = "http://127.0.0.1:8000/";

/// Where to find CoCon and how to lay out the board
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub cocon_host: String,
    pub cocon_port: u16,
    pub column_lines: usize,
    pub room_name: String,
    pub bind: SocketAddr,
    pub poll_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cocon_host: DEFAULT_COCON_HOST.to_string(),
            cocon_port: DEFAULT_COCON_PORT,
            column_lines: DEFAULT_COLUMN_LINES,
            room_name: DEFAULT_ROOM_NAME.to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
        }
    }
}

impl MonitorConfig {
    pub fn from_env() -> MonitorResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take the defaults
    pub fn from_lookup<F>(lookup: F) -> MonitorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("MONITOR_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| MonitorError::Config(format!("MONITOR_BIND={}: {}", bind_raw, e)))?;

        let column_lines = parse_or(&lookup, "COLUMN_LINES", DEFAULT_COLUMN_LINES);
        let column_lines = if column_lines == 0 {
            log::warn!("[Config] COLUMN_LINES must be at least 1, using 1");
            1
        } else {
            column_lines
        };

        Ok(Self {
            cocon_host: lookup("COCON_HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COCON_HOST.to_string()),
            cocon_port: parse_or(&lookup, "COCON_PORT", DEFAULT_COCON_PORT),
            column_lines,
            room_name: lookup("ROOM_NAME").unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string()),
            bind,
            poll_timeout: Duration::from_secs(parse_or(
                &lookup,
                "COCON_POLL_TIMEOUT_SECS",
                DEFAULT_POLL_TIMEOUT_SECS,
            )),
        })
    }

    /// Base URL of the CoCon REST interface
    pub fn cocon_base_url(&self) -> String {
        format!("http://{}:{}/CoCon", self.cocon_host, self.cocon_port)
    }
}

/// Command line of `vote-display`
#[derive(Debug, Parser)]
#[command(name = "vote-display", version, about = "Vote board display for a running vote-monitor")]
pub struct DisplayArgs {
    /// Board page URL, e.g. `http://monitor:8000/noautoprint` (default: `MONITOR_URL`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,
}

/// Settings for the `vote-display` client
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Page URL; its host locates `/ws`, its path decides auto-print
    pub page_url: String,
    pub print_command: Option<String>,
    pub html_out: Option<PathBuf>,
}

impl DisplayConfig {
    /// Read from the environment; the URL argument wins over `MONITOR_URL`
    pub fn from_env(args: DisplayArgs) -> Self {
        Self::from_lookup(args.url, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(url_arg: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            page_url: url_arg
                .or_else(|| lookup("MONITOR_URL"))
                .unwrap_or_else(|| DEFAULT_MONITOR_URL.to_string()),
            print_command: lookup("MONITOR_PRINT_CMD").filter(|c| !c.trim().is_empty()),
            html_out: lookup("MONITOR_HTML_OUT").map(PathBuf::from),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("[Config] Invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.cocon_base_url(), "http://10.20.30.40:8890/CoCon");
    }

    #[test]
    fn test_overrides() {
        let config = MonitorConfig::from_lookup(lookup_from(&[
            ("COCON_HOST", "192.168.1.5"),
            ("COCON_PORT", "9000"),
            ("COLUMN_LINES", "8"),
            ("ROOM_NAME", "Plenary"),
            ("MONITOR_BIND", "127.0.0.1:9100"),
        ]))
        .unwrap();
        assert_eq!(config.cocon_host, "192.168.1.5");
        assert_eq!(config.cocon_port, 9000);
        assert_eq!(config.column_lines, 8);
        assert_eq!(config.room_name, "Plenary");
        assert_eq!(config.bind.port(), 9100);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = MonitorConfig::from_lookup(lookup_from(&[
            ("COCON_PORT", "eighty"),
            ("COLUMN_LINES", "0"),
        ]))
        .unwrap();
        assert_eq!(config.cocon_port, DEFAULT_COCON_PORT);
        assert_eq!(config.column_lines, 1);
    }

    #[test]
    fn test_invalid_bind_is_an_error() {
        let result = MonitorConfig::from_lookup(lookup_from(&[("MONITOR_BIND", "nowhere")]));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_display_config() {
        let config = DisplayConfig::from_lookup(
            None,
            lookup_from(&[("MONITOR_URL", "http://board:8000/noautoprint"), ("MONITOR_PRINT_CMD", " ")]),
        );
        assert_eq!(config.page_url, "http://board:8000/noautoprint");
        assert!(config.print_command.is_none());

        let config = DisplayConfig::from_lookup(Some("http://x/".into()), lookup_from(&[]));
        assert_eq!(config.page_url, "http://x/");
    }

    #[test]
    fn test_display_args() {
        let args = DisplayArgs::try_parse_from(["vote-display", "http://board:8000/noautoprint"]).unwrap();
        let config = DisplayConfig::from_lookup(args.url, lookup_from(&[("MONITOR_URL", "http://x/")]));
        assert_eq!(config.page_url, "http://board:8000/noautoprint");

        let args = DisplayArgs::try_parse_from(["vote-display"]).unwrap();
        assert!(args.url.is_none());
    }

    #[test]
    fn test_display_args_reject_flags() {
        // Flags are never mistaken for the page URL
        assert!(DisplayArgs::try_parse_from(["vote-display", "--bogus"]).is_err());
        let help = DisplayArgs::try_parse_from(["vote-display", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
