//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_CONCURRENCY,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for the `techscan` binary.
#[derive(Debug, Parser)]
#[command(
    name = "techscan",
    version,
    about = "Fetch a list of URLs concurrently and fingerprint the web technologies behind each one"
)]
pub struct Opt {
    /// Path to file containing list of URLs (one per line)
    #[arg(short = 'l', long = "list", value_name = "PATH")]
    pub list: PathBuf,

    /// Number of concurrent fetches
    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = parse_concurrency
    )]
    pub threads: usize,

    /// Output JSON file path
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Fingerprint ruleset file or directory (Wappalyzer technologies JSON).
    /// Uses the bundled ruleset when omitted.
    #[arg(long, value_name = "PATH")]
    pub fingerprints: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    let n: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a valid number"))?;
    if n == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if n > MAX_CONCURRENCY {
        return Err(format!("concurrency must be at most {MAX_CONCURRENCY}"));
    }
    Ok(n)
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without going through argument parsing.
///
/// # Examples
///
/// ```no_run
/// use techscan::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     list_file: PathBuf::from("urls.txt"),
///     output: PathBuf::from("results.json"),
///     concurrency: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read URLs from
    pub list_file: PathBuf,

    /// Output JSON file
    pub output: PathBuf,

    /// Maximum concurrent fetches
    pub concurrency: usize,

    /// Per-request timeout in seconds (0 = none)
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Fingerprint ruleset path; `None` uses the bundled ruleset
    pub fingerprints: Option<PathBuf>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_file: PathBuf::from("urls.txt"),
            output: PathBuf::from("results.json"),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fingerprints: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            list_file: opt.list,
            output: opt.output,
            concurrency: opt.threads,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            fingerprints: opt.fingerprints,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_opt_short_flags() {
        let opt = Opt::try_parse_from(["techscan", "-l", "urls.txt", "-t", "2", "-o", "out.json"])
            .expect("Should parse short flags");
        assert_eq!(opt.list, PathBuf::from("urls.txt"));
        assert_eq!(opt.threads, 2);
        assert_eq!(opt.output, PathBuf::from("out.json"));
        assert!(opt.fingerprints.is_none());
    }

    #[test]
    fn test_opt_defaults() {
        let opt = Opt::try_parse_from(["techscan", "-l", "urls.txt", "-o", "out.json"])
            .expect("Should parse with defaults");
        assert_eq!(opt.threads, DEFAULT_CONCURRENCY);
        assert_eq!(opt.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(opt.user_agent, DEFAULT_USER_AGENT);
        match opt.log_format {
            LogFormat::Plain => {}
            LogFormat::Json => panic!("Default log format should be Plain"),
        }
    }

    #[test]
    fn test_opt_missing_list_is_error() {
        let result = Opt::try_parse_from(["techscan", "-o", "out.json"]);
        assert!(result.is_err(), "Missing -l should fail");
    }

    #[test]
    fn test_opt_missing_output_is_error() {
        let result = Opt::try_parse_from(["techscan", "-l", "urls.txt"]);
        assert!(result.is_err(), "Missing -o should fail");
    }

    #[test]
    fn test_opt_zero_threads_is_error() {
        let result = Opt::try_parse_from(["techscan", "-l", "urls.txt", "-o", "o.json", "-t", "0"]);
        let error = result.expect_err("-t 0 should be rejected");
        assert!(
            error.to_string().contains("at least 1"),
            "Unexpected error message: {}",
            error
        );
    }

    #[test]
    fn test_opt_threads_above_permit_ceiling_is_error() {
        let too_many = (MAX_CONCURRENCY + 1).to_string();
        let result = Opt::try_parse_from([
            "techscan", "-l", "urls.txt", "-o", "o.json", "-t", &too_many,
        ]);
        let error = result.expect_err("-t above the permit ceiling should be rejected");
        assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(error.to_string().contains("at most"), "Unexpected error message: {}", error);

        let max = MAX_CONCURRENCY.to_string();
        let opt = Opt::try_parse_from(["techscan", "-l", "urls.txt", "-o", "o.json", "-t", &max])
            .expect("The permit ceiling itself is accepted");
        assert_eq!(opt.threads, MAX_CONCURRENCY);
    }

    #[test]
    fn test_opt_non_numeric_threads_is_error() {
        let result =
            Opt::try_parse_from(["techscan", "-l", "urls.txt", "-o", "o.json", "-t", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_opt() {
        let opt = Opt::try_parse_from([
            "techscan",
            "--list",
            "in.txt",
            "--output",
            "out.json",
            "--threads",
            "8",
            "--timeout-seconds",
            "0",
            "--user-agent",
            "custom/1.0",
            "--fingerprints",
            "rules.json",
        ])
        .expect("Should parse long flags");
        let config = Config::from(opt);
        assert_eq!(config.list_file, PathBuf::from("in.txt"));
        assert_eq!(config.output, PathBuf::from("out.json"));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.timeout_seconds, 0);
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.fingerprints, Some(PathBuf::from("rules.json")));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.fingerprints.is_none());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
