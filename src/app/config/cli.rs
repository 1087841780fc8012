use super::merge::merge_field;
use super::{ConfigError, LogLevel, Protocol, TimestampPrecision};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[command(
    author,
    version,
    about = "Send a GELF message to a Graylog input",
    long_about = None
)]
#[serde(default)]
pub struct Config {
    /// The Graylog server
    #[arg(short = 'g', long = "graylog", env = "GELF_GRAYLOG_HOST", default_value = "localhost")]
    pub graylog_host: String,

    /// The port of the Graylog input
    #[arg(short = 'p', long = "port", env = "GELF_GRAYLOG_PORT", default_value = "12201")]
    pub graylog_port: u16,

    /// Echo every message to stdout before sending it
    #[arg(short = 'v', long, env = "GELF_VERBOSE")]
    pub verbose: bool,

    /// Number of messages to send
    #[arg(short = 'c', long, env = "GELF_COUNT", default_value = "1")]
    pub count: u64,

    /// Sleep time in milliseconds between sends
    #[arg(short = 's', long = "sleep", env = "GELF_SLEEP_MS", default_value = "0")]
    pub sleep_ms: u64,

    /// The log type (APP or EVENT)
    #[arg(short = 't', long = "logtype", env = "GELF_LOG_TYPE", default_value = "APP")]
    pub log_type: String,

    /// The _source_env field of the message
    #[arg(short = 'e', long = "sourceenv", env = "GELF_SOURCE_ENV", default_value = "dev")]
    pub source_env: String,

    /// The protocol used to reach the Graylog input
    #[arg(short = 'P', long, env = "GELF_PROTOCOL", default_value = "tcp")]
    pub protocol: Protocol,

    /// Precision of the timestamp field
    #[arg(
        short = 'T',
        long,
        env = "GELF_TIMESTAMP_PRECISION",
        default_value = "millis"
    )]
    pub timestamp_precision: TimestampPrecision,

    /// Host field of the message (defaults to the local hostname)
    #[arg(long, env = "GELF_SOURCE_HOST")]
    pub source_host: Option<String>,

    /// Log level of the tool's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Configuration file path (optional)
    #[arg(long, env = "GELF_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Message text; one line is read from stdin when omitted
    #[arg(trailing_var_arg = true)]
    #[serde(skip)]
    pub message: Vec<String>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub sleep: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graylog_host: "localhost".to_string(),
            graylog_port: 12201,
            verbose: false,
            count: 1,
            sleep_ms: 0,
            log_type: "APP".to_string(),
            source_env: "dev".to_string(),
            protocol: Protocol::Tcp,
            timestamp_precision: TimestampPrecision::Millis,
            source_host: None,
            log_level: LogLevel::Warn,
            config_file: None,
            message: Vec::new(),
            sleep: Duration::ZERO,
        }
    }
}

impl Config {
    /// Parse command-line arguments only; `--config-file` is not read.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    /// Parse command-line arguments (clap also reads the `GELF_*` environment
    /// variables) and fill the remaining defaults from `--config-file`.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);

        if let Some(path) = config.config_file.clone() {
            let file_config = Self::read_file(&path)?;
            config.merge_file(file_config);
        }

        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path.as_ref())?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn merge_file(&mut self, file: Config) {
        let default = Config::default();

        merge_field(&mut self.graylog_host, file.graylog_host, &default.graylog_host);
        merge_field(&mut self.graylog_port, file.graylog_port, &default.graylog_port);
        merge_field(&mut self.verbose, file.verbose, &default.verbose);
        merge_field(&mut self.count, file.count, &default.count);
        merge_field(&mut self.sleep_ms, file.sleep_ms, &default.sleep_ms);
        merge_field(&mut self.log_type, file.log_type, &default.log_type);
        merge_field(&mut self.source_env, file.source_env, &default.source_env);
        merge_field(&mut self.protocol, file.protocol, &default.protocol);
        merge_field(
            &mut self.timestamp_precision,
            file.timestamp_precision,
            &default.timestamp_precision,
        );
        merge_field(&mut self.source_host, file.source_host, &default.source_host);
        merge_field(&mut self.log_level, file.log_level, &default.log_level);
    }

    pub fn post_process(&mut self) {
        self.sleep = Duration::from_millis(self.sleep_ms);
    }

    /// `host:port` of the Graylog input.
    pub fn target_address(&self) -> String {
        format!("{}:{}", self.graylog_host, self.graylog_port)
    }
}
