pub mod config;
pub mod logging_system;

pub use config::{Config, ConfigError, LogLevel, Protocol, TimestampPrecision};
pub use logging_system::{LoggingError, setup_logging};

use crate::domain::{GelfError, GelfRecord, compose_message, resolve_host};
use crate::sender::Transport;
use chrono::Local;
use std::io::BufRead;
use std::process;
use tracing::{debug, error, info};

/// What a completed run put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_sent: u64,
    pub bytes_sent: u64,
}

/// One invocation: an immutable configuration and the record it re-sends.
#[derive(Debug)]
pub struct App {
    config: Config,
    record: GelfRecord,
}

impl App {
    /// Resolve the host, compose the message and build the template record.
    ///
    /// `input` is only read when the configuration carries no message arguments.
    pub fn from_config<R: BufRead>(config: Config, input: R) -> Result<Self, GelfError> {
        let host = resolve_host(config.source_host.as_deref())?;
        let message = compose_message(&config.message, input);
        let record = GelfRecord::new(
            host,
            message,
            config.log_type.clone(),
            config.source_env.clone(),
        );

        debug!(
            host = %record.host,
            log_type = %record.log_type,
            type_tag = %record.type_tag,
            "Built GELF record template"
        );

        Ok(Self { config, record })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn record(&self) -> &GelfRecord {
        &self.record
    }

    /// Open the connection, send `count` records and close the connection.
    ///
    /// The connection is closed exactly once whether the loop finished or
    /// failed; the first error aborts the remaining sends.
    pub async fn run(mut self) -> Result<RunSummary, GelfError> {
        let mut transport = Transport::open(
            &self.config.graylog_host,
            self.config.graylog_port,
            self.config.protocol,
        )
        .await?
        .with_verbose(self.config.verbose);

        let result = self.send_all(&mut transport).await;

        let summary = RunSummary {
            frames_sent: transport.frames_sent(),
            bytes_sent: transport.bytes_sent(),
        };
        transport.close().await;

        result.map(|()| summary)
    }

    async fn send_all(&mut self, transport: &mut Transport) -> Result<(), GelfError> {
        for i in 0..self.config.count {
            if i > 0 {
                tokio::time::sleep(self.config.sleep).await;
            }
            self.record
                .stamp(i + 1, &Local::now(), self.config.timestamp_precision);
            transport.send(&self.record).await?;
        }
        Ok(())
    }
}

/// Report a fatal error and exit. stderr gets the message even when the
/// tracing filter drops ERROR.
fn fatal(context: &str, e: &dyn std::error::Error) -> ! {
    error!("{context}: {e}");
    eprintln!("{context}: {e}");
    process::exit(1);
}

// Main entry point for the application
pub async fn main() {
    let config = match Config::from_args_and_env(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from this config, so report directly.
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = setup_logging(config.log_level) {
        eprintln!("Warning: {e}");
    }

    info!("Starting gelf-sender v{}", crate::VERSION);
    info!(
        target = %config.target_address(),
        protocol = ?config.protocol,
        count = config.count,
        sleep_ms = config.sleep_ms,
        "Configuration loaded"
    );

    let app = match App::from_config(config, std::io::stdin().lock()) {
        Ok(app) => app,
        Err(e) => fatal("Configuration error", &e),
    };

    match app.run().await {
        Ok(summary) => {
            info!(
                frames = summary.frames_sent,
                bytes = summary.bytes_sent,
                "All messages sent"
            );
        }
        Err(e) => fatal(&format!("Send failed ({})", e.kind()), &e),
    }
}
