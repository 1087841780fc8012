use chrono::{DateTime, SecondsFormat, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const GELF_VERSION: &str = "1.1";

/// Syslog "informational".
pub const LEVEL_INFORMATIONAL: u8 = 6;

pub const APP_LOG_TYPE: &str = "APP";
pub const APP_TYPE_TAG: &str = "applog-gelftest";
pub const EVENT_TYPE_TAG: &str = "eventlog-gelftest";

/// How the emission time is written to the `timestamp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPrecision {
    /// Integer seconds since the epoch, no `_dateTime` field
    Seconds,
    /// Fractional seconds rounded to the millisecond, plus `_dateTime`
    #[default]
    Millis,
}

/// Emission time as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Millis(f64),
}

impl Timestamp {
    pub fn as_secs_f64(&self) -> f64 {
        match self {
            Timestamp::Seconds(secs) => *secs as f64,
            Timestamp::Millis(secs) => *secs,
        }
    }
}

/// One GELF 1.1 message.
///
/// A single instance is built before the send loop and re-stamped in place
/// for every iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GelfRecord {
    pub version: String,
    pub host: String,
    pub short_message: String,
    pub full_message: String,
    pub timestamp: Timestamp,
    pub level: u8,

    // Additional fields; Graylog strips the leading underscore
    #[serde(rename = "_logType")]
    pub log_type: String,
    #[serde(rename = "_source_env")]
    pub source_env: String,
    #[serde(rename = "_type")]
    pub type_tag: String,
    #[serde(rename = "_messageId")]
    pub message_id: u64,
    #[serde(rename = "_dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

impl GelfRecord {
    pub fn new(
        host: impl Into<String>,
        message: impl Into<String>,
        log_type: impl Into<String>,
        source_env: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let log_type = log_type.into();
        let type_tag = type_tag_for(&log_type).to_string();

        Self {
            version: GELF_VERSION.to_string(),
            host: host.into(),
            short_message: message.clone(),
            full_message: message,
            timestamp: Timestamp::Seconds(0),
            level: LEVEL_INFORMATIONAL,
            log_type,
            source_env: source_env.into(),
            type_tag,
            message_id: 0,
            date_time: None,
        }
    }

    /// Prepare the record for the `sequence`-th send of the run.
    pub fn stamp<Tz>(&mut self, sequence: u64, now: &DateTime<Tz>, precision: TimestampPrecision)
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.message_id = sequence;

        match precision {
            TimestampPrecision::Seconds => {
                self.timestamp = Timestamp::Seconds(now.timestamp());
                self.date_time = None;
            }
            TimestampPrecision::Millis => {
                let sub_millis = (f64::from(now.timestamp_subsec_nanos()) / 1e6).round() as i64;
                let millis = now.timestamp() * 1000 + sub_millis;
                // Both fields render the same rounded instant
                let rounded = now
                    .timezone()
                    .timestamp_millis_opt(millis)
                    .single()
                    .unwrap_or_else(|| now.clone());
                self.timestamp = Timestamp::Millis(millis as f64 / 1000.0);
                self.date_time = Some(rounded.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
        }
    }
}

/// `_type` is derived from the log category: `APP` or anything else.
pub fn type_tag_for(log_type: &str) -> &'static str {
    if log_type == APP_LOG_TYPE {
        APP_TYPE_TAG
    } else {
        EVENT_TYPE_TAG
    }
}
