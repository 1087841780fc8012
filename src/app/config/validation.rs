use super::{Config, ConfigError};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graylog_host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Graylog host cannot be empty".to_string(),
            ));
        }

        if self.graylog_port == 0 {
            return Err(ConfigError::InvalidConfig(
                "Graylog port cannot be 0".to_string(),
            ));
        }

        if let Some(host) = &self.source_host
            && host.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Source host override cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
