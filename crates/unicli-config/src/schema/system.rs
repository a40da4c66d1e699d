//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "unicli=debug",
            LogLevel::Info => "unicli=info",
            LogLevel::Warning => "unicli=warn",
            LogLevel::Error => "unicli=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_uppercase() {
        let logging: LoggingConfig = toml::from_str("level = \"DEBUG\"").unwrap();
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.level.as_directive(), "unicli=debug");
    }

    #[test]
    fn default_level_is_warning() {
        assert_eq!(LoggingConfig::default().level.as_directive(), "unicli=warn");
    }
}
