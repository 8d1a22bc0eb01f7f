// Logger configuration
use serde::{Deserialize, Serialize};

/// `logging` section of the service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Redact subscriber mobile numbers and e-mail addresses in log fields
    pub redaction_enabled: bool,
    /// Emit JSON lines instead of the coloured development format
    pub json: bool,
    /// Default level when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            json: false,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(config.json);
        assert!(config.redaction_enabled);
        assert_eq!(config.log_level, "info");
    }
}
