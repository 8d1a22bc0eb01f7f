use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Option<Regex> =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").ok();
    // Ten digit mobile numbers, optionally prefixed with +91
    static ref MOBILE_REGEX: Option<Regex> =
        Regex::new(r"\+91[-\s]?[6-9][0-9]{9}\b|\b[6-9][0-9]{9}\b").ok();
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_mobiles: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_mobiles: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for log messages and log field values
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_mobiles {
            result = self.redact_mobiles(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        let Some(regex) = EMAIL_REGEX.as_ref() else {
            return text.to_string();
        };
        regex
            .replace_all(text, |caps: &regex::Captures| {
                let email = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("EMAIL[{}]", self.hash_value(email))
                } else {
                    match email.split_once('@') {
                        Some((local, domain)) => format!(
                            "{}***@{}***",
                            local.chars().next().unwrap_or('*'),
                            domain.chars().next().unwrap_or('*')
                        ),
                        None => "***@***".to_string(),
                    }
                }
            })
            .to_string()
    }

    fn redact_mobiles(&self, text: &str) -> String {
        let Some(regex) = MOBILE_REGEX.as_ref() else {
            return text.to_string();
        };
        regex
            .replace_all(text, |caps: &regex::Captures| {
                let mobile = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("MOBILE[{}]", self.hash_value(mobile))
                } else {
                    let digits: Vec<char> = mobile.chars().filter(char::is_ascii_digit).collect();
                    let tail: String = digits.iter().rev().take(2).rev().collect();
                    format!("******{tail}")
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let digest = hasher.finalize();
        // First 8 bytes keep the tag short while staying stable for correlation
        general_purpose::STANDARD.encode(digest.get(..8).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_redaction() {
        let redacted = plain_redactor().redact("Subscriber priya.k@example.com placed an order");
        assert!(redacted.contains("p***@e***"));
        assert!(!redacted.contains("priya.k@example.com"));
    }

    #[test]
    fn test_mobile_redaction_keeps_last_two_digits() {
        let redacted = plain_redactor().redact("orders for 9876543210");
        assert_eq!(redacted, "orders for ******10");
    }

    #[test]
    fn test_mobile_with_country_code() {
        let redacted = plain_redactor().redact("mobile +91 9876543210");
        assert!(!redacted.contains("9876543210"));
    }

    #[test]
    fn test_short_numbers_untouched() {
        let redacted = plain_redactor().redact("radius 5 km, 12 items");
        assert_eq!(redacted, "radius 5 km, 12 items");
    }

    #[test]
    fn test_hash_is_stable_for_correlation() {
        let redactor = PiiRedactor::default();
        let first = redactor.redact("9876543210");
        let second = redactor.redact("9876543210");
        assert_eq!(first, second);
        assert!(first.starts_with("MOBILE["));
    }

    #[test]
    fn test_custom_pattern() {
        let redactor = PiiRedactor::new(RedactionConfig {
            custom_patterns: vec![(Regex::new(r"ICSUB\d+").unwrap(), "ICSUB[REDACTED]".to_string())],
            ..Default::default()
        });
        assert_eq!(redactor.redact("id ICSUB0042"), "id ICSUB[REDACTED]");
    }
}
