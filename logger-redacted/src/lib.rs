//! Logging support with PII redaction
//!
//! Subscriber lookups are keyed by mobile number, so those numbers reach the
//! request handlers and would otherwise end up verbatim in log fields. This
//! crate detects mobile numbers and e-mail addresses and replaces them with
//! a short SHA-256 tag, so two log lines about the same subscriber can still
//! be correlated without exposing the value.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PiiRedactor, RedactionConfig};
//!
//! let redactor = PiiRedactor::new(RedactionConfig {
//!     hash_for_correlation: false,
//!     ..Default::default()
//! });
//! assert_eq!(redactor.redact("9876543210"), "******10");
//!
//! // Hashed form used in production logs
//! let tag = PiiRedactor::default().redact("9876543210");
//! assert!(tag.starts_with("MOBILE["));
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;
