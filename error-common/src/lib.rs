//! Common error handling utilities for the iCare subscriber engine
//!
//! This crate holds the pieces of error handling that every layer shares:
//!
//! - [`ErrorKind`]: the classification every component error maps onto.
//!   The HTTP layer translates a kind into a status code, so lower layers
//!   never need to know about HTTP.
//! - [`IcareError`]: process-level failures (configuration, binding the
//!   listener, serving) returned from the binary's `main`.
//! - [`codes`]: stable error codes attached to API error responses.
//!
//! # Example
//!
//! ```rust
//! use error_common::{ErrorKind, IcareError};
//!
//! fn load_port(raw: &str) -> error_common::Result<u16> {
//!     raw.parse()
//!         .map_err(|e| IcareError::ConfigError(format!("invalid port {raw}: {e}")))
//! }
//!
//! assert!(load_port("8080").is_ok());
//! assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
//! ```

pub mod codes;
pub mod types;

pub use codes::*;
pub use types::*;
