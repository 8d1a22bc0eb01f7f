//! Request validation utilities
//!
//! Request payloads implement [`RequestValidation`]; the macros below keep
//! the checks short and the error messages consistent. Handlers call
//! `validate()` before any storage access, so a rejected request never
//! consumes a sequential code or opens a transaction.

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// # Example
///
/// ```rust
/// use subscriber_server::error::ApiError;
/// use subscriber_server::validation::RequestValidation;
/// use subscriber_server::{validate_field, validate_required};
///
/// struct CartLine {
///     product_id: String,
///     quantity: i32,
/// }
///
/// impl RequestValidation for CartLine {
///     fn validate(&self) -> Result<(), ApiError> {
///         validate_required!(self.product_id, "product_id is required");
///         validate_field!(self.quantity, self.quantity > 0, "quantity must be positive");
///         Ok(())
///     }
/// }
///
/// let line = CartLine { product_id: "ICPRD0001".into(), quantity: 0 };
/// assert!(line.validate().is_err());
/// ```
pub trait RequestValidation {
    /// Returns `Ok(())` if validation passes, or a validation error otherwise
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` describing the first failed check.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Validate a field with a custom predicate
///
/// The failing field is reported under the last segment of its path, so
/// `self.subscriber_latitude` lands in `field_errors["subscriber_latitude"]`.
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::invalid_field(stringify!($field), $message));
        }
    };
}

/// Validate that a string field is not blank
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Validate string length in bytes
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        let len = $field.len();
        $crate::validate_field!($field, len >= $min && len <= $max, $message);
    };
}

/// Validate an inclusive numeric range
///
/// Non-finite floats fail the check, since every comparison with NaN is false.
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        $crate::validate_field!($field, $field >= $min && $field <= $max, $message);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    struct TestRequest {
        mobile: String,
        latitude: f64,
        quantity: i32,
    }

    impl RequestValidation for TestRequest {
        fn validate(&self) -> Result<(), ApiError> {
            validate_required!(self.mobile, "Mobile is required");
            validate_length!(self.mobile, 10, 15, "Mobile must be between 10 and 15 characters");
            validate_range!(self.latitude, -90.0, 90.0, "Latitude must be between -90 and 90");
            validate_field!(self.quantity, self.quantity > 0, "Quantity must be positive");
            Ok(())
        }
    }

    fn request() -> TestRequest {
        TestRequest {
            mobile: "9876543210".to_string(),
            latitude: 12.97,
            quantity: 2,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_validation_blank_mobile() {
        let req = TestRequest { mobile: "   ".to_string(), ..request() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validation_nan_latitude() {
        let req = TestRequest { latitude: f64::NAN, ..request() };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Latitude must be between -90 and 90");
    }

    #[test]
    fn test_validation_zero_quantity() {
        let req = TestRequest { quantity: 0, ..request() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validation_reports_failing_field() {
        let req = TestRequest { latitude: 91.0, ..request() };
        match req.validate().unwrap_err() {
            ApiError::Validation { field_errors: Some(fields), .. } => {
                assert_eq!(
                    fields.get("latitude"),
                    Some(&vec!["Latitude must be between -90 and 90".to_string()])
                );
                assert_eq!(fields.len(), 1);
            }
            other => panic!("expected field validation error, got {other:?}"),
        }
    }
}
