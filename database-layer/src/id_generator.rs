//! Sequential business identifiers such as `ICORD0042`
//!
//! Each entity (order, order item, ...) owns an active row in
//! `icare_elementid_lookup` holding the last code it issued. A code is a
//! letter prefix followed by a zero-padded counter; issuing the next code
//! increments the counter and keeps its width, growing only on overflow.
//!
//! The active row is read with `SELECT ... FOR UPDATE` and rewritten inside
//! the same transaction, so concurrent callers for one entity queue on the
//! row lock and never observe the same base value.

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::SequenceRecord;

/// Next code after `last_code`, or `None` when it is not `^[A-Za-z]+[0-9]+$`.
///
/// ```
/// use database_layer::next_sequential_code;
///
/// assert_eq!(next_sequential_code("ICDOC0099").as_deref(), Some("ICDOC0100"));
/// assert_eq!(next_sequential_code("ICDOC9999").as_deref(), Some("ICDOC10000"));
/// assert_eq!(next_sequential_code("0099"), None);
/// ```
pub fn next_sequential_code(last_code: &str) -> Option<String> {
    let split = last_code.find(|c: char| c.is_ascii_digit())?;
    let (prefix, digits) = last_code.split_at(split);

    if prefix.is_empty()
        || !prefix.chars().all(|c| c.is_ascii_alphabetic())
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    Some(format!("{prefix}{}", increment_digits(digits)))
}

/// Decimal increment on the digit string itself, so any width works
fn increment_digits(digits: &str) -> String {
    let mut bytes: Vec<u8> = digits.bytes().collect();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return bytes.into_iter().map(char::from).collect();
        }
    }
    // every digit rolled over: 999 -> 1000
    bytes.insert(0, b'1');
    bytes.into_iter().map(char::from).collect()
}

#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    pool: PgPool,
}

impl SequenceGenerator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue the next code for `entity_name` in its own transaction.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty entity name, `SequenceNotFound` when the
    /// entity has no active record, `InvalidSequenceCode` when the stored
    /// code is malformed and `QueryFailed` when storage fails.
    pub async fn issue_next_id(&self, entity_name: &str) -> DatabaseResult<String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DatabaseError::query("Database error while starting id transaction"))?;

        let code = Self::issue_next_id_in(&mut tx, entity_name).await?;

        tx.commit()
            .await
            .map_err(DatabaseError::query("Database error while committing new id"))?;
        Ok(code)
    }

    /// Issue the next code on a connection the caller already holds.
    ///
    /// The row lock is held until the caller's transaction ends, so the
    /// code is only visible to others once that transaction commits.
    ///
    /// # Errors
    ///
    /// Same as [`SequenceGenerator::issue_next_id`].
    pub async fn issue_next_id_in(
        conn: &mut PgConnection,
        entity_name: &str,
    ) -> DatabaseResult<String> {
        let entity_name = entity_name.trim();
        if entity_name.is_empty() {
            return Err(DatabaseError::Validation("entity name must not be empty".to_string()));
        }

        let record = sqlx::query_as::<_, SequenceRecord>(
            r#"
            SELECT generator_id, entity_name, starting_code, last_code,
                   created_at, updated_at, active_flag
            FROM icare_elementid_lookup
            WHERE entity_name = $1 AND active_flag = 1
            ORDER BY generator_id DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(entity_name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DatabaseError::query("Database error while reading id lookup"))?
        .ok_or_else(|| DatabaseError::SequenceNotFound(entity_name.to_string()))?;

        let next_code = next_sequential_code(&record.last_code).ok_or_else(|| {
            DatabaseError::InvalidSequenceCode {
                entity: record.entity_name.clone(),
                code: record.last_code.clone(),
            }
        })?;

        debug!(
            entity = entity_name,
            generator_id = record.generator_id,
            previous = %record.last_code,
            "Incrementing sequential code"
        );

        sqlx::query(
            r#"
            UPDATE icare_elementid_lookup
            SET last_code = $1, updated_at = now()
            WHERE generator_id = $2
            "#,
        )
        .bind(&next_code)
        .bind(record.generator_id)
        .execute(&mut *conn)
        .await
        .map_err(DatabaseError::query("Database error while updating id lookup"))?;

        info!(entity = entity_name, code = %next_code, "Issued sequential code");
        Ok(next_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_increment_preserves_width() {
        assert_eq!(next_sequential_code("ICDOC0001").as_deref(), Some("ICDOC0002"));
        assert_eq!(next_sequential_code("ICDOC0099").as_deref(), Some("ICDOC0100"));
        assert_eq!(next_sequential_code("ICORD0000").as_deref(), Some("ICORD0001"));
    }

    #[test]
    fn test_overflow_grows_width() {
        assert_eq!(next_sequential_code("ICDOC9999").as_deref(), Some("ICDOC10000"));
        assert_eq!(next_sequential_code("A999").as_deref(), Some("A1000"));
        assert_eq!(next_sequential_code("X9").as_deref(), Some("X10"));
    }

    #[test]
    fn test_counter_wider_than_u64() {
        let code = format!("ICX{}", "9".repeat(25));
        let next = next_sequential_code(&code).unwrap();
        assert_eq!(next, format!("ICX1{}", "0".repeat(25)));
    }

    #[test]
    fn test_malformed_codes_rejected() {
        for code in ["", "ICDOC", "0001", "IC-0001", "IC0001A", "IC00 01", "ÄB01"] {
            assert_eq!(next_sequential_code(code), None, "{code:?} should be rejected");
        }
    }

    proptest! {
        #[test]
        fn prop_next_code_is_prefix_plus_increment(
            prefix in "[A-Za-z]{1,8}",
            value in 0u64..1_000_000_000,
            width in 1usize..12,
        ) {
            let digits = format!("{value:0width$}");
            let next = next_sequential_code(&format!("{prefix}{digits}")).unwrap();

            prop_assert!(next.starts_with(&prefix));
            let counter = &next[prefix.len()..];
            prop_assert_eq!(counter.parse::<u64>().unwrap(), value + 1);
            prop_assert_eq!(counter.len(), digits.len().max((value + 1).to_string().len()));
        }

        #[test]
        fn prop_issued_codes_strictly_increase(prefix in "[A-Z]{2,5}", start in 0u64..10_000) {
            let mut code = format!("{prefix}{start:04}");
            let mut previous = start;
            for _ in 0..20 {
                code = next_sequential_code(&code).unwrap();
                let current: u64 = code[prefix.len()..].parse().unwrap();
                prop_assert_eq!(current, previous + 1);
                previous = current;
            }
        }
    }
}
