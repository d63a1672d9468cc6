//! # Identifier Generation
//!
//! Every collection is keyed by a string id derived from an epoch-millisecond
//! timestamp. Bulk operations (CSV import, formulas parsed out of one
//! response) append a zero-based index so items created in the same batch
//! stay distinct.
//!
//! Two independent operations inside the same millisecond *can* collide.
//! That matches the original behavior and is accepted: ids are produced by
//! human-paced interactions.

use chrono::Utc;

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// An id for a single newly created entity, e.g. `"1700000000000"`.
pub fn timestamp_id() -> String {
    now_millis().to_string()
}

/// An id for the `index`-th entity of a batch created at `millis`,
/// e.g. `"1700000000000-2"`.
pub fn indexed_id(millis: i64, index: usize) -> String {
    format!("{millis}-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_id_is_numeric() {
        let id = timestamp_id();
        assert!(id.parse::<i64>().is_ok());
    }

    #[test]
    fn indexed_ids_are_distinct_within_a_batch() {
        let millis = now_millis();
        let a = indexed_id(millis, 0);
        let b = indexed_id(millis, 1);
        assert_ne!(a, b);
        assert!(a.starts_with(&millis.to_string()));
        assert!(a.ends_with("-0"));
    }
}
