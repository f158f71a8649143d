//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid discovery query: {0}")]
    InvalidQuery(String),
    #[error("Invalid driver record: {0}")]
    InvalidRecord(String),
    #[error("Driver source failed: {0}")]
    Source(String),
    #[error("Cart holds items from store `{current}`, can't add from `{requested}`")]
    StoreConflict { current: String, requested: String },
    #[error("Invalid cart item: {0}")]
    InvalidItem(String),
    #[error("CSV error: {0}")]
    Csv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflict_display() {
        let err = Error::StoreConflict {
            current: "bakery-12".into(),
            requested: "grill-3".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cart holds items from store `bakery-12`, can't add from `grill-3`"
        );
    }

    #[test]
    fn invalid_query_display() {
        let err = Error::InvalidQuery("radius must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid discovery query: radius must be positive"
        );
    }
}
