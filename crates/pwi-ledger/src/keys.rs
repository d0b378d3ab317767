//! Reserved keys in the flat ledger key space.
//!
//! Entity records live under their lower-cased names, so these keys start
//! with `_` to stay clear of ordinary names. Nothing stops a `write` from
//! targeting them.

/// JSON array of farm names, in creation order.
pub const FARM_INDEX_KEY: &str = "_farmindex";

/// JSON array of user names, in creation order.
pub const USER_INDEX_KEY: &str = "_userindex";

/// The [`InsuranceBook`](pwi_types::InsuranceBook) aggregate.
pub const INSURANCE_KEY: &str = "_openinsurance";

/// Canonical primary key for an entity name.
pub fn primary_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_is_lowercase() {
        assert_eq!(primary_key("AlIcE"), "alice");
    }
}
