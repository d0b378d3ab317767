use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since UNIX epoch.
///
/// A clock set before the epoch yields `0` rather than failing.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        // Should be after 2020-01-01 (1577836800000 ms)
        assert!(now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn now_does_not_go_backwards() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }
}
