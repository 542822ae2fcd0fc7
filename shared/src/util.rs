//! Pure helpers shared by server and tests.

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at this scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Worked hours between check-in and check-out (Unix millis).
///
/// Minute precision: whole hours plus the minute remainder converted to a
/// fraction of an hour, seconds truncated, rounded to two decimals.
/// 09:00:00 → 11:32:45 yields 2.53, not 2.55.
pub fn elapsed_hours(check_in_millis: i64, check_out_millis: i64) -> f64 {
    let total_minutes = (check_out_millis - check_in_millis) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    round2(hours as f64 + minutes as f64 / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;
    const MINUTE: i64 = 60_000;

    #[test]
    fn elapsed_hours_uses_minute_precision() {
        // 09:00:00 → 11:32:45 = 2h 32m 45s → 2 + 32/60 = 2.5333… → 2.53
        let start = 1_700_000_000_000;
        let end = start + 2 * HOUR + 32 * MINUTE + 45_000;
        assert_eq!(elapsed_hours(start, end), 2.53);
    }

    #[test]
    fn elapsed_hours_truncates_seconds() {
        let start = 1_700_000_000_000;
        // 1h 90s → 1h 1m 30s → 1 + 1/60 = 1.02
        assert_eq!(elapsed_hours(start, start + HOUR + 90_000), 1.02);
        // 1h 29s → 1h 0m → 1.0
        assert_eq!(elapsed_hours(start, start + HOUR + 29_000), 1.0);
    }

    #[test]
    fn elapsed_hours_zero_for_instant_checkout() {
        let t = 1_700_000_000_000;
        assert_eq!(elapsed_hours(t, t), 0.0);
    }

    #[test]
    fn round2_rounds_half_up() {
        assert_eq!(round2(2.555), 2.56);
        assert_eq!(round2(2.534), 2.53);
    }

    #[test]
    fn snowflake_ids_are_js_safe() {
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1_i64 << 53));
        }
    }
}
