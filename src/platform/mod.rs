//! Platform abstraction layer
//!
//! Wall-clock time for cooldowns, daily task rollover and peer seeds.

const MS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// UTC day index for a timestamp
pub fn day_index(timestamp_ms: f64) -> u32 {
    (timestamp_ms / MS_PER_DAY).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_index() {
        assert_eq!(day_index(0.0), 0);
        assert_eq!(day_index(MS_PER_DAY - 1.0), 0);
        assert_eq!(day_index(MS_PER_DAY), 1);
        assert_eq!(day_index(-5.0), 0);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(day_index(now_ms()) > 18_000);
    }
}
