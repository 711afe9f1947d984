//! Promo code table

/// Code -> credit reward. Codes are matched after trimming and uppercasing.
const PROMO_CODES: &[(&str, u64)] = &[
    ("DRIFT2024", 5000),
    ("NEONCITY", 2500),
    ("WELCOME", 1000),
    ("RUSSIA", 3000),
];

/// Canonical form of a user-typed code
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Reward for a normalized code, if it exists
pub fn reward_for(code: &str) -> Option<u64> {
    PROMO_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, reward)| reward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(reward_for(&normalize("  drift2024 ")), Some(5000));
        assert_eq!(reward_for("drift2024"), None);
        assert_eq!(reward_for("NOPE"), None);
    }
}
