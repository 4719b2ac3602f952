//! Entity-key encoding.
//!
//! Aircraft are identified on the wire by a numeric key. Locally the map
//! is keyed by that number's hex rendering: zero-padded uppercase with a
//! six-digit minimum and no upper bound on digit count. The encoding is
//! stable, collision-free, and sorts by magnitude at equal width.

/// Minimum number of hex digits in an entity key.
pub const MIN_KEY_DIGITS: usize = 6;

/// Render a numeric entity key as the canonical map key.
///
/// `0` encodes as `"000000"`, `0xA` as `"00000A"`; values needing more
/// than six digits get exactly as many as they need (`0x1234567` →
/// `"1234567"`), never truncated.
pub fn entity_key(n: u64) -> String {
    format!("{n:0width$X}", width = MIN_KEY_DIGITS)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_zero_pads_to_six_digits() {
        assert_eq!(entity_key(0), "000000");
    }

    #[test]
    fn test_small_value_pads_and_uppercases() {
        assert_eq!(entity_key(0xA), "00000A");
        assert_eq!(entity_key(0xABCDEF), "ABCDEF");
    }

    #[test]
    fn test_wide_value_is_not_truncated() {
        assert_eq!(entity_key(0x1234567), "1234567");
        assert_eq!(entity_key(u64::MAX), "FFFFFFFFFFFFFFFF");
    }

    proptest! {
        #[test]
        fn prop_at_least_six_uppercase_hex_digits(n in any::<u64>()) {
            let key = entity_key(n);
            prop_assert!(key.len() >= MIN_KEY_DIGITS);
            prop_assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }

        #[test]
        fn prop_parses_back_to_the_same_value(n in any::<u64>()) {
            let key = entity_key(n);
            prop_assert_eq!(u64::from_str_radix(&key, 16).unwrap(), n);
        }

        #[test]
        fn prop_equal_width_keys_sort_by_magnitude(a in any::<u64>(), b in any::<u64>()) {
            let (ka, kb) = (entity_key(a), entity_key(b));
            if ka.len() == kb.len() {
                prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
            }
        }
    }
}
