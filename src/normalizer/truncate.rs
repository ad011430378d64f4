/// Truncates `s` to at most `max_len` bytes without splitting a character.
///
/// The cut point is floored to the nearest UTF-8 boundary, so the result may
/// be a few bytes shorter than `max_len`. Truncating an already-truncated
/// string to the same bound returns it unchanged.
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }

    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_untouched() {
        assert_eq!(truncate("info", 80), "info");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_ascii_cut_exactly() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("abcdef", 0), "");
    }

    #[test]
    fn test_multibyte_floored_to_boundary() {
        // "é" is two bytes; a cut at byte 2 would land inside it
        assert_eq!(truncate("aé", 2), "a");
        // "日本" is six bytes
        assert_eq!(truncate("日本", 4), "日");
        assert_eq!(truncate("日本", 6), "日本");
    }

    #[test]
    fn test_idempotent() {
        let once = truncate("ünïcödé text", 7);
        assert_eq!(truncate(once, 7), once);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncated_within_budget_and_prefix(s in "\\PC*", max_len in 0usize..64) {
                let out = truncate(&s, max_len);
                prop_assert!(out.len() <= max_len);
                prop_assert!(s.starts_with(out));
                // At most one partial character is dropped
                prop_assert!(s.len() <= max_len || max_len - out.len() < 4);
            }

            #[test]
            fn truncate_is_idempotent(s in "\\PC*", max_len in 0usize..64) {
                let once = truncate(&s, max_len);
                prop_assert_eq!(truncate(once, max_len), once);
            }
        }
    }
}
