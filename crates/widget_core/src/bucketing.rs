//! Deterministic assignment of sessions to experiment groups.
//!
//! The hash is the plain sum of the identifier's code points and the group is
//! its parity. It is stable per identifier but not uniform for short strings.

use shared::domain::{SessionId, TestGroup};

/// Sum of the identifier's Unicode code points.
///
/// Wrapping on overflow keeps the parity intact, which is all
/// [`assign_group`] reads.
pub fn identifier_hash(identifier: &str) -> u64 {
    identifier
        .chars()
        .fold(0u64, |acc, ch| acc.wrapping_add(u64::from(u32::from(ch))))
}

pub fn assign_group(session: &SessionId) -> TestGroup {
    if identifier_hash(session.as_str()) % 2 == 0 {
        TestGroup::A
    } else {
        TestGroup::B
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sum_of_code_points() {
        assert_eq!(identifier_hash(""), 0);
        assert_eq!(identifier_hash("abc"), 97 + 98 + 99);
        assert_eq!(identifier_hash("é"), 0xE9);
        assert_eq!(identifier_hash("🌞"), 0x1F31E);
    }

    #[test]
    fn parity_decides_group() {
        assert_eq!(assign_group(&SessionId::new("b")), TestGroup::A);
        assert_eq!(assign_group(&SessionId::new("a")), TestGroup::B);
        assert_eq!(assign_group(&SessionId::new("")), TestGroup::A);
        assert_eq!(assign_group(&SessionId::new("GA1.2.1235")), TestGroup::A);
        assert_eq!(assign_group(&SessionId::new("GA1.2.1234")), TestGroup::B);
    }

    #[test]
    fn assignment_is_deterministic() {
        for i in 0..200 {
            let session = SessionId::new(format!("visitor-{i}-{}", i * 7919));
            let first = assign_group(&session);
            for _ in 0..5 {
                assert_eq!(assign_group(&session), first);
            }
        }
    }

    #[test]
    fn sample_population_splits_roughly_in_half() {
        let in_a = (0..1000)
            .map(|i| SessionId::new(format!("visitor-{i}")))
            .filter(|session| assign_group(session) == TestGroup::A)
            .count();
        assert!((400..=600).contains(&in_a), "group A got {in_a} of 1000");
    }

    #[test]
    fn very_long_identifiers_do_not_overflow() {
        let long = "\u{10FFFF}".repeat(10_000);
        assert_eq!(identifier_hash(&long), 0x10FFFF * 10_000);
        assert_eq!(assign_group(&SessionId::new(long)), TestGroup::A);
    }
}
