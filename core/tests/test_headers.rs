#[cfg(test)]
mod tests {
    use envelope_core::headers::canonical_bytes;
    use envelope_core::prelude::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_bytes_are_trimmed_and_undelimited() {
        let h = MailHeaders::new(" alice ", "bob\n", "\thi", "2024-01-01");
        assert_eq!(canonical_bytes(&h), b"alicebobhi2024-01-01");
    }

    #[test]
    fn information_separators_are_trimmed() {
        let h = MailHeaders::new("alice\u{1f}", "\u{1c}bob", "hi\u{a0}", "\u{1d}2024-01-01\u{1e}");
        assert_eq!(canonical_bytes(&h), b"alicebobhi2024-01-01");
        assert_eq!(canonicalize(&h), canonicalize(&MailHeaders::new("alice", "bob", "hi", "2024-01-01")));

        let inner = MailHeaders::new("al\u{1f}ice", "bob", "hi", "2024-01-01");
        assert_eq!(canonical_bytes(&inner), "al\u{1f}icebobhi2024-01-01".as_bytes());
    }

    #[test]
    fn digest_matches_sha256_of_canonical_bytes() {
        use sha2::{Digest, Sha256};

        let h = MailHeaders::new("alice", "bob", "hi", "2024-01-01");
        let expected: [u8; 32] = Sha256::digest(b"alicebobhi2024-01-01").into();
        assert_eq!(canonicalize(&h).as_bytes(), &expected);
    }

    #[test]
    fn digest_is_deterministic() {
        let a = MailHeaders::new("alice", "bob", "hi", "2024-01-01");
        let b = a.clone();
        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert_eq!(canonicalize(&a).to_hex().len(), 64);
    }

    #[test]
    fn absent_fields_hash_as_empty() {
        let empty = MailHeaders::default();
        let blanks = MailHeaders::new("  ", "", "\t", "");
        assert_eq!(canonicalize(&empty), canonicalize(&blanks));
    }

    #[test]
    fn extra_headers_do_not_affect_digest() {
        let plain = MailHeaders::new("alice", "bob", "hi", "2024-01-01");
        let mut extended = plain.clone();
        assert!(extended.insert_extra("X-Priority", "1"));
        assert_eq!(canonicalize(&plain), canonicalize(&extended));
        assert_eq!(extended.get("X-Priority"), Some("1"));
    }

    #[test]
    fn signed_names_cannot_be_extra() {
        let mut h = MailHeaders::new("alice", "bob", "hi", "2024-01-01");
        assert!(!h.insert_extra("Subject", "spoof"));
        assert!(h.extra().is_empty());
        assert_eq!(h.get("Subject"), Some("hi"));
    }

    #[test]
    fn dated_now_is_rfc2822() {
        let h = MailHeaders::dated_now("alice", "bob", "hi");
        assert!(chrono::DateTime::parse_from_rfc2822(&h.date).is_ok(), "{}", h.date);
    }

    // The concatenation has no delimiter, so shifting bytes between adjacent
    // fields yields the same digest. Only the ciphertext and key references
    // disambiguate such headers.
    #[test]
    fn field_boundaries_are_not_part_of_digest() {
        let a = MailHeaders::new("ali", "cebob", "hi", "d");
        let b = MailHeaders::new("alice", "bob", "hi", "d");
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    proptest! {
        #[test]
        fn prop_any_signed_field_change_changes_digest(
            field in 0usize..4,
            base in "[a-z]{1,12}",
            suffix in "[A-Z0-9]{1,4}",
        ) {
            let original = MailHeaders::new(base.clone(), base.clone(), base.clone(), base.clone());
            let mut changed = original.clone();
            let target = match field {
                0 => &mut changed.from,
                1 => &mut changed.to,
                2 => &mut changed.subject,
                _ => &mut changed.date,
            };
            target.push_str(&suffix);
            prop_assert_ne!(canonicalize(&original), canonicalize(&changed));
        }
    }
}
