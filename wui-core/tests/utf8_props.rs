use proptest::prelude::*;
use wui_core::utf8;

proptest! {
    #[test]
    fn slicing_never_splits_a_code_point(text in "\\PC{0,24}", a in 0usize..32, b in 0usize..32) {
        let slice = utf8::slice_chars(&text, a, b);
        let (from, to) = (a.min(b), a.max(b));
        let expected: String = text.chars().skip(from).take(to.saturating_sub(from)).collect();
        prop_assert_eq!(slice, expected.as_str());
    }

    #[test]
    fn insert_then_remove_restores(text in "\\PC{0,16}", insert in "\\PC{1,8}", at in 0usize..20) {
        let mut edited = text.clone();
        let at = at.min(utf8::char_len(&text));
        let inserted = utf8::insert_at(&mut edited, at, &insert);
        prop_assert_eq!(inserted, insert.chars().count());
        prop_assert_eq!(utf8::char_len(&edited), utf8::char_len(&text) + inserted);

        utf8::remove_range(&mut edited, at, at + inserted);
        prop_assert_eq!(edited, text);
    }

    #[test]
    fn validate_agrees_with_std(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(utf8::validate(&bytes), std::str::from_utf8(&bytes).ok());
    }

    #[test]
    fn lines_join_back(text in "[a-z\n]{0,30}") {
        let lines = utf8::split_lines(&text);
        prop_assert!(!lines.is_empty());
        prop_assert_eq!(lines.join("\n"), text);
    }
}
