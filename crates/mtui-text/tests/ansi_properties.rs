use mtui_text::ansi::{AnsiState, parse_sgr, sgr_len};
use mtui_text::strip::strip_formatting;
use proptest::prelude::*;

fn sgr_param() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..110).prop_map(|n| n.to_string()),
        (0u32..300).prop_map(|n| format!("38;5;{n}")),
        (0u32..300).prop_map(|n| format!("48;5;{n}")),
        (0u32..256, 0u32..256, 0u32..256).prop_map(|(r, g, b)| format!("38;2;{r};{g};{b}")),
        Just(String::new()),
    ]
}

fn sgr_sequence() -> impl Strategy<Value = String> {
    proptest::collection::vec(sgr_param(), 1..5).prop_map(|ps| format!("\x1b[{}m", ps.join(";")))
}

proptest! {
    #[test]
    fn reset_then_twice_equals_once(seq in sgr_sequence()) {
        let mut once = AnsiState::default();
        parse_sgr(b"\x1b[0m", Some(&mut once));
        parse_sgr(seq.as_bytes(), Some(&mut once));

        let mut twice = AnsiState::default();
        parse_sgr(b"\x1b[0m", Some(&mut twice));
        parse_sgr(seq.as_bytes(), Some(&mut twice));
        parse_sgr(seq.as_bytes(), Some(&mut twice));

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn whole_sequence_is_consumed(seq in sgr_sequence()) {
        prop_assert_eq!(sgr_len(seq.as_bytes()), seq.len());
        let mut st = AnsiState::default();
        prop_assert_eq!(parse_sgr(seq.as_bytes(), Some(&mut st)), seq.len());
    }

    #[test]
    fn stripping_removes_all_sgr(text in "[a-z ]{0,12}", seq in sgr_sequence()) {
        let mut input = seq.clone().into_bytes();
        input.extend_from_slice(text.as_bytes());
        input.extend_from_slice(seq.as_bytes());
        prop_assert_eq!(strip_formatting(&input, true), text.into_bytes());
    }
}
