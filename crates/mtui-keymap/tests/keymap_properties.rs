use mtui_core::event::{KEY_UP, key_f};
use mtui_core::{Keycode, MenuId, Op};
use mtui_keymap::{Action, KeyBinding, Keymap, Keymaps, expand_keys, parse_keys};
use proptest::prelude::*;

const ALPHABET: &[Keycode] = &[
    'a' as Keycode,
    'b' as Keycode,
    'c' as Keycode,
    '<' as Keycode,
    '>' as Keycode,
    '^' as Keycode,
    '\\' as Keycode,
    '"' as Keycode,
    ' ' as Keycode,
    7,
    0xE9,
    KEY_UP,
    key_f(1),
];

fn key_seq() -> impl Strategy<Value = Vec<Keycode>> {
    prop::collection::vec(prop::sample::select(ALPHABET), 1..4)
}

#[derive(Debug, Clone)]
enum Cmd {
    Bind(&'static str, Vec<Keycode>, &'static str),
    Macro(&'static str, Vec<Keycode>, String, Option<String>),
}

fn cmd() -> impl Strategy<Value = Cmd> {
    let bind = (
        prop::sample::select(vec![
            ("generic", "exit"),
            ("generic", "search"),
            ("dialog", "tag-entry"),
            ("pager", "top"),
            ("pager", "skip-quoted"),
            ("editor", "kill-line"),
        ]),
        key_seq(),
    )
        .prop_map(|((menu, func), keys)| Cmd::Bind(menu, keys, func));
    let mac = (
        prop::sample::select(vec!["generic", "pager", "editor"]),
        key_seq(),
        "[ -~\n\t]{0,12}",
        prop::option::of("[ -~]{0,8}"),
    )
        .prop_map(|(menu, keys, text, desc)| Cmd::Macro(menu, keys, text, desc));
    prop_oneof![3 => bind, 1 => mac]
}

fn snapshot(km: &Keymaps) -> Vec<(MenuId, Vec<Keycode>, Action, Option<String>)> {
    km.menu_ids()
        .flat_map(|id| {
            km.keymap(id)
                .unwrap()
                .entries()
                .iter()
                .map(move |e| {
                    (
                        id,
                        e.keys().to_vec(),
                        e.action().clone(),
                        e.description().map(str::to_string),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

proptest! {
    #[test]
    fn keymap_stays_sorted_with_consistent_eq(
        inserts in prop::collection::vec((key_seq(), 1i32..20), 0..40),
    ) {
        let mut map = Keymap::new();
        for (keys, op) in inserts {
            map.insert(KeyBinding::new(keys, Action::Op(Op(op))));
            let entries = map.entries();
            for pair in entries.windows(2) {
                let (a, b) = (pair[0].keys(), pair[1].keys());
                prop_assert!(a < b);
                let common = a.iter().zip(b).take_while(|(x, y)| x == y).count();
                prop_assert_eq!(pair[0].eq_len(), common);
                // No entry is a prefix of another.
                prop_assert!(common < a.len() && common < b.len());
            }
            if let Some(last) = entries.last() {
                prop_assert_eq!(last.eq_len(), 0);
            }
        }
    }

    #[test]
    fn expanded_keys_parse_back(keys in key_seq()) {
        let text = expand_keys(&keys);
        prop_assert_eq!(parse_keys(&text).unwrap(), keys);
    }

    #[test]
    fn dump_then_load_reproduces_bindings(cmds in prop::collection::vec(cmd(), 0..25)) {
        let mut km = Keymaps::new();
        for c in &cmds {
            match c {
                Cmd::Bind(menu, keys, func) => {
                    km.bind(menu, &expand_keys(keys), func).unwrap();
                }
                Cmd::Macro(menu, keys, text, desc) => {
                    km.macro_bind(menu, &expand_keys(keys), text, desc.as_deref()).unwrap();
                }
            }
        }

        let text = km.dump(None);
        let mut reloaded = Keymaps::new();
        reloaded.load(&text).unwrap();
        prop_assert_eq!(snapshot(&reloaded), snapshot(&km));
    }
}
