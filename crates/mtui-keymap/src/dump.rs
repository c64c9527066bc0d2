#![forbid(unsafe_code)]

//! Textual listing of keymaps, in the same command syntax the listing is
//! read back with.
//!
//! ```text
//! bind pager <PageDown> next-page
//! macro generic \eS "<save-message>=spam<enter>" "file as spam"
//! ```

use mtui_core::MenuId;

use crate::error::BindError;
use crate::keymap::Action;
use crate::keys::expand_keys;
use crate::registry::Keymaps;

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Key text that survives [`tokenize`] as a bare word.
fn key_token(keys: &[mtui_core::Keycode]) -> String {
    let text = expand_keys(keys);
    match text.strip_prefix('"') {
        Some(rest) => format!("\\042{rest}"),
        None => text,
    }
}

fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };
        let mut token = String::new();
        if first == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => token.push('\n'),
                        Some('r') => token.push('\r'),
                        Some('t') => token.push('\t'),
                        Some(c @ ('"' | '\\')) => token.push(c),
                        Some(c) => {
                            token.push('\\');
                            token.push(c);
                        }
                        None => token.push('\\'),
                    },
                    c => token.push(c),
                }
            }
            if !closed {
                return Err("unterminated quote".to_string());
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}

impl Keymaps {
    /// List the bindings of one menu, or of every menu.
    pub fn dump(&self, menu: Option<MenuId>) -> String {
        let ids: Vec<MenuId> = match menu {
            Some(id) => vec![id],
            None => self.menu_ids().collect(),
        };
        let mut out = String::new();
        for id in ids {
            let (Some(name), Some(map)) = (self.menu_name(id), self.keymap(id)) else {
                continue;
            };
            for entry in map.entries() {
                let keys = key_token(entry.keys());
                match entry.action() {
                    Action::Op(op) => {
                        let Some(function) = self
                            .function_name(id, *op)
                            .or_else(|| self.any_function_name(*op))
                        else {
                            tracing::trace!(menu = name, op = op.0, "unnamed operation skipped");
                            continue;
                        };
                        out.push_str(&format!("bind {name} {keys} {function}\n"));
                    }
                    Action::Macro(text) => {
                        out.push_str(&format!("macro {name} {keys} {}", quote(text)));
                        if let Some(desc) = entry.description() {
                            out.push(' ');
                            out.push_str(&quote(desc));
                        }
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    /// Apply `bind`, `macro`, `unbind` and `unmacro` lines.
    ///
    /// Blank lines and `#` comments are skipped. Stops at the first bad
    /// line; the lines before it stay applied. Returns the number of
    /// commands applied.
    pub fn load(&mut self, text: &str) -> Result<usize, BindError> {
        let mut applied = 0;
        for (i, line) in text.lines().enumerate() {
            let lineno = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let syntax = |message: String| BindError::Syntax {
                line: lineno,
                message,
            };
            let tokens = tokenize(trimmed).map_err(syntax)?;
            let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
            let result = match args.as_slice() {
                ["bind", menus, keys, function] => self.bind(menus, keys, function).map(drop),
                ["macro", menus, keys, body] => {
                    self.macro_bind(menus, keys, body, None).map(drop)
                }
                ["macro", menus, keys, body, desc] => {
                    self.macro_bind(menus, keys, body, Some(desc)).map(drop)
                }
                ["unbind", menus] => self.unbind(menus, None),
                ["unbind", menus, keys] => self.unbind(menus, Some(keys)),
                ["unmacro", menus] => self.unmacro(menus, None),
                ["unmacro", menus, keys] => self.unmacro(menus, Some(keys)),
                [cmd @ ("bind" | "macro" | "unbind" | "unmacro"), ..] => {
                    return Err(syntax(format!("{cmd}: wrong number of arguments")));
                }
                [cmd, ..] => return Err(syntax(format!("{cmd}: unknown command"))),
                [] => continue,
            };
            result.map_err(|err| syntax(err.to_string()))?;
            applied += 1;
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::parse_keys;
    use crate::ops::OP_EXIT;

    #[test]
    fn tokenizer_handles_quotes() {
        assert_eq!(
            tokenize(r#"macro pager x "a \"b\"\n" "d e""#).unwrap(),
            vec!["macro", "pager", "x", "a \"b\"\n", "d e"]
        );
        assert!(tokenize(r#"macro pager x "open"#).is_err());
    }

    #[test]
    fn dump_lists_binds_and_macros() {
        let mut km = Keymaps::new();
        km.macro_bind("pager", "M", "say \"hi\"", Some("greet")).unwrap();
        let text = km.dump(Some(MenuId::PAGER));
        assert!(text.contains("bind pager <PageDown> next-page\n"));
        assert!(text.contains("bind pager \\\\ search-toggle\n"));
        assert!(text.contains("macro pager M \"say \\\"hi\\\"\" \"greet\"\n"));
        assert!(!text.contains("bind generic"));
    }

    #[test]
    fn quote_key_survives() {
        let mut km = Keymaps::new();
        km.bind("pager", "\"", "exit").unwrap();
        let text = km.dump(Some(MenuId::PAGER));
        let mut other = Keymaps::new();
        other.load(&text).unwrap();
        let keys = parse_keys("\"").unwrap();
        assert_eq!(
            other.keymap(MenuId::PAGER).unwrap().get(&keys).and_then(|b| b.op()),
            Some(OP_EXIT)
        );
    }

    #[test]
    fn load_reports_the_bad_line() {
        let mut km = Keymaps::new();
        let err = km
            .load("# comment\n\nbind pager X exit\nfrobnicate\n")
            .unwrap_err();
        assert_eq!(
            err,
            BindError::Syntax {
                line: 4,
                message: "frobnicate: unknown command".into()
            }
        );
        assert_eq!(
            km.load("bind nosuch X exit").unwrap_err().to_string(),
            "line 1: nosuch: no such menu"
        );
        assert_eq!(km.load("unbind pager X\nunmacro *\n"), Ok(2));
    }
}
