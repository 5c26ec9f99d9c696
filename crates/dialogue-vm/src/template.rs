//! Speech-text templating
//!
//! Replaces `$name` tokens in a line of dialogue with the textual form of
//! the named variable. A token preceded by a backslash (`\$name`) is left
//! untouched, backslash included. All distinct names in a line are resolved
//! through one batched store lookup.

use indexmap::IndexSet;

use crate::error::Result;
use crate::store::VariableStore;

/// Expand every unescaped `$name` token in `text` against the store.
pub fn expand(text: &str, store: &VariableStore) -> Result<String> {
    let tokens = scan(text);
    if tokens.is_empty() {
        return Ok(text.to_string());
    }

    let names: IndexSet<String> = tokens
        .iter()
        .map(|token| token.name.to_string())
        .collect();
    let values = store.load_many(&names)?;

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for token in &tokens {
        out.push_str(&text[cursor..token.start]);
        out.push_str(&values[token.name].to_string());
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

/// A `$name` occurrence: byte range of `$name` plus the bare name
struct Token<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

fn scan(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'\\') {
            let name_start = i + 1;
            let mut j = name_start;
            while j < bytes.len() && is_name_byte(bytes[j], j == name_start) {
                j += 1;
            }
            if j > name_start {
                tokens.push(Token {
                    start: i,
                    end: j,
                    name: &text[name_start..j],
                });
                i = j;
                continue;
            }
        }
        i += 1;
    }
    tokens
}

fn is_name_byte(b: u8, first: bool) -> bool {
    b == b'_' || b.is_ascii_alphabetic() || (!first && b.is_ascii_digit())
}
