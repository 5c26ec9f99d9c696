//! Literal values and compile-time text conversions
//!
//! Converting source text into values happens only at compile time; the
//! engine never parses text at runtime.

/// A literal as written in a script
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

/// Strip the quoting from a string-literal token.
///
/// `"text"` yields the inner text; `"""text"""` additionally trims leading
/// and trailing whitespace, so multi-line speech can be indented freely.
/// Returns `None` if the token is not a well-formed string literal.
pub fn unquote(token: &str) -> Option<String> {
    if let Some(inner) = token
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return Some(inner.trim().to_string());
    }
    if token.len() >= 2 {
        if let Some(inner) = token
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Some(inner.to_string());
        }
    }
    None
}

/// Classify a literal token: integer, `true`/`false`, or a quoted string.
pub fn parse_literal(token: &str) -> Option<Literal> {
    match token {
        "true" => return Some(Literal::Boolean(true)),
        "false" => return Some(Literal::Boolean(false)),
        _ => {}
    }
    if let Ok(i) = token.parse::<i64>() {
        return Some(Literal::Integer(i));
    }
    unquote(token).map(Literal::Str)
}
