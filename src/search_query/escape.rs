/// Remove one level of backslash escaping.
///
/// `\x` becomes `x` for any `x`, `\\` becomes `\`, and a lone trailing
/// backslash is dropped.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Strip the quotes surrounding a phrase token.
///
/// Drops the first and the last character, whatever the last one is.
pub fn strip_quotes(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
