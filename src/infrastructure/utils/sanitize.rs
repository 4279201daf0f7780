/// HTML-escapes the characters that carry markup meaning (`&`, `<`, `>`,
/// `"`, `'`) so user input can be embedded in any output without injection.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strips CR and LF so a user-supplied value is safe to place in a mail
/// header.
pub fn strip_crlf(input: &str) -> String {
    input.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}
