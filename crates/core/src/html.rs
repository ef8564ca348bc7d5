//! HTML text escaping for the string renderers.
//!
//! Row fragments are built with `format!`; anything that originated from
//! server data or user input must pass through [`escape`] before being
//! interpolated into markup.

/// Escape `&`, `<`, `>`, `"`, and `'` for safe interpolation into HTML.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
