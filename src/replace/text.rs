use std::borrow::Cow;

/// Closes the current text element, breaks the line, and opens a new one.
pub const LINE_BREAK: &str = "</w:t><w:br/><w:t>";

/// Escape the characters that cannot appear literally in element text.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape for use inside a double-quoted attribute value.
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(escape_text(text).replace('"', "&quot;"))
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Turn every line break (`\r\n` counts once) into [`LINE_BREAK`].
pub fn rewrite_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(is_line_break) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if !is_line_break(c) {
            out.push(c);
            continue;
        }
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }
        out.push_str(LINE_BREAK);
    }
    Cow::Owned(out)
}

/// Replacement text as it must appear in the markup.
pub fn to_markup(text: &str) -> String {
    rewrite_line_breaks(&escape_text(text)).into_owned()
}

/// `str::replace` with ASCII case folding on the pattern.
pub fn replace_ignore_ascii_case(haystack: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return haystack.to_string();
    }
    let hay = haystack.as_bytes();
    let needle = from.as_bytes();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        if hay[i..i + needle.len()].eq_ignore_ascii_case(needle) {
            // ASCII folding never maps onto a UTF-8 continuation byte, so both
            // ends of the match sit on char boundaries.
            out.push_str(&haystack[last..i]);
            out.push_str(to);
            i += needle.len();
            last = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&haystack[last..]);
    out
}
