//! Character reference decoding for parsed markup and escaping for serialized markup.

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6; // 10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111
const MAX_NAME_LEN: usize = 4;

/// Decodes the reference starting at `&` (`rest` begins just after it).
/// Returns the decoded char and the number of bytes consumed after the `&`.
fn decode_reference(rest: &str) -> Option<(char, usize)> {
    let semi = rest.find(';')?;
    let body = &rest[..semi];
    let ch = if let Some(digits) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        if digits.is_empty() || digits.len() > MAX_HEX_DIGITS {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?
    } else if let Some(digits) = body.strip_prefix('#') {
        if digits.is_empty() || digits.len() > MAX_DEC_DIGITS {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().and_then(char::from_u32)?
    } else {
        if body.len() > MAX_NAME_LEN {
            return None;
        }
        NAMED.iter().find(|(name, _)| *name == body).map(|(_, c)| *c)?
    };
    Some((ch, semi + 1))
}

/// Decode a small, stable subset of HTML character references.
///
/// Named: `&amp; &lt; &gt; &quot; &apos; &nbsp;`. Numeric: `&#215;` and `&#xD7;`, only when
/// semicolon-terminated and a valid Unicode scalar. Anything else is left untouched.
pub(crate) fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text content for serialization.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value for serialization.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_entities_decodes_named_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;td&gt;"), "<td>");
        assert_eq!(decode_entities("&quot;x&quot; &apos;y&apos;"), "\"x\" 'y'");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn decode_entities_decodes_numeric_entities() {
        assert_eq!(decode_entities("&#215;"), "×");
        assert_eq!(decode_entities("&#xD7;"), "×");
        assert_eq!(decode_entities("&#x1F600;"), "\u{1F600}");
    }

    #[test]
    fn decode_entities_leaves_malformed_references_alone() {
        for s in [
            "&",
            "&&",
            "&;",
            "&#;",
            "&#x;",
            "&amp",
            "&unknown;",
            "&#xZZ;",
            "&#xD800;",
            "&#x110000;",
            "&#99999999;",
            "fish &am chips",
        ] {
            assert_eq!(decode_entities(s), s, "expected {s:?} to pass through");
        }
    }

    #[test]
    fn decode_entities_continues_after_malformed_reference() {
        assert_eq!(decode_entities("&#xZZ;&amp;"), "&#xZZ;&");
        assert_eq!(decode_entities("& &lt;"), "& <");
    }

    #[test]
    fn escape_round_trips_through_decode() {
        let raw = "a < b & \"c\" > d\u{00A0}";
        assert_eq!(decode_entities(&escape_text(raw)), raw);
        assert_eq!(decode_entities(&escape_attr(raw)), raw);
    }
}
