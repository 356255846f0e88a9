//! Simplified HTML tokenizer for test documents.
//!
//! Test tables are authored by hand or exported from wiki pages, so the tokenizer only
//! has to be forgiving, not HTML5-complete.
//!
//! Known limitations:
//! - Tag/attribute names are restricted to ASCII `[A-Za-z0-9:_-]` and ASCII-lowercased.
//! - No parse-error recovery beyond "skip the offending byte".
//! - `script`/`style` bodies are raw text; their close tag may only be followed by ASCII
//!   whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// `<` never appears inside a UTF-8 continuation byte, so byte offsets found here are
// always char boundaries.
fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if starts_with_ignore_ascii_case_at(bytes, i, close_tag) {
            let mut k = i + n;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Scans the attribute list of a start tag beginning at `k` (just after the tag name).
/// Returns the attributes, whether the tag was written self-closing, and the offset after `>`.
fn scan_attributes(input: &str, mut k: usize) -> (Vec<(String, Option<String>)>, bool, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            k += 1;
            continue;
        }
        let name = input[name_start..k].to_ascii_lowercase();

        skip_whitespace(&mut k);
        if k >= len || bytes[k] != b'=' {
            attributes.push((name, None));
            continue;
        }
        k += 1;
        skip_whitespace(&mut k);
        let value = if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
            let quote = bytes[k];
            k += 1;
            let start = k;
            k += memchr(quote, &bytes[k..]).unwrap_or(len - k);
            let raw = &input[start..k];
            if k < len {
                k += 1;
            }
            decode_entities(raw)
        } else {
            let start = k;
            while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                    break;
                }
                k += 1;
            }
            decode_entities(&input[start..k])
        };
        attributes.push((name, Some(value)));
    }

    (attributes, self_closing, k)
}

/// Tokenizes a complete document or a fragment.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            i += memchr(b'<', &bytes[i..]).unwrap_or(bytes.len() - i);
            let decoded = decode_entities(&input[start..i]);
            if !decoded.is_empty() {
                out.push(Token::Text(decoded));
            }
            continue;
        }

        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(
                        input[body_start..body_start + end].to_string(),
                    ));
                    i = body_start + end + HTML_COMMENT_END.len();
                    continue;
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    break;
                }
            }
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += 2 + end + 1;
            continue;
        }

        if i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < bytes.len() && is_name_char(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            j += memchr(b'>', &bytes[j..]).map_or(bytes.len() - j, |rel| rel + 1);
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }

        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && is_name_char(bytes[j]) {
            j += 1;
        }
        if j == start {
            // Stray `<` that does not open a tag stays literal text.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..j].to_ascii_lowercase();
        let (attributes, written_self_closing, content_start) = scan_attributes(input, j);
        let self_closing = written_self_closing || is_void_element(&name);

        let rawtext_close = match name.as_str() {
            "script" if !self_closing => Some(SCRIPT_CLOSE_TAG),
            "style" if !self_closing => Some(STYLE_CLOSE_TAG),
            _ => None,
        };

        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        let Some(close_tag) = rawtext_close else {
            i = content_start;
            continue;
        };

        let body = &input[content_start..];
        match find_rawtext_close_tag(body, close_tag) {
            Some((rel_start, rel_end)) => {
                if rel_start > 0 {
                    out.push(Token::Text(body[..rel_start].to_string()));
                }
                out.push(Token::EndTag(name));
                i = content_start + rel_end;
            }
            None => {
                // Missing close tag: the rest of the input is raw text.
                if !body.is_empty() {
                    out.push(Token::Text(body.to_string()));
                }
                out.push(Token::EndTag(name));
                break;
            }
        }
    }

    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", input.len(), out.len());
    out
}
