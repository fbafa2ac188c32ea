use std::borrow::Cow;

/// Longest entity body we will try to decode (between `&` and `;`).
/// Anything longer is treated as literal text with a stray ampersand.
const MAX_ENTITY_LEN: usize = 10;

/// Strips HTML tags from a fragment and decodes character entities.
///
/// A small single-pass tokenizer standing in for the browser trick of
/// assigning `innerHTML` and reading back `textContent`: everything
/// between `<` and `>` is discarded, text runs are copied through, and
/// entities (`&amp;`, `&#233;`, `&#x2014;`, `&nbsp;`, ...) are decoded.
/// An unrecognized or unterminated entity is kept as literal text.
///
/// An unterminated tag (`<` with no closing `>`) swallows the remainder
/// of the fragment, which is how truncated HTML excerpts typically arrive
/// from feeds.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut i = 0;
    while i < html.len() {
        let rest = &html[i..];
        if let Some(stripped) = rest.strip_prefix('<') {
            match stripped.find('>') {
                Some(end) => i += end + 2,
                None => break,
            }
        } else if rest.starts_with('&') {
            match decode_entity(rest) {
                Some((decoded, consumed)) => {
                    out.push(decoded);
                    i += consumed;
                }
                None => {
                    out.push('&');
                    i += 1;
                }
            }
        } else {
            // Copy the run of plain text up to the next markup character.
            let next = rest.find(['<', '&']).unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            i += next;
        }
    }
    out
}

/// Decodes one entity at the start of `s` (which begins with `&`).
/// Returns the decoded character and the number of bytes consumed.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let semicolon = s[1..].find(';')? + 1;
    let name = &s[1..semicolon];
    if name.is_empty() || name.len() > MAX_ENTITY_LEN {
        return None;
    }
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, semicolon + 1))
}

/// Truncates a string to at most `max_chars` characters.
///
/// A hard cut, not word-boundary aware, with no ellipsis — excerpts that
/// land mid-word stay that way. Returns `Cow::Borrowed` when the string
/// already fits (no allocation).
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((byte_end, _)) => Cow::Owned(s[..byte_end].to_string()),
        None => Cow::Borrowed(s),
    }
}
