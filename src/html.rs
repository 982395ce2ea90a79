//! HTML text helpers for page titles.
//!
//! Titles arrive from the content source as rendered HTML (`&amp;`,
//! `&#8217;`, ...). They are decoded once when a page is fetched, and escaped
//! again when they become a link label, because labels are stored as markup.

use maud::html;

/// Escape text for storage as markup.
///
/// Maud escapes `&`, `<`, `>` and `"`; single quotes are escaped as well so
/// the result is safe inside single-quoted attributes.
pub fn escape(text: &str) -> String {
    html! { (text) }.into_string().replace('\'', "&#39;")
}

/// Decode HTML character references in `text`.
///
/// Handles decimal (`&#8217;`) and hex (`&#x2019;`) references plus the named
/// entities that show up in rendered post titles. Unknown or malformed
/// references are left as-is.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| {
            decode_reference(&tail[1..semi]).map(|decoded| (decoded, semi))
        }) {
            Some((decoded, semi)) => {
                out.push(decoded);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let decoded = match reference {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(decoded)
}
