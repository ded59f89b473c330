//! Java-style `.properties` parsing.
//!
//! Supported: `key=value`, `key: value` and `key value` separators, `#` and
//! `!` comment lines, backslash line continuation, `\uXXXX` code units
//! (surrogate pairs included), and the escapes `\n`, `\t`, `\r`, `\\`,
//! `\=`, `\:`, `\#`, `\!` and `\ `.

use std::collections::BTreeMap;

/// Parse properties text. The error is a reason naming the 1-based line
/// where the offending entry starts.
pub fn parse_properties(text: &str) -> Result<BTreeMap<String, String>, String> {
    let mut props = BTreeMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let mut logical = line.trim_start().to_string();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }

        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        let line_err = |reason: String| format!("line {}: {}", idx + 1, reason);
        props.insert(
            unescape(key).map_err(line_err)?,
            unescape(value).map_err(line_err)?,
        );
    }

    Ok(props)
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..idx], line[idx + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[idx..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..idx], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut pending_high: Option<u16> = None;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        let unit = if c == '\\' && chars.clone().next() == Some('u') {
            chars.next();
            Some(code_unit(&mut chars)?)
        } else {
            None
        };

        if let Some(high) = pending_high.take() {
            match unit {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    out.push(char::from_u32(code).ok_or_else(|| format!("invalid code point {code:#x}"))?);
                    continue;
                }
                _ => return Err(format!("unpaired surrogate \\u{high:04x}")),
            }
        }

        match unit {
            Some(high @ 0xD800..=0xDBFF) => pending_high = Some(high),
            Some(low @ 0xDC00..=0xDFFF) => return Err(format!("unpaired surrogate \\u{low:04x}")),
            Some(unit) => out.push(char::from_u32(u32::from(unit)).ok_or("invalid code point")?),
            None if c != '\\' => out.push(c),
            None => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => {}
            },
        }
    }

    match pending_high {
        Some(high) => Err(format!("unpaired surrogate \\u{high:04x}")),
        None => Ok(out),
    }
}

/// The four hex digits following `\u`.
fn code_unit(chars: &mut std::str::Chars) -> Result<u16, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("malformed \\u escape '\\u{digits}'"));
    }
    u16::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_and_comments() {
        let props = parse_properties(
            "# comment\n! also comment\n\nTitle=The Story\nAuthor: Jane Doe\nYear 1999\n  padded = value  \n",
        )
        .unwrap();
        assert_eq!(props["Title"], "The Story");
        assert_eq!(props["Author"], "Jane Doe");
        assert_eq!(props["Year"], "1999");
        assert_eq!(props["padded"], "value  ");
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_continuation_and_escapes() {
        let props = parse_properties("long = first \\\n    second\npath = a\\:b\\=c\nkey\\ with\\ space = x\n").unwrap();
        assert_eq!(props["long"], "first second");
        assert_eq!(props["path"], "a:b=c");
        assert_eq!(props["key with space"], "x");
    }

    #[test]
    fn test_unicode_escapes() {
        let props = parse_properties("AuthorAnnotation=Ren\\u00e9e\nClef=\\uD834\\uDD1E\ncaf\\u00E9=yes\n").unwrap();
        assert_eq!(props["AuthorAnnotation"], "Renée");
        assert_eq!(props["Clef"], "\u{1D11E}");
        assert_eq!(props["café"], "yes");
    }

    #[test]
    fn test_malformed_unicode_escape_is_rejected() {
        let err = parse_properties("ok=1\nbad=\\u00g1\n").unwrap_err();
        assert!(err.starts_with("line 2:"));
        assert!(err.contains("\\u00g1"));

        assert!(parse_properties("short=\\u12\n").is_err());
        assert!(parse_properties("lone=\\uD834x\n").is_err());
    }

    #[test]
    fn test_key_without_value() {
        let props = parse_properties("flag\n").unwrap();
        assert_eq!(props["flag"], "");
    }
}
