//! Plain-text normalization applied before identity and annotation.
//!
//! Produces the canonical form the pipeline hashes and annotates:
//! - byte order mark removed
//! - CRLF and lone CR converted to LF
//! - curly double quotes to `"`, curly single quotes and apostrophes to `'`
//! - en/em dashes to `-`, horizontal ellipsis to `...`
//! - non-breaking spaces to plain spaces
//! - trailing whitespace trimmed from every line

/// Converts raw input into the text the pipeline operates on.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

/// The default normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainUnicode;

impl TextNormalizer for PlainUnicode {
    fn normalize(&self, raw: &str) -> String {
        normalize_plain_unicode(raw)
    }
}

pub fn normalize_plain_unicode(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut mapped = String::with_capacity(unified.len());
    for c in unified.chars() {
        match c {
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' | '\u{00ab}' | '\u{00bb}' => {
                mapped.push('"')
            }
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' | '\u{2032}' => mapped.push('\''),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => mapped.push('-'),
            '\u{2026}' => mapped.push_str("..."),
            '\u{00a0}' | '\u{2007}' | '\u{202f}' => mapped.push(' '),
            _ => mapped.push(c),
        }
    }

    mapped
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_and_apostrophes() {
        assert_eq!(
            normalize_plain_unicode("\u{201c}It\u{2019}s here,\u{201d} she said."),
            "\"It's here,\" she said."
        );
    }

    #[test]
    fn test_line_endings_and_bom() {
        assert_eq!(normalize_plain_unicode("\u{feff}one\r\ntwo\rthree  \n"), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_dashes_ellipsis_spaces() {
        assert_eq!(
            normalize_plain_unicode("wait\u{2026} no\u{2014}yes\u{00a0}ok"),
            "wait... no-yes ok"
        );
    }

    #[test]
    fn test_plain_ascii_unchanged() {
        let text = "hello world\n\nSecond paragraph.";
        assert_eq!(PlainUnicode.normalize(text), text);
    }
}
