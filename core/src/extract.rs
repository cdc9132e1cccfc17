//! Narration extraction from HTML slide decks.
//!
//! The deck is read as a stream of markup events. Every `<section>` start
//! (or self-closing) tag is a slide boundary; a boundary is narrated when its
//! `data-narration` attribute holds text after unescaping and trimming.

use quick_xml::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::types::{Boundary, NarrationUnit};

/// Element that marks a slide boundary.
const BOUNDARY_TAG: &[u8] = b"section";

/// Attribute that carries narration text.
const NARRATION_ATTR: &[u8] = b"data-narration";

/// Longest entity reference (including `&` and `;`) we try to resolve.
const MAX_ENTITY_LEN: usize = 32;

/// Error type for extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The document markup could not be read past this position.
    #[error("malformed document at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    /// The attributes of a slide boundary could not be read.
    #[error("slide {index}: invalid attributes: {message}")]
    Attribute { index: u32, message: String },
}

/// Returns the slide boundaries of `document` in order.
pub fn boundaries(document: &str) -> Boundaries<'_> {
    Boundaries::new(document)
}

/// Returns the narration units of `document` in order.
///
/// The returned iterator is lazy; calling `extract` again on the same text
/// yields the same sequence.
pub fn extract<'a>(group_id: &'a str, document: &'a str) -> Extractor<'a> {
    Extractor {
        group_id,
        boundaries: Boundaries::new(document),
    }
}

/// Collects all narration units of `document`, stopping at the first error.
pub fn extract_all(group_id: &str, document: &str) -> Result<Vec<NarrationUnit>, ExtractError> {
    extract(group_id, document).collect()
}

// ==================== Boundaries ====================

/// Iterator over the slide boundaries of a document.
///
/// After a markup error the iterator yields that error once and then ends.
pub struct Boundaries<'a> {
    reader: Reader<&'a [u8]>,
    index: u32,
    finished: bool,
}

impl<'a> Boundaries<'a> {
    fn new(document: &'a str) -> Self {
        let mut reader = Reader::from_str(document);
        // HTML leaves void elements open and tolerates stray end tags.
        reader.check_end_names(false);
        reader.expand_empty_elements(false);

        Self {
            reader,
            index: 0,
            finished: false,
        }
    }

    fn boundary(&self, tag: &BytesStart<'_>) -> Result<Boundary, ExtractError> {
        let mut narration = None;
        let mut found = false;
        let mut skipped = None;

        // Browsers keep the first of repeated attributes.
        let mut attrs = tag.html_attributes();
        attrs.with_checks(false);

        for attr in attrs {
            let attr = match attr {
                Ok(attr) => attr,
                Err(e) => {
                    skipped.get_or_insert(e);
                    continue;
                }
            };

            if !attr.key.as_ref().eq_ignore_ascii_case(NARRATION_ATTR) {
                continue;
            }
            found = true;

            let raw = std::str::from_utf8(&attr.value).map_err(|e| ExtractError::Attribute {
                index: self.index,
                message: e.to_string(),
            })?;

            let text = unescape_lenient(raw);
            let text = text.trim();
            if !text.is_empty() {
                narration = Some(text.to_string());
            }
            break;
        }

        // Broken markup elsewhere in the tag is ignored; only an unreadable
        // narration attribute is an error.
        if let Some(e) = skipped {
            if !found && mentions_narration(tag) {
                return Err(ExtractError::Attribute {
                    index: self.index,
                    message: e.to_string(),
                });
            }
        }

        Ok(Boundary {
            index: self.index,
            narration,
        })
    }
}

impl Iterator for Boundaries<'_> {
    type Item = Result<Boundary, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) if is_boundary(&tag) => {
                    self.index += 1;
                    return Some(self.boundary(&tag));
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ExtractError::Malformed {
                        position: self.reader.buffer_position(),
                        message: e.to_string(),
                    }));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Boundaries<'_> {}

// ==================== Extractor ====================

/// Iterator over the narration units of a document.
pub struct Extractor<'a> {
    group_id: &'a str,
    boundaries: Boundaries<'a>,
}

impl Iterator for Extractor<'_> {
    type Item = Result<NarrationUnit, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        for boundary in self.boundaries.by_ref() {
            match boundary {
                Ok(Boundary {
                    index,
                    narration: Some(text),
                }) => {
                    return Some(Ok(NarrationUnit {
                        group_id: self.group_id.to_string(),
                        index,
                        text,
                    }));
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Extractor<'_> {}

fn is_boundary(tag: &BytesStart<'_>) -> bool {
    tag.local_name().as_ref().eq_ignore_ascii_case(BOUNDARY_TAG)
}

fn mentions_narration(tag: &BytesStart<'_>) -> bool {
    tag.as_ref()
        .windows(NARRATION_ATTR.len())
        .any(|w| w.eq_ignore_ascii_case(NARRATION_ATTR))
}

/// Named references that HTML also resolves without a trailing semicolon.
const LEGACY_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("AMP", "&"),
    ("lt", "<"),
    ("LT", "<"),
    ("gt", ">"),
    ("GT", ">"),
    ("quot", "\""),
    ("QUOT", "\""),
    ("nbsp", "\u{a0}"),
    ("copy", "\u{a9}"),
    ("COPY", "\u{a9}"),
    ("reg", "\u{ae}"),
    ("REG", "\u{ae}"),
    ("deg", "\u{b0}"),
    ("middot", "\u{b7}"),
    ("times", "\u{d7}"),
    ("laquo", "\u{ab}"),
    ("raquo", "\u{bb}"),
];

/// Resolves character references in an attribute value the way HTML does.
///
/// Numeric references and the legacy named ones resolve even without a
/// semicolon. Unknown references and bare ampersands are kept verbatim.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        match decode_reference(tail) {
            Some((text, consumed)) => {
                out.push_str(&text);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes the reference at the start of `tail`, the text after an `&`.
/// Returns the decoded text and the number of bytes it consumed.
fn decode_reference(tail: &str) -> Option<(String, usize)> {
    if let Some(number) = tail.strip_prefix('#') {
        let (c, consumed) = decode_numeric(number)?;
        return Some((c.to_string(), consumed + 1));
    }

    let name_len = tail
        .find(|c: char| matches!(c, ';' | '&' | '#' | '<') || c.is_whitespace())
        .unwrap_or(tail.len());
    if name_len > 0 && name_len < MAX_ENTITY_LEN && tail[name_len..].starts_with(';') {
        let reference = &tail[..=name_len];
        if let Ok(text) = escape::unescape(&format!("&{}", reference)) {
            return Some((text.into_owned(), name_len + 1));
        }
    }

    LEGACY_ENTITIES
        .iter()
        .filter(|(name, _)| tail.starts_with(name))
        .max_by_key(|(name, _)| name.len())
        .map(|(name, text)| (text.to_string(), name.len()))
}

/// Decodes `123`, `x7b` or `X7B`, with an optional trailing `;`.
fn decode_numeric(number: &str) -> Option<(char, usize)> {
    let (digits_start, radix) = match number.as_bytes().first() {
        Some(b'x') | Some(b'X') => (1, 16),
        _ => (0, 10),
    };
    let digits = &number[digits_start..];
    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    let c = u32::from_str_radix(&digits[..len], radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    let mut consumed = digits_start + len;
    if number[consumed..].starts_with(';') {
        consumed += 1;
    }
    Some((c, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(sections: &[&str]) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body>\n");
        html.push_str("<div class=\"reveal\"><div class=\"slides\">\n");
        for s in sections {
            html.push_str(s);
            html.push('\n');
        }
        html.push_str("</div></div></body></html>\n");
        html
    }

    #[test]
    fn test_index_tracks_every_boundary() {
        let html = deck(&[
            "<section><h1>Title</h1></section>",
            "<section data-narration=\"A\"><p>a</p></section>",
            "<section><p>no narration</p></section>",
            "<section data-narration=\"B\"><p>b</p></section>",
        ]);

        let units = extract_all("01", &html).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].index, 2);
        assert_eq!(units[0].text, "A");
        assert_eq!(units[1].index, 4);
        assert_eq!(units[1].text, "B");
        assert!(units.iter().all(|u| u.group_id == "01"));
    }

    #[test]
    fn test_blank_narration_counts_but_is_skipped() {
        let html = deck(&[
            "<section data-narration=\"\"></section>",
            "<section data-narration=\"   \n\t \"></section>",
            "<section data-narration=\"third\"></section>",
        ]);

        let all: Vec<_> = boundaries(&html).collect::<Result<_, _>>().unwrap();
        assert_eq!(all.len(), 3);
        assert!(!all[0].has_narration());
        assert!(!all[1].has_narration());

        let units = extract_all("02", &html).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, 3);
    }

    #[test]
    fn test_narration_is_unescaped_and_trimmed() {
        let html = deck(&[
            "<section data-narration=\"  Tom &amp; Jerry &lt;3 &quot;hi&quot; &#39;x&#39;\n  \"></section>",
        ]);

        let units = extract_all("01", &html).unwrap();
        assert_eq!(units[0].text, "Tom & Jerry <3 \"hi\" 'x'");
    }

    #[test]
    fn test_bare_ampersand_is_kept() {
        let html = deck(&["<section data-narration=\"TypeScript & JavaScript &unknown; &&amp;\"></section>"]);

        let units = extract_all("01", &html).unwrap();
        assert_eq!(units[0].text, "TypeScript & JavaScript &unknown; &&");
    }

    #[test]
    fn test_references_without_semicolon() {
        let html = deck(&["<section data-narration=\"Tom &amp Jerry &#39x &#x41 B &copy2024 &ampersand\"></section>"]);

        let units = extract_all("01", &html).unwrap();
        assert_eq!(units[0].text, "Tom & Jerry 'x A B \u{a9}2024 &ersand");
    }

    #[test]
    fn test_repeated_attributes_are_tolerated() {
        let html = deck(&[
            "<section data-narration=\"A\"></section>",
            "<section class=\"a\" class=\"b\"></section>",
            "<section data-narration=\"C\"></section>",
            "<section data-narration=\"first\" data-narration=\"second\"></section>",
        ]);

        let units = extract_all("01", &html).unwrap();
        let got: Vec<_> = units.iter().map(|u| (u.index, u.text.as_str())).collect();
        assert_eq!(got, vec![(1, "A"), (3, "C"), (4, "first")]);
    }

    #[test]
    fn test_broken_attribute_elsewhere_is_ignored() {
        let html = deck(&[
            "<section class=></section>",
            "<section data-narration=\"B\"></section>",
        ]);

        let units = extract_all("01", &html).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, 2);
    }

    #[test]
    fn test_unreadable_narration_attribute() {
        let html = deck(&[
            "<section data-narration=\"A\"></section>",
            "<section data-narration=></section>",
        ]);

        let result = extract_all("01", &html);
        assert!(matches!(result, Err(ExtractError::Attribute { index: 2, .. })));
    }

    #[test]
    fn test_html_tolerance() {
        let html = deck(&[
            "<section data-auto-animate data-narration='single quoted'><br><img src=x.png></section>",
            "</p><SECTION DATA-NARRATION=\"upper\"></SECTION>",
            "<section data-narration=\"a > b\"/>",
            "<sections data-narration=\"not a slide\"></sections>",
            "<div data-narration=\"not a slide either\"></div>",
            "<!-- <section data-narration=\"commented out\"></section> -->",
        ]);

        let units = extract_all("01", &html).unwrap();
        let got: Vec<_> = units.iter().map(|u| (u.index, u.text.as_str())).collect();
        assert_eq!(got, vec![(1, "single quoted"), (2, "upper"), (3, "a > b")]);
    }

    #[test]
    fn test_nested_sections_count_in_document_order() {
        let html = deck(&[
            "<section data-narration=\"intro\"></section>",
            "<section>",
            "  <section data-narration=\"vertical one\"></section>",
            "  <section data-narration=\"vertical two\"></section>",
            "</section>",
        ]);

        let units = extract_all("05", &html).unwrap();
        let got: Vec<_> = units.iter().map(|u| u.index).collect();
        assert_eq!(got, vec![1, 3, 4]);
    }

    #[test]
    fn test_extraction_is_restartable() {
        let html = deck(&[
            "<section data-narration=\"one\"></section>",
            "<section></section>",
            "<section data-narration=\"three\"></section>",
        ]);

        let first: Vec<_> = extract("01", &html).collect();
        let second: Vec<_> = extract("01", &html).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_sections() {
        assert!(extract_all("01", "<html><body><p>empty</p></body></html>").unwrap().is_empty());
        assert!(extract_all("01", "").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_stops_iteration() {
        let html = "<section data-narration=\"A\"></section><!-- never closed <section data-narration=\"B\">";

        let mut iter = extract("01", html);
        assert_eq!(iter.next().unwrap().unwrap().text, "A");
        assert!(matches!(iter.next(), Some(Err(ExtractError::Malformed { .. }))));
        assert!(iter.next().is_none());

        assert!(extract_all("01", html).is_err());
    }

    #[test]
    fn test_unescape_lenient() {
        assert_eq!(unescape_lenient("plain"), "plain");
        assert_eq!(unescape_lenient("a &amp; b"), "a & b");
        assert_eq!(unescape_lenient("&#x41;&#66;"), "AB");
        assert_eq!(unescape_lenient("trailing &"), "trailing &");
        assert_eq!(unescape_lenient("&amp;amp;"), "&amp;");
        assert_eq!(unescape_lenient("&#0; &#xD800; &#99999999;"), "\u{fffd} \u{fffd} \u{fffd}");
        assert_eq!(unescape_lenient("&#; &#x;"), "&#; &#x;");
        assert_eq!(unescape_lenient("&lt3 &gt;"), "<3 >");
    }
}
