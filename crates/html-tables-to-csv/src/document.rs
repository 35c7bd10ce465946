use encoding_rs::{Encoding, UTF_8};
use url::Url;

use crate::error::ExtractError;

pub const FALLBACK_PAGE_NAME: &str = "scraped_data";

const META_SNIFF_LIMIT: usize = 1024;

/// A fetched HTML page. Consumed once by the table locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: Url,
    pub html: String,
}

impl Document {
    #[must_use]
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    #[must_use]
    pub fn from_bytes(url: Url, bytes: &[u8], content_type: Option<&str>) -> Self {
        Self {
            url,
            html: decode_html(bytes, content_type),
        }
    }

    /// Prefix for every file written for this page.
    #[must_use]
    pub fn page_name(&self) -> String {
        page_name(&self.url)
    }
}

pub fn parse_url(raw: &str) -> Result<Url, ExtractError> {
    let trimmed = raw.trim();
    Url::parse(trimmed).map_err(|source| ExtractError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })
}

/// Last path segment of `url`, or `scraped_data` when it is empty.
#[must_use]
pub fn page_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_PAGE_NAME)
        .to_string()
}

/// Decodes raw page bytes. A byte-order mark wins, then the Content-Type
/// charset, then a `<meta>` declaration near the top, then UTF-8.
#[must_use]
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|ch| ch == '"' || ch == '\'');
        Encoding::for_label(label.as_bytes())
    })
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let lower = head.to_ascii_lowercase();

    let mut from = 0;
    while let Some(offset) = find(&lower[from..], b"<meta") {
        let start = from + offset;
        let end = find(&lower[start..], b">").map_or(lower.len(), |rel| start + rel);
        let tag = &lower[start..end];
        if let Some(encoding) = find(tag, b"charset")
            .and_then(|pos| charset_label(&tag[pos + b"charset".len()..]))
            .and_then(Encoding::for_label)
        {
            // A page cannot really be UTF-16 if this ASCII scan found the tag.
            return Some(encoding.output_encoding());
        }
        from = end;
    }
    None
}

fn charset_label(rest: &[u8]) -> Option<&[u8]> {
    let rest = trim_ascii_start(rest);
    let rest = trim_ascii_start(rest.strip_prefix(b"=")?);
    let rest = rest
        .strip_prefix(b"\"")
        .or_else(|| rest.strip_prefix(b"'"))
        .unwrap_or(rest);
    let len = rest
        .iter()
        .position(|byte| matches!(byte, b'"' | b'\'' | b';' | b' ' | b'/' | b'>'))
        .unwrap_or(rest.len());
    (len > 0).then(|| &rest[..len])
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[skip..]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
