use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::{AppError, AppResult};
use crate::models::ScanParams;

static RE_BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Turns a decoded QR payload into scan parameters.
///
/// Accepts an absolute URL carrying `id` (plus optional `cat`/`loc`) or a
/// bare string of digits.
pub fn parse_payload(raw: &str) -> AppResult<ScanParams> {
    if let Ok(url) = Url::parse(raw) {
        return params_from_url(&url).ok_or(AppError::MissingItemId);
    }

    if RE_BARE_ID.is_match(raw) {
        return Ok(ScanParams::bare(raw));
    }

    Err(AppError::InvalidPayload(raw.to_string()))
}

/// Reads `id`, `cat` and `loc` from a URL query. `None` without a usable `id`.
pub fn params_from_url(url: &Url) -> Option<ScanParams> {
    let mut id = None;
    let mut category = None;
    let mut location = None;
    for (key, value) in url.query_pairs() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "id" if id.is_none() => id = Some(value.to_string()),
            "cat" if category.is_none() => category = Some(value.to_string()),
            "loc" if location.is_none() => location = Some(value.to_string()),
            _ => {}
        }
    }

    id.map(|id| ScanParams {
        id,
        category,
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_url_payload_with_hints() {
        let params =
            parse_payload("https://app.quixx24.com/?id=42&cat=Fasteners&loc=Rack%20B").unwrap();
        assert_eq!(params.id, "42");
        assert_eq!(params.category.as_deref(), Some("Fasteners"));
        assert_eq!(params.location.as_deref(), Some("Rack B"));
    }

    #[test]
    fn test_bare_digits_equal_url_without_hints() {
        let bare = parse_payload("12345").unwrap();
        let url = parse_payload("https://scan.example.com/?id=12345").unwrap();
        assert_eq!(bare, url);
        assert_eq!(bare, ScanParams::bare("12345"));
    }

    #[test]
    fn test_url_without_id_is_rejected() {
        assert_matches!(
            parse_payload("https://scan.example.com/?cat=Fasteners"),
            Err(AppError::MissingItemId)
        );
        assert_matches!(
            parse_payload("https://scan.example.com/?id=&loc=A1"),
            Err(AppError::MissingItemId)
        );
    }

    #[test]
    fn test_other_text_is_invalid() {
        assert_matches!(parse_payload("ABC-100"), Err(AppError::InvalidPayload(_)));
        assert_matches!(parse_payload("12 34"), Err(AppError::InvalidPayload(_)));
        assert_matches!(parse_payload(""), Err(AppError::InvalidPayload(_)));
    }

    #[test]
    fn test_non_ascii_digits_are_invalid() {
        assert_matches!(
            parse_payload("\u{0661}\u{0662}\u{0663}"),
            Err(AppError::InvalidPayload(_))
        );
        assert_matches!(
            parse_payload("\u{FF11}\u{FF12}\u{FF13}"),
            Err(AppError::InvalidPayload(_))
        );
        assert_matches!(
            parse_payload("\u{0967}\u{0968}"),
            Err(AppError::InvalidPayload(_))
        );
    }

    #[test]
    fn test_empty_hints_are_dropped() {
        let params = parse_payload("https://scan.example.com/?id=7&cat=&loc=").unwrap();
        assert_eq!(params, ScanParams::bare("7"));
    }
}
