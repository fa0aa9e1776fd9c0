//! `Link` header handling (RFC 8288) for Dribbble's page/per_page pagination.
//!
//! Dribbble advertises further pages with a header such as
//! `<https://api.dribbble.com/v2/user/shots?page=2&per_page=2>; rel="next"`.

use std::collections::HashMap;

/// Parse a `Link` header into a map of relation -> target URL.
///
/// Entries without a `rel` parameter or with a malformed target are skipped.
/// A `rel` holding several space-separated relation types registers the
/// target under each of them.
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();

    for entry in split_entries(header) {
        let mut parts = entry.split(';');
        let target = match parts.next().map(str::trim) {
            Some(t) if t.starts_with('<') && t.ends_with('>') && t.len() >= 2 => &t[1..t.len() - 1],
            _ => continue,
        };

        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            let value = value.trim().trim_matches('"');
            for rel in value.split_whitespace() {
                links
                    .entry(rel.to_ascii_lowercase())
                    .or_insert_with(|| target.to_string());
            }
        }
    }

    links
}

/// True iff the header advertises a `next` relation
pub fn has_next_page(header: Option<&str>) -> bool {
    header
        .map(|h| parse_link_header(h).contains_key("next"))
        .unwrap_or(false)
}

/// Split on commas that sit outside `<...>` so URLs containing commas survive
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(header[start..].trim());

    entries.into_iter().filter(|e| !e.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIBBBLE_LINK: &str = r#"<https://api.dribbble.com/v2/user/shots?page=1&per_page=2>; rel="prev", <https://api.dribbble.com/v2/user/shots?page=3&per_page=2>; rel="next""#;

    #[test]
    fn test_parse_prev_and_next() {
        let links = parse_link_header(DRIBBBLE_LINK);
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://api.dribbble.com/v2/user/shots?page=3&per_page=2")
        );
        assert!(links.contains_key("prev"));
    }

    #[test]
    fn test_has_next_page() {
        assert!(has_next_page(Some(DRIBBBLE_LINK)));
        assert!(!has_next_page(Some(
            r#"<https://api.dribbble.com/v2/user/shots?page=2&per_page=2>; rel="prev""#
        )));
        assert!(!has_next_page(None));
        assert!(!has_next_page(Some("")));
    }

    #[test]
    fn test_unquoted_and_multi_rel() {
        let links = parse_link_header("<https://x.test/?page=2>; REL=next, <https://x.test/?page=9>; rel=\"last end\"");
        assert_eq!(links.get("next").map(String::as_str), Some("https://x.test/?page=2"));
        assert_eq!(links.get("last").map(String::as_str), Some("https://x.test/?page=9"));
        assert_eq!(links.get("end").map(String::as_str), Some("https://x.test/?page=9"));
    }

    #[test]
    fn test_comma_inside_url() {
        let links = parse_link_header(r#"<https://x.test/?ids=1,2&page=2>; rel="next""#);
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://x.test/?ids=1,2&page=2")
        );
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let links = parse_link_header(r#"https://no-brackets.test; rel="next", <https://ok.test>; title="x""#);
        assert!(links.is_empty());
    }
}
