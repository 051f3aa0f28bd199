//! Prefix completion for header names and URLs
//!
//! Header keys complete against a builtin table of common names; URLs
//! complete against what the history already holds. Single match fills
//! in fully, multiple matches extend to their longest common prefix.

use crate::constants::COMMON_HEADERS;

/// Complete a header key being typed. Matching is case-insensitive, the
/// completion takes the table's canonical casing.
pub fn complete_header_key(prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let matches: Vec<String> = COMMON_HEADERS
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix.to_lowercase()))
        .map(|name| (*name).to_string())
        .collect();
    pick_completion(prefix, matches)
}

/// Complete a URL from previously sent requests
pub fn complete_url<'a>(prefix: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let matches: Vec<String> = candidates
        .filter(|url| url.starts_with(prefix))
        .map(str::to_string)
        .collect();
    pick_completion(prefix, matches)
}

fn pick_completion(prefix: &str, matches: Vec<String>) -> Option<String> {
    match matches.len() {
        0 => None,
        1 => Some(matches.into_iter().next().unwrap_or_default()),
        _ => common_prefix(&matches).filter(|common| common.len() > prefix.len()),
    }
}

/// Find common prefix among strings
fn common_prefix(strings: &[String]) -> Option<String> {
    if strings.is_empty() {
        return None;
    }
    let first = &strings[0];
    let mut prefix_len = first.len();

    for s in &strings[1..] {
        prefix_len = first
            .chars()
            .zip(s.chars())
            .take_while(|(a, b)| a == b)
            .count()
            .min(prefix_len);
    }

    if prefix_len > 0 {
        Some(first[..prefix_len].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_header_match_completes_fully() {
        assert_eq!(complete_header_key("auth"), Some(String::from("Authorization")));
        assert_eq!(complete_header_key("user"), Some(String::from("User-Agent")));
    }

    #[test]
    fn test_multiple_header_matches_extend_to_common_prefix() {
        // Accept, Accept-Encoding, Accept-Language share "Accept"
        assert_eq!(complete_header_key("acc"), Some(String::from("Accept")));
    }

    #[test]
    fn test_no_match_or_no_progress_yields_none() {
        assert_eq!(complete_header_key("zz"), None);
        assert_eq!(complete_header_key(""), None);
        // Already at the common prefix, nothing to extend
        assert_eq!(complete_header_key("Accept"), None);
    }

    #[test]
    fn test_url_completion_from_history() {
        let urls = [
            String::from("https://api.example.com/users"),
            String::from("https://api.example.com/users/42"),
        ];
        assert_eq!(
            complete_url("https://api", urls.iter().map(String::as_str)),
            Some(String::from("https://api.example.com/users"))
        );
        assert_eq!(complete_url("http://other", urls.iter().map(String::as_str)), None);
    }

    #[test]
    fn test_common_prefix() {
        let strings = vec![String::from("header-one"), String::from("header-two")];
        assert_eq!(common_prefix(&strings), Some(String::from("header-")));
        assert_eq!(common_prefix(&[]), None);
    }
}
