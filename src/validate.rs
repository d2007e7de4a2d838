//! Request validation for user link lists.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

const MIN_LINKS: usize = 2;
const MAX_LINKS: usize = 20;

static PROFILE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://steamcommunity\.com/id/[^/]+/?$").expect("profile link regex")
});

/// Check a link list before any remote call: 2 to 20 entries, no duplicates,
/// every entry a steamcommunity.com profile URL.
pub fn validate_links(links: &[String]) -> Result<(), AppError> {
    if links.len() < MIN_LINKS {
        return Err(AppError::Validation(format!(
            "links must contain at least {MIN_LINKS} entries"
        )));
    }
    if links.len() > MAX_LINKS {
        return Err(AppError::Validation(format!(
            "links must contain no more than {MAX_LINKS} entries"
        )));
    }

    let mut seen = HashSet::new();
    for link in links {
        if !seen.insert(link.as_str()) {
            return Err(AppError::Validation(format!("duplicate link: {link}")));
        }
        if !PROFILE_LINK_RE.is_match(link) {
            return Err(AppError::Validation(format!("not a profile link: {link}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| format!("https://steamcommunity.com/id/{n}/"))
            .collect()
    }

    #[test]
    fn accepts_two_distinct_profile_links() {
        assert!(validate_links(&links(&["alice", "bob"])).is_ok());
    }

    #[test]
    fn trailing_slash_is_optional() {
        let list = vec![
            "https://steamcommunity.com/id/alice".to_string(),
            "https://steamcommunity.com/id/bob/".to_string(),
        ];
        assert!(validate_links(&list).is_ok());
    }

    #[test]
    fn rejects_a_single_link() {
        assert!(validate_links(&links(&["alice"])).is_err());
    }

    #[test]
    fn rejects_more_than_twenty_links() {
        let names: Vec<String> = (0..21).map(|i| format!("user{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        assert!(validate_links(&links(&refs)).is_err());
    }

    #[test]
    fn rejects_duplicates() {
        assert!(validate_links(&links(&["alice", "alice"])).is_err());
    }

    #[test]
    fn rejects_non_profile_urls() {
        let list = vec![
            "https://steamcommunity.com/id/alice/".to_string(),
            "https://example.com/id/bob/".to_string(),
        ];
        assert!(validate_links(&list).is_err());

        let extra_path = vec![
            "https://steamcommunity.com/id/alice/".to_string(),
            "https://steamcommunity.com/id/bob/games".to_string(),
        ];
        assert!(validate_links(&extra_path).is_err());
    }

    #[test]
    fn validation_errors_are_recognized() {
        let err = validate_links(&links(&["alice"])).unwrap_err();
        assert!(err.is_recognized());
    }
}
