//! Link and date patterns shared by extraction and the timeline validator.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::LinkKind;

lazy_static! {
    /// github.com/<user>
    pub static ref GITHUB_PATTERN: Regex = Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?github\.com/([a-zA-Z0-9_-]+)"
    ).unwrap();

    /// linkedin.com/in/<user>
    pub static ref LINKEDIN_PATTERN: Regex = Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/([a-zA-Z0-9_-]+)"
    ).unwrap();

    /// kaggle.com/<user>
    pub static ref KAGGLE_PATTERN: Regex = Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?kaggle\.com/([a-zA-Z0-9_-]+)"
    ).unwrap();

    /// Bare handle, accepted when the resume lists a username instead of a URL
    static ref HANDLE_PATTERN: Regex = Regex::new(r"^@?([a-zA-Z0-9_-]+)$").unwrap();

    /// Metric claims a Kaggle profile can speak to
    pub static ref KAGGLE_CLAIM_PATTERN: Regex = Regex::new(
        r"(?i)\b(kaggle|competitions?|medals?|grandmaster)\b"
    ).unwrap();

    /// 2021-03, 2021/3, 2021
    pub static ref YEAR_MONTH_PATTERN: Regex = Regex::new(
        r"^\s*(\d{4})(?:\s*[-/.]\s*(\d{1,2}))?\s*$"
    ).unwrap();

    /// present, current, now, ongoing
    pub static ref ONGOING_PATTERN: Regex = Regex::new(
        r"(?i)^\s*(present|current|now|ongoing|till date|to date)\s*$"
    ).unwrap();
}

fn pattern_for(kind: LinkKind) -> &'static Regex {
    match kind {
        LinkKind::Github => &GITHUB_PATTERN,
        LinkKind::Kaggle => &KAGGLE_PATTERN,
        LinkKind::Linkedin => &LINKEDIN_PATTERN,
    }
}

/// Extract the lower-cased username from a profile URL or bare handle.
pub fn extract_username(kind: LinkKind, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Some(caps) = pattern_for(kind).captures(link) {
        return caps.get(1).map(|m| m.as_str().to_lowercase());
    }

    // A URL for another site is not a handle.
    if link.contains('/') || link.contains('.') {
        return None;
    }

    HANDLE_PATTERN
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Check if a claim's text concerns Kaggle standing.
pub fn mentions_kaggle(content: &str) -> bool {
    KAGGLE_CLAIM_PATTERN.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_username() {
        assert_eq!(
            extract_username(LinkKind::Github, "https://github.com/OctoCat"),
            Some("octocat".to_string())
        );
        assert_eq!(
            extract_username(LinkKind::Github, "www.github.com/octo-cat/repo"),
            Some("octo-cat".to_string())
        );
    }

    #[test]
    fn test_linkedin_requires_in_path() {
        assert_eq!(
            extract_username(LinkKind::Linkedin, "linkedin.com/in/jane_doe"),
            Some("jane_doe".to_string())
        );
        assert_eq!(extract_username(LinkKind::Linkedin, "linkedin.com/company/acme"), None);
    }

    #[test]
    fn test_bare_handle_accepted() {
        assert_eq!(extract_username(LinkKind::Kaggle, "@Grandmaster"), Some("grandmaster".to_string()));
    }

    #[test]
    fn test_wrong_site_rejected() {
        assert_eq!(extract_username(LinkKind::Github, "https://gitlab.com/octocat"), None);
        assert_eq!(extract_username(LinkKind::Github, "   "), None);
    }

    #[test]
    fn test_year_month_pattern() {
        let caps = YEAR_MONTH_PATTERN.captures("2021-03").unwrap();
        assert_eq!(&caps[1], "2021");
        assert_eq!(&caps[2], "03");
        assert!(YEAR_MONTH_PATTERN.captures("2021").unwrap().get(2).is_none());
        assert!(ONGOING_PATTERN.is_match("Present"));
    }

    #[test]
    fn test_mentions_kaggle() {
        assert!(mentions_kaggle("Kaggle Expert with 2 silver medals"));
        assert!(mentions_kaggle("Top 5% in 3 competitions"));
        assert!(!mentions_kaggle("Reduced latency by 40%"));
    }
}
