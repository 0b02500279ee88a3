//! Input shape checks for membership forms.
//!
//! These run before anything touches the store. The URL rule is
//! deliberately strict: a member registers an origin
//! (`http(s)://host`, optional trailing slash), not a deep link.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^/]+/?$").expect("static regex"))
}

/// Returns true for `http(s)://host` with at most a trailing slash.
pub fn is_valid_url(url: &str) -> bool {
    url_regex().is_match(url)
}

/// Minimal email shape check: an `@` and a `.` somewhere.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Returns true if the password meets the length floor.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Strips a single trailing slash so `https://x.example/` and
/// `https://x.example` are the same member.
pub fn normalize_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
