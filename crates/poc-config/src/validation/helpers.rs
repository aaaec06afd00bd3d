//! Shared validation helpers.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+(?:[/?#]\S*)?$").unwrap());

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Whether `value` is an absolute http(s) URL.
pub fn is_http_url(value: &str) -> bool {
    URL_RE.is_match(value)
}

/// Push an error unless `value` is an absolute http(s) URL.
pub(crate) fn validate_url(errors: &mut Vec<String>, name: &str, value: &str) {
    if !is_http_url(value) {
        errors.push(format!("{name} = {value:?} is not an http(s) URL"));
    }
}

/// Push an error unless `value` (case-insensitive) is one of `allowed`.
pub(crate) fn validate_one_of(errors: &mut Vec<String>, name: &str, value: &str, allowed: &[&str]) {
    if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
        errors.push(format!(
            "{name} = {value:?} must be one of {}",
            allowed.join(", ")
        ));
    }
}
