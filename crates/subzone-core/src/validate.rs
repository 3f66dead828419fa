//! Syntactic checks for subdomain labels and nameserver host names.
//!
//! A label is the single segment a user claims directly below the service
//! domain. It must never contain a dot: `sub.alice` would create a delegation
//! inside `alice`'s namespace.
//!
//! A nameserver is a fully qualified host name such as `ns1.example.com`.

use crate::{Result, SubzoneError};

/// Shortest acceptable label.
pub const MIN_LABEL_LEN: usize = 3;

/// Longest acceptable label (a single DNS label).
pub const MAX_LABEL_LEN: usize = 63;

/// Overall length bounds for a nameserver host name.
const MIN_HOST_LEN: usize = 3;
const MAX_HOST_LEN: usize = 63;

/// Length bounds for the final (top-level) label of a nameserver.
const MIN_TLD_LEN: usize = 2;
const MAX_TLD_LEN: usize = 20;

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Hyphen and digit rules shared by labels and host names.
fn passes_common_rules(s: &str) -> bool {
    !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && !s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `label` can be claimed as `label.<service domain>`.
#[must_use]
pub fn is_acceptable_label(label: &str) -> bool {
    (MIN_LABEL_LEN..=MAX_LABEL_LEN).contains(&label.len())
        && label.chars().all(is_host_char)
        && passes_common_rules(label)
}

/// Returns true if `value` is a syntactically valid nameserver host name.
#[must_use]
pub fn is_acceptable_nameserver(value: &str) -> bool {
    if !(MIN_HOST_LEN..=MAX_HOST_LEN).contains(&value.len()) || !passes_common_rules(value) {
        return false;
    }

    let labels: Vec<&str> = value.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };

    !rest.is_empty()
        && (MIN_TLD_LEN..=MAX_TLD_LEN).contains(&tld.len())
        && tld.chars().all(is_host_char)
        && rest
            .iter()
            .all(|l| (1..=MAX_LABEL_LEN).contains(&l.len()) && l.chars().all(is_host_char))
}

/// Like [`is_acceptable_label`], but reports the rejected label.
pub fn validate_label(label: &str) -> Result<()> {
    if is_acceptable_label(label) {
        Ok(())
    } else {
        Err(SubzoneError::InvalidLabel(label.to_string()))
    }
}

/// Like [`is_acceptable_nameserver`], but reports the rejected value.
pub fn validate_nameserver(value: &str) -> Result<()> {
    if is_acceptable_nameserver(value) {
        Ok(())
    } else {
        Err(SubzoneError::InvalidNameserver(value.to_string()))
    }
}

/// Lower-case a label for storage and comparison.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

/// Lower-case a nameserver and drop a single trailing root dot.
#[must_use]
pub fn normalize_nameserver(value: &str) -> String {
    let value = value.trim();
    value.strip_suffix('.').unwrap_or(value).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_boundaries() {
        assert!(is_acceptable_label("valid-label"));
        assert!(is_acceptable_label("abc"));
        assert!(is_acceptable_label("a1b"));
        assert!(is_acceptable_label("Alice"));
        assert!(is_acceptable_label(&"a".repeat(63)));

        assert!(!is_acceptable_label("ab"));
        assert!(!is_acceptable_label(""));
        assert!(!is_acceptable_label(&"a".repeat(64)));
        assert!(!is_acceptable_label("sub.example"));
        assert!(!is_acceptable_label("abc."));
        assert!(!is_acceptable_label("123"));
        assert!(!is_acceptable_label("a--b"));
        assert!(!is_acceptable_label("abc-"));
        assert!(!is_acceptable_label("-abc"));
        assert!(!is_acceptable_label("ab_c"));
        assert!(!is_acceptable_label("ab c"));
    }

    #[test]
    fn nameserver_boundaries() {
        assert!(is_acceptable_nameserver("ns1.example.com"));
        assert!(is_acceptable_nameserver("a.io"));
        assert!(is_acceptable_nameserver("dns-1.registrar-servers.com"));
        assert!(is_acceptable_nameserver("ns.example.abcdefghijklmnopqrst"));

        assert!(!is_acceptable_nameserver("localhost"));
        assert!(!is_acceptable_nameserver("ns1.example.c"));
        assert!(!is_acceptable_nameserver("ns.example.abcdefghijklmnopqrstu"));
        assert!(!is_acceptable_nameserver("ns1..com"));
        assert!(!is_acceptable_nameserver(".example.com"));
        assert!(!is_acceptable_nameserver("ns1.example.com."));
        assert!(!is_acceptable_nameserver("ns--1.example.com"));
        assert!(!is_acceptable_nameserver("-ns1.example.com"));
        assert!(!is_acceptable_nameserver("ns1.example.com-"));
        assert!(!is_acceptable_nameserver("ns1.exa_mple.com"));
        assert!(!is_acceptable_nameserver(&format!("{}.com", "a".repeat(60))));
    }

    #[test]
    fn validate_reports_input() {
        assert!(validate_label("valid-label").is_ok());
        match validate_label("a.b") {
            Err(SubzoneError::InvalidLabel(l)) => assert_eq!(l, "a.b"),
            other => panic!("unexpected: {other:?}"),
        }
        match validate_nameserver("nope") {
            Err(SubzoneError::InvalidNameserver(v)) => assert_eq!(v, "nope"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_label(" Alice "), "alice");
        assert_eq!(normalize_nameserver("NS1.Example.COM."), "ns1.example.com");
        assert_eq!(normalize_nameserver("ns1.example.com"), "ns1.example.com");
    }
}
