//! Subscription gate policy.
//!
//! Lookups are keyed by the normalized email. The persisted half of the gate
//! lives in `vreverse-db`; this module owns normalization and the admin
//! override set.

use std::collections::HashSet;

/// Lower-cases and trims an email. Returns `None` for input that cannot be an
/// address (no `@`), so callers can deny without a lookup.
#[must_use]
pub fn normalize_email(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() || !cleaned.contains('@') {
        return None;
    }
    Some(cleaned)
}

/// Emails that are always allowed regardless of subscriber rows.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admin_emails: HashSet<String>,
}

impl AccessPolicy {
    #[must_use]
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_emails: admin_emails
                .into_iter()
                .filter_map(|e| normalize_email(e.as_ref()))
                .collect(),
        }
    }

    /// `email` must already be normalized.
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.contains(email)
    }
}
