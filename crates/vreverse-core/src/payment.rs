//! Normalization of payment-provider webhook payloads.
//!
//! The checkout provider posts loosely shaped JSON: the buyer email and status
//! may sit at the top level or under `data`. Only approvals produce a
//! subscriber upsert; everything else is acknowledged and ignored.

use serde_json::Value;

use crate::subscription::normalize_email;

const APPROVED_STATUSES: &[&str] = &["approved", "complete", "active", "active_subscription"];
const APPROVED_EVENTS: &[&str] = &[
    "PURCHASE_APPROVED",
    "PURCHASE_COMPLETE",
    "SUBSCRIPTION_RENEWAL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Grant access: upsert `email` with `last_event`.
    Approved { email: String, last_event: String },
    Ignored { reason: String },
}

/// Classifies a webhook body.
#[must_use]
pub fn parse_payment_notification(body: &Value) -> PaymentOutcome {
    let email = str_at(body, &["email"])
        .or_else(|| str_at(body, &["data", "buyer", "email"]))
        .unwrap_or_default();
    let status = str_at(body, &["status"])
        .or_else(|| str_at(body, &["data", "status"]))
        .unwrap_or_default()
        .to_lowercase();
    let event = str_at(body, &["event"]).unwrap_or_default();

    let approved =
        APPROVED_STATUSES.contains(&status.as_str()) || APPROVED_EVENTS.contains(&event);
    if !approved {
        return PaymentOutcome::Ignored {
            reason: format!("not an approval (event='{event}', status='{status}')"),
        };
    }

    let Some(email) = normalize_email(email) else {
        return PaymentOutcome::Ignored {
            reason: "approval without a buyer email".to_string(),
        };
    };

    let last_event = if event.is_empty() { status } else { event.to_string() };
    PaymentOutcome::Approved { email, last_event }
}

/// Walks `path` and returns a non-empty string leaf.
fn str_at<'a>(body: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(body, |node, key| node.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
