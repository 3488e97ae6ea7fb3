//! Rendering contract for an authenticated identity.
//!
//! Both front-ends show the same ordered list of rows, so the ordering and
//! labels live here rather than in either UI layer.

use crate::auth::UserIdentity;

/// One labelled row on the logged-in screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub title: &'static str,
    pub content: String,
}

impl ContentRow {
    fn new(title: &'static str, content: impl Into<String>) -> Self {
        Self {
            title,
            content: content.into(),
        }
    }
}

/// Flatten an identity into display rows.
///
/// Order is fixed: name (only when any part is non-empty), user id, then a
/// value/id row pair per email, per phone number, and per linked provider.
pub fn identity_rows(user: &UserIdentity) -> Vec<ContentRow> {
    let mut rows = Vec::new();

    if let Some(full_name) = user.name.full_name() {
        rows.push(ContentRow::new("NAME", full_name));
    }
    rows.push(ContentRow::new("USER ID", &user.user_id));

    for email in &user.emails {
        rows.push(ContentRow::new("EMAIL", &email.address));
        rows.push(ContentRow::new("EMAIL ID", &email.id));
    }
    for phone in &user.phone_numbers {
        rows.push(ContentRow::new("PHONE NUMBER", &phone.number));
        rows.push(ContentRow::new("PHONE ID", &phone.id));
    }
    for provider in &user.providers {
        rows.push(ContentRow::new("OAUTH PROVIDER", &provider.provider_type));
        rows.push(ContentRow::new("PROVIDER SUBJECT", &provider.provider_subject));
    }

    rows
}
