//! Profile reads against the host's account API and forwarding of the
//! combined record to a webhook.
//!
//! [`ProfileClient`] performs the three authenticated reads concurrently.
//! [`ProfileForwarder`] waits for all three, posts the combined
//! [`ProfileRecord`] once, and can run the whole thing as a detached task that
//! never touches the response path.

mod client;
mod forwarder;

pub use client::ProfileClient;
pub use forwarder::ProfileForwarder;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile attribute exposed by the account settings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Email,
    MobileNumber,
}

impl ProfileField {
    /// All fields, in read order.
    pub fn all() -> &'static [ProfileField] {
        &[
            ProfileField::Name,
            ProfileField::Email,
            ProfileField::MobileNumber,
        ]
    }

    /// Settings key as it appears in the API path.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "Profile.name",
            Self::Email => "Profile.email",
            Self::MobileNumber => "Profile.mobileNumber",
        }
    }

    /// Full read URL below the host-provided endpoint base.
    #[must_use]
    pub fn url(self, endpoint_base: &str) -> String {
        format!(
            "{}/v2/accounts/~current/settings/{}",
            endpoint_base.trim_end_matches('/'),
            self.as_str()
        )
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record posted to the webhook. Lives only for the duration of one
/// forwarding task.
///
/// The mobile number is kept as the API returned it, whatever its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub email_address: String,
    pub mobile_number: serde_json::Value,
}

/// Errors from profile reads and the webhook POST.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Endpoint base or webhook URL is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport failure while reading a field.
    #[error("reading {field} failed: {source}")]
    Http {
        field: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The user has not granted access to a field.
    #[error("permission to read {field} not granted")]
    PermissionDenied { field: &'static str },

    /// Non-success status while reading a field.
    #[error("reading {field} returned HTTP {status}")]
    Status { field: &'static str, status: u16 },

    /// The field body did not decode.
    #[error("decoding {field} failed: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Transport failure while posting to the webhook.
    #[error("webhook request failed: {0}")]
    WebhookTransport(#[source] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("webhook returned HTTP {status}")]
    Webhook { status: u16 },
}
