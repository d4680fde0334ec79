//! Request and response envelopes exchanged with the voice host.
//!
//! The host posts one [`RequestEnvelope`] per invocation and expects one
//! [`ResponseEnvelope`] back. Field names follow the host's camelCase wire
//! format; everything the skill does not read is tolerated and ignored.

use crate::response::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope format version written on every response.
pub const ENVELOPE_VERSION: &str = "1.0";

/// Inbound envelope for a single skill invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Context,
    pub request: Request,
}

impl RequestEnvelope {
    /// Wrap a request with an empty context.
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_owned(),
            session: None,
            context: Context::default(),
            request,
        }
    }

    /// Attach the profile API endpoint and access token the host issued.
    #[must_use]
    pub fn with_api_access(mut self, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        self.context.system.api_endpoint = Some(endpoint.into());
        self.context.system.api_access_token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: SystemContext,
}

/// Host-provided system block: where the profile API lives and the token
/// that authorizes reads against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub application_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,
}

/// The request body, tagged by its wire `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "LaunchRequest")]
    Launch(LaunchRequest),
    #[serde(rename = "IntentRequest")]
    Intent(IntentRequest),
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded(SessionEndedRequest),
    /// Any request type this skill has no handler for.
    #[serde(other)]
    Unknown,
}

impl Request {
    /// Wire name of the request type.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch(_) => "LaunchRequest",
            Self::Intent(_) => "IntentRequest",
            Self::SessionEnded(_) => "SessionEndedRequest",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::Launch(r) => &r.request_id,
            Self::Intent(r) => &r.request_id,
            Self::SessionEnded(r) => &r.request_id,
            Self::Unknown => "",
        }
    }

    /// Intent name for intent requests, `None` otherwise.
    #[must_use]
    pub fn intent_name(&self) -> Option<&str> {
        match self {
            Self::Intent(r) => Some(r.intent.name.as_str()),
            _ => None,
        }
    }

    /// Build an intent request with a fresh timestamp and no slots.
    #[must_use]
    pub fn intent(name: impl Into<String>) -> Self {
        Self::Intent(IntentRequest {
            request_id: String::new(),
            timestamp: Some(Utc::now()),
            locale: None,
            intent: Intent {
                name: name.into(),
                confirmation_status: None,
                slots: BTreeMap::new(),
            },
        })
    }

    #[must_use]
    pub fn launch() -> Self {
        Self::Launch(LaunchRequest {
            request_id: String::new(),
            timestamp: Some(Utc::now()),
            locale: None,
        })
    }

    #[must_use]
    pub fn session_ended() -> Self {
        Self::SessionEnded(SessionEndedRequest {
            request_id: String::new(),
            timestamp: Some(Utc::now()),
            reason: None,
            error: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// `USER_INITIATED`, `ERROR` or `EXCEEDED_MAX_REPROMPTS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionEndedError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEndedError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Outbound envelope returned to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub response: Response,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn new(response: Response, user_agent: Option<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_owned(),
            user_agent,
            response,
        }
    }
}
