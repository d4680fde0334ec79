//! The [`RequestHandler`] and [`ErrorHandler`] traits and the skill's
//! built-in handlers.
//!
//! A request handler pairs a predicate with an action. The dispatcher asks
//! each handler in priority order whether it can handle the request and runs
//! the first one that says yes. The error handler is not a predicate: it is
//! the dispatcher's fallback branch.

mod builtins;
mod play_radio;

pub use builtins::{
    CancelOrStopHandler, DefaultErrorHandler, FallbackIntentHandler, HelpIntentHandler,
    IntentReflectorHandler, LaunchRequestHandler, SessionEndedRequestHandler,
};
pub use play_radio::PlayRadioHandler;

use crate::envelope::{Request, RequestEnvelope};
use crate::error::{Result, SkillError};
use crate::response::Response;

/// Intent names the built-in handlers route on.
pub mod intents {
    pub const PLAY_RADIO: &str = "PlayRadioIntent";
    pub const RESUME: &str = "AMAZON.ResumeIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const PAUSE: &str = "AMAZON.PauseIntent";
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
    /// Unprefixed aliases some interaction models use.
    pub const CANCEL_BARE: &str = "CancelIntent";
    pub const STOP_BARE: &str = "StopIntent";
}

/// Spoken text of the built-in handlers.
pub mod speech {
    pub const LAUNCH: &str =
        "Hi there! You can ask me to play bee bee see radio one in order to listen to music.";
    pub const HELP: &str = "You can say hello to me! How can I help?";
    pub const GOODBYE: &str = "Thanks for listening to bee bee see sounds.";
    pub const FALLBACK: &str = "Sorry, I don't know about that. Please try again.";
    pub const ERROR: &str = "Sorry, I had trouble doing what you asked. Please try again.";
}

/// Evaluation class of a handler. All `Specific` handlers are consulted
/// before any `CatchAll` handler, whatever the registration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerPriority {
    #[default]
    Specific,
    CatchAll,
}

/// Read-only view of one invocation handed to handlers.
#[derive(Debug, Clone, Copy)]
pub struct HandlerInput<'a> {
    envelope: &'a RequestEnvelope,
}

impl<'a> HandlerInput<'a> {
    pub fn new(envelope: &'a RequestEnvelope) -> Self {
        Self { envelope }
    }

    pub fn envelope(&self) -> &'a RequestEnvelope {
        self.envelope
    }

    pub fn request(&self) -> &'a Request {
        &self.envelope.request
    }

    pub fn request_kind(&self) -> &'static str {
        self.envelope.request.kind()
    }

    pub fn request_id(&self) -> &'a str {
        self.envelope.request.request_id()
    }

    pub fn intent_name(&self) -> Option<&'a str> {
        self.envelope.request.intent_name()
    }

    /// True for an intent request whose name is one of `names`.
    pub fn is_intent_any(&self, names: &[&str]) -> bool {
        self.intent_name().is_some_and(|name| names.contains(&name))
    }

    /// Profile API base the host issued for this request.
    pub fn api_endpoint(&self) -> Option<&'a str> {
        self.envelope.context.system.api_endpoint.as_deref()
    }

    pub fn api_access_token(&self) -> Option<&'a str> {
        self.envelope.context.system.api_access_token.as_deref()
    }

    /// Intent name, or [`SkillError::MissingIntent`] for non-intent requests.
    pub fn require_intent_name(&self) -> Result<&'a str> {
        self.intent_name().ok_or(SkillError::MissingIntent)
    }
}

/// A predicate + action pair.
pub trait RequestHandler: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &str;

    fn priority(&self) -> HandlerPriority {
        HandlerPriority::Specific
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool;

    /// Build the response. An `Err` routes the request to the error handler.
    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response>;
}

/// The dispatcher's fallback branch, run when nothing matched or the chosen
/// handler failed.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, input: &HandlerInput<'_>, error: &SkillError) -> Response;
}
