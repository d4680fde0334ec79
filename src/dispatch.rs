//! Request dispatch: [`SkillBuilder`] assembles handlers, [`SkillDispatcher`]
//! routes each request to exactly one of them.
//!
//! Selection walks the handlers in priority order (every
//! [`HandlerPriority::Specific`] handler before any
//! [`HandlerPriority::CatchAll`] one, registration order within a class) and
//! runs the first whose predicate matches. No match, an `Err`, or a panic all
//! land in the [`ErrorHandler`], so a caller always gets a response.

use crate::catalog::Catalog;
use crate::config::SkillConfig;
use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::SkillError;
use crate::handlers::{
    CancelOrStopHandler, DefaultErrorHandler, ErrorHandler, FallbackIntentHandler,
    HandlerInput, HelpIntentHandler, IntentReflectorHandler, LaunchRequestHandler,
    PlayRadioHandler, RequestHandler, SessionEndedRequestHandler,
};
use crate::profile::ProfileForwarder;
use crate::response::Response;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Collects handlers and settings for a [`SkillDispatcher`].
#[derive(Default)]
pub struct SkillBuilder {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Option<Box<dyn ErrorHandler>>,
    user_agent: Option<String>,
}

impl SkillBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn custom() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_request_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use]
    pub fn add_request_handlers(mut self, handlers: Vec<Box<dyn RequestHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Replace the fallback branch. Defaults to [`DefaultErrorHandler`].
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// User agent written into every response envelope.
    #[must_use]
    pub fn with_custom_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Freeze the handler order and build the dispatcher.
    #[must_use]
    pub fn build(mut self) -> SkillDispatcher {
        // Stable: registration order survives within a priority class.
        self.handlers.sort_by_key(|h| h.priority());
        SkillDispatcher {
            handlers: self.handlers,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Box::new(DefaultErrorHandler)),
            user_agent: self.user_agent,
        }
    }
}

/// Routes requests to handlers. Immutable once built; share behind an `Arc`.
pub struct SkillDispatcher {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Box<dyn ErrorHandler>,
    user_agent: Option<String>,
}

impl SkillDispatcher {
    /// Handler names in evaluation order.
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Produce the response for one request. Never fails.
    pub fn dispatch(&self, input: &HandlerInput<'_>) -> Response {
        let span = tracing::info_span!(
            "dispatch",
            request_id = input.request_id(),
            kind = input.request_kind()
        );
        let _guard = span.enter();

        let Some(handler) = self.handlers.iter().find(|h| h.can_handle(input)) else {
            let error = SkillError::NoHandlerMatched {
                kind: input.request_kind().to_owned(),
            };
            return self.error_handler.handle(input, &error);
        };

        tracing::debug!(handler = handler.name(), "handler selected");
        let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(input)))
            .unwrap_or_else(|_| {
                Err(SkillError::HandlerPanicked {
                    handler: handler.name().to_owned(),
                })
            });

        match outcome {
            Ok(response) => response,
            Err(error) => self.error_handler.handle(input, &error),
        }
    }

    /// Envelope-in, envelope-out entry point used by the hosts.
    pub fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let response = self.dispatch(&HandlerInput::new(envelope));
        ResponseEnvelope::new(response, self.user_agent.clone())
    }
}

/// The radio skill's standard handler set.
pub fn radio_skill(config: &SkillConfig, forwarder: Option<Arc<ProfileForwarder>>) -> SkillDispatcher {
    let catalog = Catalog::new(config.streams.clone());
    let mut builder = SkillBuilder::custom()
        .add_request_handler(LaunchRequestHandler)
        .add_request_handler(PlayRadioHandler::new(catalog, forwarder))
        .add_request_handler(HelpIntentHandler)
        .add_request_handler(CancelOrStopHandler)
        .add_request_handler(FallbackIntentHandler)
        .add_request_handler(SessionEndedRequestHandler)
        .add_request_handler(IntentReflectorHandler)
        .with_error_handler(DefaultErrorHandler);
    if let Some(ua) = &config.skill.user_agent {
        builder = builder.with_custom_user_agent(ua.clone());
    }
    builder.build()
}
