//! Built-in handlers with canned responses.

use super::{ErrorHandler, HandlerInput, HandlerPriority, RequestHandler, intents, speech};
use crate::envelope::Request;
use crate::error::{Result, SkillError};
use crate::response::{ClearBehavior, Response, ResponseBuilder};

// ---------------------------------------------------------------------------
// Macro for intents answered with a fixed speech + reprompt.
// ---------------------------------------------------------------------------

macro_rules! define_reprompting_intent {
    (
        $struct_name:ident,
        name: $name:expr,
        intents: [$($intent:expr),+ $(,)?],
        speech: $speech:expr $(,)?
    ) => {
        /// Built-in handler: see [`RequestHandler`] impl.
        pub struct $struct_name;

        impl RequestHandler for $struct_name {
            fn name(&self) -> &str {
                $name
            }
            fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
                input.is_intent_any(&[$($intent),+])
            }
            fn handle(&self, _input: &HandlerInput<'_>) -> Result<Response> {
                Ok(ResponseBuilder::new().speak($speech).reprompt($speech).build())
            }
        }
    };
}

define_reprompting_intent!(
    HelpIntentHandler,
    name: "help",
    intents: [intents::HELP],
    speech: speech::HELP,
);

define_reprompting_intent!(
    FallbackIntentHandler,
    name: "fallback",
    intents: [intents::FALLBACK],
    speech: speech::FALLBACK,
);

// ---------------------------------------------------------------------------
// Request-type handlers
// ---------------------------------------------------------------------------

/// Greets the user and keeps the session open.
pub struct LaunchRequestHandler;

impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &str {
        "launch"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request(), Request::Launch(_))
    }

    fn handle(&self, _input: &HandlerInput<'_>) -> Result<Response> {
        Ok(ResponseBuilder::new()
            .speak(speech::LAUNCH)
            .with_should_end_session(false)
            .build())
    }
}

/// Clears the play queue, stops playback and ends the session.
pub struct CancelOrStopHandler;

impl RequestHandler for CancelOrStopHandler {
    fn name(&self) -> &str {
        "cancel_or_stop"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_any(&[
            intents::CANCEL,
            intents::STOP,
            intents::PAUSE,
            intents::CANCEL_BARE,
            intents::STOP_BARE,
        ])
    }

    fn handle(&self, _input: &HandlerInput<'_>) -> Result<Response> {
        Ok(ResponseBuilder::new()
            .add_audio_player_clear_queue_directive(ClearBehavior::ClearAll)
            .add_audio_player_stop_directive()
            .speak(speech::GOODBYE)
            .with_should_end_session(true)
            .build())
    }
}

/// Answers the host's session-ended notice with an empty response.
pub struct SessionEndedRequestHandler;

impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &str {
        "session_ended"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request(), Request::SessionEnded(_))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response> {
        let mut envelope = input.envelope().clone();
        if envelope.context.system.api_access_token.is_some() {
            envelope.context.system.api_access_token = Some("<redacted>".to_owned());
        }
        let (reason, error) = match &envelope.request {
            Request::SessionEnded(ended) => (
                ended.reason.clone().unwrap_or_default(),
                ended
                    .error
                    .as_ref()
                    .map(|e| format!("{}: {}", e.kind, e.message))
                    .unwrap_or_default(),
            ),
            _ => (String::new(), String::new()),
        };
        let envelope_json = serde_json::to_string(&envelope)?;
        tracing::info!(%reason, %error, envelope = %envelope_json, "session ended");
        Ok(ResponseBuilder::new().build())
    }
}

/// Echoes any intent no specific handler claimed.
///
/// Registered with [`HandlerPriority::CatchAll`] so it only runs after every
/// specific handler declined.
pub struct IntentReflectorHandler;

impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &str {
        "intent_reflector"
    }

    fn priority(&self) -> HandlerPriority {
        HandlerPriority::CatchAll
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request(), Request::Intent(_))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response> {
        let intent_name = input.require_intent_name()?;
        Ok(ResponseBuilder::new()
            .speak(format!("You just triggered {intent_name}"))
            .build())
    }
}

/// Generic apology. Never ends the session and never plays audio.
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, input: &HandlerInput<'_>, error: &SkillError) -> Response {
        tracing::error!(
            request_id = input.request_id(),
            kind = input.request_kind(),
            error = %error,
            "request handling failed"
        );
        ResponseBuilder::new()
            .speak(speech::ERROR)
            .reprompt(speech::ERROR)
            .build()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::envelope::RequestEnvelope;
    use crate::response::Directive;

    fn run(handler: &dyn RequestHandler, envelope: &RequestEnvelope) -> Response {
        let input = HandlerInput::new(envelope);
        assert!(handler.can_handle(&input), "{} should match", handler.name());
        handler.handle(&input).unwrap()
    }

    #[test]
    fn launch_greets_and_keeps_session_open() {
        let response = run(&LaunchRequestHandler, &RequestEnvelope::new(Request::launch()));
        assert_eq!(response.speech_text().as_deref(), Some(speech::LAUNCH));
        assert_eq!(response.should_end_session(), Some(false));
        assert!(response.directives.is_empty());
    }

    #[test]
    fn launch_ignores_intents() {
        let envelope = RequestEnvelope::new(Request::intent(intents::HELP));
        assert!(!LaunchRequestHandler.can_handle(&HandlerInput::new(&envelope)));
    }

    #[test]
    fn help_speaks_and_reprompts() {
        let response = run(
            &HelpIntentHandler,
            &RequestEnvelope::new(Request::intent(intents::HELP)),
        );
        assert_eq!(
            response.speech_text().as_deref(),
            Some("You can say hello to me! How can I help?")
        );
        assert_eq!(response.reprompt_text().as_deref(), response.speech_text().as_deref());
        assert_eq!(response.should_end_session(), Some(false));
    }

    #[test]
    fn fallback_speaks_and_reprompts() {
        let response = run(
            &FallbackIntentHandler,
            &RequestEnvelope::new(Request::intent(intents::FALLBACK)),
        );
        assert_eq!(response.speech_text().as_deref(), Some(speech::FALLBACK));
        assert_eq!(response.reprompt_text().as_deref(), Some(speech::FALLBACK));
        assert_eq!(response.should_end_session(), Some(false));
    }

    #[test]
    fn cancel_stop_pause_clear_then_stop_and_end_session() {
        for name in [
            intents::CANCEL,
            intents::STOP,
            intents::PAUSE,
            intents::CANCEL_BARE,
            intents::STOP_BARE,
        ] {
            let response = run(&CancelOrStopHandler, &RequestEnvelope::new(Request::intent(name)));
            assert_eq!(
                response.directives,
                vec![
                    Directive::ClearQueue {
                        clear_behavior: ClearBehavior::ClearAll
                    },
                    Directive::Stop
                ],
                "{name}"
            );
            assert_eq!(response.speech_text().as_deref(), Some(speech::GOODBYE));
            assert_eq!(response.should_end_session(), Some(true));
        }
    }

    #[test]
    fn session_ended_returns_empty_response() {
        let envelope = RequestEnvelope::new(Request::session_ended())
            .with_api_access("https://api.example.com", "secret");
        let response = run(&SessionEndedRequestHandler, &envelope);
        assert!(response.is_empty());
    }

    #[test]
    fn reflector_echoes_intent_name() {
        let response = run(
            &IntentReflectorHandler,
            &RequestEnvelope::new(Request::intent("OrderPizzaIntent")),
        );
        assert_eq!(
            response.speech_text().as_deref(),
            Some("You just triggered OrderPizzaIntent")
        );
        assert_eq!(IntentReflectorHandler.priority(), HandlerPriority::CatchAll);
    }

    #[test]
    fn reflector_does_not_match_launch() {
        let envelope = RequestEnvelope::new(Request::launch());
        assert!(!IntentReflectorHandler.can_handle(&HandlerInput::new(&envelope)));
    }

    #[test]
    fn error_handler_apologizes_without_directives() {
        let envelope = RequestEnvelope::new(Request::launch());
        let response = DefaultErrorHandler.handle(
            &HandlerInput::new(&envelope),
            &SkillError::EmptyCatalog,
        );
        assert_eq!(response.speech_text().as_deref(), Some(speech::ERROR));
        assert_eq!(response.reprompt_text().as_deref(), Some(speech::ERROR));
        assert!(response.directives.is_empty());
        assert_eq!(response.should_end_session(), Some(false));
    }
}
