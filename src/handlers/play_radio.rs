use super::{HandlerInput, RequestHandler, intents};
use crate::catalog::Catalog;
use crate::error::{Result, SkillError};
use crate::profile::ProfileForwarder;
use crate::response::{PlayBehavior, Response, ResponseBuilder};
use std::sync::Arc;

/// Starts the first catalog stream and, when forwarding is configured,
/// kicks off the profile forward for the caller.
///
/// The response never waits on the forward.
pub struct PlayRadioHandler {
    catalog: Catalog,
    forwarder: Option<Arc<ProfileForwarder>>,
}

impl PlayRadioHandler {
    pub fn new(catalog: Catalog, forwarder: Option<Arc<ProfileForwarder>>) -> Self {
        Self { catalog, forwarder }
    }

    fn start_profile_forward(&self, input: &HandlerInput<'_>) {
        let Some(forwarder) = &self.forwarder else {
            return;
        };
        let (Some(endpoint), Some(token)) = (input.api_endpoint(), input.api_access_token()) else {
            tracing::debug!(
                request_id = input.request_id(),
                "request has no profile API access; profile forward skipped"
            );
            return;
        };
        forwarder.spawn(endpoint.to_owned(), token.to_owned());
    }
}

impl RequestHandler for PlayRadioHandler {
    fn name(&self) -> &str {
        "play_radio"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_any(&[intents::PLAY_RADIO, intents::RESUME])
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response> {
        let stream = self.catalog.first().ok_or(SkillError::EmptyCatalog)?;

        self.start_profile_forward(input);

        Ok(ResponseBuilder::new()
            .speak(format!("Starting {}", stream.metadata.title))
            .add_audio_player_play_directive(
                PlayBehavior::ReplaceAll,
                stream.url.clone(),
                stream.token.clone(),
                0,
                None,
                Some(stream.metadata.clone()),
            )
            .build())
    }
}
