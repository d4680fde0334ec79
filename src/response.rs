//! Skill responses and the builder handlers use to assemble them.
//!
//! A [`Response`] carries optional speech, an optional reprompt, an ordered
//! list of audio-player [`Directive`]s and the session flag. Handlers build
//! one with [`ResponseBuilder`] and hand it back to the dispatcher, which
//! emits it exactly once.

use crate::catalog::StreamMetadata;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const SSML_OPEN: &str = "<speak>";
const SSML_CLOSE: &str = "</speak>";

/// Finalized response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    /// `None` leaves the decision to the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

impl Response {
    /// Spoken text with the SSML wrapper removed.
    #[must_use]
    pub fn speech_text(&self) -> Option<Cow<'_, str>> {
        self.output_speech.as_ref().map(OutputSpeech::text)
    }

    /// Reprompt text with the SSML wrapper removed.
    #[must_use]
    pub fn reprompt_text(&self) -> Option<Cow<'_, str>> {
        self.reprompt.as_ref().map(|r| r.output_speech.text())
    }

    #[must_use]
    pub fn should_end_session(&self) -> Option<bool> {
        self.should_end_session
    }

    /// True when the response carries nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output_speech.is_none()
            && self.reprompt.is_none()
            && self.directives.is_empty()
            && self.should_end_session.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
    #[serde(rename = "PlainText")]
    PlainText { text: String },
}

impl OutputSpeech {
    /// Wrap plain text in `<speak>`, escaping XML special characters.
    fn ssml(text: &str) -> Self {
        Self::Ssml {
            ssml: format!("{SSML_OPEN}{}{SSML_CLOSE}", escape_xml(text)),
        }
    }

    /// The spoken text without the markup wrapper and with entities decoded.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Ssml { ssml } => {
                let inner = ssml
                    .strip_prefix(SSML_OPEN)
                    .and_then(|s| s.strip_suffix(SSML_CLOSE))
                    .unwrap_or(ssml.as_str());
                unescape_xml(inner)
            }
            Self::PlainText { text } => Cow::Borrowed(text),
        }
    }
}

fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn unescape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    // `&amp;` last so an escaped entity like `&amp;lt;` decodes to `&lt;`.
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Audio-player instruction for the host's playback subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "AudioPlayer.Play", rename_all = "camelCase")]
    Play {
        play_behavior: PlayBehavior,
        audio_item: AudioItem,
    },
    #[serde(rename = "AudioPlayer.ClearQueue", rename_all = "camelCase")]
    ClearQueue { clear_behavior: ClearBehavior },
    #[serde(rename = "AudioPlayer.Stop")]
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Stop current playback and replace the whole queue.
    ReplaceAll,
    Enqueue,
    ReplaceEnqueued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearBehavior {
    /// Clear the queue and stop the current stream.
    ClearAll,
    ClearEnqueued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioItem {
    pub stream: AudioStream,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StreamMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStream {
    pub token: String,
    pub url: String,
    pub offset_in_milliseconds: u64,
    /// Resume-state marker for enqueued streams; `None` on a fresh play.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
}

/// Incremental builder for a [`Response`].
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spoken output.
    #[must_use]
    pub fn speak(mut self, text: impl AsRef<str>) -> Self {
        self.response.output_speech = Some(OutputSpeech::ssml(text.as_ref()));
        self
    }

    /// Set the reprompt. A reprompt keeps the session open.
    #[must_use]
    pub fn reprompt(mut self, text: impl AsRef<str>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::ssml(text.as_ref()),
        });
        self.response.should_end_session = Some(false);
        self
    }

    #[must_use]
    pub fn add_audio_player_play_directive(
        mut self,
        play_behavior: PlayBehavior,
        url: impl Into<String>,
        token: impl Into<String>,
        offset_in_milliseconds: u64,
        expected_previous_token: Option<String>,
        metadata: Option<StreamMetadata>,
    ) -> Self {
        self.response.directives.push(Directive::Play {
            play_behavior,
            audio_item: AudioItem {
                stream: AudioStream {
                    token: token.into(),
                    url: url.into(),
                    offset_in_milliseconds,
                    expected_previous_token,
                },
                metadata,
            },
        });
        self
    }

    #[must_use]
    pub fn add_audio_player_clear_queue_directive(mut self, clear_behavior: ClearBehavior) -> Self {
        self.response
            .directives
            .push(Directive::ClearQueue { clear_behavior });
        self
    }

    #[must_use]
    pub fn add_audio_player_stop_directive(mut self) -> Self {
        self.response.directives.push(Directive::Stop);
        self
    }

    #[must_use]
    pub fn with_should_end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }

    #[must_use]
    pub fn build(self) -> Response {
        self.response
    }
}
