//! Static catalog of playable streams.
//!
//! The catalog is loaded once at startup (built-in default or the
//! `[[streams]]` config table) and never mutated afterwards. Clones share the
//! same backing slice.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display metadata sent alongside a play directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub title: String,
    pub subtitle: String,
}

/// One playable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Unique id echoed back by the host in playback events.
    pub token: String,
    pub url: String,
    pub metadata: StreamMetadata,
}

/// The built-in stream list.
#[must_use]
pub fn default_streams() -> Vec<StreamDescriptor> {
    vec![StreamDescriptor {
        token: "1".to_owned(),
        url: "https://streams.example.com/radio-one/example_encoded.mp3".to_owned(),
        metadata: StreamMetadata {
            title: "Radio One".to_owned(),
            subtitle: "A subtitle for stream one".to_owned(),
        },
    }]
}

/// Read-only, cheaply clonable stream list.
#[derive(Debug, Clone)]
pub struct Catalog {
    streams: Arc<[StreamDescriptor]>,
}

impl Catalog {
    #[must_use]
    pub fn new(streams: Vec<StreamDescriptor>) -> Self {
        Self {
            streams: streams.into(),
        }
    }

    /// The entry the play intent starts. Always index 0.
    #[must_use]
    pub fn first(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_streams())
    }
}
