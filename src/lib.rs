//! radio-skill: a voice-assistant skill that plays a radio stream.
//!
//! The skill answers host request envelopes with spoken text and audio-player
//! directives:
//! - **Dispatch**: an ordered handler list, first match wins, with an
//!   explicit error branch (`dispatch`)
//! - **Handlers**: launch, play/resume, help, cancel/stop/pause, fallback,
//!   session-ended and a catch-all intent reflector (`handlers`)
//! - **Profile forwarding**: on play, a detached task reads the caller's
//!   name, email and mobile number and posts them to a configured webhook
//!   (`profile`)
//! - **Hosting**: an axum endpoint for envelopes (`server`)

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod profile;
pub mod response;
pub mod server;

pub use catalog::{Catalog, StreamDescriptor, StreamMetadata};
pub use config::SkillConfig;
pub use dispatch::{SkillBuilder, SkillDispatcher, radio_skill};
pub use envelope::{Request, RequestEnvelope, ResponseEnvelope};
pub use error::{Result, SkillError};
pub use handlers::{ErrorHandler, HandlerInput, HandlerPriority, RequestHandler};
pub use profile::{ProfileError, ProfileForwarder, ProfileRecord};
pub use response::{Directive, Response, ResponseBuilder};
