//! REST client for the hosted PhotoMaker generation service.
//!
//! Wraps the single generation endpoint: submit an archive reference plus
//! prompt and style, block until the service answers, and classify
//! failures into a typed taxonomy so callers never match on message text.

pub mod client;
pub mod messages;

pub use client::{GenerationBackend, PhotomakerClient, PhotomakerConfig, PhotomakerError};
pub use messages::{GeneratedImage, GenerationRequest, GenerationResult};
