//! The generation pipeline: orchestrates one job from submitted images to
//! a terminal status, and the dispatcher loop that pulls queued work.

pub mod dispatcher;
pub mod processor;
pub mod status_store;

pub use dispatcher::Dispatcher;
pub use processor::JobProcessor;
pub use status_store::{PgStatusStore, StatusStore};
