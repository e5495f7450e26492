//! Call-recording playback for the agent call dashboard.
//!
//! The dashboard renders an unbounded list of call rows, each with its own
//! play button, against exactly one audio output. This crate owns that
//! problem: [`playback::PlaybackCoordinator`] guarantees at most one recording
//! is audible at a time, resolves signed stream URLs lazily through the
//! recordings API, and fans state changes out to whichever rows are currently
//! watching. The surrounding CRUD (agents, campaigns, leads) lives in the
//! dashboard itself, not here.

pub mod api;
pub mod models;
pub mod playback;

pub use playback::{PlaybackCoordinator, PlaybackError, PlaybackState, Subscription};
