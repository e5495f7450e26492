//! Exclusive playback of call recordings.
//!
//! Every recording row in the dashboard has its own play button, but there is
//! exactly one audio output. [`PlaybackCoordinator`] owns that output: it keeps
//! at most one recording in `Playing`/`Paused` at a time, resolves stream URLs
//! lazily (once per recording), and pushes recomputed state to every
//! subscribed row on each transition. Rows render coordinator state; they
//! never derive playback state on their own.

pub mod output;
mod subscribers;


use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SignedStreamUrl;
use output::{AudioOutput, OutputEvent, OutputHandle};
use subscribers::{StateCallback, SubscriberRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    #[error("Recording not available: {0}")]
    ResolutionFailed(String),
    #[error("Playback failed: {0}")]
    OutputFailed(String),
}

/// Coordinates the single audio output across all recording rows.
///
/// Cheap to clone; clones share the same session. Construct one per app (or
/// per test) and hand it to every row that needs playback.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    output: Arc<dyn AudioOutput>,
    state: Mutex<CoordinatorState>,
}

struct CoordinatorState {
    active: Option<ActiveSession>,
    url_cache: HashMap<i64, String>,
    // Bumped by every play() and stop(); a resolution only applies if its
    // request is still the most recent one when it completes.
    request_seq: u64,
    subscribers: SubscriberRegistry,
}

struct ActiveSession {
    recording_id: i64,
    // Playing or Paused, never Stopped.
    transport: PlaybackState,
    // Sequence the handle was started under; output events carry it so a late
    // event from a torn-down handle is ignored.
    seq: u64,
    handle: Box<dyn OutputHandle>,
}

/// Handle returned by [`PlaybackCoordinator::subscribe`].
pub struct Subscription {
    inner: Weak<CoordinatorInner>,
    recording_id: i64,
    id: u64,
}

impl PlaybackCoordinator {
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        PlaybackCoordinator {
            inner: Arc::new(CoordinatorInner {
                output,
                state: Mutex::new(CoordinatorState {
                    active: None,
                    url_cache: HashMap::new(),
                    request_seq: 0,
                    subscribers: SubscriberRegistry::default(),
                }),
            }),
        }
    }

    /// Start (or resume) playback of `recording_id`, stopping whatever else
    /// is playing.
    ///
    /// `resolve` is only invoked the first time a recording needs a stream
    /// URL; a successfully resolved URL stays cached for the id. Calling
    /// `play` for the currently paused recording resumes it in place without
    /// resolving or restarting. Resolver and output failures leave the
    /// requested recording stopped and are returned to the caller; a
    /// resolution that completes after a newer `play`/`stop` request is
    /// discarded silently.
    pub async fn play<F, Fut, E>(&self, recording_id: i64, resolve: F) -> Result<(), PlaybackError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SignedStreamUrl, E>>,
        E: fmt::Display,
    {
        let seq;
        let cached;
        {
            let mut st = self.inner.state.lock().unwrap();
            // Every play supersedes whatever request came before it.
            st.request_seq += 1;
            seq = st.request_seq;

            // Resume short-circuit: same recording, paused. No stop, no
            // restart, no resolver call, so the position is kept and there is
            // no audible glitch.
            let resumed = match st.active.as_mut() {
                Some(session)
                    if session.recording_id == recording_id
                        && session.transport == PlaybackState::Paused =>
                {
                    session.handle.resume();
                    session.transport = PlaybackState::Playing;
                    true
                }
                _ => false,
            };
            if resumed {
                let notifications = st.notifications();
                drop(st);
                deliver(notifications);
                return Ok(());
            }

            cached = st.url_cache.get(&recording_id).cloned();
        }

        let url = match cached {
            Some(url) => {
                debug!(recording_id, "using cached stream url");
                url
            }
            None => match resolve().await {
                Ok(signed) => signed.url,
                Err(err) => {
                    let mut st = self.inner.state.lock().unwrap();
                    if st.request_seq != seq {
                        debug!(recording_id, "discarding failed resolution for superseded request");
                        return Ok(());
                    }
                    warn!(recording_id, error = %err, "stream url resolution failed");
                    // The requested recording never left Stopped; refresh its
                    // row so the spinner clears. Whatever else was playing is
                    // untouched.
                    let callback = st.subscribers.callback_for(recording_id);
                    drop(st);
                    if let Some(callback) = callback {
                        (*callback)(PlaybackState::Stopped);
                    }
                    return Err(PlaybackError::ResolutionFailed(err.to_string()));
                }
            },
        };

        let mut st = self.inner.state.lock().unwrap();
        // Resolved URLs stay cached for the lifetime of the id, even when the
        // request that fetched them has been superseded.
        st.url_cache.insert(recording_id, url.clone());

        if st.request_seq != seq {
            debug!(recording_id, "discarding stale resolution");
            return Ok(());
        }

        // Exclusivity: the previous session goes down before the new handle
        // exists, so no instant has two audible recordings.
        if let Some(mut previous) = st.active.take() {
            previous.handle.stop();
        }

        let weak = Arc::downgrade(&self.inner);
        let on_event: output::OutputCallback = Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_output_event(seq, event);
            }
        });

        match self.inner.output.start(&url, on_event) {
            Ok(handle) => {
                st.active = Some(ActiveSession {
                    recording_id,
                    transport: PlaybackState::Playing,
                    seq,
                    handle,
                });
                let notifications = st.notifications();
                drop(st);
                deliver(notifications);
                Ok(())
            }
            Err(err) => {
                warn!(recording_id, error = %err, "audio output failed to start");
                let notifications = st.notifications();
                drop(st);
                deliver(notifications);
                Err(PlaybackError::OutputFailed(err.to_string()))
            }
        }
    }

    /// Pause the active recording in place. No-op if nothing is playing.
    pub fn pause(&self) {
        let notifications;
        {
            let mut st = self.inner.state.lock().unwrap();
            let paused = match st.active.as_mut() {
                Some(session) if session.transport == PlaybackState::Playing => {
                    session.handle.pause();
                    session.transport = PlaybackState::Paused;
                    true
                }
                _ => false,
            };
            if !paused {
                return;
            }
            notifications = st.notifications();
        }
        deliver(notifications);
    }

    /// Tear down the active session and report everyone Stopped.
    pub fn stop(&self) {
        let notifications;
        {
            let mut st = self.inner.state.lock().unwrap();
            // Stop counts as a request: an in-flight resolution must not
            // revive playback after the user stopped it.
            st.request_seq += 1;
            if let Some(mut session) = st.active.take() {
                session.handle.stop();
            }
            notifications = st.notifications();
        }
        deliver(notifications);
    }

    /// Effective state of one recording, derived from the active session.
    pub fn get_state(&self, recording_id: i64) -> PlaybackState {
        let st = self.inner.state.lock().unwrap();
        match st.active.as_ref() {
            Some(session) if session.recording_id == recording_id => session.transport,
            _ => PlaybackState::Stopped,
        }
    }

    /// Register a row's interest in one recording's state.
    ///
    /// Re-subscribing the same id replaces the previous callback. The
    /// returned handle unsubscribes explicitly; dropping it without calling
    /// [`Subscription::unsubscribe`] leaves the callback registered until the
    /// id is subscribed again.
    pub fn subscribe<F>(&self, recording_id: i64, on_state_change: F) -> Subscription
    where
        F: Fn(PlaybackState) + Send + Sync + 'static,
    {
        let id = {
            let mut st = self.inner.state.lock().unwrap();
            st.subscribers.insert(recording_id, Arc::new(on_state_change))
        };
        Subscription {
            inner: Arc::downgrade(&self.inner),
            recording_id,
            id,
        }
    }
}

impl CoordinatorInner {
    /// Autonomous transition driven by the output itself (stream ended or
    /// errored). Ignored unless the event came from the currently active
    /// handle.
    fn handle_output_event(&self, seq: u64, event: OutputEvent) {
        let notifications;
        {
            let mut st = self.state.lock().unwrap();
            if st.active.as_ref().map(|s| s.seq) != Some(seq) {
                debug!("ignoring output event from replaced handle");
                return;
            }
            if let OutputEvent::Error(ref message) = event {
                warn!(error = %message, "playback error, releasing session");
            }
            if let Some(mut session) = st.active.take() {
                session.handle.stop();
            }
            notifications = st.notifications();
        }
        deliver(notifications);
    }
}

impl CoordinatorState {
    fn notifications(&self) -> Vec<(StateCallback, PlaybackState)> {
        let active = self
            .active
            .as_ref()
            .map(|s| (s.recording_id, s.transport));
        self.subscribers.snapshot(active)
    }
}

impl Subscription {
    /// Idempotent: calling twice, after the id was re-subscribed by a newer
    /// row, or after the coordinator is gone, does nothing.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut st = inner.state.lock().unwrap();
            st.subscribers.remove(self.recording_id, self.id);
        }
    }
}

// Callbacks run outside the state lock so a subscriber may call back into the
// coordinator (get_state, even play) without deadlocking.
fn deliver(notifications: Vec<(StateCallback, PlaybackState)>) {
    for (callback, state) in notifications {
        (*callback)(state);
    }
}
