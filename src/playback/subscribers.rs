use std::collections::HashMap;
use std::sync::Arc;

use super::PlaybackState;

pub(crate) type StateCallback = Arc<dyn Fn(PlaybackState) + Send + Sync>;

/// Per-recording callback registry.
///
/// One visible row per recording at a time, so re-subscribing an id replaces
/// the previous entry; removal is checked against the subscription id so a
/// stale handle cannot evict its replacement.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    next_id: u64,
    entries: HashMap<i64, Subscriber>,
}

struct Subscriber {
    id: u64,
    callback: StateCallback,
}

impl SubscriberRegistry {
    pub fn insert(&mut self, recording_id: i64, callback: StateCallback) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(recording_id, Subscriber { id, callback });
        id
    }

    pub fn remove(&mut self, recording_id: i64, id: u64) {
        if self.entries.get(&recording_id).map(|s| s.id) == Some(id) {
            self.entries.remove(&recording_id);
        }
    }

    pub fn callback_for(&self, recording_id: i64) -> Option<StateCallback> {
        self.entries.get(&recording_id).map(|s| s.callback.clone())
    }

    /// Effective state per subscriber, derived from the active session: the
    /// active id reports its transport state, every other id reports Stopped.
    pub fn snapshot(
        &self,
        active: Option<(i64, PlaybackState)>,
    ) -> Vec<(StateCallback, PlaybackState)> {
        self.entries
            .iter()
            .map(|(recording_id, sub)| {
                let state = match active {
                    Some((id, state)) if id == *recording_id => state,
                    _ => PlaybackState::Stopped,
                };
                (sub.callback.clone(), state)
            })
            .collect()
    }
}
