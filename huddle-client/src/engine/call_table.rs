use crate::link::CallHandle;
use huddle_core::PeerId;
use std::collections::HashMap;

/// Stored state of the connection to one remote member. A remote with no
/// entry is either unknown or already closed; Closed is terminal and
/// leaves the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Join notification received, local media and/or identity still
    /// pending. No call object exists yet.
    AwaitingLocalReadiness,
    /// A call (outbound placed, or inbound answered) awaits its stream.
    CallPending,
    /// Remote stream received and attached.
    Established,
}

/// One per-remote slot: display name, state, and the call object once
/// one exists. Exactly one entry per remote peer identity.
pub struct CallEntry {
    pub name: String,
    pub state: CallState,
    pub handle: Option<Box<dyn CallHandle>>,
}

/// The client's local connection table, keyed by remote peer identity.
#[derive(Default)]
pub struct CallTable {
    entries: HashMap<PeerId, CallEntry>,
}

impl CallTable {
    /// Park a join notification until local prerequisites are ready.
    /// An already-active slot is left untouched.
    pub fn buffer(&mut self, peer: PeerId, name: String) {
        self.entries.entry(peer).or_insert(CallEntry {
            name,
            state: CallState::AwaitingLocalReadiness,
            handle: None,
        });
    }

    /// Pull out every buffered remote, leaving active slots in place.
    pub fn take_buffered(&mut self) -> Vec<(PeerId, String)> {
        let parked: Vec<PeerId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.state == CallState::AwaitingLocalReadiness)
            .map(|(peer, _)| peer.clone())
            .collect();

        parked
            .into_iter()
            .filter_map(|peer| {
                let entry = self.entries.remove(&peer)?;
                Some((peer, entry.name))
            })
            .collect()
    }

    /// Register a live call object for `peer`, pending its stream.
    /// Returns the superseded handle, if the slot already held one, so
    /// the caller can close it silently.
    pub fn activate(
        &mut self,
        peer: PeerId,
        name: String,
        handle: Box<dyn CallHandle>,
    ) -> Option<Box<dyn CallHandle>> {
        self.entries
            .insert(
                peer,
                CallEntry {
                    name,
                    state: CallState::CallPending,
                    handle: Some(handle),
                },
            )
            .and_then(|previous| previous.handle)
    }

    /// Mark the call with `peer` established; returns the remote's
    /// display name for the rendering surface. `None` when no live call
    /// exists for that peer (a redundant, already-discarded attempt).
    pub fn establish(&mut self, peer: &PeerId) -> Option<String> {
        let entry = self.entries.get_mut(peer)?;
        entry.handle.as_ref()?;
        entry.state = CallState::Established;
        Some(entry.name.clone())
    }

    /// Whether a call object already exists for `peer` (guards the race
    /// where the remote side called first).
    pub fn has_active(&self, peer: &PeerId) -> bool {
        self.entries
            .get(peer)
            .is_some_and(|entry| entry.handle.is_some())
    }

    pub fn state_of(&self, peer: &PeerId) -> Option<CallState> {
        self.entries.get(peer).map(|entry| entry.state)
    }

    pub fn remove(&mut self, peer: &PeerId) -> Option<CallEntry> {
        self.entries.remove(peer)
    }

    /// Empty the table, yielding every entry for teardown.
    pub fn drain(&mut self) -> Vec<(PeerId, CallEntry)> {
        self.entries.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
