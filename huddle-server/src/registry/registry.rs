use crate::registry::Member;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use huddle_core::{ConnId, PeerId, RoomId};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The connection is already registered in some room. A re-join must
    /// leave first.
    #[error("connection {0} is already a room member")]
    DuplicateMember(ConnId),
}

/// The result of a departure: who left which room, and who is still there.
/// `remaining` is the snapshot taken inside the room's critical section,
/// so it is exactly the set of fanout targets for the leave notification.
#[derive(Debug)]
pub struct Departure {
    pub room_id: RoomId,
    pub member: Member,
    pub remaining: Vec<Member>,
}

/// In-memory room membership. Each room's entry is its own critical
/// section (DashMap shard locking), so membership mutations and the
/// snapshots taken alongside them cannot interleave within one room,
/// while distinct rooms proceed in parallel.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Vec<Member>>,
    index: DashMap<ConnId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `conn` under `room_id`, creating the room if absent.
    /// Returns the members present before this join, i.e. the fanout
    /// targets for the join notification. The registry is unchanged when
    /// the connection is already a member somewhere.
    pub fn join(
        &self,
        conn: ConnId,
        room_id: RoomId,
        peer_id: PeerId,
        name: String,
    ) -> Result<Vec<Member>, RegistryError> {
        let mut room = self.rooms.entry(room_id.clone()).or_default();

        match self.index.entry(conn.clone()) {
            Entry::Occupied(_) => {
                let created_empty = room.is_empty();
                drop(room);
                if created_empty {
                    self.rooms.remove_if(&room_id, |_, members| members.is_empty());
                }
                return Err(RegistryError::DuplicateMember(conn));
            }
            Entry::Vacant(slot) => {
                slot.insert(room_id.clone());
            }
        }

        if room.is_empty() {
            info!("Creating room '{}'", room_id);
        }

        let peers = room.value().clone();
        room.push(Member {
            conn,
            peer_id,
            name,
        });

        Ok(peers)
    }

    /// Remove `conn` from its room, if any. Idempotent: unregistered
    /// handles are a no-op, because disconnect notifications may race
    /// with explicit leaves. Empty rooms are garbage-collected here.
    pub fn leave(&self, conn: &ConnId) -> Option<Departure> {
        let (_, room_id) = self.index.remove(conn)?;

        let mut departed = None;
        let mut remaining = Vec::new();
        if let Some(mut room) = self.rooms.get_mut(&room_id) {
            if let Some(pos) = room.iter().position(|m| &m.conn == conn) {
                departed = Some(room.remove(pos));
            }
            remaining = room.value().clone();
        }

        if remaining.is_empty() {
            self.rooms.remove_if(&room_id, |_, members| members.is_empty());
            info!("Room '{}' is empty, dropping it", room_id);
        }

        Some(Departure {
            room_id,
            member: departed?,
            remaining,
        })
    }

    /// Snapshot of the room's members at call time, in insertion order.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|room| room.value().clone())
            .unwrap_or_default()
    }

    /// Resolve the room and member record of one connection handle.
    pub fn lookup(&self, conn: &ConnId) -> Option<(RoomId, Member)> {
        let room_id = self.index.get(conn)?.value().clone();
        let room = self.rooms.get(&room_id)?;
        let member = room.iter().find(|m| &m.conn == conn)?.clone();
        Some((room_id, member))
    }

    /// Number of live (non-empty) rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
