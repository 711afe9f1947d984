//! Room mirror: peer presence through shared storage
//!
//! Each room is one JSON array in the key-value store. Every session
//! rewrites its own entry (last writer wins) and polls for the others.
//! There is no ordering or liveness guarantee beyond the per-peer `seq`,
//! which `PeerTracker` uses to spot peers that stopped updating.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::DriveState;

/// Entries kept per room
pub const ROOM_CAPACITY: usize = 5;
/// A peer whose seq has not advanced for this long is stale (ms)
pub const STALE_AFTER_MS: f64 = 3000.0;

/// One peer's published state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSnapshot {
    pub id: String,
    pub name: String,
    pub vehicle_id: String,
    pub skin_id: String,
    pub pos: Vec2,
    pub rotation: f32,
    pub speed: f32,
    pub score: u64,
    /// Monotonic per-peer publish counter
    #[serde(default)]
    pub seq: u64,
}

impl PeerSnapshot {
    pub fn from_drive(
        id: &str,
        name: &str,
        vehicle_id: &str,
        skin_id: &str,
        drive: &DriveState,
        seq: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            vehicle_id: vehicle_id.to_string(),
            skin_id: skin_id.to_string(),
            pos: drive.pos,
            rotation: drive.rotation,
            speed: drive.speed,
            score: drive.drift_score,
            seq,
        }
    }
}

/// Storage key for a room code
pub fn room_key(room: &str) -> String {
    format!("drift_room_{}", room.trim().to_uppercase())
}

/// Random-looking peer id from a seed
pub fn generate_peer_id(seed: u64) -> String {
    let mut rng = Pcg32::seed_from_u64(seed);
    format!("P-{:06X}", rng.random_range(0..0x100_0000u32))
}

/// Read the room; malformed blobs read as empty
pub fn read_room<S: KeyValueStore>(store: &S, room: &str) -> Vec<PeerSnapshot> {
    let Some(json) = store.get(&room_key(room)) else {
        return Vec::new();
    };
    serde_json::from_str(&json).unwrap_or_else(|e| {
        log::warn!("Room {room} blob is malformed, ignoring: {e}");
        Vec::new()
    })
}

/// Replace our entry in the room and keep only the newest entries
pub fn publish<S: KeyValueStore>(
    store: &mut S,
    room: &str,
    snapshot: &PeerSnapshot,
) -> Result<(), StorageError> {
    let mut peers = read_room(store, room);
    peers.retain(|p| p.id != snapshot.id);
    peers.push(snapshot.clone());
    if peers.len() > ROOM_CAPACITY {
        let excess = peers.len() - ROOM_CAPACITY;
        peers.drain(..excess);
    }
    let json = serde_json::to_string(&peers)?;
    store.set(&room_key(room), &json)
}

/// Everyone in the room except `self_id`
pub fn peers<S: KeyValueStore>(store: &S, room: &str, self_id: &str) -> Vec<PeerSnapshot> {
    read_room(store, room)
        .into_iter()
        .filter(|p| p.id != self_id)
        .collect()
}

/// Drop our entry from the room
pub fn leave<S: KeyValueStore>(
    store: &mut S,
    room: &str,
    self_id: &str,
) -> Result<(), StorageError> {
    let mut peers = read_room(store, room);
    let before = peers.len();
    peers.retain(|p| p.id != self_id);
    if peers.len() == before {
        return Ok(());
    }
    let json = serde_json::to_string(&peers)?;
    store.set(&room_key(room), &json)
}

#[derive(Debug, Clone, Copy)]
struct SeenPeer {
    seq: u64,
    advanced_at_ms: f64,
}

/// Tracks per-peer seq to filter out peers that stopped publishing
#[derive(Debug, Default)]
pub struct PeerTracker {
    seen: HashMap<String, SeenPeer>,
}

impl PeerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll and return the peers that are still live.
    ///
    /// A snapshot with a seq lower than one already seen is ignored as out of date.
    pub fn observe(&mut self, peers: Vec<PeerSnapshot>, now_ms: f64) -> Vec<PeerSnapshot> {
        self.seen.retain(|id, _| peers.iter().any(|p| &p.id == id));
        peers
            .into_iter()
            .filter(|peer| {
                let entry = self.seen.entry(peer.id.clone()).or_insert(SeenPeer {
                    seq: peer.seq,
                    advanced_at_ms: now_ms,
                });
                if peer.seq < entry.seq {
                    return false;
                }
                if peer.seq > entry.seq {
                    entry.seq = peer.seq;
                    entry.advanced_at_ms = now_ms;
                }
                now_ms - entry.advanced_at_ms <= STALE_AFTER_MS
            })
            .collect()
    }
}
