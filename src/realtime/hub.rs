use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use super::channel::Channel;
use super::message::Envelope;

#[derive(Default)]
struct Registry {
    clients: HashMap<u64, Arc<Channel>>,
    by_user: HashMap<Uuid, HashSet<u64>>,
    by_room: HashMap<Uuid, HashSet<u64>>,
}

/// Registry of live channels with per-user and per-quiz-room indexes.
///
/// All three indexes sit behind one readers-writer lock: broadcasts take the
/// read lock, membership changes take the write lock. Enqueueing onto a
/// channel is a non-blocking `try_send`, so the lock is never held across a
/// suspension point.
#[derive(Default)]
pub struct Hub {
    registry: RwLock<Registry>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, channel: Arc<Channel>) {
        let mut registry = self.registry.write().unwrap();
        if let Some(user_id) = channel.user_id() {
            registry.by_user.entry(user_id).or_default().insert(channel.id());
        }
        tracing::info!(channel = channel.id(), user = ?channel.user_id(), "channel registered");
        registry.clients.insert(channel.id(), channel);
    }

    /// Removes the channel from every index and closes its outbound queue.
    /// Safe to call more than once; only the first call does anything.
    pub fn unregister(&self, channel: &Channel) {
        let removed = {
            let mut registry = self.registry.write().unwrap();
            remove_locked(&mut registry, channel.id())
        };
        if let Some(removed) = removed {
            removed.close();
            tracing::info!(channel = removed.id(), user = ?removed.user_id(), "channel unregistered");
        }
    }

    /// Adds the channel to a quiz room. Ignored if the channel has already
    /// been unregistered (the reader loop may race shutdown).
    pub fn subscribe(&self, channel: &Channel, quiz_id: Uuid) {
        let mut registry = self.registry.write().unwrap();
        if !registry.clients.contains_key(&channel.id()) {
            return;
        }
        registry.by_room.entry(quiz_id).or_default().insert(channel.id());
        tracing::info!(channel = channel.id(), user = ?channel.user_id(), %quiz_id, "channel joined quiz room");
    }

    pub fn unsubscribe(&self, channel: &Channel, quiz_id: Uuid) {
        let mut registry = self.registry.write().unwrap();
        if let Some(members) = registry.by_room.get_mut(&quiz_id) {
            members.remove(&channel.id());
            if members.is_empty() {
                registry.by_room.remove(&quiz_id);
            }
        }
        tracing::info!(channel = channel.id(), user = ?channel.user_id(), %quiz_id, "channel left quiz room");
    }

    /// Enqueues onto every channel in the room. A full queue drops the
    /// message for that channel only; leaderboard snapshots are idempotent,
    /// so the next update supersedes the lost one.
    pub fn broadcast_to_room(&self, quiz_id: Uuid, message: &Envelope) {
        let registry = self.registry.read().unwrap();
        let Some(members) = registry.by_room.get(&quiz_id) else {
            return;
        };
        for id in members {
            if let Some(channel) = registry.clients.get(id) {
                if !channel.try_send(message.clone()) {
                    tracing::debug!(channel = id, %quiz_id, "dropping room message for slow channel");
                }
            }
        }
    }

    pub fn broadcast_to_user(&self, user_id: Uuid, message: &Envelope) {
        let registry = self.registry.read().unwrap();
        let Some(channels) = registry.by_user.get(&user_id) else {
            return;
        };
        for id in channels {
            if let Some(channel) = registry.clients.get(id) {
                if !channel.try_send(message.clone()) {
                    tracing::debug!(channel = id, %user_id, "dropping user message for slow channel");
                }
            }
        }
    }

    /// Enqueues onto every live channel. Channels that cannot take the
    /// message are treated as dead: removed from all indexes and closed.
    pub fn broadcast_all(&self, message: &Envelope) {
        let dead: Vec<u64> = {
            let registry = self.registry.read().unwrap();
            registry
                .clients
                .values()
                .filter(|channel| !channel.try_send(message.clone()))
                .map(|channel| channel.id())
                .collect()
        };

        if dead.is_empty() {
            return;
        }
        let mut registry = self.registry.write().unwrap();
        for id in dead {
            if let Some(channel) = remove_locked(&mut registry, id) {
                channel.close();
                tracing::info!(channel = id, "removed unresponsive channel during broadcast");
            }
        }
    }
}

fn remove_locked(registry: &mut Registry, id: u64) -> Option<Arc<Channel>> {
    let channel = registry.clients.remove(&id)?;
    if let Some(user_id) = channel.user_id() {
        if let Some(channels) = registry.by_user.get_mut(&user_id) {
            channels.remove(&id);
            if channels.is_empty() {
                registry.by_user.remove(&user_id);
            }
        }
    }
    registry.by_room.retain(|_, members| {
        members.remove(&id);
        !members.is_empty()
    });
    Some(channel)
}
