/**
 * Connection Registry
 *
 * In-process mapping from a recipient (user) to the set of currently-open
 * push channels for that recipient. The registry is the single piece of
 * mutable shared state in the alarm subsystem: it is cloned into the
 * dispatcher, the subscription handler, and the heartbeat supervisor, and
 * must tolerate concurrent register/unregister/snapshot calls for the same
 * recipient without losing entries.
 *
 * # Multiplicity
 *
 * A recipient may hold zero, one, or many channels at once (multi-device).
 * A channel is bound to exactly one recipient and one physical connection,
 * and is never reused across reconnects — a new connection always gets a
 * new channel.
 *
 * # Snapshots
 *
 * `channels_for` returns a point-in-time copy of the recipient's set, so a
 * push loop iterating it is unaffected by concurrent registration changes.
 * The snapshot may be momentarily stale; pushing into a channel whose
 * receiver is already gone fails cleanly and the caller unregisters it.
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::alarm::model::AlarmPush;

/// Event delivered over a registered channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A freshly persisted alarm
    Alarm(AlarmPush),
    /// Periodic keep-alive, no payload significance
    KeepAlive,
}

/// Error returned by [`Channel::push`] when the receiving half is gone
#[derive(Debug, Error)]
#[error("channel receiver dropped")]
pub struct ChannelClosed;

/// Sending half of one live subscription
///
/// Identity is the channel id, not the recipient id: teardown paths remove
/// exactly this channel and can never evict a sibling connection of the
/// same recipient.
#[derive(Debug, Clone)]
pub struct Channel {
    id: Uuid,
    recipient_id: Uuid,
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl Channel {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recipient_id(&self) -> Uuid {
        self.recipient_id
    }

    /// Enqueue an event for this channel's connection.
    ///
    /// Never blocks; the per-channel queue serializes writes so concurrent
    /// dispatches cannot interleave on the underlying connection. Fails only
    /// when the subscriber side has gone away.
    pub fn push(&self, event: ChannelEvent) -> Result<(), ChannelClosed> {
        self.tx.send(event).map_err(|_| ChannelClosed)
    }
}

/// Receiving half of one live subscription, handed to the SSE handler
///
/// Dropping the subscription unregisters its channel, so client disconnects
/// clean up the registry without an explicit teardown call.
pub struct Subscription {
    channel_id: Uuid,
    recipient_id: Uuid,
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
    registry: ConnectionRegistry,
}

impl Subscription {
    pub fn channel_id(&self) -> Uuid {
        self.channel_id
    }

    pub fn recipient_id(&self) -> Uuid {
        self.recipient_id
    }

    /// Receive the next event for this channel.
    ///
    /// Returns `None` once the registry no longer holds the sending half,
    /// i.e. after supervisor eviction or a push-failure cleanup.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unregister(self.recipient_id, self.channel_id);
    }
}

/// Registry of live push channels, shared across all request handlers
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    channels: Arc<Mutex<HashMap<Uuid, Vec<Channel>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a new channel for `recipient_id` and insert it into the
    /// recipient's set (created lazily on first registration).
    ///
    /// Returns the receiving half; the registry keeps the only long-lived
    /// sending half, so removing the channel from the registry ends the
    /// subscriber's stream.
    pub fn register(&self, recipient_id: Uuid) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Channel {
            id: Uuid::new_v4(),
            recipient_id,
            tx,
        };
        let channel_id = channel.id;

        {
            let mut channels = self.channels.lock().unwrap();
            channels.entry(recipient_id).or_default().push(channel);
        }

        tracing::info!(
            "[Alarm] Channel {} registered for recipient {}",
            channel_id,
            recipient_id
        );

        Subscription {
            channel_id,
            recipient_id,
            rx,
            registry: self.clone(),
        }
    }

    /// Remove exactly the given channel from the recipient's set.
    ///
    /// Removing a channel that is not present is a no-op, so the disconnect
    /// and supervisor-timeout paths can race on cleanup safely. Empty sets
    /// are left in place and pruned on the next snapshot.
    pub fn unregister(&self, recipient_id: Uuid, channel_id: Uuid) {
        let mut channels = self.channels.lock().unwrap();
        if let Some(set) = channels.get_mut(&recipient_id) {
            let before = set.len();
            set.retain(|channel| channel.id != channel_id);
            if set.len() < before {
                tracing::info!(
                    "[Alarm] Channel {} unregistered for recipient {}",
                    channel_id,
                    recipient_id
                );
            }
        }
    }

    /// Point-in-time snapshot of the recipient's open channels.
    ///
    /// An empty set encountered here is pruned from the map.
    pub fn channels_for(&self, recipient_id: Uuid) -> Vec<Channel> {
        let mut channels = self.channels.lock().unwrap();
        match channels.get(&recipient_id) {
            Some(set) if set.is_empty() => {
                channels.remove(&recipient_id);
                Vec::new()
            }
            Some(set) => set.clone(),
            None => Vec::new(),
        }
    }

    /// Snapshot of every open channel across all recipients, for the
    /// heartbeat sweep. Prunes empty sets while it holds the lock.
    pub fn all_channels(&self) -> Vec<Channel> {
        let mut channels = self.channels.lock().unwrap();
        channels.retain(|_, set| !set.is_empty());
        channels.values().flatten().cloned().collect()
    }

    /// Number of open channels across all recipients
    pub fn channel_count(&self) -> usize {
        self.channels.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Number of recipients with a (possibly empty, not yet pruned) set
    pub fn recipient_count(&self) -> usize {
        self.channels.lock().unwrap().len()
    }
}

#[cfg(test)]
impl ConnectionRegistry {
    /// Insert a channel whose receiver is already gone, simulating a
    /// subscriber that vanished between snapshot and push.
    pub(crate) fn register_dead_channel(&self, recipient_id: Uuid) -> Uuid {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let channel = Channel {
            id: Uuid::new_v4(),
            recipient_id,
            tx,
        };
        let channel_id = channel.id;
        let mut channels = self.channels.lock().unwrap();
        channels.entry(recipient_id).or_default().push(channel);
        channel_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::model::{AlarmArgs, AlarmPush, AlarmType};

    fn push_payload() -> AlarmPush {
        AlarmPush {
            alarm_id: Uuid::new_v4(),
            alarm_type: AlarmType::NewLikeOnPost,
            args: AlarmArgs {
                actor_id: Uuid::new_v4(),
                post_id: Uuid::new_v4(),
            },
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_and_snapshot() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let _sub = registry.register(recipient);
        let snapshot = registry.channels_for(recipient);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].recipient_id(), recipient);
    }

    #[tokio::test]
    async fn test_multi_device_channels() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let sub_a = registry.register(recipient);
        let sub_b = registry.register(recipient);

        assert_eq!(registry.channels_for(recipient).len(), 2);
        assert_ne!(sub_a.channel_id(), sub_b.channel_id());
    }

    #[tokio::test]
    async fn test_push_reaches_subscriber() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let mut sub = registry.register(recipient);
        let payload = push_payload();

        let snapshot = registry.channels_for(recipient);
        snapshot[0].push(ChannelEvent::Alarm(payload.clone())).unwrap();

        assert_eq!(sub.recv().await, Some(ChannelEvent::Alarm(payload)));
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let sub = registry.register(recipient);
        let channel_id = sub.channel_id();

        registry.unregister(recipient, channel_id);
        registry.unregister(recipient, channel_id);

        assert!(registry.channels_for(recipient).is_empty());
    }

    #[tokio::test]
    async fn test_unregister_cannot_touch_other_recipient() {
        let registry = ConnectionRegistry::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let alice_sub = registry.register(alice);
        let _bob_sub = registry.register(bob);

        // Wrong recipient, right channel id: must be a no-op everywhere.
        registry.unregister(bob, alice_sub.channel_id());

        assert_eq!(registry.channels_for(alice).len(), 1);
        assert_eq!(registry.channels_for(bob).len(), 1);
    }

    #[tokio::test]
    async fn test_empty_set_pruned_on_snapshot() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let sub = registry.register(recipient);
        registry.unregister(recipient, sub.channel_id());

        // The emptied set survives unregister and is pruned on next access.
        assert_eq!(registry.recipient_count(), 1);
        assert!(registry.channels_for(recipient).is_empty());
        assert_eq!(registry.recipient_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_subscription_unregisters() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let sub = registry.register(recipient);
        assert_eq!(registry.channel_count(), 1);

        drop(sub);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_push_after_receiver_dropped_fails() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let sub = registry.register(recipient);
        let snapshot = registry.channels_for(recipient);
        drop(sub);

        // Stale snapshot: the channel is unregistered but a dispatcher may
        // still hold a clone of it.
        assert!(snapshot[0].push(ChannelEvent::KeepAlive).is_err());
    }

    #[tokio::test]
    async fn test_eviction_ends_subscriber_stream() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let mut sub = registry.register(recipient);
        registry.unregister(recipient, sub.channel_id());

        // The registry held the only sender, so the stream terminates.
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_unregister_same_recipient() {
        let registry = ConnectionRegistry::new();
        let recipient = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let sub = registry.register(recipient);
                // Snapshot concurrently with other registrations.
                let _ = registry.channels_for(recipient);
                drop(sub);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.channel_count(), 0);
    }
}
