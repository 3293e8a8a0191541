/**
 * Alarm Dispatcher
 *
 * The operation producers invoke when a like or comment lands: persist the
 * alarm, then push it to every open channel of the recipient.
 *
 * # Ordering and failure isolation
 *
 * The durable append always completes (or definitively fails) before any
 * push is attempted — the record is the source of truth, the push is a
 * convenience layer on top of it. A failed append fails the whole dispatch.
 * A failed push only unregisters the broken channel; the caller still gets
 * the alarm id, and a client that missed the push recovers via the durable
 * list endpoint.
 *
 * Pushes are enqueued without blocking, so the producer's response never
 * waits for a subscriber's connection.
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::alarm::model::{AlarmArgs, AlarmPush, AlarmType};
use crate::alarm::registry::{ChannelEvent, ConnectionRegistry};
use crate::alarm::store::{AlarmStore, AlarmStoreError};

/// Persist-then-push entry point, shared by all producer handlers
#[derive(Clone)]
pub struct AlarmDispatcher {
    store: Arc<dyn AlarmStore>,
    registry: ConnectionRegistry,
}

impl AlarmDispatcher {
    pub fn new(store: Arc<dyn AlarmStore>, registry: ConnectionRegistry) -> Self {
        Self { store, registry }
    }

    /// Persist a new alarm for `recipient_id` and push it to every channel
    /// currently registered for them.
    ///
    /// Returns the store-assigned alarm id. The caller is responsible for
    /// resolving the recipient; the dispatcher does not validate existence.
    pub async fn dispatch(
        &self,
        recipient_id: Uuid,
        alarm_type: AlarmType,
        args: AlarmArgs,
    ) -> Result<Uuid, AlarmStoreError> {
        // Step (a): durable append. No registry lock is held across this
        // await; registry access starts only after persistence completes.
        let record = self.store.append(recipient_id, alarm_type, args).await?;

        // Step (b): snapshot the recipient's channels and push best-effort.
        // The snapshot may miss a channel registered a moment later (it will
        // catch up via the list endpoint) or include one that just went away
        // (the failed send unregisters it).
        let push = AlarmPush::from_record(&record);
        let channels = self.registry.channels_for(recipient_id);

        if channels.is_empty() {
            tracing::debug!(
                "[Alarm] No open channel for recipient {}, alarm {} persisted only",
                recipient_id,
                record.id
            );
            return Ok(record.id);
        }

        let mut delivered = 0;
        for channel in &channels {
            match channel.push(ChannelEvent::Alarm(push.clone())) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::warn!(
                        "[Alarm] Push failed on channel {}, unregistering",
                        channel.id()
                    );
                    self.registry.unregister(recipient_id, channel.id());
                }
            }
        }

        tracing::info!(
            "[Alarm] Alarm {} pushed to {}/{} channel(s) of recipient {}",
            record.id,
            delivered,
            channels.len(),
            recipient_id
        );

        Ok(record.id)
    }
}
