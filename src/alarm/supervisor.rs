/**
 * Heartbeat Supervisor
 *
 * Recurring background sweep over every registered channel. Each tick sends
 * a no-op keep-alive so proxies and load balancers between the server and
 * the subscriber do not reap an idle connection; a channel whose send fails
 * is evicted from the registry, which closes its stream from the server
 * side.
 *
 * The interval must stay below the shortest intermediary idle timeout —
 * tens of seconds, not minutes.
 */
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::alarm::registry::{ChannelEvent, ConnectionRegistry};

/// Default sweep interval, safely under common 60s proxy idle timeouts
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the recurring keep-alive sweep.
///
/// Runs for the lifetime of the process, independent of any request.
pub fn spawn_heartbeat(registry: ConnectionRegistry, interval: Duration) -> JoinHandle<()> {
    tracing::info!(
        "[Alarm] Heartbeat supervisor started, interval {}s",
        interval.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            sweep(&registry);
        }
    })
}

/// Send one keep-alive to every registered channel, evicting the dead ones.
pub fn sweep(registry: &ConnectionRegistry) {
    let channels = registry.all_channels();
    if channels.is_empty() {
        return;
    }

    let mut evicted = 0;
    for channel in &channels {
        if channel.push(ChannelEvent::KeepAlive).is_err() {
            registry.unregister(channel.recipient_id(), channel.id());
            evicted += 1;
        }
    }

    if evicted > 0 {
        tracing::info!(
            "[Alarm] Keep-alive swept {} channel(s), evicted {} dead",
            channels.len(),
            evicted
        );
    } else {
        tracing::debug!("[Alarm] Keep-alive sent to {} channel(s)", channels.len());
    }
}
