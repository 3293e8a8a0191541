/**
 * Alarm Subscription Handler
 *
 * This module implements the Server-Sent Events handler for
 * `GET /api/v1/users/alarm/subscribe`. It registers a push channel for the
 * authenticated user and streams alarms to it until the connection ends.
 *
 * # Stream contents
 *
 * - An initial `connected` sentinel event, so the client can distinguish
 *   "subscribed, no alarms yet" from "never connected".
 * - One `alarm` event per dispatched alarm, carrying the JSON push payload.
 * - Keep-alive comment lines injected by the heartbeat supervisor; these
 *   are invisible to `EventSource` consumers.
 *
 * # Teardown
 *
 * Client disconnects drop the response stream, which drops the registered
 * subscription and unregisters its channel. Supervisor eviction removes the
 * channel's sender from the registry, which ends this stream from the
 * server side. Both paths converge on the same idempotent unregister.
 */
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures_util::stream::{self, Stream, StreamExt};

use crate::alarm::registry::{ChannelEvent, Subscription};
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// SSE event name for pushed alarms
const ALARM_EVENT: &str = "alarm";
/// SSE event name for the initial sentinel
const CONNECTED_EVENT: &str = "connected";

/// Handle alarm subscription (GET /api/v1/users/alarm/subscribe)
///
/// The subscription lives until the client disconnects or the supervisor
/// evicts the channel; there is no application-level deadline. A client
/// that reconnects gets a fresh channel and recovers anything missed via
/// the durable alarm list.
pub async fn handle_alarm_subscription(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!("[Alarm] Subscription request from user {}", user.user_id);

    let subscription = app_state.registry.register(user.user_id);

    Sse::new(subscription_stream(subscription))
}

/// Build the SSE event stream for one registered subscription.
///
/// The sentinel is yielded before anything read from the channel, so it is
/// always the first event on the wire.
fn subscription_stream(
    subscription: Subscription,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    let connected = Event::default()
        .event(CONNECTED_EVENT)
        .data("connect completed");

    let updates = stream::unfold(subscription, |mut subscription| async move {
        loop {
            match subscription.recv().await {
                Some(ChannelEvent::Alarm(push)) => {
                    let data = match serde_json::to_string(&push) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Alarm] Failed to serialize push: {:?}", e);
                            continue;
                        }
                    };

                    let event = Event::default()
                        .event(ALARM_EVENT)
                        .id(push.alarm_id.to_string())
                        .data(data);

                    return Some((Ok(event), subscription));
                }
                Some(ChannelEvent::KeepAlive) => {
                    return Some((Ok(Event::default().comment("keep-alive")), subscription));
                }
                None => {
                    // The registry dropped our sender: supervisor eviction
                    // or push-failure cleanup. Close from the server side.
                    tracing::info!(
                        "[Alarm] Channel {} evicted, ending stream",
                        subscription.channel_id()
                    );
                    return None;
                }
            }
        }
    });

    stream::once(async move { Ok(connected) }).chain(updates)
}
