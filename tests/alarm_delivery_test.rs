//! Alarm delivery integration tests
//!
//! Exercises the registry, dispatcher, store, and supervisor together,
//! using the in-memory store so no database is required.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::timeout;
use uuid::Uuid;

use xfsocial::alarm::{
    supervisor, AlarmArgs, AlarmDispatcher, AlarmRecord, AlarmStore, AlarmStoreError, AlarmType,
    ChannelEvent, ConnectionRegistry, MemoryAlarmStore,
};

/// Store double that refuses every append
struct FailingStore;

#[async_trait]
impl AlarmStore for FailingStore {
    async fn append(
        &self,
        _recipient_id: Uuid,
        _alarm_type: AlarmType,
        _args: AlarmArgs,
    ) -> Result<AlarmRecord, AlarmStoreError> {
        Err(AlarmStoreError::Unavailable("append rejected".to_string()))
    }

    async fn list_by_recipient(
        &self,
        _recipient_id: Uuid,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<AlarmRecord>, AlarmStoreError> {
        Ok(Vec::new())
    }
}

fn args_for(actor_id: Uuid) -> AlarmArgs {
    AlarmArgs {
        actor_id,
        post_id: Uuid::new_v4(),
    }
}

/// Pull the next alarm push off a subscription, skipping keep-alives.
async fn next_alarm(sub: &mut xfsocial::alarm::Subscription) -> Option<xfsocial::alarm::AlarmPush> {
    loop {
        match timeout(Duration::from_millis(200), sub.recv()).await.ok()? {
            Some(ChannelEvent::Alarm(push)) => return Some(push),
            Some(ChannelEvent::KeepAlive) => continue,
            None => return None,
        }
    }
}

#[tokio::test]
async fn offline_recipient_gets_a_durable_record_and_no_push() {
    let store = Arc::new(MemoryAlarmStore::new());
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(store.clone(), registry.clone());

    let recipient = Uuid::new_v4();
    let actor = Uuid::new_v4();

    let alarm_id = dispatcher
        .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(actor))
        .await
        .expect("dispatch succeeds with no open channel");

    let listed = store.list_by_recipient(recipient, 0, 20).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, alarm_id);
    assert_eq!(listed[0].args.actor_id, actor);

    // No channel was ever open, so no push side effect exists anywhere.
    assert_eq!(registry.channel_count(), 0);
}

#[tokio::test]
async fn push_carries_the_same_id_as_the_durable_record() {
    let store = Arc::new(MemoryAlarmStore::new());
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(store.clone(), registry.clone());

    let recipient = Uuid::new_v4();
    let mut sub = registry.register(recipient);

    // The dispatch call returns before the subscriber reads anything.
    let alarm_id = dispatcher
        .dispatch(recipient, AlarmType::NewCommentOnPost, args_for(Uuid::new_v4()))
        .await
        .unwrap();

    let push = next_alarm(&mut sub).await.expect("one push arrives");
    assert_eq!(push.alarm_id, alarm_id);
    assert_eq!(push.alarm_type, AlarmType::NewCommentOnPost);

    let listed = store.list_by_recipient(recipient, 0, 20).await.unwrap();
    assert_eq!(listed[0].id, push.alarm_id);
    assert_eq!(listed[0].created_at, push.created_at);
}

#[tokio::test]
async fn persistence_failure_means_no_push_for_that_call() {
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(Arc::new(FailingStore), registry.clone());

    let recipient = Uuid::new_v4();
    let mut sub = registry.register(recipient);

    let result = dispatcher
        .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(Uuid::new_v4()))
        .await;
    assert!(result.is_err());

    // The channel is untouched: still registered, nothing delivered.
    assert_eq!(registry.channels_for(recipient).len(), 1);
    assert!(next_alarm(&mut sub).await.is_none());
}

#[tokio::test]
async fn multi_device_fanout_and_selective_teardown() {
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(Arc::new(MemoryAlarmStore::new()), registry.clone());

    let recipient = Uuid::new_v4();
    let mut phone = registry.register(recipient);
    let mut laptop = registry.register(recipient);

    let first = dispatcher
        .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(Uuid::new_v4()))
        .await
        .unwrap();

    assert_eq!(next_alarm(&mut phone).await.unwrap().alarm_id, first);
    assert_eq!(next_alarm(&mut laptop).await.unwrap().alarm_id, first);

    // Disconnect the phone; only the laptop sees the second alarm.
    drop(phone);

    let second = dispatcher
        .dispatch(recipient, AlarmType::NewCommentOnPost, args_for(Uuid::new_v4()))
        .await
        .unwrap();

    assert_eq!(next_alarm(&mut laptop).await.unwrap().alarm_id, second);
    assert_eq!(registry.channels_for(recipient).len(), 1);
}

#[tokio::test]
async fn unregistered_channel_never_receives_a_subsequent_push() {
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(Arc::new(MemoryAlarmStore::new()), registry.clone());

    let recipient = Uuid::new_v4();
    let mut sub = registry.register(recipient);
    registry.unregister(recipient, sub.channel_id());

    for _ in 0..5 {
        dispatcher
            .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(Uuid::new_v4()))
            .await
            .unwrap();
    }

    // The registry dropped the channel's sender, so the stream ends with
    // nothing delivered.
    assert_eq!(sub.recv().await, None);
}

#[tokio::test]
async fn double_unregister_is_benign_and_scoped() {
    let registry = ConnectionRegistry::new();

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_sub = registry.register(alice);
    let _bob_sub = registry.register(bob);

    // Disconnect and supervisor-timeout racing on the same channel.
    registry.unregister(alice, alice_sub.channel_id());
    registry.unregister(alice, alice_sub.channel_id());

    assert!(registry.channels_for(alice).is_empty());
    assert_eq!(registry.channels_for(bob).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fifty_concurrent_dispatches_deliver_fifty_intact_pushes() {
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(Arc::new(MemoryAlarmStore::new()), registry.clone());

    let recipient = Uuid::new_v4();
    let mut sub = registry.register(recipient);

    let mut handles = Vec::new();
    for _ in 0..50 {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            dispatcher
                .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(Uuid::new_v4()))
                .await
                .unwrap()
        }));
    }

    let mut dispatched = Vec::new();
    for handle in handles {
        dispatched.push(handle.await.unwrap());
    }

    let mut received = Vec::new();
    for _ in 0..50 {
        let push = next_alarm(&mut sub).await.expect("fifty pushes arrive");
        assert_eq!(push.alarm_type, AlarmType::NewLikeOnPost);
        received.push(push.alarm_id);
    }

    // Exactly fifty, no duplicates, no extras.
    let mut unique = received.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 50);

    let mut expected = dispatched.clone();
    expected.sort();
    assert_eq!(unique, expected);
    assert!(next_alarm(&mut sub).await.is_none());
}

#[tokio::test]
async fn sequential_dispatches_arrive_in_order() {
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(Arc::new(MemoryAlarmStore::new()), registry.clone());

    let recipient = Uuid::new_v4();
    let mut sub = registry.register(recipient);

    let mut dispatched = Vec::new();
    for _ in 0..10 {
        let alarm_id = dispatcher
            .dispatch(recipient, AlarmType::NewCommentOnPost, args_for(Uuid::new_v4()))
            .await
            .unwrap();
        dispatched.push(alarm_id);
    }

    for expected in dispatched {
        let push = next_alarm(&mut sub).await.unwrap();
        assert_eq!(push.alarm_id, expected);
    }
}

#[tokio::test]
async fn snapshot_taken_before_registration_misses_the_new_channel() {
    let store = Arc::new(MemoryAlarmStore::new());
    let registry = ConnectionRegistry::new();
    let dispatcher = AlarmDispatcher::new(store.clone(), registry.clone());

    let recipient = Uuid::new_v4();

    // Dispatch completes before the client subscribes; the record is the
    // recovery path.
    let alarm_id = dispatcher
        .dispatch(recipient, AlarmType::NewLikeOnPost, args_for(Uuid::new_v4()))
        .await
        .unwrap();

    let mut sub = registry.register(recipient);
    assert!(next_alarm(&mut sub).await.is_none());

    let listed = store.list_by_recipient(recipient, 0, 20).await.unwrap();
    assert_eq!(listed[0].id, alarm_id);
}

#[tokio::test]
async fn keep_alive_sweep_reaches_every_open_channel() {
    let registry = ConnectionRegistry::new();

    let mut sub_a = registry.register(Uuid::new_v4());
    let mut sub_b = registry.register(Uuid::new_v4());

    supervisor::sweep(&registry);

    assert_eq!(sub_a.recv().await, Some(ChannelEvent::KeepAlive));
    assert_eq!(sub_b.recv().await, Some(ChannelEvent::KeepAlive));
    assert_eq!(registry.channel_count(), 2);
}

#[tokio::test]
async fn spawned_supervisor_keeps_channels_warm() {
    let registry = ConnectionRegistry::new();
    let mut sub = registry.register(Uuid::new_v4());

    let handle = supervisor::spawn_heartbeat(registry.clone(), Duration::from_millis(20));

    for _ in 0..3 {
        let event = timeout(Duration::from_millis(500), sub.recv())
            .await
            .expect("keep-alive within interval");
        assert_eq!(event, Some(ChannelEvent::KeepAlive));
    }

    handle.abort();
}
