/**
 * Alarm Domain Model
 *
 * This module defines the data types for the alarm (notification) subsystem:
 * the durable alarm record, its type tag and arguments, and the payload
 * pushed to subscribed clients.
 *
 * The dispatcher treats `AlarmType` and `AlarmArgs` as opaque — they are
 * interpreted only by the client rendering the alarm.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Kind of alarm raised by a producer.
///
/// Serialized in SCREAMING_SNAKE_CASE on the wire and stored as TEXT in the
/// database. The delivery core never branches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmType {
    /// Someone liked one of the recipient's posts
    NewLikeOnPost,
    /// Someone commented on one of the recipient's posts
    NewCommentOnPost,
}

/// Error returned when decoding an unknown alarm type tag from storage
#[derive(Debug, Error)]
#[error("unknown alarm type: {0}")]
pub struct UnknownAlarmType(pub String);

impl AlarmType {
    /// Storage/wire representation of the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmType::NewLikeOnPost => "NEW_LIKE_ON_POST",
            AlarmType::NewCommentOnPost => "NEW_COMMENT_ON_POST",
        }
    }
}

impl std::str::FromStr for AlarmType {
    type Err = UnknownAlarmType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW_LIKE_ON_POST" => Ok(AlarmType::NewLikeOnPost),
            "NEW_COMMENT_ON_POST" => Ok(AlarmType::NewCommentOnPost),
            other => Err(UnknownAlarmType(other.to_string())),
        }
    }
}

/// Structured arguments attached to every alarm
///
/// `actor_id` is the user whose action raised the alarm; `post_id` is the
/// post the action targeted. Opaque to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmArgs {
    /// User whose like/comment triggered the alarm
    pub actor_id: Uuid,
    /// Post the action targeted
    pub post_id: Uuid,
}

/// A durable, immutable notification entry
///
/// Created exactly once by the dispatcher at dispatch time; never updated
/// afterwards. The id is assigned by the store and globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Store-assigned alarm id
    pub id: Uuid,
    /// User the alarm is addressed to
    pub recipient_id: Uuid,
    /// Type tag, interpreted by clients only
    pub alarm_type: AlarmType,
    /// Structured payload, interpreted by clients only
    pub args: AlarmArgs,
    /// When the alarm was persisted
    pub created_at: DateTime<Utc>,
}

/// Payload pushed to every open channel of the recipient
///
/// Carries the same data as the durable record so a client can render the
/// alarm without a follow-up fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPush {
    pub alarm_id: Uuid,
    pub alarm_type: AlarmType,
    pub args: AlarmArgs,
    pub created_at: DateTime<Utc>,
}

impl AlarmPush {
    /// Build the push payload for a freshly persisted record
    pub fn from_record(record: &AlarmRecord) -> Self {
        Self {
            alarm_id: record.id,
            alarm_type: record.alarm_type,
            args: record.args,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_alarm_type_round_trip() {
        for alarm_type in [AlarmType::NewLikeOnPost, AlarmType::NewCommentOnPost] {
            let parsed = AlarmType::from_str(alarm_type.as_str()).unwrap();
            assert_eq!(parsed, alarm_type);
        }
    }

    #[test]
    fn test_alarm_type_unknown_tag() {
        let err = AlarmType::from_str("NEW_FOLLOW").unwrap_err();
        assert!(err.to_string().contains("NEW_FOLLOW"));
    }

    #[test]
    fn test_alarm_type_serde_shape() {
        let json = serde_json::to_string(&AlarmType::NewLikeOnPost).unwrap();
        assert_eq!(json, "\"NEW_LIKE_ON_POST\"");
    }

    #[test]
    fn test_push_from_record() {
        let record = AlarmRecord {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            alarm_type: AlarmType::NewCommentOnPost,
            args: AlarmArgs {
                actor_id: Uuid::new_v4(),
                post_id: Uuid::new_v4(),
            },
            created_at: Utc::now(),
        };

        let push = AlarmPush::from_record(&record);
        assert_eq!(push.alarm_id, record.id);
        assert_eq!(push.alarm_type, record.alarm_type);
        assert_eq!(push.args, record.args);
        assert_eq!(push.created_at, record.created_at);
    }

    #[test]
    fn test_push_serialization() {
        let push = AlarmPush {
            alarm_id: Uuid::new_v4(),
            alarm_type: AlarmType::NewLikeOnPost,
            args: AlarmArgs {
                actor_id: Uuid::new_v4(),
                post_id: Uuid::new_v4(),
            },
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&push).unwrap();
        let decoded: AlarmPush = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, push);
        assert!(json.contains("NEW_LIKE_ON_POST"));
    }
}
