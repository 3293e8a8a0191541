/**
 * Durable Alarm Store
 *
 * Append-only persistence for alarm records, behind a trait so the
 * dispatcher and handlers take an injected `Arc<dyn AlarmStore>` rather
 * than a concrete pool. Production uses the PostgreSQL implementation;
 * tests (and database-less local runs) use the in-memory one.
 *
 * The store is the source of truth for alarm delivery: a client that
 * missed a push recovers by paging through `list_by_recipient`.
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::alarm::model::{AlarmArgs, AlarmRecord, AlarmType};

/// Errors surfaced by the durable alarm store
#[derive(Debug, Error)]
pub enum AlarmStoreError {
    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The store rejected the operation for a non-database reason
    #[error("alarm store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only, paginated log of alarm records per recipient
#[async_trait]
pub trait AlarmStore: Send + Sync {
    /// Persist a new alarm record and return it with its assigned id.
    async fn append(
        &self,
        recipient_id: Uuid,
        alarm_type: AlarmType,
        args: AlarmArgs,
    ) -> Result<AlarmRecord, AlarmStoreError>;

    /// Page through a recipient's alarms, newest first.
    async fn list_by_recipient(
        &self,
        recipient_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AlarmRecord>, AlarmStoreError>;
}

/// PostgreSQL-backed alarm store
pub struct PgAlarmStore {
    pool: PgPool,
}

impl PgAlarmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AlarmRow {
    id: Uuid,
    user_id: Uuid,
    alarm_type: String,
    args: sqlx::types::Json<AlarmArgs>,
    created_at: DateTime<Utc>,
}

impl AlarmRow {
    fn into_record(self) -> Result<AlarmRecord, sqlx::Error> {
        let alarm_type = AlarmType::from_str(&self.alarm_type)
            .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;

        Ok(AlarmRecord {
            id: self.id,
            recipient_id: self.user_id,
            alarm_type,
            args: self.args.0,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl AlarmStore for PgAlarmStore {
    async fn append(
        &self,
        recipient_id: Uuid,
        alarm_type: AlarmType,
        args: AlarmArgs,
    ) -> Result<AlarmRecord, AlarmStoreError> {
        let row = sqlx::query_as::<_, AlarmRow>(
            r#"
            INSERT INTO alarms (id, user_id, alarm_type, args, created_at)
            VALUES (gen_random_uuid(), $1, $2, $3, NOW())
            RETURNING id, user_id, alarm_type, args, created_at
            "#,
        )
        .bind(recipient_id)
        .bind(alarm_type.as_str())
        .bind(sqlx::types::Json(args))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record()?)
    }

    async fn list_by_recipient(
        &self,
        recipient_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AlarmRecord>, AlarmStoreError> {
        let offset = i64::from(page) * i64::from(per_page);

        let rows = sqlx::query_as::<_, AlarmRow>(
            r#"
            SELECT id, user_id, alarm_type, args, created_at
            FROM alarms
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(recipient_id)
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row.into_record()?);
        }

        Ok(records)
    }
}

/// In-memory alarm store
///
/// Used by tests and by database-less local runs. Records do not survive a
/// restart; otherwise the semantics match the PostgreSQL store.
#[derive(Default)]
pub struct MemoryAlarmStore {
    records: Mutex<Vec<AlarmRecord>>,
}

impl MemoryAlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all recipients
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AlarmStore for MemoryAlarmStore {
    async fn append(
        &self,
        recipient_id: Uuid,
        alarm_type: AlarmType,
        args: AlarmArgs,
    ) -> Result<AlarmRecord, AlarmStoreError> {
        let record = AlarmRecord {
            id: Uuid::new_v4(),
            recipient_id,
            alarm_type,
            args,
            created_at: Utc::now(),
        };

        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_by_recipient(
        &self,
        recipient_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AlarmRecord>, AlarmStoreError> {
        let records = self.records.lock().unwrap();

        // Insertion order is creation order, so newest-first is a reverse scan.
        Ok(records
            .iter()
            .rev()
            .filter(|record| record.recipient_id == recipient_id)
            .skip(page as usize * per_page as usize)
            .take(per_page as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AlarmArgs {
        AlarmArgs {
            actor_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_unique_ids() {
        let store = MemoryAlarmStore::new();
        let recipient = Uuid::new_v4();

        let first = store
            .append(recipient, AlarmType::NewLikeOnPost, args())
            .await
            .unwrap();
        let second = store
            .append(recipient, AlarmType::NewCommentOnPost, args())
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped_to_recipient() {
        let store = MemoryAlarmStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let old = store
            .append(alice, AlarmType::NewLikeOnPost, args())
            .await
            .unwrap();
        store
            .append(bob, AlarmType::NewLikeOnPost, args())
            .await
            .unwrap();
        let new = store
            .append(alice, AlarmType::NewCommentOnPost, args())
            .await
            .unwrap();

        let listed = store.list_by_recipient(alice, 0, 20).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = MemoryAlarmStore::new();
        let recipient = Uuid::new_v4();

        for _ in 0..5 {
            store
                .append(recipient, AlarmType::NewLikeOnPost, args())
                .await
                .unwrap();
        }

        let first_page = store.list_by_recipient(recipient, 0, 2).await.unwrap();
        let second_page = store.list_by_recipient(recipient, 1, 2).await.unwrap();
        let last_page = store.list_by_recipient(recipient, 2, 2).await.unwrap();

        assert_eq!(first_page.len(), 2);
        assert_eq!(second_page.len(), 2);
        assert_eq!(last_page.len(), 1);
        assert_ne!(first_page[0].id, second_page[0].id);
    }

    #[tokio::test]
    async fn test_list_unknown_recipient_is_empty() {
        let store = MemoryAlarmStore::new();
        let listed = store
            .list_by_recipient(Uuid::new_v4(), 0, 20)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
