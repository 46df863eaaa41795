//! Revision log storage repository.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use super::model::{ObjectType, Revision, RevisionCommand};
use crate::{NamespaceId, Result};

/// Repository for the append-only revision log.
///
/// The log is never updated or deleted from; the only write is
/// [`RevisionRepository::append`], which callers run inside the same
/// transaction as the lifecycle event it records.
pub struct RevisionRepository {
    pool: SqlitePool,
}

impl RevisionRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry to the log.
    ///
    /// Takes any executor so the append can share the transaction of
    /// the mutation it records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn append<'e, E>(
        executor: E,
        namespace_id: NamespaceId,
        object_type: ObjectType,
        record_id: i64,
        command: RevisionCommand,
    ) -> Result<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r"
            INSERT INTO revisions (namespace_id, object_type, record_id, command, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(namespace_id.0)
        .bind(object_type.as_str())
        .bind(record_id)
        .bind(command.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get the latest entry for one tracked object.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_for_object(
        &self,
        namespace_id: NamespaceId,
        object_type: ObjectType,
        record_id: i64,
    ) -> Result<Option<Revision>> {
        let row = sqlx::query(
            r"
            SELECT id, namespace_id, object_type, record_id, command, created_at
            FROM revisions
            WHERE namespace_id = ? AND object_type = ? AND record_id = ?
            ORDER BY id DESC
            LIMIT 1
            ",
        )
        .bind(namespace_id.0)
        .bind(object_type.as_str())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(row_to_revision))
    }

    /// Get all entries for one tracked object, in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_object(
        &self,
        namespace_id: NamespaceId,
        object_type: ObjectType,
        record_id: i64,
    ) -> Result<Vec<Revision>> {
        let rows = sqlx::query(
            r"
            SELECT id, namespace_id, object_type, record_id, command, created_at
            FROM revisions
            WHERE namespace_id = ? AND object_type = ? AND record_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(namespace_id.0)
        .bind(object_type.as_str())
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(row_to_revision).collect())
    }

    /// Get all entries of a namespace after the given sequence number,
    /// in sequence order. This is the delta-sync cursor query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn since(&self, namespace_id: NamespaceId, after: i64) -> Result<Vec<Revision>> {
        let rows = sqlx::query(
            r"
            SELECT id, namespace_id, object_type, record_id, command, created_at
            FROM revisions
            WHERE namespace_id = ? AND id > ?
            ORDER BY id ASC
            ",
        )
        .bind(namespace_id.0)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(row_to_revision).collect())
    }
}

/// Convert a database row to a Revision.
///
/// Rows with an unknown object type or command are skipped rather than
/// failing the whole query (they can only come from a newer schema).
fn row_to_revision(row: &SqliteRow) -> Option<Revision> {
    let object_type = ObjectType::parse(&row.get::<String, _>("object_type"))?;
    let command = RevisionCommand::parse(&row.get::<String, _>("command"))?;
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .ok()?
        .with_timezone(&Utc);

    Some(Revision {
        id: row.get("id"),
        namespace_id: NamespaceId(row.get("namespace_id")),
        object_type,
        record_id: row.get("record_id"),
        command,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MailStore;

    #[tokio::test]
    async fn test_append_is_ordered() {
        let store = MailStore::in_memory().await.unwrap();
        let ns = NamespaceId(1);

        let first = RevisionRepository::append(
            store.pool(),
            ns,
            ObjectType::Message,
            7,
            RevisionCommand::Insert,
        )
        .await
        .unwrap();
        let second = RevisionRepository::append(
            store.pool(),
            ns,
            ObjectType::Message,
            7,
            RevisionCommand::Delete,
        )
        .await
        .unwrap();
        assert!(second > first);

        let entries = store
            .revisions()
            .for_object(ns, ObjectType::Message, 7)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, RevisionCommand::Insert);
        assert_eq!(entries[1].command, RevisionCommand::Delete);

        let latest = store
            .revisions()
            .latest_for_object(ns, ObjectType::Message, 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.command, RevisionCommand::Delete);
    }

    #[tokio::test]
    async fn test_since_filters_by_namespace_and_cursor() {
        let store = MailStore::in_memory().await.unwrap();

        let cursor = RevisionRepository::append(
            store.pool(),
            NamespaceId(1),
            ObjectType::Thread,
            1,
            RevisionCommand::Insert,
        )
        .await
        .unwrap();
        RevisionRepository::append(
            store.pool(),
            NamespaceId(2),
            ObjectType::Thread,
            2,
            RevisionCommand::Insert,
        )
        .await
        .unwrap();
        RevisionRepository::append(
            store.pool(),
            NamespaceId(1),
            ObjectType::Thread,
            1,
            RevisionCommand::Update,
        )
        .await
        .unwrap();

        let delta = store.revisions().since(NamespaceId(1), cursor).await.unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].command, RevisionCommand::Update);
        assert_eq!(delta[0].record_id, 1);
    }
}
