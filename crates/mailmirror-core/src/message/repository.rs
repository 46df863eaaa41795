//! Message storage repository.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, SqliteConnection};
use tracing::debug;

use super::model::{Message, NewMessage};
use crate::revision::{ObjectType, RevisionCommand, RevisionRepository};
use crate::{MessageId, NamespaceId, Result, ThreadId};

/// Repository for message storage and retrieval.
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a message and record its `insert` revision in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn create(&self, new: NewMessage) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO messages (namespace_id, thread_id, subject, is_draft)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(new.namespace_id.0)
        .bind(new.thread_id.0)
        .bind(&new.subject)
        .bind(new.is_draft)
        .execute(&mut *tx)
        .await?;
        let id = MessageId::new(result.last_insert_rowid());

        RevisionRepository::append(
            &mut *tx,
            new.namespace_id,
            ObjectType::Message,
            id.0,
            RevisionCommand::Insert,
        )
        .await?;

        tx.commit().await?;

        Ok(Message {
            id,
            namespace_id: new.namespace_id,
            thread_id: new.thread_id,
            subject: new.subject,
            is_draft: new.is_draft,
            is_read: false,
            is_starred: false,
            deleted_at: None,
        })
    }

    /// Get a message by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: MessageId) -> Result<Option<Message>> {
        let row = sqlx::query(
            r"
            SELECT id, namespace_id, thread_id, subject, is_draft, is_read, is_starred, deleted_at
            FROM messages
            WHERE id = ?
            ",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_message))
    }

    /// Set the soft-delete tombstone on a live message.
    ///
    /// Returns false if the message is already marked or already gone,
    /// both of which are fine to ignore (reconciliation re-runs).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn mark_deleted(&self, id: MessageId, when: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE messages SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(when.to_rfc3339())
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        let marked = result.rows_affected() > 0;
        if marked {
            debug!("marked message {id} deleted at {when}");
        }
        Ok(marked)
    }

    /// Clear the soft-delete tombstone.
    ///
    /// A no-op when the message was already purged by a concurrent
    /// sweep; un-marking never resurrects a deleted row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn unmark_deleted(&self, id: MessageId) -> Result<bool> {
        let result = sqlx::query("UPDATE messages SET deleted_at = NULL WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        let unmarked = result.rows_affected() > 0;
        if unmarked {
            debug!("cleared tombstone on message {id}");
        }
        Ok(unmarked)
    }

    /// Get all soft-deleted messages of a namespace, oldest tombstone
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn soft_deleted(&self, namespace_id: NamespaceId) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            r"
            SELECT id, namespace_id, thread_id, subject, is_draft, is_read, is_starred, deleted_at
            FROM messages
            WHERE namespace_id = ? AND deleted_at IS NOT NULL
            ORDER BY deleted_at ASC
            ",
        )
        .bind(namespace_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_message).collect())
    }

    /// Update the remote-derived flags of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_flags(&self, id: MessageId, is_read: bool, is_starred: bool) -> Result<()> {
        sqlx::query("UPDATE messages SET is_read = ?, is_starred = ? WHERE id = ?")
            .bind(is_read)
            .bind(is_starred)
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Destroy a message row within an open transaction.
    ///
    /// Returns the number of rows removed; zero means the message was
    /// already gone (a stale reference, not an error). Callers must
    /// have verified the message has no live associations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_row(conn: &mut SqliteConnection, id: MessageId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id.0)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Convert a database row to a Message.
fn row_to_message(row: &SqliteRow) -> Message {
    let deleted_at = row
        .get::<Option<String>, _>("deleted_at")
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Message {
        id: MessageId(row.get("id")),
        namespace_id: NamespaceId(row.get("namespace_id")),
        thread_id: ThreadId(row.get("thread_id")),
        subject: row.get("subject"),
        is_draft: row.get("is_draft"),
        is_read: row.get("is_read"),
        is_starred: row.get("is_starred"),
        deleted_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MailStore;

    async fn fixture(store: &MailStore) -> Message {
        let thread = store
            .threads()
            .create(NamespaceId(1), "subject")
            .await
            .unwrap();
        store
            .messages()
            .create(NewMessage::new(NamespaceId(1), thread.id, "subject"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_writes_insert_revision() {
        let store = MailStore::in_memory().await.unwrap();
        let message = fixture(&store).await;

        let latest = store
            .revisions()
            .latest_for_object(NamespaceId(1), ObjectType::Message, message.id.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.command, RevisionCommand::Insert);
    }

    #[tokio::test]
    async fn test_mark_deleted_only_marks_live_messages() {
        let store = MailStore::in_memory().await.unwrap();
        let message = fixture(&store).await;
        let repo = store.messages();

        assert!(repo.mark_deleted(message.id, Utc::now()).await.unwrap());
        // Second mark is a no-op: the original tombstone timestamp wins.
        assert!(!repo.mark_deleted(message.id, Utc::now()).await.unwrap());

        let marked = repo.get(message.id).await.unwrap().unwrap();
        assert!(marked.is_marked_deleted());

        assert!(repo.unmark_deleted(message.id).await.unwrap());
        let live = repo.get(message.id).await.unwrap().unwrap();
        assert!(live.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_soft_deleted_lists_tombstoned_only() {
        let store = MailStore::in_memory().await.unwrap();
        let kept = fixture(&store).await;
        let marked = fixture(&store).await;

        store
            .messages()
            .mark_deleted(marked.id, Utc::now())
            .await
            .unwrap();

        let listed = store.messages().soft_deleted(NamespaceId(1)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, marked.id);
        assert_ne!(listed[0].id, kept.id);
    }
}
