//! Thread storage repository.

use sqlx::sqlite::SqlitePool;
use sqlx::{Row, SqliteConnection};

use super::model::Thread;
use crate::revision::{ObjectType, RevisionCommand, RevisionRepository};
use crate::{NamespaceId, Result, ThreadId};

/// Repository for thread storage and retrieval.
pub struct ThreadRepository {
    pool: SqlitePool,
}

impl ThreadRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a thread and record its `insert` revision in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn create(
        &self,
        namespace_id: NamespaceId,
        subject: impl Into<String> + Send,
    ) -> Result<Thread> {
        let subject = subject.into();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO threads (namespace_id, subject) VALUES (?, ?)")
            .bind(namespace_id.0)
            .bind(&subject)
            .execute(&mut *tx)
            .await?;
        let id = ThreadId::new(result.last_insert_rowid());

        RevisionRepository::append(
            &mut *tx,
            namespace_id,
            ObjectType::Thread,
            id.0,
            RevisionCommand::Insert,
        )
        .await?;

        tx.commit().await?;

        Ok(Thread {
            id,
            namespace_id,
            subject,
        })
    }

    /// Get a thread by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: ThreadId) -> Result<Option<Thread>> {
        let row = sqlx::query("SELECT id, namespace_id, subject FROM threads WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Thread {
            id: ThreadId(r.get("id")),
            namespace_id: NamespaceId(r.get("namespace_id")),
            subject: r.get("subject"),
        }))
    }

    /// Count the message rows still attached to a thread.
    ///
    /// Soft-deleted messages still count: their rows exist until the
    /// sweeper purges them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn message_count(&self, id: ThreadId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM messages WHERE thread_id = ?")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Count message rows on a thread within an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn message_count_with(conn: &mut SqliteConnection, id: ThreadId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM messages WHERE thread_id = ?")
            .bind(id.0)
            .fetch_one(conn)
            .await?;

        Ok(row.get("count"))
    }

    /// Destroy a thread row within an open transaction.
    ///
    /// Returns the number of rows removed; zero means the thread was
    /// already gone (a stale reference, not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_row(conn: &mut SqliteConnection, id: ThreadId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(id.0)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
