//! The SQLite-backed mirror store.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::category::CategoryRepository;
use crate::folder::FolderRepository;
use crate::message::MessageRepository;
use crate::revision::RevisionRepository;
use crate::thread::ThreadRepository;
use crate::uid::UidRepository;
use crate::Result;

/// The durable store holding the local mirror of remote mailboxes.
///
/// Owns the connection pool and the schema; per-domain access goes
/// through the repository accessors, which share the pool. Multi-row
/// atomic units (hard deletes plus their revision entries) run inside
/// transactions started from [`MailStore::pool`].
#[derive(Clone)]
pub struct MailStore {
    pool: SqlitePool,
}

impl MailStore {
    /// Open (or create) the store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema
    /// creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema
    /// creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS threads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace_id INTEGER NOT NULL,
                subject TEXT NOT NULL DEFAULT ''
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace_id INTEGER NOT NULL,
                thread_id INTEGER NOT NULL,
                subject TEXT NOT NULL DEFAULT '',
                is_draft INTEGER NOT NULL DEFAULT 0,
                is_read INTEGER NOT NULL DEFAULT 0,
                is_starred INTEGER NOT NULL DEFAULT 0,
                deleted_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS folders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                canonical_name TEXT NOT NULL DEFAULT '',
                UNIQUE(account_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS imap_uids (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                folder_id INTEGER NOT NULL,
                msg_uid INTEGER NOT NULL,
                UNIQUE(folder_id, msg_uid)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace_id INTEGER NOT NULL,
                display_name TEXT NOT NULL,
                UNIQUE(namespace_id, display_name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Link rows carry the folder that contributed the label so a
        // single association's labels can be dropped without touching
        // the same label seen through another folder.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS message_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                folder_id INTEGER NOT NULL,
                UNIQUE(message_id, category_id, folder_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Append-only: the AUTOINCREMENT id doubles as the monotonic
        // sequence number consumers order by.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS revisions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace_id INTEGER NOT NULL,
                object_type TEXT NOT NULL,
                record_id INTEGER NOT NULL,
                command TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_messages_deleted
            ON messages(namespace_id, deleted_at) WHERE deleted_at IS NOT NULL
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_uids_message
            ON imap_uids(message_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_revisions_object
            ON revisions(namespace_id, object_type, record_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The underlying connection pool, for callers that need to run
    /// several repository operations in one transaction.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Message repository over this store.
    #[must_use]
    pub fn messages(&self) -> MessageRepository {
        MessageRepository::new(self.pool.clone())
    }

    /// Thread repository over this store.
    #[must_use]
    pub fn threads(&self) -> ThreadRepository {
        ThreadRepository::new(self.pool.clone())
    }

    /// Folder repository over this store.
    #[must_use]
    pub fn folders(&self) -> FolderRepository {
        FolderRepository::new(self.pool.clone())
    }

    /// UID association repository over this store.
    #[must_use]
    pub fn uids(&self) -> UidRepository {
        UidRepository::new(self.pool.clone())
    }

    /// Category repository over this store.
    #[must_use]
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Revision log repository over this store.
    #[must_use]
    pub fn revisions(&self) -> RevisionRepository {
        RevisionRepository::new(self.pool.clone())
    }
}
