//! Folder storage repository.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use super::model::Folder;
use crate::{AccountId, FolderId, Result};

/// Repository for folder storage and retrieval.
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the folder with the given name, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_or_create(
        &self,
        account_id: AccountId,
        name: &str,
        canonical_name: &str,
    ) -> Result<Folder> {
        sqlx::query(
            r"
            INSERT INTO folders (account_id, name, canonical_name)
            VALUES (?, ?, ?)
            ON CONFLICT(account_id, name) DO NOTHING
            ",
        )
        .bind(account_id.0)
        .bind(name)
        .bind(canonical_name)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r"
            SELECT id, account_id, name, canonical_name
            FROM folders
            WHERE account_id = ? AND name = ?
            ",
        )
        .bind(account_id.0)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Folder {
            id: FolderId(row.get("id")),
            account_id: AccountId(row.get("account_id")),
            name: row.get("name"),
            canonical_name: row.get("canonical_name"),
        })
    }

    /// Get a folder by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: FolderId) -> Result<Option<Folder>> {
        let row = sqlx::query(
            "SELECT id, account_id, name, canonical_name FROM folders WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Folder {
            id: FolderId(r.get("id")),
            account_id: AccountId(r.get("account_id")),
            name: r.get("name"),
            canonical_name: r.get("canonical_name"),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MailStore;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = MailStore::in_memory().await.unwrap();
        let repo = store.folders();

        let first = repo
            .find_or_create(AccountId(1), "INBOX", "inbox")
            .await
            .unwrap();
        let second = repo
            .find_or_create(AccountId(1), "INBOX", "inbox")
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        let other_account = repo
            .find_or_create(AccountId(2), "INBOX", "inbox")
            .await
            .unwrap();
        assert_ne!(first.id, other_account.id);
    }
}
