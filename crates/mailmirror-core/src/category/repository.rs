//! Category storage repository.

use sqlx::sqlite::SqlitePool;
use sqlx::{Row, SqliteConnection};

use super::model::Category;
use crate::{CategoryId, FolderId, MessageId, NamespaceId, Result};

/// Repository for categories and their folder-scoped message links.
///
/// A link row records that one folder's association contributed one
/// label to a message. Replacing or removing labels is always scoped to
/// a folder so that the same label seen through a second folder
/// survives the first folder's reconciliation.
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the category with the given display name, creating it if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_or_create(
        &self,
        namespace_id: NamespaceId,
        display_name: &str,
    ) -> Result<Category> {
        sqlx::query(
            r"
            INSERT INTO categories (namespace_id, display_name)
            VALUES (?, ?)
            ON CONFLICT(namespace_id, display_name) DO NOTHING
            ",
        )
        .bind(namespace_id.0)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r"
            SELECT id, namespace_id, display_name
            FROM categories
            WHERE namespace_id = ? AND display_name = ?
            ",
        )
        .bind(namespace_id.0)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Category {
            id: CategoryId(row.get("id")),
            namespace_id: NamespaceId(row.get("namespace_id")),
            display_name: row.get("display_name"),
        })
    }

    /// Replace the folder-scoped label set of a message.
    ///
    /// Existing link rows for the (message, folder) pair are dropped
    /// and one link per name in `display_names` is written, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn replace_for_folder(
        &self,
        namespace_id: NamespaceId,
        message_id: MessageId,
        folder_id: FolderId,
        display_names: &[String],
    ) -> Result<()> {
        let mut category_ids = Vec::with_capacity(display_names.len());
        for name in display_names {
            category_ids.push(self.find_or_create(namespace_id, name).await?.id);
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM message_categories WHERE message_id = ? AND folder_id = ?")
            .bind(message_id.0)
            .bind(folder_id.0)
            .execute(&mut *tx)
            .await?;

        for category_id in category_ids {
            sqlx::query(
                r"
                INSERT INTO message_categories (message_id, category_id, folder_id)
                VALUES (?, ?, ?)
                ON CONFLICT(message_id, category_id, folder_id) DO NOTHING
                ",
            )
            .bind(message_id.0)
            .bind(category_id.0)
            .bind(folder_id.0)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Drop every label link a folder contributed to a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn remove_for_folder(
        &self,
        message_id: MessageId,
        folder_id: FolderId,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM message_categories WHERE message_id = ? AND folder_id = ?",
        )
        .bind(message_id.0)
        .bind(folder_id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Drop every label link of a message within an open transaction.
    /// Used by the hard-delete cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_links_for_message(
        conn: &mut SqliteConnection,
        message_id: MessageId,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM message_categories WHERE message_id = ?")
            .bind(message_id.0)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// The distinct label names currently attached to a message, from
    /// any folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn display_names(&self, message_id: MessageId) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r"
            SELECT DISTINCT c.display_name
            FROM message_categories mc
            JOIN categories c ON c.id = mc.category_id
            WHERE mc.message_id = ?
            ORDER BY c.display_name ASC
            ",
        )
        .bind(message_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| r.get("display_name")).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::NewMessage;
    use crate::{AccountId, MailStore};

    async fn fixture(store: &MailStore) -> (MessageId, FolderId, FolderId) {
        let thread = store.threads().create(NamespaceId(1), "t").await.unwrap();
        let message = store
            .messages()
            .create(NewMessage::new(NamespaceId(1), thread.id, "m"))
            .await
            .unwrap();
        let inbox = store
            .folders()
            .find_or_create(AccountId(1), "INBOX", "inbox")
            .await
            .unwrap();
        let archive = store
            .folders()
            .find_or_create(AccountId(1), "Archive", "archive")
            .await
            .unwrap();
        (message.id, inbox.id, archive.id)
    }

    #[tokio::test]
    async fn test_replace_for_folder_is_a_full_replacement() {
        let store = MailStore::in_memory().await.unwrap();
        let (message_id, inbox, _) = fixture(&store).await;
        let repo = store.categories();

        repo.replace_for_folder(
            NamespaceId(1),
            message_id,
            inbox,
            &["work".to_string(), "urgent".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(
            repo.display_names(message_id).await.unwrap(),
            vec!["urgent".to_string(), "work".to_string()]
        );

        repo.replace_for_folder(NamespaceId(1), message_id, inbox, &["work".to_string()])
            .await
            .unwrap();
        assert_eq!(
            repo.display_names(message_id).await.unwrap(),
            vec!["work".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_for_folder_keeps_other_folders_labels() {
        let store = MailStore::in_memory().await.unwrap();
        let (message_id, inbox, archive) = fixture(&store).await;
        let repo = store.categories();

        repo.replace_for_folder(NamespaceId(1), message_id, inbox, &["shared".to_string()])
            .await
            .unwrap();
        repo.replace_for_folder(NamespaceId(1), message_id, archive, &["shared".to_string()])
            .await
            .unwrap();

        repo.remove_for_folder(message_id, inbox).await.unwrap();
        assert_eq!(
            repo.display_names(message_id).await.unwrap(),
            vec!["shared".to_string()]
        );

        repo.remove_for_folder(message_id, archive).await.unwrap();
        assert!(repo.display_names(message_id).await.unwrap().is_empty());
    }
}
