//! UID association storage repository.

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, SqliteConnection};

use super::model::{NewUidAssociation, UidAssociation};
use crate::{AccountId, FolderId, MessageId, Result, Uid};

/// Repository for UID association storage and retrieval.
pub struct UidRepository {
    pool: SqlitePool,
}

impl UidRepository {
    pub(crate) const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record that a message is visible at a (folder, UID) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails, including when the
    /// (folder, UID) pair is already taken.
    pub async fn add(&self, new: NewUidAssociation) -> Result<UidAssociation> {
        let result = sqlx::query(
            r"
            INSERT INTO imap_uids (account_id, message_id, folder_id, msg_uid)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(new.account_id.0)
        .bind(new.message_id.0)
        .bind(new.folder_id.0)
        .bind(new.uid.0)
        .execute(&self.pool)
        .await?;

        Ok(UidAssociation {
            id: result.last_insert_rowid(),
            account_id: new.account_id,
            message_id: new.message_id,
            folder_id: new.folder_id,
            uid: new.uid,
        })
    }

    /// Look up the association at a (folder, UID) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, folder_id: FolderId, uid: Uid) -> Result<Option<UidAssociation>> {
        let row = sqlx::query(
            r"
            SELECT id, account_id, message_id, folder_id, msg_uid
            FROM imap_uids
            WHERE folder_id = ? AND msg_uid = ?
            ",
        )
        .bind(folder_id.0)
        .bind(uid.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_association))
    }

    /// Get all live associations of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn live_for_message(&self, message_id: MessageId) -> Result<Vec<UidAssociation>> {
        let rows = sqlx::query(
            r"
            SELECT id, account_id, message_id, folder_id, msg_uid
            FROM imap_uids
            WHERE message_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(message_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_association).collect())
    }

    /// Count the live associations of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_message(&self, message_id: MessageId) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM imap_uids WHERE message_id = ?")
            .bind(message_id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Count the live associations of a message within an open
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_message_with(
        conn: &mut SqliteConnection,
        message_id: MessageId,
    ) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM imap_uids WHERE message_id = ?")
            .bind(message_id.0)
            .fetch_one(conn)
            .await?;

        Ok(row.get("count"))
    }

    /// Delete an association row by its row identifier.
    ///
    /// Returns false if the row was already gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM imap_uids WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a UidAssociation.
fn row_to_association(row: &SqliteRow) -> UidAssociation {
    UidAssociation {
        id: row.get("id"),
        account_id: AccountId(row.get("account_id")),
        message_id: MessageId(row.get("message_id")),
        folder_id: FolderId(row.get("folder_id")),
        uid: Uid(row.get("msg_uid")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::NewMessage;
    use crate::{MailStore, NamespaceId};

    async fn message_fixture(store: &MailStore) -> MessageId {
        let thread = store.threads().create(NamespaceId(1), "t").await.unwrap();
        store
            .messages()
            .create(NewMessage::new(NamespaceId(1), thread.id, "m"))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_find_delete() {
        let store = MailStore::in_memory().await.unwrap();
        let message_id = message_fixture(&store).await;
        let folder = store
            .folders()
            .find_or_create(AccountId(1), "INBOX", "inbox")
            .await
            .unwrap();
        let repo = store.uids();

        let assoc = repo
            .add(NewUidAssociation {
                account_id: AccountId(1),
                message_id,
                folder_id: folder.id,
                uid: Uid(22),
            })
            .await
            .unwrap();

        let found = repo.find(folder.id, Uid(22)).await.unwrap().unwrap();
        assert_eq!(found.id, assoc.id);
        assert_eq!(found.message_id, message_id);
        assert_eq!(repo.count_for_message(message_id).await.unwrap(), 1);

        assert!(repo.delete(assoc.id).await.unwrap());
        assert!(!repo.delete(assoc.id).await.unwrap());
        assert!(repo.find(folder.id, Uid(22)).await.unwrap().is_none());
        assert_eq!(repo.count_for_message(message_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_live_for_message_spans_folders() {
        let store = MailStore::in_memory().await.unwrap();
        let message_id = message_fixture(&store).await;
        let folders = store.folders();
        let inbox = folders
            .find_or_create(AccountId(1), "INBOX", "inbox")
            .await
            .unwrap();
        let sent = folders
            .find_or_create(AccountId(1), "Sent", "sent")
            .await
            .unwrap();
        let repo = store.uids();

        for (folder_id, uid) in [(inbox.id, Uid(1337)), (sent.id, Uid(2222))] {
            repo.add(NewUidAssociation {
                account_id: AccountId(1),
                message_id,
                folder_id,
                uid,
            })
            .await
            .unwrap();
        }

        let live = repo.live_for_message(message_id).await.unwrap();
        assert_eq!(live.len(), 2);
    }
}
