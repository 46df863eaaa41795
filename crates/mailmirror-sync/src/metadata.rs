//! Applying remote flag/label state to local folder associations.

use std::collections::HashMap;

use mailmirror_core::{AccountId, FolderId, MailStore, Uid};
use tracing::debug;

use crate::Result;

/// The remote state of one UID: IMAP flags plus provider labels.
#[derive(Debug, Clone, Default)]
pub struct RemoteMetadata {
    /// IMAP system flags (`\Seen`, `\Flagged`, ...).
    pub flags: Vec<String>,
    /// Provider label names for the message.
    pub labels: Vec<String>,
}

impl RemoteMetadata {
    /// Create metadata from flag and label lists.
    #[must_use]
    pub fn new(flags: Vec<String>, labels: Vec<String>) -> Self {
        Self { flags, labels }
    }

    /// Whether the remote copy carries `\Seen`.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.flags.iter().any(|f| f == "\\Seen")
    }

    /// Whether the remote copy carries `\Flagged`.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.flags.iter().any(|f| f == "\\Flagged")
    }
}

/// Apply current remote flag/label state for a folder's UIDs.
///
/// For each UID with a live association, the message's folder-scoped
/// category set is replaced with the remote label set and the
/// read/starred flags are refreshed. UIDs without a live association
/// are skipped. Label changes are visible immediately; this never
/// touches the soft-delete tombstone.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn update_metadata(
    store: &MailStore,
    account_id: AccountId,
    folder_id: FolderId,
    metadata: &HashMap<Uid, RemoteMetadata>,
) -> Result<()> {
    let uids = store.uids();
    let messages = store.messages();
    let categories = store.categories();

    for (&uid, remote) in metadata {
        let Some(association) = uids.find(folder_id, uid).await? else {
            debug!("no association for uid {uid} in folder {folder_id} (account {account_id})");
            continue;
        };

        let Some(message) = messages.get(association.message_id).await? else {
            continue;
        };

        categories
            .replace_for_folder(
                message.namespace_id,
                message.id,
                folder_id,
                &remote.labels,
            )
            .await?;
        messages
            .set_flags(message.id, remote.is_seen(), remote.is_flagged())
            .await?;
    }

    Ok(())
}
