//! UID reconciliation: turning "this UID is gone from the remote
//! folder" into local state changes.

use chrono::Utc;
use mailmirror_core::{AccountId, FolderId, MailStore, Uid};
use tracing::{debug, warn};

use crate::lock::AccountLocks;
use crate::purge::purge_message;
use crate::Result;

/// Counters describing what one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Association rows removed.
    pub removed: usize,
    /// Messages that lost their last association and were tombstoned.
    pub soft_deleted: usize,
    /// Draft messages destroyed synchronously.
    pub hard_deleted: usize,
    /// UIDs with no association left (already reconciled earlier).
    pub skipped: usize,
    /// UIDs whose processing failed and was skipped over.
    pub failed: usize,
}

/// Process the UIDs confirmed absent from a remote folder.
///
/// For each UID: drop the folder's label links, delete the
/// association, then classify the owning message by its remaining
/// association count: still visible elsewhere (nothing to do),
/// orphaned draft (destroy now, revisions included), or orphaned
/// non-draft (tombstone for the sweeper). Absent UIDs with no
/// association are skipped, so re-running after a partial failure is
/// safe. An empty list is a no-op.
///
/// Failures on one UID are logged and counted without aborting the
/// rest of the batch.
///
/// # Errors
///
/// Returns an error if the account lock or the store fails at the
/// batch level.
pub async fn remove_deleted_uids(
    store: &MailStore,
    locks: &AccountLocks,
    account_id: AccountId,
    folder_id: FolderId,
    absent_uids: &[Uid],
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();
    if absent_uids.is_empty() {
        return Ok(outcome);
    }

    let _guard = locks.acquire(account_id).await;

    for &uid in absent_uids {
        match remove_one(store, folder_id, uid, &mut outcome).await {
            Ok(()) => {}
            Err(e) => {
                warn!("reconciliation of uid {uid} in folder {folder_id} failed: {e}");
                outcome.failed += 1;
            }
        }
    }

    debug!(
        "reconciled folder {folder_id} (account {account_id}): {} removed, {} soft-deleted, {} hard-deleted, {} skipped, {} failed",
        outcome.removed, outcome.soft_deleted, outcome.hard_deleted, outcome.skipped, outcome.failed
    );

    Ok(outcome)
}

async fn remove_one(
    store: &MailStore,
    folder_id: FolderId,
    uid: Uid,
    outcome: &mut ReconcileOutcome,
) -> Result<()> {
    let uids = store.uids();

    let Some(association) = uids.find(folder_id, uid).await? else {
        outcome.skipped += 1;
        return Ok(());
    };

    // Stale labels must not survive the association they came from.
    store
        .categories()
        .remove_for_folder(association.message_id, folder_id)
        .await?;

    if uids.delete(association.id).await? {
        outcome.removed += 1;
    }

    let remaining = uids.count_for_message(association.message_id).await?;
    if remaining > 0 {
        // Still visible through another folder.
        return Ok(());
    }

    let Some(message) = store.messages().get(association.message_id).await? else {
        outcome.skipped += 1;
        return Ok(());
    };

    if message.is_draft {
        // Drafts have no grace period: gone remotely means gone.
        let purge = purge_message(store, &message).await?;
        if purge.message_deleted {
            outcome.hard_deleted += 1;
        }
    } else if store.messages().mark_deleted(message.id, Utc::now()).await? {
        outcome.soft_deleted += 1;
    }

    Ok(())
}
