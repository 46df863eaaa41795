//! The transactional hard-delete cascade.
//!
//! Shared by the draft path of the reconciler and by the sweeper: one
//! transaction removes the message row, its link rows, and (when the
//! thread has no message rows left) the thread row, appending one
//! `delete` revision per destroyed object.

use mailmirror_core::revision::{ObjectType, RevisionCommand, RevisionRepository};
use mailmirror_core::{
    CategoryRepository, Error as StoreError, MailStore, Message, MessageRepository,
    ThreadRepository, UidRepository,
};
use tracing::debug;

use crate::Result;

/// What a purge attempt actually removed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Purge {
    pub message_deleted: bool,
    pub thread_deleted: bool,
}

/// Hard-delete a message, cascading to its thread when the last
/// message row goes away.
///
/// Re-validates the association count inside the transaction: a row
/// that appeared since the caller's check bars the delete and the
/// whole unit rolls back, leaving the tombstone for the caller to
/// clear. A message already removed by a concurrent path is a no-op.
pub(crate) async fn purge_message(store: &MailStore, message: &Message) -> Result<Purge> {
    let mut tx = store.pool().begin().await?;

    let live = UidRepository::count_for_message_with(&mut tx, message.id).await?;
    if live > 0 {
        debug!(
            "message {} regained {live} associations, not purging",
            message.id
        );
        tx.rollback().await?;
        return Ok(Purge::default());
    }

    let removed = MessageRepository::delete_row(&mut tx, message.id).await?;
    if removed == 0 {
        // Already purged by a concurrent path.
        tx.rollback().await?;
        return Ok(Purge::default());
    }

    CategoryRepository::delete_links_for_message(&mut tx, message.id).await?;
    RevisionRepository::append(
        &mut *tx,
        message.namespace_id,
        ObjectType::Message,
        message.id.0,
        RevisionCommand::Delete,
    )
    .await?;

    let mut thread_deleted = false;
    let remaining = ThreadRepository::message_count_with(&mut tx, message.thread_id).await?;
    if remaining == 0 {
        let rows = ThreadRepository::delete_row(&mut tx, message.thread_id).await?;
        if rows == 0 {
            // Transaction rolls back on drop.
            return Err(StoreError::Integrity(format!(
                "thread {} missing while purging its last message {}",
                message.thread_id, message.id
            ))
            .into());
        }
        RevisionRepository::append(
            &mut *tx,
            message.namespace_id,
            ObjectType::Thread,
            message.thread_id.0,
            RevisionCommand::Delete,
        )
        .await?;
        thread_deleted = true;
    }

    tx.commit().await?;
    debug!(
        "purged message {} (thread {} {})",
        message.id,
        message.thread_id,
        if thread_deleted { "deleted" } else { "kept" }
    );

    Ok(Purge {
        message_deleted: true,
        thread_deleted,
    })
}
