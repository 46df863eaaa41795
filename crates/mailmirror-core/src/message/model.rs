//! Message data models.

use chrono::{DateTime, Utc};

use crate::{MessageId, NamespaceId, ThreadId};

/// A logical mail object mirrored from the remote server.
#[derive(Debug, Clone)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Namespace this message belongs to.
    pub namespace_id: NamespaceId,
    /// Thread this message belongs to.
    pub thread_id: ThreadId,
    /// Subject line.
    pub subject: String,
    /// Whether this message is a draft.
    ///
    /// Drafts skip the soft-delete grace period: losing their last
    /// association destroys them immediately.
    pub is_draft: bool,
    /// Whether the message has been read (`\Seen`).
    pub is_read: bool,
    /// Whether the message is starred (`\Flagged`).
    pub is_starred: bool,
    /// Soft-delete tombstone. Non-null exactly while the message has
    /// no live associations and awaits the sweeper's verdict.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Returns true if the message carries a soft-delete tombstone.
    #[must_use]
    pub const fn is_marked_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields needed to create a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Namespace the message belongs to.
    pub namespace_id: NamespaceId,
    /// Thread the message belongs to.
    pub thread_id: ThreadId,
    /// Subject line.
    pub subject: String,
    /// Whether the message is a draft.
    pub is_draft: bool,
}

impl NewMessage {
    /// Creates a new non-draft message description.
    #[must_use]
    pub fn new(
        namespace_id: NamespaceId,
        thread_id: ThreadId,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            namespace_id,
            thread_id,
            subject: subject.into(),
            is_draft: false,
        }
    }
}
