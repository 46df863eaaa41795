//! Thread data model.

use crate::{NamespaceId, ThreadId};

/// A conversation grouping one or more messages.
#[derive(Debug, Clone)]
pub struct Thread {
    /// Unique identifier.
    pub id: ThreadId,
    /// Namespace this thread belongs to.
    pub namespace_id: NamespaceId,
    /// Subject of the conversation.
    pub subject: String,
}
