//! Folder data model.

use crate::{AccountId, FolderId};

/// A remote mailbox container, used as the scoping unit for UID
/// reconciliation. Never mutated by the sync passes beyond lookup.
#[derive(Debug, Clone)]
pub struct Folder {
    /// Unique identifier.
    pub id: FolderId,
    /// Account this folder belongs to.
    pub account_id: AccountId,
    /// Folder name as reported by the server.
    pub name: String,
    /// Provider-independent role name (inbox, sent, ...), if known.
    pub canonical_name: String,
}
