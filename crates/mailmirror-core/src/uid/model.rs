//! UID association data models.

use crate::{AccountId, FolderId, MessageId, Uid};

/// The link between a local message and a (folder, UID) pair on the
/// remote server.
#[derive(Debug, Clone)]
pub struct UidAssociation {
    /// Row identifier.
    pub id: i64,
    /// Account the folder belongs to.
    pub account_id: AccountId,
    /// The local message this association points at.
    pub message_id: MessageId,
    /// Folder the UID lives in.
    pub folder_id: FolderId,
    /// Remote UID.
    pub uid: Uid,
}

/// Fields needed to create a UID association.
#[derive(Debug, Clone, Copy)]
pub struct NewUidAssociation {
    /// Account the folder belongs to.
    pub account_id: AccountId,
    /// The local message this association points at.
    pub message_id: MessageId,
    /// Folder the UID lives in.
    pub folder_id: FolderId,
    /// Remote UID.
    pub uid: Uid,
}
