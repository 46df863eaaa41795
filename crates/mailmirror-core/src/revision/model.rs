//! Revision log data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NamespaceId;

/// The kind of object a revision entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    /// A message.
    Message,
    /// A thread.
    Thread,
}

impl ObjectType {
    /// Parse from database string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(Self::Message),
            "thread" => Some(Self::Thread),
            _ => None,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Thread => "thread",
        }
    }
}

/// The lifecycle event a revision entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionCommand {
    /// The object was created.
    Insert,
    /// The object was modified.
    Update,
    /// The object was destroyed.
    Delete,
}

impl RevisionCommand {
    /// Parse from database string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One immutable entry in the revision log.
///
/// `id` is the strictly increasing sequence number; within one
/// namespace it gives consumers a total order over lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Sequence number (assigned by the store on append).
    pub id: i64,
    /// Namespace the tracked object belongs to.
    pub namespace_id: NamespaceId,
    /// Kind of the tracked object.
    pub object_type: ObjectType,
    /// Identifier of the tracked object.
    pub record_id: i64,
    /// Lifecycle event recorded by this entry.
    pub command: RevisionCommand,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}
