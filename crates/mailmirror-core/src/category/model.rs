//! Category data model.

use crate::{CategoryId, NamespaceId};

/// A label associated with messages, unique per namespace by display
/// name.
#[derive(Debug, Clone)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Namespace this category belongs to.
    pub namespace_id: NamespaceId,
    /// Label text as shown to the user.
    pub display_name: String,
}
