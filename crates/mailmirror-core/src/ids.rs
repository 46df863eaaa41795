//! Identifier newtypes shared across the store.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a synced account.
    AccountId
);
id_type!(
    /// Unique identifier for a namespace (the unit of data ownership).
    NamespaceId
);
id_type!(
    /// Unique identifier for a thread.
    ThreadId
);
id_type!(
    /// Unique identifier for a message.
    MessageId
);
id_type!(
    /// Unique identifier for a remote folder.
    FolderId
);
id_type!(
    /// Unique identifier for a category (label).
    CategoryId
);

/// A remote, folder-scoped message identifier assigned by the mail server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid(pub u32);

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
