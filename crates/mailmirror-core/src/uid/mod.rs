//! Remote UID associations.
//!
//! An association row means "this message is currently visible at this
//! UID in this folder". Its presence is what keeps a message alive;
//! reconciliation deletes it when the remote UID disappears.

mod model;
mod repository;

pub use model::{NewUidAssociation, UidAssociation};
pub use repository::UidRepository;
