//! Append-only revision log.
//!
//! Every observable lifecycle event on a tracked object produces one
//! immutable entry; downstream delta-sync clients replay the log in
//! sequence order to compute their own deltas.

mod model;
mod repository;

pub use model::{ObjectType, Revision, RevisionCommand};
pub use repository::RevisionRepository;
