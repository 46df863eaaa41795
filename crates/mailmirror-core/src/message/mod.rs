//! Messages and their soft-delete lifecycle.
//!
//! A message carries a nullable `deleted_at` tombstone. Reconciliation
//! sets it when the last remote association disappears; the sweeper in
//! `mailmirror-sync` later either clears it (false positive) or purges
//! the row.

mod model;
mod repository;

pub use model::{Message, NewMessage};
pub use repository::MessageRepository;
