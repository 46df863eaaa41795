//! # mailmirror-core
//!
//! Durable store and domain models for the `MailMirror` sync engine.
//!
//! This crate provides:
//! - The `SQLite`-backed mirror store (messages, threads, folders,
//!   UID associations, categories)
//! - Per-domain repositories over a shared connection pool
//! - The append-only revision log consumed by delta-sync clients
//!
//! The sync passes that drive deletion reconciliation live in
//! `mailmirror-sync`; this crate only owns the data and its invariants.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod category;
mod error;
pub mod folder;
mod ids;
pub mod message;
pub mod revision;
mod store;
pub mod thread;
pub mod uid;

pub use category::{Category, CategoryRepository};
pub use error::{Error, Result};
pub use folder::{Folder, FolderRepository};
pub use ids::{AccountId, CategoryId, FolderId, MessageId, NamespaceId, ThreadId, Uid};
pub use message::{Message, MessageRepository, NewMessage};
pub use revision::{ObjectType, Revision, RevisionCommand, RevisionRepository};
pub use store::MailStore;
pub use thread::{Thread, ThreadRepository};
pub use uid::{NewUidAssociation, UidAssociation, UidRepository};
