//! # mailmirror-sync
//!
//! The sync passes that keep the local mirror in step with remote
//! deletions:
//!
//! - [`update_metadata`] applies remote flag/label state to folder
//!   associations
//! - [`remove_deleted_uids`] reconciles UIDs that disappeared from a
//!   remote folder, soft-deleting orphaned messages (drafts are
//!   destroyed immediately)
//! - [`DeleteHandler`] is the deferred garbage-collection sweep that
//!   promotes soft-deletes to hard deletes after a grace period, or
//!   reverses false positives
//!
//! Both deletion paths serialize per account through [`AccountLocks`],
//! so a sweep can never hard-delete a message the reconciler has just
//! revived.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod gc;
mod lock;
pub mod metadata;
mod purge;
pub mod reconcile;

pub use config::GcConfig;
pub use error::{Error, Result};
pub use gc::{DeleteHandler, SweepOutcome, UidAccessor};
pub use lock::AccountLocks;
pub use metadata::{update_metadata, RemoteMetadata};
pub use reconcile::{remove_deleted_uids, ReconcileOutcome};
