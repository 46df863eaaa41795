//! Deferred garbage collection of soft-deleted messages.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mailmirror_core::{
    AccountId, MailStore, Message, MessageId, NamespaceId, UidAssociation, UidRepository,
};
use tracing::{debug, warn};

use crate::config::GcConfig;
use crate::lock::AccountLocks;
use crate::purge::{purge_message, Purge};
use crate::Result;

/// Capability to fetch the current live associations of a message.
///
/// The sweeper never hard-codes the lookup; tests substitute their own
/// accessor to drive the state machine.
pub trait UidAccessor {
    /// Fetch the live associations of a message.
    fn live_associations(
        &self,
        message_id: MessageId,
    ) -> impl Future<Output = mailmirror_core::Result<Vec<UidAssociation>>> + Send;
}

impl UidAccessor for UidRepository {
    fn live_associations(
        &self,
        message_id: MessageId,
    ) -> impl Future<Output = mailmirror_core::Result<Vec<UidAssociation>>> + Send {
        self.live_for_message(message_id)
    }
}

/// Counters describing what one sweep pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// False-positive tombstones cleared.
    pub unmarked: usize,
    /// Messages hard-deleted.
    pub deleted: usize,
    /// Threads hard-deleted alongside their last message.
    pub threads_deleted: usize,
    /// Tombstoned messages left for a later sweep.
    pub pending: usize,
    /// Messages whose evaluation failed and was skipped over.
    pub failed: usize,
}

/// What one sweep iteration decided for one message.
enum SweepAction {
    Unmarked,
    Deleted(Purge),
    Pending,
}

/// The deletion sweeper.
///
/// A sweep re-validates every soft-deleted message of the namespace
/// against its current associations: messages that regained one are
/// un-marked; orphans whose grace period has elapsed are purged along
/// with their newly-empty threads, one transaction per message.
pub struct DeleteHandler<A: UidAccessor> {
    store: MailStore,
    account_id: AccountId,
    namespace_id: NamespaceId,
    accessor: A,
    message_ttl: Duration,
    locks: Arc<AccountLocks>,
}

impl<A: UidAccessor> DeleteHandler<A> {
    /// Create a sweeper for one account's namespace.
    #[must_use]
    pub fn new(
        store: MailStore,
        account_id: AccountId,
        namespace_id: NamespaceId,
        accessor: A,
        message_ttl: Duration,
        locks: Arc<AccountLocks>,
    ) -> Self {
        Self {
            store,
            account_id,
            namespace_id,
            accessor,
            message_ttl,
            locks,
        }
    }

    /// Create a sweeper with the grace period taken from configuration.
    #[must_use]
    pub fn from_config(
        store: MailStore,
        account_id: AccountId,
        namespace_id: NamespaceId,
        accessor: A,
        config: &GcConfig,
        locks: Arc<AccountLocks>,
    ) -> Self {
        Self::new(
            store,
            account_id,
            namespace_id,
            accessor,
            config.message_ttl(),
            locks,
        )
    }

    /// Run one sweep pass.
    ///
    /// `now` is caller-supplied so sweeps are deterministic and
    /// testable. A message becomes eligible only once strictly more
    /// than the TTL has elapsed past its tombstone; with a zero TTL, a
    /// sweep at exactly the tombstone instant does nothing.
    ///
    /// Failures on one message are logged and counted without
    /// aborting the pass; each message is its own unit of work, so an
    /// interrupted pass leaves a valid state and can simply re-run.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the sweep candidates fails.
    pub async fn check(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let _guard = self.locks.acquire(self.account_id).await;

        let candidates = self.store.messages().soft_deleted(self.namespace_id).await?;
        let mut outcome = SweepOutcome::default();

        for message in candidates {
            match self.check_one(&message, now).await {
                Ok(SweepAction::Unmarked) => outcome.unmarked += 1,
                Ok(SweepAction::Deleted(purge)) => {
                    outcome.deleted += 1;
                    if purge.thread_deleted {
                        outcome.threads_deleted += 1;
                    }
                }
                Ok(SweepAction::Pending) => outcome.pending += 1,
                Err(e) => {
                    warn!("sweep of message {} failed: {e}", message.id);
                    outcome.failed += 1;
                }
            }
        }

        debug!(
            "swept namespace {} (account {}): {} unmarked, {} deleted, {} pending, {} failed",
            self.namespace_id,
            self.account_id,
            outcome.unmarked,
            outcome.deleted,
            outcome.pending,
            outcome.failed
        );

        Ok(outcome)
    }

    async fn check_one(&self, message: &Message, now: DateTime<Utc>) -> Result<SweepAction> {
        let associations = self.accessor.live_associations(message.id).await?;
        if !associations.is_empty() {
            // False positive: the message came back (new mail raced the
            // reconciler). Clearing a tombstone a concurrent purge
            // already removed is a no-op, never a resurrection.
            self.store.messages().unmark_deleted(message.id).await?;
            return Ok(SweepAction::Unmarked);
        }

        let Some(deleted_at) = message.deleted_at else {
            return Ok(SweepAction::Pending);
        };

        let elapsed = now.signed_duration_since(deleted_at);
        if elapsed <= Duration::zero() || elapsed < self.message_ttl {
            return Ok(SweepAction::Pending);
        }

        let purge = purge_message(&self.store, message).await?;
        if purge.message_deleted {
            return Ok(SweepAction::Deleted(purge));
        }

        // The in-transaction re-check found live rows the accessor
        // missed; treat it like any other false positive.
        self.store.messages().unmark_deleted(message.id).await?;
        Ok(SweepAction::Unmarked)
    }
}
