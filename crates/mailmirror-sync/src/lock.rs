//! Per-account serialization of deletion-related mutations.

use std::collections::HashMap;
use std::sync::Arc;

use mailmirror_core::AccountId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-account locks.
///
/// The reconciler and the deletion sweeper both hold an account's
/// guard for the duration of a pass, so the un-mark and hard-delete
/// paths for any one message are mutually exclusive. Different
/// accounts lock independently and may run concurrently.
#[derive(Debug, Default)]
pub struct AccountLocks {
    inner: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one account, waiting if another pass for
    /// the same account is running.
    pub async fn acquire(&self, account_id: AccountId) -> OwnedMutexGuard<()> {
        let handle = {
            let mut registry = self.inner.lock().await;
            Arc::clone(
                registry
                    .entry(account_id)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        handle.lock_owned().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_account_is_exclusive() {
        let locks = AccountLocks::new();

        let guard = locks.acquire(AccountId(1)).await;
        // A second acquire on the same account must block until the
        // first guard is dropped.
        let pending = {
            let second = locks.acquire(AccountId(1));
            tokio::time::timeout(std::time::Duration::from_millis(20), second).await
        };
        assert!(pending.is_err());

        drop(guard);
        locks.acquire(AccountId(1)).await;
    }

    #[tokio::test]
    async fn test_accounts_lock_independently() {
        let locks = AccountLocks::new();

        let _one = locks.acquire(AccountId(1)).await;
        // Holding account 1 must not block account 2.
        locks.acquire(AccountId(2)).await;
    }
}
