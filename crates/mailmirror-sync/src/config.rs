//! Sync pass configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Grace period before a soft-deleted message becomes eligible for
/// hard deletion.
const DEFAULT_MESSAGE_TTL_SECS: u64 = 120;

/// Configuration for the deletion sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcConfig {
    /// Grace period in seconds. Zero means a soft-deleted message is
    /// eligible as soon as any time at all has passed since its
    /// tombstone.
    pub message_ttl_secs: u64,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            message_ttl_secs: DEFAULT_MESSAGE_TTL_SECS,
        }
    }
}

impl GcConfig {
    /// The grace period as a duration.
    #[must_use]
    pub fn message_ttl(&self) -> Duration {
        Duration::seconds(i64::try_from(self.message_ttl_secs).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GcConfig::default();
        assert_eq!(config.message_ttl(), Duration::seconds(120));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GcConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GcConfig::default());

        let config: GcConfig = serde_json::from_str(r#"{"message_ttl_secs": 0}"#).unwrap();
        assert_eq!(config.message_ttl(), Duration::zero());
    }
}
