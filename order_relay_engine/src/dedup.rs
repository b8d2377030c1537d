use std::time::Duration;

use chrono::{DateTime, Utc};
use log::*;
use sha2::{Digest, Sha256};

use crate::db_types::DedupState;

pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(900);

/// Lowercase hex SHA-256 of the message text.
pub fn content_fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupDecision {
    pub send: bool,
    /// The state to persist: refreshed when sending, the stored state otherwise.
    pub state: DedupState,
}

/// Suppresses a notification when the same text was already sent for the same record within the window.
#[derive(Debug, Clone, Copy)]
pub struct DedupGate {
    window: Duration,
}

impl Default for DedupGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW)
    }
}

impl DedupGate {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn should_send(
        &self,
        record_id: &str,
        new_text: &str,
        stored: Option<&DedupState>,
        now: DateTime<Utc>,
    ) -> DedupDecision {
        let new_hash = content_fingerprint(new_text);
        let fresh = DedupState { content_hash: new_hash.clone(), last_sent_at: now };
        let Some(stored) = stored else {
            trace!("🔁️ No previous notification for {record_id}");
            return DedupDecision { send: true, state: fresh };
        };
        if stored.content_hash != new_hash {
            debug!("🔁️ Message for {record_id} changed since the last notification. Resending.");
            return DedupDecision { send: true, state: fresh };
        }
        let elapsed = now.signed_duration_since(stored.last_sent_at);
        let within_window = elapsed.to_std().map(|e| e < self.window).unwrap_or(true);
        if within_window {
            info!(
                "🔁️ Identical message for {record_id} was sent {}s ago. Suppressing the notification.",
                elapsed.num_seconds()
            );
            DedupDecision { send: false, state: stored.clone() }
        } else {
            debug!("🔁️ Dedup window for {record_id} has expired. Resending.");
            DedupDecision { send: true, state: fresh }
        }
    }
}
