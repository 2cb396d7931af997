//! Offline/online and sync bookkeeping for one tab.
//!
//! State changes only through the explicit reducer methods below; nothing is
//! garbage-collected automatically except `recent_syncs`, which keeps the
//! last five entries.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

const RECENT_SYNCS_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
}

/// One completed sync, kept for the status UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRecord {
    pub label: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SyncState {
    pub is_online: bool,
    pub pending_sync_count: usize,
    pub sync_in_progress: bool,
    pub last_sync_timestamp: Option<DateTime<Utc>>,
    pub connection_status: ConnectionStatus,
    pub reconnect_attempt: u32,
    recent_syncs: VecDeque<SyncRecord>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_online: true,
            pending_sync_count: 0,
            sync_in_progress: false,
            last_sync_timestamp: None,
            connection_status: ConnectionStatus::Connecting,
            reconnect_attempt: 0,
            recent_syncs: VecDeque::with_capacity(RECENT_SYNCS_CAPACITY),
        }
    }
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a browser connectivity transition. Returns `true` on the
    /// offline-to-online edge: the caller must reopen the event stream and
    /// refetch, because events missed while offline are never replayed.
    pub fn set_online(&mut self, is_online: bool) -> bool {
        let needs_reconnect = is_online && !self.is_online;
        self.is_online = is_online;

        if !is_online {
            self.connection_status = ConnectionStatus::Disconnected;
        } else if needs_reconnect {
            self.connection_status = ConnectionStatus::Reconnecting;
        }

        needs_reconnect
    }

    pub fn connection_opened(&mut self) {
        self.connection_status = ConnectionStatus::Connected;
        self.reconnect_attempt = 0;
    }

    pub fn connection_lost(&mut self) {
        self.connection_status = ConnectionStatus::Reconnecting;
        self.reconnect_attempt = self.reconnect_attempt.saturating_add(1);
    }

    /// A mutation was issued while offline (or is otherwise awaiting
    /// confirmation).
    pub fn enqueue_pending(&mut self) {
        self.pending_sync_count += 1;
    }

    pub fn resolve_pending(&mut self) {
        self.pending_sync_count = self.pending_sync_count.saturating_sub(1);
    }

    pub fn begin_sync(&mut self) {
        self.sync_in_progress = true;
    }

    /// Marks a sync as finished and records it, evicting the oldest entry
    /// beyond the last five.
    pub fn finish_sync(&mut self, label: &str) {
        let now = Utc::now();
        self.sync_in_progress = false;
        self.last_sync_timestamp = Some(now);

        if self.recent_syncs.len() == RECENT_SYNCS_CAPACITY {
            self.recent_syncs.pop_front();
        }
        self.recent_syncs.push_back(SyncRecord {
            label: label.to_owned(),
            at: now,
        });
    }

    pub fn recent_syncs(&self) -> impl Iterator<Item = &SyncRecord> {
        self.recent_syncs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_offline_to_online_edge_requests_a_reconnect() {
        let mut state = SyncState::new();

        // Already online: no edge.
        assert!(!state.set_online(true));

        assert!(!state.set_online(false));
        assert_eq!(state.connection_status, ConnectionStatus::Disconnected);

        assert!(state.set_online(true));
        assert_eq!(state.connection_status, ConnectionStatus::Reconnecting);
    }

    #[test]
    fn reconnect_attempts_reset_once_connected() {
        let mut state = SyncState::new();

        state.connection_lost();
        state.connection_lost();
        assert_eq!(state.reconnect_attempt, 2);

        state.connection_opened();
        assert_eq!(state.reconnect_attempt, 0);
        assert_eq!(state.connection_status, ConnectionStatus::Connected);
    }

    #[test]
    fn pending_counts_never_underflow() {
        let mut state = SyncState::new();

        state.resolve_pending();
        assert_eq!(state.pending_sync_count, 0);

        state.enqueue_pending();
        state.enqueue_pending();
        state.resolve_pending();
        assert_eq!(state.pending_sync_count, 1);
    }

    #[test]
    fn recent_syncs_keep_only_the_last_five() {
        let mut state = SyncState::new();

        for i in 0..7 {
            state.begin_sync();
            state.finish_sync(&format!("sync-{i}"));
        }

        let labels: Vec<&str> = state.recent_syncs().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["sync-2", "sync-3", "sync-4", "sync-5", "sync-6"]);
        assert!(!state.sync_in_progress);
        assert!(state.last_sync_timestamp.is_some());
    }
}
