//! Roster Synchronizer — keeps an in-memory mirror of all users and folders
//! current on a fixed cadence, independent of operator interaction.
//!
//! Refresh semantics: the user-list and folder-list fetches run concurrently,
//! but the mirrored state is only swapped in together after both resolve, so a
//! reader never observes users referencing folders from a stale or future
//! folder snapshot. On any fetch failure the prior state is retained
//! unchanged; the next tick tries again.
//!
//! Overlap policy: a `refresh()` triggered while another is in flight is
//! dropped, and the skip is reported to the caller. The in-flight refresh
//! still completes and later ticks run normally, so a dropped trigger can
//! never freeze the displayed roster.

pub mod filter;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::directory::{DirectoryApi, DirectoryError};
use crate::models::folder::FolderRecord;
use crate::models::user::{CallStatus, UserRecord};
use crate::selection::Selection;

/// What a `refresh()` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both lists were fetched and swapped in.
    Completed,
    /// Another refresh was already in flight; this trigger was dropped.
    Skipped,
}

/// A point-in-time copy of the mirrored state, handed to the presentation
/// layer. Cheap to re-request; never kept across commands.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    pub users: Vec<UserRecord>,
    pub folders: Vec<FolderRecord>,
    pub selection: Selection,
    pub last_sync: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    folders: Vec<FolderRecord>,
    selection: Selection,
    last_sync: Option<DateTime<Utc>>,
}

pub struct RosterService {
    directory: Arc<dyn DirectoryApi>,
    state: RwLock<Inner>,
    /// In-flight gate: `try_lock` failure means a refresh is already running.
    refresh_gate: Mutex<()>,
}

impl RosterService {
    pub fn new(directory: Arc<dyn DirectoryApi>) -> Arc<Self> {
        Arc::new(Self {
            directory,
            state: RwLock::new(Inner::default()),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Fetches both lists and atomically replaces the mirror (last write wins
    /// wholesale, no partial merge). Purges the selection of ids the service
    /// no longer knows.
    pub async fn refresh(&self) -> Result<RefreshOutcome, DirectoryError> {
        let Ok(_gate) = self.refresh_gate.try_lock() else {
            debug!("refresh already in flight; dropping trigger");
            return Ok(RefreshOutcome::Skipped);
        };

        let (users, folders) =
            tokio::join!(self.directory.list_users(), self.directory.list_folders());
        let (users, folders) = (users?, folders?);

        let mut state = self.state.write().await;
        let known: HashSet<String> = users.iter().map(|u| u.user_id.clone()).collect();
        state.users = users;
        state.folders = folders;
        state.selection.retain_known(&known);
        state.last_sync = Some(Utc::now());
        debug!(
            users = state.users.len(),
            folders = state.folders.len(),
            selected = state.selection.len(),
            "roster refreshed"
        );
        Ok(RefreshOutcome::Completed)
    }

    pub async fn snapshot(&self) -> RosterSnapshot {
        let state = self.state.read().await;
        RosterSnapshot {
            users: state.users.clone(),
            folders: state.folders.clone(),
            selection: state.selection.clone(),
            last_sync: state.last_sync,
        }
    }

    pub async fn toggle(&self, id: &str) {
        self.state.write().await.selection.toggle(id);
    }

    pub async fn select_all(&self, ids: Vec<String>) {
        self.state.write().await.selection.select_all(ids);
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    pub async fn selected_ids(&self) -> Vec<String> {
        self.state.read().await.selection.ids()
    }

    pub async fn is_selected(&self, id: &str) -> bool {
        self.state.read().await.selection.contains(id)
    }

    /// Optimistic write after a dispatched call: the affected users show as
    /// `pending` with a cleared transcript until the next refresh replaces the
    /// records wholesale with server truth. Never merged field-by-field.
    pub async fn mark_dispatched(&self, ids: &[String]) {
        let mut state = self.state.write().await;
        for user in state
            .users
            .iter_mut()
            .filter(|u| ids.iter().any(|id| id == &u.user_id))
        {
            user.call_status = CallStatus::Pending;
            user.transcription.clear();
        }
    }
}

/// Owned handle to the periodic refresh task.
///
/// Dropping the poller aborts the task, so no refresh callback can mutate
/// state after the owning view is torn down.
pub struct RosterPoller {
    handle: JoinHandle<()>,
}

impl RosterPoller {
    pub fn start(roster: Arc<RosterService>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the eager startup refresh
            // already happened, so skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match roster.refresh().await {
                    Ok(RefreshOutcome::Completed) => {}
                    Ok(RefreshOutcome::Skipped) => {
                        debug!("poll tick skipped; refresh still in flight")
                    }
                    Err(e) => {
                        warn!(error = %e, "periodic refresh failed; keeping previous roster")
                    }
                }
            }
        });
        Self { handle }
    }
}

impl Drop for RosterPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::{folder, user, StubDirectory};
    use crate::roster::filter::{filter_users, FolderFilter};
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn refresh_mirrors_users_and_folders() {
        let stub = StubDirectory::with_users(vec![user("a", Some("f1"))]);
        stub.set_folders(vec![folder("f1", "Backend")]);
        let roster = RosterService::new(stub);

        let outcome = roster.refresh().await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed);

        let snapshot = roster.snapshot().await;
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.folders.len(), 1);
        assert!(snapshot.last_sync.is_some());
    }

    #[tokio::test]
    async fn failed_refresh_retains_prior_state_unchanged() {
        let stub = StubDirectory::with_users(vec![user("a", None), user("b", None)]);
        let roster = RosterService::new(stub.clone());
        roster.refresh().await.unwrap();
        let before = roster.snapshot().await;

        stub.set_users(vec![user("c", None)]);
        stub.fail_folders.store(true, Ordering::SeqCst);
        assert!(roster.refresh().await.is_err());

        let after = roster.snapshot().await;
        assert_eq!(after.users, before.users);
        assert_eq!(after.folders, before.folders);
        assert_eq!(after.last_sync, before.last_sync);
    }

    #[tokio::test]
    async fn refresh_purges_selection_of_deleted_users() {
        let stub = StubDirectory::with_users(vec![user("a", None), user("b", None)]);
        let roster = RosterService::new(stub.clone());
        roster.refresh().await.unwrap();
        roster.toggle("a").await;
        roster.toggle("b").await;

        stub.set_users(vec![user("b", None)]);
        roster.refresh().await.unwrap();

        let snapshot = roster.snapshot().await;
        assert!(!snapshot.selection.contains("a"));
        assert!(snapshot.selection.contains("b"));
        for id in roster.selected_ids().await {
            assert!(snapshot.users.iter().any(|u| u.user_id == id));
        }
    }

    #[tokio::test]
    async fn selection_survives_folder_filter_switches() {
        let stub = StubDirectory::with_users(vec![user("a", Some("f1")), user("b", Some("f2"))]);
        stub.set_folders(vec![folder("f1", "One"), folder("f2", "Two")]);
        let roster = RosterService::new(stub);
        roster.refresh().await.unwrap();

        // Operator filters to folder 1 and checks A.
        let snapshot = roster.snapshot().await;
        let view = filter_users(&snapshot.users, &FolderFilter::Folder("f1".into()));
        assert_eq!(view.len(), 1);
        roster.toggle("a").await;

        // Switching to folder 2 hides A but must not deselect it.
        let snapshot = roster.snapshot().await;
        let view = filter_users(&snapshot.users, &FolderFilter::Folder("f2".into()));
        assert!(view.iter().all(|u| u.user_id != "a"));
        assert!(roster.is_selected("a").await);
    }

    #[tokio::test]
    async fn overlapping_refresh_trigger_is_dropped() {
        let stub = StubDirectory::with_users(vec![user("a", None)]);
        let gate = Arc::new(Notify::new());
        *stub.hold_users.lock().unwrap() = Some(gate.clone());
        let roster = RosterService::new(stub.clone());

        let in_flight = {
            let roster = roster.clone();
            tokio::spawn(async move { roster.refresh().await })
        };
        // Let the spawned refresh reach the parked fetch.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(roster.refresh().await.unwrap(), RefreshOutcome::Skipped);

        gate.notify_one();
        assert_eq!(in_flight.await.unwrap().unwrap(), RefreshOutcome::Completed);
        // Only the first refresh hit the service.
        assert_eq!(stub.list_user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn optimistic_pending_write_is_superseded_by_next_refresh() {
        let stub = StubDirectory::with_users(vec![user("a", None)]);
        let roster = RosterService::new(stub.clone());
        roster.refresh().await.unwrap();

        roster.mark_dispatched(&["a".to_string()]).await;
        let snapshot = roster.snapshot().await;
        assert_eq!(snapshot.users[0].call_status, CallStatus::Pending);

        // Server truth (still not-called in the stub) wins wholesale.
        roster.refresh().await.unwrap();
        let snapshot = roster.snapshot().await;
        assert_eq!(snapshot.users[0].call_status, CallStatus::NotCalled);
    }
}
