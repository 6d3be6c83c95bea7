use crate::playlist_proc::types::TrackOutcome;
use async_lock::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Append-only outcome log shared by concurrently running track downloads.
#[derive(Clone, Default)]
pub(crate) struct OutcomeCollector {
    outcomes: Arc<Mutex<Vec<(usize, TrackOutcome)>>>,
}

impl OutcomeCollector {
    pub(crate) async fn push(&self, position: usize, outcome: TrackOutcome) {
        self.outcomes.lock().await.push((position, outcome));
    }

    /// Drains collected outcomes in playlist order.
    pub(crate) async fn take_ordered(&self) -> Vec<TrackOutcome> {
        let mut outcomes = std::mem::take(&mut *self.outcomes.lock().await);
        outcomes.sort_by_key(|(position, _)| *position);

        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

/// Target files already taken by a track of the current run.
#[derive(Clone, Default)]
pub(crate) struct ClaimedPaths {
    paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl ClaimedPaths {
    /// Returns `false` when another track already claimed `path`.
    pub(crate) async fn claim(&self, path: &Path) -> bool {
        self.paths.lock().await.insert(path.to_path_buf())
    }
}
