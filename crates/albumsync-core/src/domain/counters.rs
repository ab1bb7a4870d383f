//! Run-scoped counters
//!
//! A [`SyncCounters`] value is created when a run starts, owned by the
//! engine for the duration of the run and turned into an immutable
//! [`SyncSummary`] once the walk is over.

use std::time::{Duration, Instant};

/// Mutable tally of what a run did so far
#[derive(Debug, Clone)]
pub struct SyncCounters {
    pub folders_skipped: u32,
    pub albums_created: u32,
    pub albums_updated: u32,
    pub albums_deleted: u32,
    pub files_uploaded: u32,
    pub files_removed: u32,
    pub files_skipped: u32,
    pub errors: u32,
    started: Instant,
}

impl SyncCounters {
    /// All counters at zero, clock started now
    #[must_use]
    pub fn start() -> Self {
        Self {
            folders_skipped: 0,
            albums_created: 0,
            albums_updated: 0,
            albums_deleted: 0,
            files_uploaded: 0,
            files_removed: 0,
            files_skipped: 0,
            errors: 0,
            started: Instant::now(),
        }
    }

    /// Time elapsed since the run started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Freezes the counters into a summary
    #[must_use]
    pub fn finish(&self) -> SyncSummary {
        SyncSummary {
            folders_skipped: self.folders_skipped,
            albums_created: self.albums_created,
            albums_updated: self.albums_updated,
            albums_deleted: self.albums_deleted,
            files_uploaded: self.files_uploaded,
            files_removed: self.files_removed,
            files_skipped: self.files_skipped,
            errors: self.errors,
            elapsed: self.elapsed(),
        }
    }
}

impl Default for SyncCounters {
    fn default() -> Self {
        Self::start()
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub folders_skipped: u32,
    pub albums_created: u32,
    pub albums_updated: u32,
    pub albums_deleted: u32,
    pub files_uploaded: u32,
    pub files_removed: u32,
    pub files_skipped: u32,
    pub errors: u32,
    pub elapsed: Duration,
}

impl SyncSummary {
    /// True when the run changed nothing remotely and hit no errors
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.albums_created == 0
            && self.albums_updated == 0
            && self.albums_deleted == 0
            && self.files_uploaded == 0
            && self.files_removed == 0
            && self.errors == 0
    }
}
