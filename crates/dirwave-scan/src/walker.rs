//! Breadth-first frontier walker.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use dirwave_core::{WalkConfig, WalkEvent, WalkRoots, WalkSummary};

use crate::classify::inspect_entry;
use crate::reader::list_directory;
use crate::visited::VisitedSet;

/// Walker that starts a fresh session per call.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    config: WalkConfig,
}

impl TreeWalker {
    /// Create a walker with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker with a custom configuration.
    pub fn with_config(config: WalkConfig) -> Self {
        Self { config }
    }

    /// The configuration each walk starts with.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Start walking `roots` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, roots: impl Into<WalkRoots>) -> mpsc::Receiver<WalkEvent> {
        start_walk(roots, self.config.clone())
    }
}

/// Start a background walk and return its event stream.
///
/// The stream ends with exactly one [`WalkEvent::Done`]. Failures never end the
/// walk early; they arrive as [`WalkEvent::Error`].
///
/// Must be called from within a tokio runtime.
pub fn start_walk(roots: impl Into<WalkRoots>, config: WalkConfig) -> mpsc::Receiver<WalkEvent> {
    let (session, rx) = WalkSession::new(roots, config);
    tokio::spawn(session.run());
    rx
}

/// State of one traversal.
///
/// [`run`](Self::run) consumes the session, so depth and visited state never
/// carry over into a second walk.
#[derive(Debug)]
pub struct WalkSession {
    roots: WalkRoots,
    max_depth: u32,
    visited: VisitedSet,
    permits: Arc<Semaphore>,
    tx: mpsc::Sender<WalkEvent>,
}

/// What one directory, or one whole level, contributed.
#[derive(Debug, Default)]
struct LevelOutcome {
    subdirs: Vec<PathBuf>,
    summary: WalkSummary,
}

impl LevelOutcome {
    fn merge(&mut self, other: LevelOutcome) {
        self.subdirs.extend(other.subdirs);
        self.summary.absorb(&other.summary);
    }
}

impl WalkSession {
    /// Create a session and the receiver for its events.
    ///
    /// The receiver must be drained while [`run`](Self::run) is polled,
    /// otherwise the walk stalls once the channel is full.
    pub fn new(
        roots: impl Into<WalkRoots>,
        config: WalkConfig,
    ) -> (Self, mpsc::Receiver<WalkEvent>) {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let session = Self {
            roots: roots.into(),
            max_depth: config.max_depth,
            visited: VisitedSet::new(),
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            tx,
        };
        (session, rx)
    }

    /// Walk every level, then emit [`WalkEvent::Done`].
    pub async fn run(self) -> WalkSummary {
        let start = Instant::now();
        let mut summary = WalkSummary::default();

        let mut frontier = self.admit(self.roots.paths().to_vec());
        if self.visited.is_empty() {
            debug!("No roots to walk");
        }

        for level in 0..=self.max_depth {
            if frontier.is_empty() {
                break;
            }

            debug!(depth = level, dirs = frontier.len(), "Reading frontier");
            let outcome = self.read_frontier(frontier, level).await;
            summary.absorb(&outcome.summary);

            if level == self.max_depth {
                if !outcome.subdirs.is_empty() {
                    debug!(
                        depth = level,
                        skipped = outcome.subdirs.len(),
                        "Depth budget exhausted"
                    );
                }
                break;
            }
            frontier = self.admit(outcome.subdirs);
        }

        summary.elapsed = start.elapsed();
        debug!(
            dirs = summary.dirs_read,
            entries = summary.entries_inspected,
            errors = summary.errors,
            claimed = self.visited.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Walk complete"
        );

        let _ = self.tx.send(WalkEvent::Done(summary.clone())).await;
        summary
    }

    /// Claim directories for the next level, dropping any already claimed.
    fn admit(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        candidates
            .into_iter()
            .filter(|dir| {
                let fresh = self.visited.claim(dir);
                if !fresh {
                    trace!(path = %dir.display(), "Skipping visited directory");
                }
                fresh
            })
            .collect()
    }

    /// Read every directory of one level and wait for all of it to settle.
    async fn read_frontier(&self, frontier: Vec<PathBuf>, level: u32) -> LevelOutcome {
        let mut reads = JoinSet::new();
        for dir in frontier {
            reads.spawn(read_directory(
                dir,
                level,
                Arc::clone(&self.permits),
                self.tx.clone(),
            ));
        }

        let mut outcome = LevelOutcome::default();
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok(dir_outcome) => outcome.merge(dir_outcome),
                Err(e) => error!(depth = level, error = %e, "Directory task failed"),
            }
        }
        outcome
    }
}

/// List one directory, then inspect all of its entries concurrently.
async fn read_directory(
    dir: PathBuf,
    level: u32,
    permits: Arc<Semaphore>,
    tx: mpsc::Sender<WalkEvent>,
) -> LevelOutcome {
    let mut outcome = LevelOutcome::default();

    // The permit covers the open directory handle only. Inspections take their
    // own permits, so a read never waits on capacity its children need.
    let listing = {
        let _permit = permits.acquire().await.ok();
        list_directory(&dir).await
    };

    let entries = match listing {
        Ok(entries) => entries,
        Err(err) => {
            debug!(error = %err, "Directory read failed");
            outcome.summary.errors += 1;
            let _ = tx.send(WalkEvent::Error(err)).await;
            return outcome;
        }
    };

    outcome.summary.dirs_read = 1;
    outcome.summary.deepest_level = level;
    trace!(path = %dir.display(), entries = entries.len(), "Listed directory");
    let _ = tx.send(WalkEvent::Directory(dir)).await;

    let mut inspections = JoinSet::new();
    for path in entries {
        let permits = Arc::clone(&permits);
        inspections.spawn(async move {
            let _permit = permits.acquire().await.ok();
            inspect_entry(path).await
        });
    }

    while let Some(joined) = inspections.join_next().await {
        let inspection = match joined {
            Ok(Ok(inspection)) => inspection,
            Ok(Err(err)) => {
                debug!(error = %err, "Inspection failed");
                outcome.summary.errors += 1;
                let _ = tx.send(WalkEvent::Error(err)).await;
                continue;
            }
            Err(e) => {
                error!(depth = level, error = %e, "Inspection task failed");
                continue;
            }
        };

        outcome.summary.entries_inspected += 1;
        if inspection.kinds.is_empty() {
            trace!(path = %inspection.path.display(), "Entry matches no known kind");
        }
        for &kind in &inspection.kinds {
            outcome.summary.entries_reported += 1;
            let _ = tx
                .send(WalkEvent::Entry {
                    path: inspection.path.clone(),
                    kind,
                })
                .await;
        }
        if inspection.is_dir() {
            outcome.subdirs.push(inspection.path);
        }
    }

    outcome
}
