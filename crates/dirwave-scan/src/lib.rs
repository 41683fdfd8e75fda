//! Breadth-first traversal engine for dirwave.
//!
//! This crate walks one or more root directories level by level, listing
//! directories and inspecting their entries concurrently on the tokio runtime,
//! and reports everything through an event channel.
//!
//! # Overview
//!
//! - **Frontier levels**: every directory of level *d* settles before any
//!   directory of level *d + 1* is read
//! - **Bounded fan-out**: a semaphore caps open reads plus in-flight inspections
//! - **No duplicate reads**: a directory reachable from two roots is read once
//! - **Errors as events**: failures never stop the walk
//!
//! # Example
//!
//! ```rust,no_run
//! use dirwave_scan::{EntryKind, TreeWalker, WalkEvent};
//!
//! # async fn example() {
//! let walker = TreeWalker::new();
//! let mut events = walker.start(["Felidae", "Canidae"]);
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         WalkEvent::Entry { path, kind: EntryKind::File } => println!("{}", path.display()),
//!         WalkEvent::Error(err) => eprintln!("{err}"),
//!         WalkEvent::Done(summary) => println!("{} directories", summary.dirs_read),
//!         _ => {}
//!     }
//! }
//! # }
//! ```

mod classify;
mod reader;
mod visited;
mod walker;

pub use classify::{Inspection, inspect_entry};
pub use reader::list_directory;
pub use visited::VisitedSet;
pub use walker::{TreeWalker, WalkSession, start_walk};

// Re-export core types for convenience
pub use dirwave_core::{
    EntryKind, WalkConfig, WalkConfigBuilder, WalkError, WalkEvent, WalkRoots, WalkStage,
    WalkSummary,
};
