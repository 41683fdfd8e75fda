//! Core types for dirwave.
//!
//! This crate holds the data shared between the traversal engine and its
//! consumers: walk configuration, root path sets, entry classification, the
//! event enum and the error taxonomy.

mod config;
mod entry;
mod error;
mod event;
mod roots;

pub use config::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_DEPTH, WalkConfig,
    WalkConfigBuilder, WalkConfigBuilderError,
};
pub use entry::EntryKind;
pub use error::{WalkError, WalkStage};
pub use event::{WalkEvent, WalkSummary};
pub use roots::{WalkRoots, normalize_path};
