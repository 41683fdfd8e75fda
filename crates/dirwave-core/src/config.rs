//! Walk configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize};

/// Default number of directory levels expanded below the roots.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default cap on concurrently open directory reads plus in-flight inspections.
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;

/// Default bound of the event channel handed to the consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Configuration for a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Deepest level whose directories are read. Roots are level 0.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    #[serde(
        default = "default_max_depth",
        deserialize_with = "deserialize_max_depth"
    )]
    pub max_depth: u32,

    /// Maximum number of filesystem operations outstanding at once.
    #[builder(default = "DEFAULT_MAX_CONCURRENCY")]
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Capacity of the event channel.
    #[builder(default = "DEFAULT_CHANNEL_CAPACITY")]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

/// Negative depths in a config file fall back to the default instead of
/// failing the parse.
fn deserialize_max_depth<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(WalkConfig::resolve_max_depth(raw))
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == Some(0) {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.channel_capacity == Some(0) {
            return Err("channel_capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a config with every field at its default.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the concurrency cap. Zero is clamped to one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Resolve a depth taken from an untyped source.
    ///
    /// Unset or negative values fall back to [`DEFAULT_MAX_DEPTH`]; values
    /// beyond `u32::MAX` saturate.
    pub fn resolve_max_depth(raw: Option<i64>) -> u32 {
        match raw {
            Some(depth) if depth >= 0 => u32::try_from(depth).unwrap_or(u32::MAX),
            _ => DEFAULT_MAX_DEPTH,
        }
    }

    /// Check the invariants the builder enforces on a config assembled by hand
    /// or deserialized from a file.
    pub fn validated(self) -> Result<Self, WalkConfigBuilderError> {
        WalkConfigBuilder::default()
            .max_depth(self.max_depth)
            .max_concurrency(self.max_concurrency)
            .channel_capacity(self.channel_capacity)
            .build()
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new()
    }
}
