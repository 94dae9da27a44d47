//! Engine configuration.
//!
//! Read from environment variables once the binary has loaded `.env` files.
//! Every setting has a default, so an empty environment is valid.

use serde::{Deserialize, Serialize};

/// Nested dispatch levels allowed before a cascade is cut off.
pub const DEFAULT_MAX_DISPATCH_DEPTH: u32 = 32;
/// Log filter used when neither `MYTHCRAFT_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "mythcraft_engine=info";

pub const MAX_DISPATCH_DEPTH_VAR: &str = "MYTHCRAFT_MAX_DISPATCH_DEPTH";
pub const LOG_FILTER_VAR: &str = "MYTHCRAFT_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Last-resort guard against runaway cascades. Rules never write
    /// non-silently to their own triggers, so real cascades stay shallow.
    #[serde(default = "default_max_dispatch_depth")]
    pub max_dispatch_depth: u32,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_max_dispatch_depth() -> u32 {
    DEFAULT_MAX_DISPATCH_DEPTH
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: default_max_dispatch_depth(),
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Unparsable or zero depths
    /// fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_dispatch_depth = match lookup(MAX_DISPATCH_DEPTH_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    tracing::warn!(
                        var = MAX_DISPATCH_DEPTH_VAR,
                        value = %raw,
                        default = DEFAULT_MAX_DISPATCH_DEPTH,
                        "Invalid dispatch depth, using default"
                    );
                    DEFAULT_MAX_DISPATCH_DEPTH
                }
            },
            None => DEFAULT_MAX_DISPATCH_DEPTH,
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_log_filter);

        Self {
            max_dispatch_depth,
            log_filter,
        }
    }

    pub fn with_max_dispatch_depth(mut self, depth: u32) -> Self {
        self.max_dispatch_depth = depth.max(1);
        self
    }
}
