//! Configuration for query resolution.
//!
//! # Examples
//!
//! ```
//! use concord_core::config::ReasoningConfig;
//!
//! let config = ReasoningConfig::default();
//! assert!(config.memoization);
//! assert_eq!(config.context_id_prefix, "q");
//! ```

use serde::{Deserialize, Serialize};

use super::defaults;

/// Query resolution settings shared by every agent of a society.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Minimum similarity for a rule head to match a queried literal. Default: 1.0 (exact).
    pub similarity_threshold: f64,
    /// Trust assumed for agents absent from a preference map. Default: 0.0.
    pub default_preference: f64,
    /// Reuse delegated answers within a query context. Default: true.
    pub memoization: bool,
    /// Evaluate the candidates of one body term concurrently. Default: false.
    pub parallel_delegation: bool,
    /// Bound on static-rule recursion and delegation history length. Default: 256.
    pub max_recursion_depth: usize,
    /// Prefix of sequential query context ids. Default: "q".
    pub context_id_prefix: String,
    /// Definer token that marks an unbound ("any agent") term. Default: "X".
    pub placeholder_definer: String,
    /// Drop a context's memo entries once its top-level answer is returned. Default: true.
    pub release_memo_on_completion: bool,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            default_preference: defaults::DEFAULT_PREFERENCE,
            memoization: defaults::DEFAULT_MEMOIZATION,
            parallel_delegation: defaults::DEFAULT_PARALLEL_DELEGATION,
            max_recursion_depth: defaults::DEFAULT_MAX_RECURSION_DEPTH,
            context_id_prefix: defaults::DEFAULT_CONTEXT_ID_PREFIX.to_string(),
            placeholder_definer: defaults::DEFAULT_PLACEHOLDER_DEFINER.to_string(),
            release_memo_on_completion: defaults::DEFAULT_RELEASE_MEMO_ON_COMPLETION,
        }
    }
}
