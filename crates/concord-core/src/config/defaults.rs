// Single source of truth for all default values.

// --- Reasoning ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 1.0;
pub const DEFAULT_PREFERENCE: f64 = 0.0;
pub const DEFAULT_MEMOIZATION: bool = true;
pub const DEFAULT_PARALLEL_DELEGATION: bool = false;
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 256;
pub const DEFAULT_CONTEXT_ID_PREFIX: &str = "q";
pub const DEFAULT_PLACEHOLDER_DEFINER: &str = "X";
pub const DEFAULT_RELEASE_MEMO_ON_COMPLETION: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
