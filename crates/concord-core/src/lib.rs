//! # concord-core
//!
//! Foundation crate for the Concord agent society.
//! Defines the term/rule/argument data model, traits, errors, config, and
//! constants. The query engine in `concord-society` depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ConcordConfig;
pub use errors::{ConcordError, ConcordResult};
pub use models::{
    AgentId, Answer, ArgTree, ContextId, Definer, InstantiatedTerm, Literal, QueryContext, Rule,
    RuleKind, SummarizedArgument, Term, TruthValue,
};
pub use traits::SimilarityComparator;
