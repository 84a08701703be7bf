//! # concord-society
//!
//! Distributed defeasible query resolution across a society of agents.
//!
//! Each agent holds a private, possibly inconsistent rule base and trust
//! weights over its peers. A query is matched against the agent's rules by
//! similarity, answered locally when static rules settle it, and otherwise
//! resolved by delegating body terms to whichever agents can answer them.
//! Competing arguments for a term and its negation are arbitrated by
//! trust-weighted rank. Reasoning cycles across agents are cut by the
//! per-path history; delegated answers are memoized per query context.

pub mod agent;
pub mod builder;
pub mod memo;
pub mod ranking;
pub mod similarity;
pub mod stats;
pub mod system;
pub mod tracing_setup;

pub use agent::{Agent, AgentHandle, Delegated, Support};
pub use builder::SocietyBuilder;
pub use ranking::Preferences;
pub use similarity::{ExactMatch, SimilarityTable};
pub use stats::QueryStatsSnapshot;
pub use system::MultiAgentSystem;
