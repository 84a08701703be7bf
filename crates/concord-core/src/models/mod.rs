//! Shared data model: literals, terms, rules, argument trees, contexts, answers.

pub mod agent_id;
pub mod answer;
pub mod argument;
pub mod context;
pub mod literal;
pub mod rule;
pub mod society_spec;
pub mod term;

pub use agent_id::AgentId;
pub use answer::{Answer, TruthValue};
pub use argument::{ArgTree, SummarizedArgument};
pub use context::{ContextId, QueryContext};
pub use literal::Literal;
pub use rule::{Rule, RuleKind};
pub use society_spec::{AgentSpec, RuleSpec, SimilarityEntry, SocietySpec, TermSpec};
pub use term::{Definer, InstantiatedTerm, Term};
