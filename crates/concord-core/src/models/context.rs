use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::agent_id::AgentId;
use super::rule::Rule;
use super::term::Term;

/// Session-scoped identifier of a top-level query (`q0`, `q1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub String);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One top-level query: what was asked, by whom, and the focus knowledge
/// visible only inside it. Immutable once opened; compared by id alone.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub id: ContextId,
    pub term: Term,
    pub agent: AgentId,
    pub focus_knowledge: Vec<Rule>,
}

impl QueryContext {
    pub fn new(id: ContextId, term: Term, agent: AgentId, focus_knowledge: Vec<Rule>) -> Self {
        Self {
            id,
            term,
            agent,
            focus_knowledge,
        }
    }
}

impl PartialEq for QueryContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QueryContext {}

impl Hash for QueryContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
