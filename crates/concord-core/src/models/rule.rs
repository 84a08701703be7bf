use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::agent_id::AgentId;
use super::term::Term;

/// How a rule participates in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Defeasible: may be delegated, attacked, and arbitrated.
    #[default]
    Defeasible,
    /// Fact-style: decided only by local lookup over other static rules.
    Static,
}

/// `head <- body[0], body[1], ...`
///
/// Equality and hashing are structural over `(kind, head, body)`; the id is a label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub head: Term,
    pub body: Vec<Term>,
}

impl Rule {
    pub fn new(id: impl Into<String>, head: Term, body: Vec<Term>) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Defeasible,
            head,
            body,
        }
    }

    pub fn new_static(id: impl Into<String>, head: Term, body: Vec<Term>) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Static,
            head,
            body,
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind == RuleKind::Static
    }

    /// Adopt the rule as if `agent` asserted it: every term is redefined by
    /// `agent` and the id becomes `<id>_<agent>`.
    pub fn localized(&self, agent: &AgentId) -> Self {
        Self {
            id: format!("{}_{}", self.id, agent),
            kind: self.kind,
            head: self.head.localized(agent),
            body: self.body.iter().map(|t| t.localized(agent)).collect(),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.head == other.head && self.body == other.body
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.head.hash(state);
        self.body.hash(state);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.kind {
            RuleKind::Defeasible => "<=",
            RuleKind::Static => "<-",
        };
        write!(f, "{}: {} {}", self.id, self.head, arrow)?;
        for (i, term) in self.body.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{term}")?;
        }
        Ok(())
    }
}
