//! Terms: literals attributed to the agent expected to define them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use super::agent_id::AgentId;
use super::literal::Literal;
use crate::constants::UNBOUND_DISPLAY;

/// The agent authoritative for a term, or the "any agent" placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "agent", rename_all = "snake_case")]
pub enum Definer {
    Bound(AgentId),
    Unbound,
}

impl Definer {
    pub fn agent(&self) -> Option<&AgentId> {
        match self {
            Definer::Bound(id) => Some(id),
            Definer::Unbound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Definer::Bound(_))
    }

    /// True only for a bound definer naming `id`.
    pub fn is(&self, id: &AgentId) -> bool {
        self.agent() == Some(id)
    }
}

impl fmt::Display for Definer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definer::Bound(id) => write!(f, "{id}"),
            Definer::Unbound => f.write_str(UNBOUND_DISPLAY),
        }
    }
}

/// A literal paired with its definer. Equal iff definer and literal are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub definer: Definer,
    pub literal: Literal,
}

impl Term {
    pub fn new(definer: Definer, literal: Literal) -> Self {
        Self { definer, literal }
    }

    pub fn bound(agent: impl Into<AgentId>, literal: Literal) -> Self {
        Self::new(Definer::Bound(agent.into()), literal)
    }

    /// A term matched against any agent's vocabulary at resolution time.
    pub fn pattern(literal: Literal) -> Self {
        Self::new(Definer::Unbound, literal)
    }

    pub fn is_pattern(&self) -> bool {
        !self.definer.is_bound()
    }

    /// Same definer, negated literal.
    pub fn negated(&self) -> Self {
        Self {
            definer: self.definer.clone(),
            literal: self.literal.negated(),
        }
    }

    /// Same literal, rewritten as defined by `agent`.
    pub fn localized(&self, agent: &AgentId) -> Self {
        Self::bound(agent.clone(), self.literal.clone())
    }

    /// Whether some history entry was instantiated from this pattern's literal.
    /// Bound terms never match this way.
    pub fn has_instantiated_term_in(&self, hist: &[InstantiatedTerm]) -> bool {
        if self.definer.is_bound() {
            return false;
        }
        hist.iter().any(|t| t.original_literal == self.literal)
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term {
            definer: self.definer,
            literal: -self.literal,
        }
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Term {
        self.negated()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.definer, self.literal)
    }
}

/// A term produced by matching a queried literal against a rule head.
///
/// `term` carries the rule's definer and literal, `original_literal` the
/// literal that was asked for, and `sim_degree` how well the two match
/// (`1.0` for exact matches).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantiatedTerm {
    pub term: Term,
    pub original_literal: Literal,
    pub sim_degree: f64,
}

impl InstantiatedTerm {
    pub fn new(term: Term, original_literal: Literal, sim_degree: f64) -> Self {
        Self {
            term,
            original_literal,
            sim_degree,
        }
    }

    pub fn definer(&self) -> &Definer {
        &self.term.definer
    }

    pub fn literal(&self) -> &Literal {
        &self.term.literal
    }

    /// Negates both the matched and the original literal; similarity is kept.
    pub fn negated(&self) -> Self {
        Self {
            term: self.term.negated(),
            original_literal: self.original_literal.negated(),
            sim_degree: self.sim_degree,
        }
    }
}

impl PartialEq for InstantiatedTerm {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
            && self.original_literal == other.original_literal
            && self.sim_degree.to_bits() == other.sim_degree.to_bits()
    }
}

impl Eq for InstantiatedTerm {}

impl Hash for InstantiatedTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
        self.original_literal.hash(state);
        self.sim_degree.to_bits().hash(state);
    }
}

impl fmt::Display for InstantiatedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (from {}, sim {:.2})",
            self.term, self.original_literal, self.sim_degree
        )
    }
}
