//! Agents and the query protocol.
//!
//! [`Agent`] owns a rule base, trust weights, and a memo cache.
//! [`AgentHandle`] pairs an agent with its society and runs the protocol:
//! matching, local answers, support finding, delegation, arbitration.

mod delegation;
mod local;
mod query;

pub use delegation::Delegated;
pub use query::Support;

use concord_core::models::{AgentId, ArgTree, Rule};

use crate::memo::MemoCache;
use crate::ranking::{self, Preferences, Verdict};
use crate::system::MultiAgentSystem;

/// One member of a society.
#[derive(Debug)]
pub struct Agent {
    id: AgentId,
    rules: Vec<Rule>,
    preferences: Preferences,
    memo: MemoCache,
}

impl Agent {
    pub fn new(id: AgentId, rules: Vec<Rule>, preferences: Preferences) -> Self {
        Self {
            id,
            rules,
            preferences,
            memo: MemoCache::new(),
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn memo(&self) -> &MemoCache {
        &self.memo
    }
}

/// An agent bound to the society it queries through.
#[derive(Debug, Clone, Copy)]
pub struct AgentHandle<'a> {
    system: &'a MultiAgentSystem,
    agent: &'a Agent,
}

impl<'a> AgentHandle<'a> {
    pub(crate) fn new(system: &'a MultiAgentSystem, agent: &'a Agent) -> Self {
        Self { system, agent }
    }

    pub fn id(&self) -> &'a AgentId {
        &self.agent.id
    }

    pub fn agent(&self) -> &'a Agent {
        self.agent
    }

    pub fn system(&self) -> &'a MultiAgentSystem {
        self.system
    }

    /// Preference-weighted, similarity-discounted rank of `tree` from this
    /// agent's point of view.
    pub fn calculate_arg_tree_rank(&self, tree: &ArgTree) -> f64 {
        ranking::arg_tree_rank(tree, &self.agent.id, &self.agent.preferences)
    }

    /// Whichever tree this agent ranks higher, ties resolved in favor of `a`.
    pub fn stronger<'t>(&self, a: &'t ArgTree, b: &'t ArgTree) -> &'t ArgTree {
        ranking::stronger(a, b, &self.agent.id, &self.agent.preferences)
    }

    /// True when `challenger` strictly outranks `incumbent`.
    pub(crate) fn prefers_challenger(&self, incumbent: &ArgTree, challenger: &ArgTree) -> bool {
        ranking::compare(incumbent, challenger, &self.agent.id, &self.agent.preferences)
            == Verdict::Challenger
    }
}
