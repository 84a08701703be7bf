//! Society construction: agents, tuple rule bases, trust weights, and the
//! similarity comparator, validated and frozen into a [`MultiAgentSystem`].
//!
//! # Examples
//!
//! ```
//! use concord_core::models::{AgentId, Literal, Term, TruthValue};
//! use concord_society::builder::{rule_spec, SocietyBuilder};
//!
//! let system = SocietyBuilder::new()
//!     .agent("A")
//!     .agent("B")
//!     .rule("A", rule_spec("r1", ("A", "p"), &[("X", "q")]))
//!     .rule("B", rule_spec("r2", ("B", "q"), &[]))
//!     .preference("A", "B", 0.7)
//!     .build()
//!     .unwrap();
//!
//! let answer = system
//!     .initialize_query(&AgentId::from("A"), Term::bound("A", Literal::positive("p")), vec![])
//!     .unwrap();
//! assert_eq!(answer.truth_value, TruthValue::True);
//! ```

mod resolver;
mod validation;

pub use resolver::TermResolver;
pub use validation::check_static_acyclic;

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use concord_core::config::ReasoningConfig;
use concord_core::errors::{ConcordResult, SocietyError};
use concord_core::models::{AgentId, RuleKind, RuleSpec, SocietySpec, TermSpec};
use concord_core::traits::SimilarityComparator;

use crate::agent::Agent;
use crate::ranking::Preferences;
use crate::similarity::{ExactMatch, SimilarityTable};
use crate::system::MultiAgentSystem;

/// `(id, (definer, literal), [(definer, literal), ...])` as a [`RuleSpec`].
pub fn rule_spec(id: &str, head: (&str, &str), body: &[(&str, &str)]) -> RuleSpec {
    RuleSpec::new(
        id,
        TermSpec::new(head.0, head.1),
        body.iter().map(|(d, l)| TermSpec::new(*d, *l)).collect(),
    )
}

/// Collects a society description; every check runs in [`SocietyBuilder::build`].
pub struct SocietyBuilder {
    config: ReasoningConfig,
    comparator: Option<Box<dyn SimilarityComparator>>,
    agents: Vec<AgentId>,
    rules: Vec<(AgentId, RuleKind, RuleSpec)>,
    preferences: Vec<(AgentId, AgentId, f64)>,
}

impl Default for SocietyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SocietyBuilder {
    pub fn new() -> Self {
        Self {
            config: ReasoningConfig::default(),
            comparator: None,
            agents: Vec::new(),
            rules: Vec::new(),
            preferences: Vec::new(),
        }
    }

    /// Start from a serialized society. Its similarity entries become a
    /// [`SimilarityTable`].
    pub fn from_spec(spec: SocietySpec) -> Self {
        let mut builder = Self::new()
            .config(spec.reasoning)
            .comparator(SimilarityTable::from_entries(&spec.similarity));
        for agent in spec.agents {
            let id = AgentId::from(agent.id);
            builder = builder.agent(id.clone());
            for rule in agent.rules {
                builder = builder.rule(id.clone(), rule);
            }
            for rule in agent.static_rules {
                builder = builder.static_rule(id.clone(), rule);
            }
            for (target, weight) in agent.preferences {
                builder = builder.preference(id.clone(), target, weight);
            }
        }
        builder
    }

    pub fn config(mut self, config: ReasoningConfig) -> Self {
        self.config = config;
        self
    }

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn comparator(mut self, comparator: impl SimilarityComparator + 'static) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    pub fn agent(mut self, id: impl Into<AgentId>) -> Self {
        self.agents.push(id.into());
        self
    }

    pub fn rule(mut self, agent: impl Into<AgentId>, spec: RuleSpec) -> Self {
        self.rules.push((agent.into(), RuleKind::Defeasible, spec));
        self
    }

    pub fn rules(self, agent: impl Into<AgentId>, specs: impl IntoIterator<Item = RuleSpec>) -> Self {
        let agent = agent.into();
        specs
            .into_iter()
            .fold(self, |builder, spec| builder.rule(agent.clone(), spec))
    }

    pub fn static_rule(mut self, agent: impl Into<AgentId>, spec: RuleSpec) -> Self {
        self.rules.push((agent.into(), RuleKind::Static, spec));
        self
    }

    pub fn preference(
        mut self,
        agent: impl Into<AgentId>,
        target: impl Into<AgentId>,
        weight: f64,
    ) -> Self {
        self.preferences.push((agent.into(), target.into(), weight));
        self
    }

    /// Validate and freeze the society.
    pub fn build(self) -> ConcordResult<MultiAgentSystem> {
        let threshold = self.config.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SocietyError::InvalidThreshold(threshold).into());
        }

        let mut known = BTreeSet::new();
        for id in &self.agents {
            if !known.insert(id.clone()) {
                return Err(SocietyError::DuplicateAgent(id.to_string()).into());
            }
        }

        let resolver = TermResolver::strict(&known, &self.config.placeholder_definer);
        let mut rule_bases: BTreeMap<AgentId, Vec<_>> =
            known.iter().map(|id| (id.clone(), Vec::new())).collect();
        for (agent, kind, spec) in &self.rules {
            let base = rule_bases
                .get_mut(agent)
                .ok_or_else(|| SocietyError::UnknownAgent(agent.to_string()))?;
            base.push(resolver.rule(spec, *kind)?);
        }

        let mut preference_maps: BTreeMap<AgentId, Preferences> = known
            .iter()
            .map(|id| (id.clone(), Preferences::new(self.config.default_preference)))
            .collect();
        for (agent, target, weight) in &self.preferences {
            if !known.contains(target) {
                return Err(SocietyError::UnknownAgent(target.to_string()).into());
            }
            if !(0.0..=1.0).contains(weight) {
                return Err(SocietyError::InvalidPreference {
                    agent: agent.to_string(),
                    target: target.to_string(),
                    value: *weight,
                }
                .into());
            }
            preference_maps
                .get_mut(agent)
                .ok_or_else(|| SocietyError::UnknownAgent(agent.to_string()))?
                .set(target.clone(), *weight);
        }

        let mut agents = BTreeMap::new();
        for (id, rules) in rule_bases {
            check_static_acyclic(&id, &rules)?;
            let preferences = preference_maps.remove(&id).unwrap_or_default();
            agents.insert(id.clone(), Agent::new(id, rules, preferences));
        }

        info!(
            agents = agents.len(),
            rules = self.rules.len(),
            threshold,
            "society assembled"
        );

        let comparator = self
            .comparator
            .unwrap_or_else(|| Box::new(ExactMatch));
        Ok(MultiAgentSystem::new(self.config, comparator, agents))
    }
}
