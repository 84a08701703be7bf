//! The query session registry: agent directory, similarity comparator and
//! threshold, and allocation of query contexts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use concord_core::config::ReasoningConfig;
use concord_core::errors::{ConcordResult, ReasoningError, SocietyError};
use concord_core::models::{
    AgentId, Answer, ContextId, Literal, QueryContext, Rule, RuleSpec, Term,
};
use concord_core::traits::SimilarityComparator;

use crate::agent::{Agent, AgentHandle};
use crate::builder::{SocietyBuilder, TermResolver};
use crate::memo::WaitGraph;
use crate::stats::{QueryStats, QueryStatsSnapshot};

/// A society of agents sharing one similarity comparator and config.
///
/// Built once through [`SocietyBuilder`]; rule bases and preferences are
/// frozen afterwards. Only memo caches, the context registry, stats and
/// the wait graph of in-flight memo keys change while queries run.
pub struct MultiAgentSystem {
    config: ReasoningConfig,
    comparator: Box<dyn SimilarityComparator>,
    agents: BTreeMap<AgentId, Agent>,
    contexts: DashMap<ContextId, Arc<QueryContext>>,
    next_context: AtomicU64,
    stats: QueryStats,
    waits: WaitGraph,
}

impl MultiAgentSystem {
    pub fn builder() -> SocietyBuilder {
        SocietyBuilder::new()
    }

    pub(crate) fn new(
        config: ReasoningConfig,
        comparator: Box<dyn SimilarityComparator>,
        agents: BTreeMap<AgentId, Agent>,
    ) -> Self {
        Self {
            config,
            comparator,
            agents,
            contexts: DashMap::new(),
            next_context: AtomicU64::new(0),
            stats: QueryStats::default(),
            waits: WaitGraph::default(),
        }
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    pub fn similarity(&self, a: &Literal, b: &Literal) -> f64 {
        self.comparator.similarity(a, b)
    }

    pub fn similar_enough(&self, sim_degree: f64) -> bool {
        sim_degree >= self.config.similarity_threshold
    }

    /// A handle for querying `id`, or `None` if no such agent exists.
    pub fn agent(&self, id: &AgentId) -> Option<AgentHandle<'_>> {
        self.agents.get(id).map(|agent| AgentHandle::new(self, agent))
    }

    /// Agent ids in directory order.
    pub fn agent_ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    pub fn contains_agent(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Open a fresh context with the next sequential id.
    pub fn new_query_context(
        &self,
        term: Term,
        agent: AgentId,
        focus_knowledge: Vec<Rule>,
    ) -> Arc<QueryContext> {
        let n = self.next_context.fetch_add(1, Ordering::Relaxed);
        let id = ContextId(format!("{}{}", self.config.context_id_prefix, n));
        let context = Arc::new(QueryContext::new(id.clone(), term, agent, focus_knowledge));
        self.contexts.insert(id, Arc::clone(&context));
        debug!(context = %context.id, agent = %context.agent, "opened query context");
        context
    }

    pub fn context(&self, id: &ContextId) -> Option<Arc<QueryContext>> {
        self.contexts.get(id).map(|c| Arc::clone(c.value()))
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Drop every agent's memo entries for `id`. Returns how many were removed.
    pub fn release_memo(&self, id: &ContextId) -> usize {
        self.agents
            .values()
            .map(|agent| agent.memo().release_context(id))
            .sum()
    }

    /// Release the memo and forget the context.
    pub fn close_context(&self, id: &ContextId) -> Option<Arc<QueryContext>> {
        self.release_memo(id);
        self.contexts.remove(id).map(|(_, c)| c)
    }

    /// Total memo entries held across all agents.
    pub fn memo_len(&self) -> usize {
        self.agents.values().map(|a| a.memo().len()).sum()
    }

    pub fn stats(&self) -> QueryStatsSnapshot {
        self.stats.snapshot()
    }

    pub(crate) fn stats_recorder(&self) -> &QueryStats {
        &self.stats
    }

    pub(crate) fn waits(&self) -> &WaitGraph {
        &self.waits
    }

    /// Ask `agent` to resolve `term` under `focus_knowledge`.
    pub fn initialize_query(
        &self,
        agent: &AgentId,
        term: Term,
        focus_knowledge: Vec<Rule>,
    ) -> ConcordResult<Answer> {
        let handle = self
            .agent(agent)
            .ok_or_else(|| ReasoningError::UnknownAgent(agent.to_string()))?;
        handle.initialize_query(term, focus_knowledge)
    }

    /// Build focus knowledge from tuple rules. Definers are not checked
    /// against the directory: focus rules are adopted by whichever agent
    /// queries with them.
    pub fn focus_knowledge(&self, specs: &[RuleSpec]) -> Result<Vec<Rule>, SocietyError> {
        let resolver = TermResolver::lenient(&self.config.placeholder_definer);
        specs.iter().map(|spec| resolver.defeasible_rule(spec)).collect()
    }
}

impl std::fmt::Debug for MultiAgentSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiAgentSystem")
            .field("config", &self.config)
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .field("contexts", &self.contexts.len())
            .finish()
    }
}
