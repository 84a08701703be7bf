//! Cross-agent delegation with per-context memoization.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use concord_core::errors::{ConcordResult, ReasoningError};
use concord_core::models::{
    AgentId, ArgTree, Definer, InstantiatedTerm, QueryContext, Term, TruthValue,
};

use super::AgentHandle;
use crate::memo::{Claim, Flight, MemoEntry, MemoKey, PathTrace};

/// Best answer gathered from a set of candidate agents.
#[derive(Debug, Clone)]
pub struct Delegated {
    /// The answering agent's matched term, rebound to that agent and
    /// re-scored against the queried literal. `None` when nobody answered.
    pub instantiated: Option<InstantiatedTerm>,
    pub truth_value: TruthValue,
    pub arg_tree: ArgTree,
    /// History checks behind every candidate's answer, kept or not.
    pub trace: PathTrace,
}

impl Delegated {
    fn nobody() -> Self {
        Self {
            instantiated: None,
            truth_value: TruthValue::False,
            arg_tree: ArgTree::empty(),
            trace: PathTrace::default(),
        }
    }
}

impl<'a> AgentHandle<'a> {
    /// Agents to ask about `term`: its definer when bound, otherwise every
    /// known agent plus this one, deduplicated, in directory order.
    pub fn candidates_for(&self, term: &Term) -> Vec<AgentId> {
        match &term.definer {
            Definer::Bound(id) if self.system.contains_agent(id) => vec![id.clone()],
            Definer::Bound(id) => {
                warn!(agent = %self.agent.id, definer = %id, "term defined by unknown agent");
                Vec::new()
            }
            Definer::Unbound => {
                let mut candidates: Vec<AgentId> = self.system.agent_ids().cloned().collect();
                if !candidates.contains(&self.agent.id) {
                    candidates.push(self.agent.id.clone());
                }
                candidates
            }
        }
    }

    /// Ask every candidate about `term` and keep the best True answer, else
    /// the best Undefined one. False answers are skipped, so the result is
    /// False only when no candidate supports the term (or there are none).
    ///
    /// Only the root of a query fans out across threads. Nested delegation
    /// stays on the thread that asked, so each worker carries a single chain
    /// of in-flight memo keys.
    pub fn query_agents(
        &self,
        candidates: &[AgentId],
        term: &Term,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<Delegated> {
        let fan_out =
            self.system.config().parallel_delegation && candidates.len() > 1 && hist.len() <= 1;
        let answers: Vec<(&AgentId, MemoEntry)> = if fan_out {
            candidates
                .par_iter()
                .map(|c| self.ask(c, term, context, hist).map(|entry| (c, entry)))
                .collect::<ConcordResult<_>>()?
        } else {
            candidates
                .iter()
                .map(|c| self.ask(c, term, context, hist).map(|entry| (c, entry)))
                .collect::<ConcordResult<_>>()?
        };

        let mut best = Delegated::nobody();
        for (candidate, entry) in answers {
            best.trace.absorb(&entry.trace);
            let take = match entry.truth_value {
                TruthValue::False => false,
                TruthValue::True => {
                    best.truth_value != TruthValue::True
                        || self.prefers_challenger(&best.arg_tree, &entry.arg_tree)
                }
                TruthValue::Undefined => match best.truth_value {
                    TruthValue::False => true,
                    TruthValue::Undefined => {
                        self.prefers_challenger(&best.arg_tree, &entry.arg_tree)
                    }
                    TruthValue::True => false,
                },
            };
            if !take {
                continue;
            }
            trace!(candidate = %candidate, truth_value = %entry.truth_value, "candidate kept");
            best.instantiated = entry.equivalent_term.as_ref().map(|equivalent| {
                let literal = equivalent.literal().clone();
                let sim_degree = self.system.similarity(&term.literal, &literal);
                InstantiatedTerm::new(
                    Term::bound(candidate.clone(), literal),
                    term.literal.clone(),
                    sim_degree,
                )
            });
            best.truth_value = entry.truth_value;
            best.arg_tree = entry.arg_tree;
        }

        Ok(best)
    }

    /// One candidate's answer, from this agent's memo when it replays on
    /// this path. Results that cut a cycle are never committed. Without
    /// memoization nothing is replayed, but reusable results are still
    /// committed for [`Self::borrow_cycle`].
    fn ask(
        &self,
        candidate: &AgentId,
        term: &Term,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<MemoEntry> {
        let key = MemoKey::new(context.id.clone(), term.clone(), candidate.clone());

        if !self.system.config().memoization {
            let entry = self.delegate(candidate, term, context, hist)?;
            if !entry.trace.is_borrowed() {
                self.agent.memo.commit(key, entry.clone());
            }
            return Ok(entry);
        }

        match self.agent.memo.claim(&key) {
            Claim::Ready(entry) if entry.trace.replays_under(hist) => {
                Ok(self.memo_hit(candidate, term, entry))
            }
            Claim::Ready(_) => {
                trace!(candidate = %candidate, term = %term, "memo entry does not replay on this path");
                self.delegate(candidate, term, context, hist)
            }
            Claim::InFlight(flight) => match self.await_flight(&flight) {
                Some(entry) if entry.trace.replays_under(hist) => {
                    Ok(self.memo_hit(candidate, term, entry))
                }
                _ => self.delegate(candidate, term, context, hist),
            },
            Claim::Owned(flight) => {
                let result = self.delegate(candidate, term, context, hist);
                let reusable = result
                    .as_ref()
                    .ok()
                    .filter(|entry| !entry.trace.is_borrowed())
                    .cloned();
                self.agent.memo.land(&key, &flight, reusable);
                result
            }
        }
    }

    fn memo_hit(&self, candidate: &AgentId, term: &Term, entry: MemoEntry) -> MemoEntry {
        self.system.stats_recorder().record_memo_hit();
        trace!(candidate = %candidate, term = %term, "memo hit");
        entry
    }

    /// Wait for another thread's in-flight answer, unless that thread is
    /// this one or is itself waiting on this one.
    fn await_flight(&self, flight: &Flight) -> Option<MemoEntry> {
        let waits = self.system.waits();
        if !waits.enter(flight.owner()) {
            trace!(agent = %self.agent.id, "in-flight key owned along this chain");
            return None;
        }
        let entry = flight.wait();
        waits.leave();
        entry
    }

    fn delegate(
        &self,
        candidate: &AgentId,
        term: &Term,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<MemoEntry> {
        let target = self
            .system
            .agent(candidate)
            .ok_or_else(|| ReasoningError::UnknownAgent(candidate.to_string()))?;
        self.system
            .stats_recorder()
            .record_delegation(candidate != &self.agent.id);

        let (answer, trace) = target.resolve(&self.agent.id, term, context, hist)?;
        Ok(MemoEntry::new(answer, trace))
    }

    /// Argument for a term that recurs on the current path. The owner is not
    /// asked to re-derive it: whatever result this agent already holds for
    /// the owner in this context is reused, otherwise a promise is returned.
    pub(crate) fn borrow_cycle(
        &self,
        term: &InstantiatedTerm,
        context: &Arc<QueryContext>,
    ) -> ArgTree {
        self.system.stats_recorder().record_cycle_borrow();

        let committed = term.definer().agent().and_then(|owner| {
            let key = MemoKey::new(context.id.clone(), term.term.clone(), owner.clone());
            self.agent.memo.get(&key)
        });

        match committed {
            Some(entry) if entry.truth_value != TruthValue::False => {
                debug!(term = %term, "cycle borrowed committed argument");
                entry.arg_tree
            }
            _ => {
                debug!(term = %term, "cycle borrowed with no committed argument");
                ArgTree::promise(term.term.clone())
            }
        }
    }
}
