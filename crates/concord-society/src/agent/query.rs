//! The query protocol: match, local answer, support finding for the term
//! and its negation, then arbitration by argument strength.

use std::sync::Arc;

use tracing::{debug, info, info_span, instrument};

use concord_core::errors::{ConcordResult, ReasoningError};
use concord_core::models::{
    AgentId, Answer, ArgTree, InstantiatedTerm, QueryContext, Rule, Term, TruthValue,
};

use super::AgentHandle;
use crate::memo::PathTrace;

/// Outcome of looking for support of one term.
#[derive(Debug, Clone)]
pub struct Support {
    /// At least one rule contributed, possibly only through a cycle.
    pub unblocked: bool,
    /// At least one non-cyclic rule contributed.
    pub supported: bool,
    pub arg_tree: ArgTree,
    pub trace: PathTrace,
}

impl Support {
    fn blocked(conclusion: Term) -> Self {
        Self {
            unblocked: false,
            supported: false,
            arg_tree: ArgTree::for_conclusion(conclusion),
            trace: PathTrace::default(),
        }
    }

    /// A cycle contributes no support but does not falsify.
    fn borrowed(arg_tree: ArgTree) -> Self {
        let mut trace = PathTrace::default();
        trace.mark_borrowed();
        Self {
            unblocked: true,
            supported: false,
            arg_tree,
            trace,
        }
    }
}

/// A rule whose body was satisfied, possibly only through Undefined members.
struct BodyResult {
    arg_tree: ArgTree,
    cyclic: bool,
}

fn in_history(hist: &[InstantiatedTerm], term: &Term) -> bool {
    hist.iter().any(|h| h.term == *term)
}

fn extended(hist: &[InstantiatedTerm], term: InstantiatedTerm) -> Vec<InstantiatedTerm> {
    let mut next = Vec::with_capacity(hist.len() + 1);
    next.extend_from_slice(hist);
    next.push(term);
    next
}

impl<'a> AgentHandle<'a> {
    /// Open a fresh query context and resolve `term` with an empty history.
    pub fn initialize_query(&self, term: Term, focus_knowledge: Vec<Rule>) -> ConcordResult<Answer> {
        let system = self.system;
        let context = system.new_query_context(term.clone(), self.agent.id.clone(), focus_knowledge);
        let span = info_span!("concord.initialize_query", context = %context.id, agent = %self.agent.id);
        let _guard = span.enter();

        system.stats_recorder().record_top_level();
        let result = self.query(&self.agent.id, &term, &context, &[]);

        if system.config().release_memo_on_completion {
            let released = system.release_memo(&context.id);
            debug!(released, "released memo entries");
        }

        if let Ok(answer) = &result {
            info!(
                term = %term,
                truth_value = %answer.truth_value,
                rank = self.calculate_arg_tree_rank(&answer.arg_tree),
                "query complete"
            );
        }
        result
    }

    /// Answer `term` on behalf of `sender` within `context`.
    ///
    /// `hist` holds the instantiated terms on the current path from the
    /// top-level query and is never shared mutably between calls.
    pub fn query(
        &self,
        sender: &AgentId,
        term: &Term,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<Answer> {
        self.resolve(sender, term, context, hist)
            .map(|(answer, _)| answer)
    }

    /// [`Self::query`], along with the history checks the answer rests on.
    #[instrument(
        name = "concord.query",
        skip_all,
        fields(agent = %self.agent.id, sender = %sender, term = %term, context = %context.id)
    )]
    pub(crate) fn resolve(
        &self,
        sender: &AgentId,
        term: &Term,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<(Answer, PathTrace)> {
        let max_depth = self.system.config().max_recursion_depth;
        if hist.len() > max_depth {
            return Err(ReasoningError::RecursionLimitExceeded {
                depth: hist.len(),
                max_depth,
            }
            .into());
        }

        let answer = |equivalent: Option<InstantiatedTerm>, tv: TruthValue, tree: ArgTree| {
            Answer::new(term.clone(), Arc::clone(context), equivalent, tv, tree)
        };

        let rules = self.create_extended_rules(&context.focus_knowledge);
        let Some(equivalent) = self.look_for_similar_term(term, &rules) else {
            debug!("no similar rule head");
            let none = answer(None, TruthValue::False, ArgTree::empty());
            return Ok((none, PathTrace::default()));
        };

        if self.local_ans(&equivalent.term, &rules)? {
            debug!(equivalent = %equivalent, "locally true");
            let leaf = ArgTree::leaf(equivalent.term.clone());
            let local = answer(Some(equivalent), TruthValue::True, leaf);
            return Ok((local, PathTrace::default()));
        }
        if self.local_ans(&equivalent.term.negated(), &rules)? {
            debug!(equivalent = %equivalent, "negation locally true");
            let local = answer(Some(equivalent), TruthValue::False, ArgTree::empty());
            return Ok((local, PathTrace::default()));
        }

        let mut trace = PathTrace::default();
        trace.visit(&equivalent.term);
        let pro = if in_history(hist, &equivalent.term) {
            Support::borrowed(self.borrow_cycle(&equivalent, context))
        } else {
            let hist_q = extended(hist, equivalent.clone());
            let support = self.find_support(&equivalent, &rules, context, &hist_q)?;
            if !support.unblocked {
                debug!(equivalent = %equivalent, "no applicable rule");
                trace.absorb(&support.trace);
                let blocked = answer(Some(equivalent), TruthValue::False, ArgTree::empty());
                return Ok((blocked, trace));
            }
            support
        };
        trace.absorb(&pro.trace);

        let negation = equivalent.negated();
        trace.visit(&negation.term);
        let con = if in_history(hist, &negation.term) || negation.term.has_instantiated_term_in(hist) {
            Support::borrowed(self.borrow_cycle(&negation, context))
        } else {
            let hist_neg = extended(hist, negation.clone());
            self.find_support(&negation, &rules, context, &hist_neg)?
        };
        trace.absorb(&con.trace);

        let (truth_value, arg_tree) = self.arbitrate(pro, con);
        debug!(
            equivalent = %equivalent,
            truth_value = %truth_value,
            borrowed = trace.is_borrowed(),
            "arbitrated"
        );
        Ok((answer(Some(equivalent), truth_value, arg_tree), trace))
    }

    /// The term holds when supported and its argument is at least as strong
    /// as the negation's (or the negation is blocked). The negation holds
    /// only when supported and strictly stronger (or the term is blocked).
    fn arbitrate(&self, pro: Support, con: Support) -> (TruthValue, ArgTree) {
        let pro_at_least_as_strong = !self.prefers_challenger(&pro.arg_tree, &con.arg_tree);

        if pro.supported && (!con.unblocked || pro_at_least_as_strong) {
            (TruthValue::True, pro.arg_tree)
        } else if con.supported && (!pro.unblocked || !pro_at_least_as_strong) {
            (TruthValue::False, con.arg_tree)
        } else {
            (TruthValue::Undefined, pro.arg_tree)
        }
    }

    /// Try every rule concluding `term`; keep the strongest argument.
    ///
    /// Once a non-cyclic rule has contributed, cyclic contributors are ignored.
    /// A later contributor only displaces the kept argument when strictly
    /// stronger, whether or not the kept one came through a cycle.
    pub fn find_support(
        &self,
        term: &InstantiatedTerm,
        rules: &[Rule],
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
    ) -> ConcordResult<Support> {
        let mut support = Support::blocked(term.term.clone());

        for rule in rules.iter().filter(|r| r.head == term.term) {
            let Some(body) = self.process_body_members(rule, context, hist, &mut support.trace)?
            else {
                continue;
            };
            if support.supported && body.cyclic {
                continue;
            }
            let replace =
                !support.unblocked || self.prefers_challenger(&support.arg_tree, &body.arg_tree);
            if replace {
                support.arg_tree = body.arg_tree;
            }
            support.unblocked = true;
            if !body.cyclic {
                support.supported = true;
            }
        }

        Ok(support)
    }

    /// Resolve each body member left to right. `None` as soon as one is
    /// False; Undefined members mark the rule cyclic. Members answered by
    /// another agent become foreign leaves and children of the rule's tree.
    fn process_body_members(
        &self,
        rule: &Rule,
        context: &Arc<QueryContext>,
        hist: &[InstantiatedTerm],
        trace: &mut PathTrace,
    ) -> ConcordResult<Option<BodyResult>> {
        let mut arg_tree = ArgTree::for_conclusion(rule.head.clone());
        let mut cyclic = false;

        for member in &rule.body {
            let candidates = self.candidates_for(member);
            let resolved = self.query_agents(&candidates, member, context, hist)?;
            trace.absorb(&resolved.trace);

            match resolved.truth_value {
                TruthValue::False => return Ok(None),
                TruthValue::Undefined => cyclic = true,
                TruthValue::True => {}
            }

            if let Some(instantiated) = resolved.instantiated {
                if !instantiated.definer().is(&self.agent.id) {
                    arg_tree.add_foreign_leaf(instantiated);
                    arg_tree.add_child(resolved.arg_tree);
                }
            }
        }

        Ok(Some(BodyResult { arg_tree, cyclic }))
    }
}
