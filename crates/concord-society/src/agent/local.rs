//! Purely local steps: extended rule sets, similarity matching, and
//! static-rule answers.

use std::collections::HashSet;

use tracing::{trace, warn};

use concord_core::errors::{ConcordResult, ReasoningError};
use concord_core::models::{InstantiatedTerm, Rule, Term};

use super::AgentHandle;

impl<'a> AgentHandle<'a> {
    /// Own rules followed by a localized copy of every focus rule.
    /// Structurally equal rules collapse; first occurrence keeps its place.
    pub fn create_extended_rules(&self, focus_knowledge: &[Rule]) -> Vec<Rule> {
        let mut seen = HashSet::new();
        self.agent
            .rules
            .iter()
            .cloned()
            .chain(focus_knowledge.iter().map(|rule| rule.localized(&self.agent.id)))
            .filter(|rule| seen.insert(rule.clone()))
            .collect()
    }

    /// First rule head, in rule order, whose literal is similar enough to
    /// the queried one. Not best-match.
    pub fn look_for_similar_term(&self, term: &Term, rules: &[Rule]) -> Option<InstantiatedTerm> {
        rules.iter().find_map(|rule| {
            let sim_degree = self.system.similarity(&rule.head.literal, &term.literal);
            self.system.similar_enough(sim_degree).then(|| {
                InstantiatedTerm::new(rule.head.clone(), term.literal.clone(), sim_degree)
            })
        })
    }

    /// True iff some static rule concludes `term` and every member of its
    /// body is itself locally true.
    pub fn local_ans(&self, term: &Term, rules: &[Rule]) -> ConcordResult<bool> {
        self.local_ans_at(term, rules, 0)
    }

    fn local_ans_at(&self, term: &Term, rules: &[Rule], depth: usize) -> ConcordResult<bool> {
        let max_depth = self.system.config().max_recursion_depth;
        if depth > max_depth {
            warn!(agent = %self.agent.id, term = %term, depth, "static rule recursion bound hit");
            return Err(ReasoningError::RecursionLimitExceeded { depth, max_depth }.into());
        }

        for rule in rules.iter().filter(|r| r.is_static() && r.head == *term) {
            let mut satisfied = true;
            for member in &rule.body {
                if !self.local_ans_at(member, rules, depth + 1)? {
                    satisfied = false;
                    break;
                }
            }
            if satisfied {
                trace!(agent = %self.agent.id, rule = %rule.id, "static rule satisfied");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
