//! Argument strength: trust-weighted, similarity-discounted rank.
//!
//! `rank(tree) = Σ preference[leaf.definer] × leaf.sim_degree` over the
//! tree's foreign leaves, i.e. leaves defined by an agent other than the
//! evaluator. Tree size and depth do not matter.
//!
//! # Examples
//!
//! ```
//! use concord_core::models::{AgentId, ArgTree, InstantiatedTerm, Literal, Term};
//! use concord_society::ranking::{arg_tree_rank, Preferences};
//!
//! let mut prefs = Preferences::new(0.0);
//! prefs.set(AgentId::from("C"), 0.6);
//!
//! let mut tree = ArgTree::for_conclusion(Term::bound("A", Literal::positive("col(m1)")));
//! tree.add_foreign_leaf(InstantiatedTerm::new(
//!     Term::bound("C", Literal::positive("ed(m1)")),
//!     Literal::positive("ed(m1)"),
//!     0.5,
//! ));
//! let rank = arg_tree_rank(&tree, &AgentId::from("A"), &prefs);
//! assert!((rank - 0.3).abs() < 1e-9);
//! ```

use std::collections::HashMap;

use concord_core::models::{AgentId, ArgTree, InstantiatedTerm};

/// One agent's trust weights over the others, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    weights: HashMap<AgentId, f64>,
    default_weight: f64,
}

impl Preferences {
    pub fn new(default_weight: f64) -> Self {
        Self {
            weights: HashMap::new(),
            default_weight,
        }
    }

    pub fn set(&mut self, agent: AgentId, weight: f64) {
        self.weights.insert(agent, weight);
    }

    /// Weight of `agent`, or the default for agents without an entry.
    pub fn weight(&self, agent: &AgentId) -> f64 {
        self.weights.get(agent).copied().unwrap_or(self.default_weight)
    }
}

/// Which of two arguments a comparison keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Incumbent,
    Challenger,
}

/// Contribution of one leaf. Unbound leaves carry no trust.
pub fn term_rank(leaf: &InstantiatedTerm, preferences: &Preferences) -> f64 {
    match leaf.definer().agent() {
        Some(agent) => preferences.weight(agent) * leaf.sim_degree,
        None => 0.0,
    }
}

pub fn arg_tree_rank(tree: &ArgTree, evaluator: &AgentId, preferences: &Preferences) -> f64 {
    tree.all_foreign_leaves()
        .into_iter()
        .filter(|leaf| !leaf.definer().is(evaluator))
        .map(|leaf| term_rank(leaf, preferences))
        .sum()
}

/// The challenger wins only when strictly stronger; ties keep the incumbent.
pub fn compare(
    incumbent: &ArgTree,
    challenger: &ArgTree,
    evaluator: &AgentId,
    preferences: &Preferences,
) -> Verdict {
    let incumbent_rank = arg_tree_rank(incumbent, evaluator, preferences);
    let challenger_rank = arg_tree_rank(challenger, evaluator, preferences);
    if incumbent_rank >= challenger_rank {
        Verdict::Incumbent
    } else {
        Verdict::Challenger
    }
}

/// Whichever tree ranks higher, ties resolved in favor of `a`.
pub fn stronger<'t>(
    a: &'t ArgTree,
    b: &'t ArgTree,
    evaluator: &AgentId,
    preferences: &Preferences,
) -> &'t ArgTree {
    match compare(a, b, evaluator, preferences) {
        Verdict::Incumbent => a,
        Verdict::Challenger => b,
    }
}
