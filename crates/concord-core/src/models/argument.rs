//! Explanation trees built while resolving a query.
//!
//! Each node summarizes one argument: its conclusion and the instantiated
//! terms contributed by other agents that the argument rests on. Those
//! foreign leaves are what argument ranking weighs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::term::{InstantiatedTerm, Term};

/// A conclusion plus the foreign terms it ultimately depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizedArgument {
    pub conclusion: Term,
    pub foreign_leaves: Vec<InstantiatedTerm>,
}

impl SummarizedArgument {
    pub fn new(conclusion: Term) -> Self {
        Self {
            conclusion,
            foreign_leaves: Vec::new(),
        }
    }

    /// Record a foreign leaf. Duplicates collapse.
    pub fn add_foreign_leaf(&mut self, leaf: InstantiatedTerm) {
        if !self.foreign_leaves.contains(&leaf) {
            self.foreign_leaves.push(leaf);
        }
    }
}

/// A rooted tree of arguments. A tree without an argument is the
/// "no argument yet" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgTree {
    pub argument: Option<SummarizedArgument>,
    pub children: Vec<ArgTree>,
    /// Set when the conclusion was borrowed from a reasoning cycle before
    /// any result for it had been committed.
    #[serde(default)]
    pub promise: bool,
}

impl ArgTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A root argument for `conclusion` with no leaves and no children.
    pub fn for_conclusion(conclusion: Term) -> Self {
        Self {
            argument: Some(SummarizedArgument::new(conclusion)),
            children: Vec::new(),
            promise: false,
        }
    }

    /// A single-node tree for a conclusion settled locally.
    pub fn leaf(conclusion: Term) -> Self {
        Self::for_conclusion(conclusion)
    }

    pub fn promise(conclusion: Term) -> Self {
        Self {
            promise: true,
            ..Self::for_conclusion(conclusion)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.argument.is_none()
    }

    pub fn conclusion(&self) -> Option<&Term> {
        self.argument.as_ref().map(|a| &a.conclusion)
    }

    pub fn add_child(&mut self, tree: ArgTree) {
        self.children.push(tree);
    }

    /// Attach a foreign leaf to the root argument. No-op on the empty sentinel.
    pub fn add_foreign_leaf(&mut self, leaf: InstantiatedTerm) {
        if let Some(argument) = self.argument.as_mut() {
            argument.add_foreign_leaf(leaf);
        }
    }

    /// Union of this node's foreign leaves with every descendant's,
    /// in first-seen order.
    pub fn all_foreign_leaves(&self) -> Vec<&InstantiatedTerm> {
        let mut seen = HashSet::new();
        let mut leaves = Vec::new();
        self.collect_leaves(&mut seen, &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(
        &'a self,
        seen: &mut HashSet<&'a InstantiatedTerm>,
        out: &mut Vec<&'a InstantiatedTerm>,
    ) {
        if let Some(argument) = &self.argument {
            for leaf in &argument.foreign_leaves {
                if seen.insert(leaf) {
                    out.push(leaf);
                }
            }
        }
        for child in &self.children {
            child.collect_leaves(seen, out);
        }
    }

    /// Number of argument nodes in the tree.
    pub fn node_count(&self) -> usize {
        let own = usize::from(self.argument.is_some());
        own + self.children.iter().map(ArgTree::node_count).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        if self.is_empty() && self.children.is_empty() {
            return 0;
        }
        1 + self.children.iter().map(ArgTree::depth).max().unwrap_or(0)
    }
}
