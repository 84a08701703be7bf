use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::argument::ArgTree;
use super::context::QueryContext;
use super::term::{InstantiatedTerm, Term};

/// Three-valued verdict of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruthValue {
    True,
    False,
    Undefined,
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TruthValue::True => "true",
            TruthValue::False => "false",
            TruthValue::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

/// Result of every query call, top-level and delegated alike.
#[derive(Debug, Clone)]
pub struct Answer {
    pub queried_term: Term,
    pub context: Arc<QueryContext>,
    /// The rule head the query was matched to. `None` when nothing matched.
    pub equivalent_term: Option<InstantiatedTerm>,
    pub truth_value: TruthValue,
    pub arg_tree: ArgTree,
}

impl Answer {
    pub fn new(
        queried_term: Term,
        context: Arc<QueryContext>,
        equivalent_term: Option<InstantiatedTerm>,
        truth_value: TruthValue,
        arg_tree: ArgTree,
    ) -> Self {
        Self {
            queried_term,
            context,
            equivalent_term,
            truth_value,
            arg_tree,
        }
    }

    pub fn is_true(&self) -> bool {
        self.truth_value == TruthValue::True
    }

    pub fn is_false(&self) -> bool {
        self.truth_value == TruthValue::False
    }

    pub fn is_undefined(&self) -> bool {
        self.truth_value == TruthValue::Undefined
    }
}
