//! Serializable description of a society, in the tuple convention:
//! a rule is `[id, [definer, literal], [[definer, literal], ...]]`.
//!
//! # Examples
//!
//! ```
//! use concord_core::models::SocietySpec;
//!
//! let spec: SocietySpec = serde_json::from_str(r#"{
//!     "agents": [
//!         { "id": "A", "rules": [["r1", ["A", "p"], [["X", "q"]]]] },
//!         { "id": "B", "rules": [["r2", ["B", "q"], []]], "preferences": { "A": 0.5 } }
//!     ]
//! }"#).unwrap();
//! assert_eq!(spec.agents.len(), 2);
//! assert_eq!(spec.agents[0].rules[0].body[0].definer, "X");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ReasoningConfig;
use crate::errors::{ConcordResult, ConfigError};

/// `[definer, literal text]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TermSpec {
    pub definer: String,
    pub literal: String,
}

impl TermSpec {
    pub fn new(definer: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            definer: definer.into(),
            literal: literal.into(),
        }
    }
}

impl From<(String, String)> for TermSpec {
    fn from((definer, literal): (String, String)) -> Self {
        Self { definer, literal }
    }
}

impl From<TermSpec> for (String, String) {
    fn from(t: TermSpec) -> Self {
        (t.definer, t.literal)
    }
}

/// `[id, head, [body...]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, TermSpec, Vec<TermSpec>)", into = "(String, TermSpec, Vec<TermSpec>)")]
pub struct RuleSpec {
    pub id: String,
    pub head: TermSpec,
    pub body: Vec<TermSpec>,
}

impl RuleSpec {
    pub fn new(id: impl Into<String>, head: TermSpec, body: Vec<TermSpec>) -> Self {
        Self {
            id: id.into(),
            head,
            body,
        }
    }
}

impl From<(String, TermSpec, Vec<TermSpec>)> for RuleSpec {
    fn from((id, head, body): (String, TermSpec, Vec<TermSpec>)) -> Self {
        Self { id, head, body }
    }
}

impl From<RuleSpec> for (String, TermSpec, Vec<TermSpec>) {
    fn from(r: RuleSpec) -> Self {
        (r.id, r.head, r.body)
    }
}

/// One agent's rule base and trust weights.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub static_rules: Vec<RuleSpec>,
    #[serde(default)]
    pub preferences: BTreeMap<String, f64>,
}

/// A symmetric similarity degree between two literal symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEntry {
    pub left: String,
    pub right: String,
    pub degree: f64,
}

/// A full society: agents, similarity table, and reasoning settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocietySpec {
    #[serde(default)]
    pub reasoning: ReasoningConfig,
    pub agents: Vec<AgentSpec>,
    #[serde(default)]
    pub similarity: Vec<SimilarityEntry>,
    /// Focus knowledge commonly queried against this society.
    #[serde(default)]
    pub focus_knowledge: Vec<RuleSpec>,
}

impl SocietySpec {
    pub fn from_json(json: &str) -> ConcordResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Same layout as the JSON form, with `[[agents]]` tables.
    pub fn from_toml(toml_str: &str) -> ConcordResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    pub fn agent(&self, id: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.id == id)
    }
}
