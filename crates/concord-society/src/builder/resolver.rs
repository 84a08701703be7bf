//! Tuple descriptions to terms and rules.

use std::collections::BTreeSet;

use concord_core::errors::SocietyError;
use concord_core::models::{AgentId, Definer, Literal, Rule, RuleKind, RuleSpec, Term, TermSpec};

/// Resolves definer tokens to [`Definer`]s.
///
/// The placeholder token denotes an unbound term. In strict mode any other
/// token must name a registered agent; lenient mode (focus knowledge)
/// accepts any token, since focus rules are relocalized before use.
#[derive(Debug, Clone)]
pub struct TermResolver<'a> {
    agents: Option<&'a BTreeSet<AgentId>>,
    placeholder: &'a str,
}

impl<'a> TermResolver<'a> {
    pub fn strict(agents: &'a BTreeSet<AgentId>, placeholder: &'a str) -> Self {
        Self {
            agents: Some(agents),
            placeholder,
        }
    }

    pub fn lenient(placeholder: &'a str) -> Self {
        Self {
            agents: None,
            placeholder,
        }
    }

    pub fn definer(&self, token: &str) -> Result<Definer, SocietyError> {
        if token == self.placeholder {
            return Ok(Definer::Unbound);
        }
        let id = AgentId::from(token);
        match self.agents {
            Some(agents) if !agents.contains(&id) => Err(SocietyError::UnknownAgent(id.0)),
            _ => Ok(Definer::Bound(id)),
        }
    }

    pub fn term(&self, spec: &TermSpec) -> Result<Term, SocietyError> {
        Ok(Term::new(self.definer(&spec.definer)?, Literal::parse(&spec.literal)?))
    }

    pub fn rule(&self, spec: &RuleSpec, kind: RuleKind) -> Result<Rule, SocietyError> {
        let head = self.term(&spec.head)?;
        let body = spec
            .body
            .iter()
            .map(|t| self.term(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Rule {
            id: spec.id.clone(),
            kind,
            head,
            body,
        })
    }

    pub fn defeasible_rule(&self, spec: &RuleSpec) -> Result<Rule, SocietyError> {
        self.rule(spec, RuleKind::Defeasible)
    }
}
