//! Setup-time checks on a frozen rule base.

use std::collections::HashMap;

use concord_core::errors::SocietyError;
use concord_core::models::{AgentId, Rule, Term};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Reject static rules whose bodies loop back to their own heads.
/// Local answering recurses through static bodies without a cycle guard.
pub fn check_static_acyclic(agent: &AgentId, rules: &[Rule]) -> Result<(), SocietyError> {
    let mut marks: HashMap<&Term, Mark> = HashMap::new();
    let mut path: Vec<&Term> = Vec::new();

    for rule in rules.iter().filter(|r| r.is_static()) {
        visit(&rule.head, rules, &mut marks, &mut path).map_err(|cycle| {
            SocietyError::StaticCycle {
                agent: agent.to_string(),
                path: cycle,
            }
        })?;
    }
    Ok(())
}

fn visit<'r>(
    term: &'r Term,
    rules: &'r [Rule],
    marks: &mut HashMap<&'r Term, Mark>,
    path: &mut Vec<&'r Term>,
) -> Result<(), String> {
    match marks.get(term) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|t| *t == term).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|t| t.to_string()).collect();
            cycle.push(term.to_string());
            return Err(cycle.join(" -> "));
        }
        None => {}
    }

    marks.insert(term, Mark::Visiting);
    path.push(term);
    for rule in rules.iter().filter(|r| r.is_static() && r.head == *term) {
        for member in &rule.body {
            visit(member, rules, marks, path)?;
        }
    }
    path.pop();
    marks.insert(term, Mark::Done);
    Ok(())
}
