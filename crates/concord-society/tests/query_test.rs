//! Query protocol: matching, local answers, delegation, contexts.

use concord_core::config::ReasoningConfig;
use concord_core::errors::{ConcordError, ReasoningError};
use concord_core::models::{AgentId, Literal, Rule, Term, TruthValue};
use concord_society::builder::rule_spec;
use concord_society::{MultiAgentSystem, SimilarityTable, SocietyBuilder};

fn lit(text: &str) -> Literal {
    text.parse().unwrap()
}

fn term(agent: &str, text: &str) -> Term {
    Term::bound(agent, lit(text))
}

fn static_society() -> MultiAgentSystem {
    SocietyBuilder::new()
        .agent("A")
        .agent("B")
        .static_rule("A", rule_spec("s1", ("A", "p"), &[("A", "q")]))
        .static_rule("A", rule_spec("s2", ("A", "q"), &[]))
        .static_rule("A", rule_spec("s3", ("A", "¬r"), &[]))
        .rule("A", rule_spec("d1", ("A", "r"), &[("B", "s")]))
        .rule("B", rule_spec("b1", ("B", "s"), &[]))
        .preference("A", "B", 1.0)
        .build()
        .unwrap()
}

#[test]
fn no_similar_head_is_false_with_empty_tree() {
    let system = static_society();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "unknown"), vec![])
        .unwrap();
    assert_eq!(answer.truth_value, TruthValue::False);
    assert!(answer.equivalent_term.is_none());
    assert!(answer.arg_tree.is_empty());
}

#[test]
fn static_rules_answer_locally_without_delegation() {
    let system = static_society();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();
    assert_eq!(answer.truth_value, TruthValue::True);
    assert_eq!(answer.arg_tree.node_count(), 1);
    assert_eq!(answer.arg_tree.conclusion(), Some(&term("A", "p")));
    assert_eq!(system.stats().delegations, 0);
}

#[test]
fn locally_true_negation_is_false_before_delegating() {
    let system = static_society();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "r"), vec![])
        .unwrap();
    assert_eq!(answer.truth_value, TruthValue::False);
    assert!(answer.arg_tree.is_empty());
    assert_eq!(system.stats().delegations, 0);
}

#[test]
fn bound_body_term_is_delegated_to_its_definer() {
    let system = SocietyBuilder::new()
        .agent("A")
        .agent("B")
        .rule("A", rule_spec("a1", ("A", "p"), &[("B", "s")]))
        .rule("B", rule_spec("b1", ("B", "s"), &[]))
        .preference("A", "B", 0.5)
        .build()
        .unwrap();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();

    assert_eq!(answer.truth_value, TruthValue::True);
    let leaves = answer.arg_tree.all_foreign_leaves();
    assert_eq!(leaves.len(), 1);
    assert!(leaves[0].definer().is(&AgentId::from("B")));
    assert_eq!(answer.arg_tree.children.len(), 1);

    let handle = system.agent(&AgentId::from("A")).unwrap();
    assert!((handle.calculate_arg_tree_rank(&answer.arg_tree) - 0.5).abs() < 1e-9);
    assert_eq!(system.stats().cross_agent_calls, 1);
}

#[test]
fn locally_resolved_members_add_no_child() {
    let system = SocietyBuilder::new()
        .agent("A")
        .rule("A", rule_spec("a1", ("A", "p"), &[("A", "q")]))
        .rule("A", rule_spec("a2", ("A", "q"), &[]))
        .build()
        .unwrap();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();
    assert_eq!(answer.truth_value, TruthValue::True);
    assert!(answer.arg_tree.children.is_empty());
    assert!(answer.arg_tree.all_foreign_leaves().is_empty());
}

#[test]
fn false_body_member_fails_the_rule() {
    let system = SocietyBuilder::new()
        .agent("A")
        .agent("B")
        .rule("A", rule_spec("a1", ("A", "p"), &[("B", "s"), ("B", "missing")]))
        .rule("B", rule_spec("b1", ("B", "s"), &[]))
        .build()
        .unwrap();
    let answer = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();
    assert_eq!(answer.truth_value, TruthValue::False);
    assert!(answer.arg_tree.is_empty());
}

#[test]
fn empty_candidate_list_resolves_false() {
    let system = static_society();
    let handle = system.agent(&AgentId::from("A")).unwrap();
    let context = system.new_query_context(term("A", "p"), AgentId::from("A"), vec![]);
    let delegated = handle
        .query_agents(&[], &term("B", "s"), &context, &[])
        .unwrap();
    assert_eq!(delegated.truth_value, TruthValue::False);
    assert!(delegated.instantiated.is_none());
    assert!(delegated.arg_tree.is_empty());
}

#[test]
fn unbound_terms_ask_every_agent_including_self() {
    let system = static_society();
    let handle = system.agent(&AgentId::from("A")).unwrap();
    let candidates = handle.candidates_for(&Term::pattern(lit("s")));
    assert_eq!(candidates, vec![AgentId::from("A"), AgentId::from("B")]);
    assert_eq!(handle.candidates_for(&term("B", "s")), vec![AgentId::from("B")]);
}

#[test]
fn focus_rules_are_adopted_by_the_querying_agent() {
    let system = SocietyBuilder::new().agent("A").build().unwrap();
    let focus = vec![
        Rule::new("r_fk1", term("FK", "hv(m1)"), vec![]),
        Rule::new("r_fk1", term("FK", "hv(m1)"), vec![]),
    ];
    let handle = system.agent(&AgentId::from("A")).unwrap();
    let extended = handle.create_extended_rules(&focus);
    assert_eq!(extended.len(), 1);
    assert_eq!(extended[0].id, "r_fk1_A");
    assert_eq!(extended[0].head, term("A", "hv(m1)"));
    // The caller's focus rules are untouched.
    assert_eq!(focus[0].head, term("FK", "hv(m1)"));

    let answer = handle.initialize_query(term("A", "hv(m1)"), focus).unwrap();
    assert_eq!(answer.truth_value, TruthValue::True);
}

#[test]
fn similarity_match_takes_first_qualifying_head_not_best() {
    let system = SocietyBuilder::new()
        .agent("E")
        .similarity_threshold(0.5)
        .comparator(
            SimilarityTable::new()
                .with("avl", "spa", 0.8)
                .with("am", "spa", 0.9),
        )
        .rule("E", rule_spec("e1", ("E", "avl"), &[]))
        .rule("E", rule_spec("e2", ("E", "am"), &[]))
        .build()
        .unwrap();
    let handle = system.agent(&AgentId::from("E")).unwrap();
    let rules = handle.create_extended_rules(&[]);
    let matched = handle
        .look_for_similar_term(&Term::pattern(lit("spa")), &rules)
        .unwrap();
    assert_eq!(matched.literal(), &lit("avl"));
    assert_eq!(matched.original_literal, lit("spa"));
    assert_eq!(matched.sim_degree, 0.8);
}

#[test]
fn context_ids_are_sequential_with_configured_prefix() {
    let config = ReasoningConfig {
        context_id_prefix: "s-".into(),
        ..Default::default()
    };
    let system = SocietyBuilder::new()
        .config(config)
        .agent("A")
        .build()
        .unwrap();
    let a = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();
    let b = system
        .initialize_query(&AgentId::from("A"), term("A", "p"), vec![])
        .unwrap();
    assert_eq!(a.context.id.0, "s-0");
    assert_eq!(b.context.id.0, "s-1");
    assert_ne!(*a.context, *b.context);
    assert!(system.context(&a.context.id).is_some());
    assert_eq!(system.context_count(), 2);
}

#[test]
fn querying_an_unknown_agent_is_an_error() {
    let system = static_society();
    let err = system
        .initialize_query(&AgentId::from("Z"), term("Z", "p"), vec![])
        .unwrap_err();
    assert!(matches!(
        err,
        ConcordError::ReasoningError(ReasoningError::UnknownAgent(id)) if id == "Z"
    ));
}
