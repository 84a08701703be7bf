use concord_core::models::{AgentId, ArgTree, InstantiatedTerm, Literal, Term, TruthValue};
use concord_society::builder::rule_spec;
use concord_society::ranking::{arg_tree_rank, stronger};
use concord_society::{Preferences, SocietyBuilder};
use proptest::prelude::*;

const AGENTS: [&str; 4] = ["A", "B", "C", "D"];

fn preferences(weights: &[f64]) -> Preferences {
    let mut prefs = Preferences::new(0.0);
    for (agent, weight) in AGENTS.iter().zip(weights) {
        prefs.set(AgentId::from(*agent), *weight);
    }
    prefs
}

/// One argument node with a distinct foreign leaf per entry.
fn tree(leaves: &[(usize, f64)]) -> ArgTree {
    let mut tree = ArgTree::for_conclusion(Term::bound("Z", Literal::positive("goal")));
    for (i, (agent, sim)) in leaves.iter().enumerate() {
        let literal = Literal::positive(format!("l{i}"));
        tree.add_foreign_leaf(InstantiatedTerm::new(
            Term::bound(AGENTS[*agent], literal.clone()),
            literal,
            *sim,
        ));
    }
    tree
}

fn leaves_strategy() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..AGENTS.len(), 0.0f64..=1.0), 1..8)
}

proptest! {
    #[test]
    fn raising_a_similarity_never_lowers_rank(
        leaves in leaves_strategy(),
        weights in prop::collection::vec(0.0f64..=1.0, AGENTS.len()),
        pick in any::<prop::sample::Index>(),
        bump in 0.0f64..=1.0,
    ) {
        let prefs = preferences(&weights);
        let evaluator = AgentId::from("Z");
        let before = arg_tree_rank(&tree(&leaves), &evaluator, &prefs);

        let mut raised = leaves.clone();
        let i = pick.index(raised.len());
        raised[i].1 = (raised[i].1 + bump).min(1.0);
        let after = arg_tree_rank(&tree(&raised), &evaluator, &prefs);

        prop_assert!(after + 1e-12 >= before, "{after} < {before}");
    }

    #[test]
    fn strengthening_the_winner_keeps_it_winning(
        a in leaves_strategy(),
        b in leaves_strategy(),
        weights in prop::collection::vec(0.0f64..=1.0, AGENTS.len()),
        pick in any::<prop::sample::Index>(),
    ) {
        let prefs = preferences(&weights);
        let evaluator = AgentId::from("Z");
        let (tree_a, tree_b) = (tree(&a), tree(&b));
        prop_assume!(std::ptr::eq(stronger(&tree_a, &tree_b, &evaluator, &prefs), &tree_a));

        let mut raised = a.clone();
        let i = pick.index(raised.len());
        raised[i].1 = 1.0;
        let tree_raised = tree(&raised);
        prop_assert!(std::ptr::eq(
            stronger(&tree_raised, &tree_b, &evaluator, &prefs),
            &tree_raised
        ));
    }

    #[test]
    fn own_leaves_never_count(
        leaves in leaves_strategy(),
        weights in prop::collection::vec(0.0f64..=1.0, AGENTS.len()),
    ) {
        let prefs = preferences(&weights);
        let only_a: Vec<(usize, f64)> = leaves.iter().map(|(_, sim)| (0, *sim)).collect();
        prop_assert_eq!(arg_tree_rank(&tree(&only_a), &AgentId::from("A"), &prefs), 0.0);
    }

    #[test]
    fn static_answers_are_never_contradictory(
        heads in prop::collection::vec((any::<bool>(), prop::collection::vec(any::<bool>(), 0..4)), 1..8),
        polarity in prop::collection::vec(any::<bool>(), 8),
    ) {
        // Symbol i only ever appears with polarity[i] and only depends on
        // later symbols, so the static rule base is acyclic.
        let n = heads.len();
        let literal = |i: usize| if polarity[i] { format!("s{i}") } else { format!("¬s{i}") };

        let mut builder = SocietyBuilder::new().agent("A");
        for (i, (is_rule, deps)) in heads.iter().enumerate() {
            if !is_rule {
                continue;
            }
            let body: Vec<(String, String)> = deps
                .iter()
                .enumerate()
                .filter(|(k, take)| **take && i + 1 + k < n)
                .map(|(k, _)| ("A".to_string(), literal(i + 1 + k)))
                .collect();
            let body_refs: Vec<(&str, &str)> =
                body.iter().map(|(d, l)| (d.as_str(), l.as_str())).collect();
            builder = builder.static_rule(
                "A",
                rule_spec(&format!("s{i}"), ("A", literal(i).as_str()), &body_refs),
            );
        }
        let system = builder.build().unwrap();
        let handle = system.agent(&AgentId::from("A")).unwrap();
        let rules = handle.create_extended_rules(&[]);

        for i in 0..n {
            let term = Term::bound("A", Literal::positive(format!("s{i}")));
            let pos = handle.local_ans(&term, &rules).unwrap();
            let neg = handle.local_ans(&term.negated(), &rules).unwrap();
            prop_assert!(!(pos && neg));
        }
    }

    #[test]
    fn trust_decides_conflicts(b in 0.0f64..=1.0, c in 0.0f64..=1.0) {
        let system = SocietyBuilder::new()
            .agent("A")
            .agent("B")
            .agent("C")
            .rule("A", rule_spec("a1", ("A", "p"), &[("X", "q")]))
            .rule("A", rule_spec("a2", ("A", "¬p"), &[("X", "r")]))
            .rule("B", rule_spec("b1", ("B", "q"), &[]))
            .rule("C", rule_spec("c1", ("C", "r"), &[]))
            .preference("A", "B", b)
            .preference("A", "C", c)
            .build()
            .unwrap();
        let query = || {
            system
                .initialize_query(&AgentId::from("A"), Term::bound("A", Literal::positive("p")), vec![])
                .unwrap()
                .truth_value
        };
        let expected = if b >= c { TruthValue::True } else { TruthValue::False };
        prop_assert_eq!(query(), expected);
        prop_assert_eq!(query(), expected);
    }
}
