use concord_core::config::ReasoningConfig;
use concord_core::models::{AgentId, Answer, Literal, Term};
use concord_society::builder::rule_spec;
use concord_society::{MultiAgentSystem, SocietyBuilder};
use proptest::prelude::*;

const AGENTS: [&str; 3] = ["A", "B", "C"];
/// Body definers: any agent, or the placeholder.
const DEFINERS: [&str; 4] = ["A", "B", "C", "X"];
const LITERALS: [&str; 4] = ["a", "¬a", "b", "¬b"];

/// Head literal and body `(definer, literal)` indices of one rule.
type RuleShape = (usize, Vec<(usize, usize)>);

#[derive(Debug, Clone)]
struct Society {
    rules: Vec<Vec<RuleShape>>,
    /// Row-major `AGENTS x AGENTS` trust; the diagonal is ignored.
    trust: Vec<f64>,
}

fn definer_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![3 => 0..AGENTS.len(), 1 => Just(DEFINERS.len() - 1)]
}

fn rule_strategy() -> impl Strategy<Value = RuleShape> {
    (
        0..LITERALS.len(),
        prop::collection::vec((definer_strategy(), 0..LITERALS.len()), 0..=2),
    )
}

fn society_strategy() -> impl Strategy<Value = Society> {
    (
        prop::collection::vec(prop::collection::vec(rule_strategy(), 0..=2), AGENTS.len()),
        prop::collection::vec(0.0f64..=1.0, AGENTS.len() * AGENTS.len()),
    )
        .prop_map(|(rules, trust)| Society { rules, trust })
}

fn build(society: &Society, memoization: bool) -> MultiAgentSystem {
    let config = ReasoningConfig {
        memoization,
        ..Default::default()
    };
    let mut builder = SocietyBuilder::new().config(config);
    for agent in AGENTS {
        builder = builder.agent(agent);
    }
    for (i, rules) in society.rules.iter().enumerate() {
        for (j, (head, body)) in rules.iter().enumerate() {
            let body: Vec<(&str, &str)> = body
                .iter()
                .map(|&(d, l)| (DEFINERS[d], LITERALS[l]))
                .collect();
            let id = format!("{}{j}", AGENTS[i].to_lowercase());
            builder = builder.rule(AGENTS[i], rule_spec(&id, (AGENTS[i], LITERALS[*head]), &body));
        }
    }
    for (i, from) in AGENTS.iter().enumerate() {
        for (j, to) in AGENTS.iter().enumerate() {
            if i != j {
                builder = builder.preference(*from, *to, society.trust[i * AGENTS.len() + j]);
            }
        }
    }
    builder.build().unwrap()
}

fn ask(system: &MultiAgentSystem, agent: usize, literal: usize) -> (Answer, f64) {
    let id = AgentId::from(AGENTS[agent]);
    let term = Term::bound(AGENTS[agent], LITERALS[literal].parse::<Literal>().unwrap());
    let answer = system.initialize_query(&id, term, vec![]).unwrap();
    let rank = system.agent(&id).unwrap().calculate_arg_tree_rank(&answer.arg_tree);
    (answer, rank)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn repeated_queries_agree(
        society in society_strategy(),
        agent in 0..AGENTS.len(),
        literal in 0..LITERALS.len(),
    ) {
        let system = build(&society, true);
        let (first, first_rank) = ask(&system, agent, literal);
        let (second, second_rank) = ask(&system, agent, literal);

        prop_assert_eq!(first.truth_value, second.truth_value);
        prop_assert_eq!(&first.equivalent_term, &second.equivalent_term);
        prop_assert_eq!(&first.arg_tree, &second.arg_tree);
        prop_assert!((first_rank - second_rank).abs() < 1e-9);
        prop_assert_eq!(system.memo_len(), 0);
    }

    #[test]
    fn memoization_never_changes_an_answer(
        society in society_strategy(),
        agent in 0..AGENTS.len(),
        literal in 0..LITERALS.len(),
    ) {
        let with = build(&society, true);
        let without = build(&society, false);
        let (x, x_rank) = ask(&with, agent, literal);
        let (y, y_rank) = ask(&without, agent, literal);

        prop_assert_eq!(x.truth_value, y.truth_value);
        prop_assert_eq!(&x.equivalent_term, &y.equivalent_term);
        prop_assert!((x_rank - y_rank).abs() < 1e-9, "{} vs {}", x_rank, y_rank);
        prop_assert!(with.stats().delegations <= without.stats().delegations);
    }
}
