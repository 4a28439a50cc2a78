//! Property-based tests for the search.
//!
//! These tests check, over randomly generated game trees:
//! - alpha-beta never changes the decision or the root value
//! - alpha-beta never visits more states than plain search
//! - the root value is the best recorded action value
//! - a depth-0 value is the evaluation of the state
//! - plain search matches a direct recursion over the tree description

use plysearch_agent::games::{TreeSpec, TreeState};
use plysearch_agent::{AdversarialAgent, SearchConfig, StateScore};
use plysearch_core::{AgentModel, AgentModels, GameState};
use proptest::prelude::*;

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

/// Small integer evaluations keep expectation nodes free of rounding noise.
fn arb_value() -> impl Strategy<Value = f32> {
    (-20i32..=20).prop_map(|v| v as f32)
}

fn label(children: Vec<TreeSpec>) -> Vec<(String, TreeSpec)> {
    children
        .into_iter()
        .enumerate()
        .map(|(i, child)| (format!("a{i}"), child))
        .collect()
}

/// Generate a random subtree with 1-3 children per inner node.
fn arb_subtree() -> impl Strategy<Value = TreeSpec> {
    arb_value()
        .prop_map(TreeSpec::leaf)
        .prop_recursive(5, 96, 3, |inner| {
            (arb_value(), prop::collection::vec(inner, 1..4))
                .prop_map(|(value, children)| TreeSpec::branch(value, label(children)))
        })
}

/// Generate a tree whose root always has at least one action.
fn arb_tree() -> impl Strategy<Value = TreeSpec> {
    (arb_value(), prop::collection::vec(arb_subtree(), 1..4))
        .prop_map(|(value, children)| TreeSpec::branch(value, label(children)))
}

fn arb_model() -> impl Strategy<Value = AgentModel> {
    prop::sample::select(vec![AgentModel::Adversarial, AgentModel::Random, AgentModel::Greedy])
}

/// Generate models for a 2- to 4-agent game.
fn arb_models() -> impl Strategy<Value = AgentModels> {
    prop::collection::vec(arb_model(), 1..4).prop_map(|models| AgentModels::new(models).unwrap())
}

fn agents(depth: usize, models: &AgentModels) -> (AdversarialAgent<StateScore>, AdversarialAgent<StateScore>) {
    let config = SearchConfig::new(depth, models.clone());
    (
        AdversarialAgent::with_state_score(config.clone()),
        AdversarialAgent::with_state_score(config.with_alpha_beta()),
    )
}

/// Value of `node` computed straight from the tree description, with
/// `agent` to move and `depth` full rounds left.
fn reference_value(node: &TreeSpec, depth: usize, agent: usize, models: &AgentModels) -> f32 {
    if depth == 0 || node.children.is_empty() {
        return node.value;
    }
    let next_agent = (agent + 1) % models.num_agents();
    let next_depth = if next_agent == 0 { depth - 1 } else { depth };
    let values = node
        .children
        .iter()
        .map(|b| reference_value(&b.node, next_depth, next_agent, models));

    if agent == 0 {
        return values.fold(f32::NEG_INFINITY, f32::max);
    }
    match models.model(agent).unwrap() {
        AgentModel::Adversarial => values.fold(f32::INFINITY, f32::min),
        AgentModel::Random => values.fold(0.0, |total, v| total + v) / node.children.len() as f32,
        AgentModel::Greedy => {
            // Lowest immediate value, first on ties.
            let mut pick = &node.children[0];
            for branch in &node.children[1..] {
                if branch.node.value < pick.node.value {
                    pick = branch;
                }
            }
            reference_value(&pick.node, next_depth, next_agent, models)
        }
    }
}

// =============================================================================
// Search agrees with the direct recursion
// =============================================================================

proptest! {
    #[test]
    fn prop_plain_search_matches_reference(
        spec in arb_tree(),
        models in arb_models(),
        depth in 0usize..4,
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (plain, _) = agents(depth, &models);
        let result = plain.search(&state).unwrap();

        // Every game here has at least two agents, so agent 1 replies.
        let expected: Vec<f32> = spec
            .children
            .iter()
            .map(|b| reference_value(&b.node, depth, 1, &models))
            .collect();
        let actual: Vec<f32> = result.action_values.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(result.root_value, expected.iter().copied().fold(f32::NEG_INFINITY, f32::max));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_opponent_value_matches_reference(
        spec in arb_tree(),
        models in arb_models(),
        depth in 1usize..4,
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (plain, pruned) = agents(depth, &models);
        for agent in 0..models.num_agents() {
            let expected = reference_value(&spec, depth, agent, &models);
            prop_assert_eq!(plain.value(&state, depth, agent).unwrap(), expected);
            prop_assert_eq!(pruned.value(&state, depth, agent).unwrap(), expected);
        }
    }
}

// =============================================================================
// Alpha-beta agrees with plain search
// =============================================================================

proptest! {
    #[test]
    fn prop_alpha_beta_matches_plain_search(
        spec in arb_tree(),
        models in arb_models(),
        depth in 0usize..4,
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (plain, pruned) = agents(depth, &models);

        let a = plain.search(&state).unwrap();
        let b = pruned.search(&state).unwrap();

        prop_assert_eq!(&a.best_action, &b.best_action);
        prop_assert_eq!(a.root_value, b.root_value);
        prop_assert!(
            b.nodes_visited <= a.nodes_visited,
            "alpha-beta visited {} states, plain search {}",
            b.nodes_visited,
            a.nodes_visited
        );
    }

    #[test]
    fn prop_root_value_is_best_action_value(
        spec in arb_tree(),
        models in arb_models(),
        depth in 0usize..4,
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (plain, _) = agents(depth, &models);
        let result = plain.search(&state).unwrap();

        prop_assert_eq!(result.action_values.len(), state.legal_actions(0).len());
        let best = result
            .action_values
            .iter()
            .map(|(_, v)| *v)
            .fold(f32::NEG_INFINITY, f32::max);
        prop_assert_eq!(result.root_value, best);

        // First action reaching the best value wins.
        let first = result.action_values.iter().find(|(_, v)| *v == best).unwrap();
        prop_assert_eq!(&first.0, &result.best_action);
    }

    #[test]
    fn prop_depth_zero_value_is_evaluation(
        spec in arb_tree(),
        models in arb_models(),
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (plain, pruned) = agents(3, &models);
        for agent in 0..models.num_agents() {
            prop_assert_eq!(plain.value(&state, 0, agent).unwrap(), spec.value);
            prop_assert_eq!(pruned.value(&state, 0, agent).unwrap(), spec.value);
        }
    }

    #[test]
    fn prop_search_is_deterministic(
        spec in arb_tree(),
        models in arb_models(),
        depth in 1usize..4,
    ) {
        let state = TreeState::new(models.num_agents(), &spec);
        let (_, pruned) = agents(depth, &models);
        let first = pruned.search(&state).unwrap();
        let second = pruned.search(&state).unwrap();
        prop_assert_eq!(first.best_action, second.best_action);
        prop_assert_eq!(first.nodes_visited, second.nodes_visited);
    }
}

// =============================================================================
// Hand-computed trees
// =============================================================================

fn classic_tree() -> TreeState {
    let spec = TreeSpec::from_json_str(
        r#"{ "children": [
            { "action": "A", "children": [ { "action": "a1", "value": 3 }, { "action": "a2", "value": 5 } ] },
            { "action": "B", "children": [ { "action": "b1", "value": 1 }, { "action": "b2", "value": 9 } ] }
        ] }"#,
    )
    .unwrap();
    TreeState::new(2, &spec)
}

#[test]
fn test_minimax_picks_best_worst_case() {
    for alpha_beta in [false, true] {
        let mut config = SearchConfig::minimax(1, 2).unwrap();
        config.alpha_beta = alpha_beta;
        let result = AdversarialAgent::with_state_score(config).search(&classic_tree()).unwrap();
        assert_eq!(result.best_action, "A");
        assert_eq!(result.root_value, 3.0);
    }
}

#[test]
fn test_expectimax_mean_of_three() {
    let spec = TreeSpec::branch(
        0.0,
        vec![
            ("safe".to_string(), TreeSpec::leaves("s", &[4.0, 4.0, 4.0])),
            ("risky".to_string(), TreeSpec::leaves("r", &[-3.0, 6.0, 12.0])),
        ],
    );
    let state = TreeState::new(2, &spec);
    let agent = AdversarialAgent::with_state_score(SearchConfig::expectimax(1, 2).unwrap());
    let result = agent.search(&state).unwrap();

    assert_eq!(result.best_action, "risky");
    assert_eq!(result.root_value, 5.0);
    assert_eq!(result.value_of(&"safe".to_string()), Some(4.0));
}

#[test]
fn test_mixed_models_per_agent() {
    // Agent 1 minimizes, agent 2 is random.
    let opp2 = |values: &[f32]| TreeSpec::leaves("z", values);
    let spec = TreeSpec::branch(
        0.0,
        vec![(
            "go".to_string(),
            TreeSpec::branch(
                0.0,
                vec![
                    ("x".to_string(), opp2(&[0.0, 10.0])),
                    ("y".to_string(), opp2(&[4.0, 4.0])),
                ],
            ),
        )],
    );
    let state = TreeState::new(3, &spec);
    let models: AgentModels = "adversarial,random".parse().unwrap();
    let agent = AdversarialAgent::with_state_score(SearchConfig::new(1, models));

    // min(mean(0, 10), mean(4, 4)) = 4
    assert_eq!(agent.search(&state).unwrap().root_value, 4.0);
}

/// Agent 0 picks a number; agent 1 never has a move but the game goes on.
#[derive(Clone, Debug)]
struct Frozen {
    value: f32,
}

impl GameState for Frozen {
    type Action = u8;

    fn legal_actions(&self, agent: usize) -> Vec<u8> {
        if agent == 0 {
            vec![1, 3, 2]
        } else {
            Vec::new()
        }
    }

    fn successor(&self, _agent: usize, action: &u8) -> Self {
        Frozen { value: *action as f32 }
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn num_agents(&self) -> usize {
        2
    }

    fn evaluate(&self) -> f32 {
        self.value
    }
}

#[test]
fn test_stalled_opponent_is_scored_as_leaf() {
    for alpha_beta in [false, true] {
        let mut config = SearchConfig::minimax(4, 2).unwrap();
        config.alpha_beta = alpha_beta;
        let result = AdversarialAgent::with_state_score(config)
            .search(&Frozen { value: 0.0 })
            .unwrap();

        assert_eq!(result.best_action, 3);
        assert_eq!(result.root_value, 3.0);
        // root + one stalled opponent node per action
        assert_eq!(result.nodes_visited, 4);
    }
}
