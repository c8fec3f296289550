use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mcmf_core::{
    certificate, max_flow, min_cost_flow, MaxFlowAlgorithm, McfOutcome, MinCostFlowAlgorithm,
    Network, NodeId,
};

const MAX_FLOW_ALGORITHMS: [MaxFlowAlgorithm; 6] = [
    MaxFlowAlgorithm::FordFulkerson,
    MaxFlowAlgorithm::EdmondsKarp,
    MaxFlowAlgorithm::Dinic,
    MaxFlowAlgorithm::ShortestAugmentingPath,
    MaxFlowAlgorithm::CapacityScaling,
    MaxFlowAlgorithm::PushRelabelFifo,
];

const MIN_COST_ALGORITHMS: [MinCostFlowAlgorithm; 5] = [
    MinCostFlowAlgorithm::SuccessiveShortestPath,
    MinCostFlowAlgorithm::PrimalDual,
    MinCostFlowAlgorithm::CycleCanceling,
    MinCostFlowAlgorithm::CostScaling,
    MinCostFlowAlgorithm::OutOfKilter,
];

fn random_network(n: usize, m: usize, seed: u64) -> Network<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = Network::new(n);
    for _ in 0..m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        let capacity = rng.gen_range(0..=10);
        let cost = rng.gen_range(0..=8);
        network
            .add_arc(NodeId(u), NodeId(v), capacity, cost)
            .unwrap();
    }
    network
}

#[test]
fn max_flow_engines_agree_on_random_networks() {
    for seed in 0..20 {
        let network = random_network(10, 30, seed);
        let source = NodeId(0);
        let sink = NodeId(9);

        let reference = max_flow(&mut network.clone(), source, sink, MaxFlowAlgorithm::Dinic)
            .unwrap()
            .value;
        for algorithm in MAX_FLOW_ALGORITHMS {
            let mut instance = network.clone();
            let result = max_flow(&mut instance, source, sink, algorithm).unwrap();
            assert_eq!(result.value, reference, "seed {seed}, {algorithm:?}");
            assert!(
                certificate::conservation_holds(&instance, source, sink).unwrap(),
                "seed {seed}, {algorithm:?}"
            );
            assert!(
                certificate::max_flow_is_optimal(&instance, source, sink).unwrap(),
                "seed {seed}, {algorithm:?}"
            );

            let cut_capacity: i64 = result
                .min_cut
                .iter()
                .map(|&arc| instance.arc(arc).unwrap().upper)
                .sum();
            assert_eq!(result.value, cut_capacity, "seed {seed}, {algorithm:?}");
        }
    }
}

#[test]
fn min_cost_engines_agree_on_random_networks() {
    for seed in 0..20 {
        let network = random_network(8, 24, seed);
        let source = NodeId(0);
        let sink = NodeId(7);

        let capacity = max_flow(&mut network.clone(), source, sink, MaxFlowAlgorithm::Dinic)
            .unwrap()
            .value;
        let target = capacity / 2;

        let mut costs = Vec::new();
        for algorithm in MIN_COST_ALGORITHMS {
            let mut instance = network.clone();
            let outcome = min_cost_flow(&mut instance, source, sink, target, algorithm).unwrap();
            let solution = match outcome {
                McfOutcome::Optimal(solution) => solution,
                McfOutcome::Infeasible => {
                    panic!("seed {seed}, {algorithm:?}: target below capacity is feasible")
                }
            };
            assert_eq!(instance.total_flow_value(source), target);
            assert!(
                certificate::min_cost_is_optimal(&instance),
                "seed {seed}, {algorithm:?}"
            );
            assert!(
                certificate::conservation_holds(&instance, source, sink).unwrap(),
                "seed {seed}, {algorithm:?}"
            );
            costs.push(solution.cost);
        }

        for (algorithm, &cost) in MIN_COST_ALGORITHMS.iter().zip(&costs) {
            assert_eq!(cost, costs[0], "seed {seed}, {algorithm:?}");
        }
    }
}

#[test]
fn targets_above_capacity_are_infeasible_for_every_engine() {
    for seed in 0..10 {
        let network = random_network(8, 20, seed);
        let source = NodeId(0);
        let sink = NodeId(7);
        let capacity = max_flow(&mut network.clone(), source, sink, MaxFlowAlgorithm::Dinic)
            .unwrap()
            .value;

        for algorithm in MIN_COST_ALGORITHMS {
            let mut instance = network.clone();
            let outcome =
                min_cost_flow(&mut instance, source, sink, capacity + 1, algorithm).unwrap();
            assert_eq!(
                outcome,
                McfOutcome::Infeasible,
                "seed {seed}, {algorithm:?}"
            );
        }
    }
}

proptest! {
    #[test]
    fn dinic_matches_edmonds_karp_on_small_networks(seed in 0u64..200) {
        let network = random_network(6, 14, seed);
        let a = max_flow(&mut network.clone(), NodeId(0), NodeId(5), MaxFlowAlgorithm::Dinic)
            .unwrap()
            .value;
        let b = max_flow(
            &mut network.clone(),
            NodeId(0),
            NodeId(5),
            MaxFlowAlgorithm::EdmondsKarp,
        )
        .unwrap()
        .value;
        prop_assert_eq!(a, b);
    }

    #[test]
    fn solved_networks_always_carry_a_matching_cut(seed in 0u64..100) {
        let mut network = random_network(7, 18, seed);
        let result = max_flow(&mut network, NodeId(0), NodeId(6), MaxFlowAlgorithm::PushRelabelFifo)
            .unwrap();
        let cut_capacity: i64 = result
            .min_cut
            .iter()
            .map(|&arc| network.arc(arc).unwrap().upper)
            .sum();
        prop_assert_eq!(result.value, cut_capacity);
    }
}
