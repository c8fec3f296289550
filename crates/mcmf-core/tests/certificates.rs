use mcmf_core::{
    certificate, max_flow, min_cost_flow, MaxFlowAlgorithm, MinCostFlowAlgorithm, Network, NodeId,
};

fn diamond() -> Network<i64> {
    let mut network = Network::new(4);
    network.add_arc(NodeId(0), NodeId(1), 3, 1).unwrap();
    network.add_arc(NodeId(0), NodeId(2), 2, 2).unwrap();
    network.add_arc(NodeId(1), NodeId(3), 2, 1).unwrap();
    network.add_arc(NodeId(2), NodeId(3), 3, 1).unwrap();
    network
}

#[test]
fn augmenting_paths_vanish_exactly_at_the_maximum() {
    let mut network = diamond();
    assert!(certificate::has_augmenting_path(&network, NodeId(0), NodeId(3)).unwrap());
    assert!(!certificate::max_flow_is_optimal(&network, NodeId(0), NodeId(3)).unwrap());

    max_flow(&mut network, NodeId(0), NodeId(3), MaxFlowAlgorithm::EdmondsKarp).unwrap();
    assert!(!certificate::has_augmenting_path(&network, NodeId(0), NodeId(3)).unwrap());
    assert!(certificate::max_flow_is_optimal(&network, NodeId(0), NodeId(3)).unwrap());
}

#[test]
fn cut_arcs_are_saturated_and_separate_the_endpoints() {
    let mut network = diamond();
    let result = max_flow(&mut network, NodeId(0), NodeId(3), MaxFlowAlgorithm::Dinic).unwrap();

    let cut = certificate::min_cut(&network, NodeId(0)).unwrap();
    assert_eq!(cut.capacity, result.value);
    assert!(cut.source_side.contains(&NodeId(0)));
    assert!(!cut.source_side.contains(&NodeId(3)));
    for &arc in &cut.arcs {
        let arc = network.arc(arc).unwrap();
        assert_eq!(arc.flow, arc.upper);
    }
}

#[test]
fn cut_extraction_is_idempotent() {
    let mut network = diamond();
    max_flow(&mut network, NodeId(0), NodeId(3), MaxFlowAlgorithm::Dinic).unwrap();
    let first = certificate::min_cut(&network, NodeId(0)).unwrap();
    let second = certificate::min_cut(&network, NodeId(0)).unwrap();
    assert_eq!(first.arcs, second.arcs);
    assert_eq!(first.capacity, second.capacity);
}

#[test]
fn optimal_min_cost_flow_has_no_negative_residual_cycle() {
    let mut network = diamond();
    min_cost_flow(
        &mut network,
        NodeId(0),
        NodeId(3),
        3,
        MinCostFlowAlgorithm::SuccessiveShortestPath,
    )
    .unwrap();
    assert!(certificate::min_cost_is_optimal(&network));
    assert!(certificate::conservation_holds(&network, NodeId(0), NodeId(3)).unwrap());
}

#[test]
fn a_deliberately_expensive_routing_is_not_optimal() {
    let mut network: Network<i64> = Network::new(3);
    network.add_arc(NodeId(0), NodeId(1), 1, 1).unwrap();
    network.add_arc(NodeId(1), NodeId(2), 1, 1).unwrap();
    network.add_arc(NodeId(0), NodeId(2), 1, 1).unwrap();

    // route the long way around while the direct arc is free
    network.push(0, 1).unwrap();
    network.push(1, 1).unwrap();
    assert!(!certificate::min_cost_is_optimal(&network));
    assert!(certificate::conservation_holds(&network, NodeId(0), NodeId(2)).unwrap());
}

#[test]
fn conservation_checks_capacity_bounds_too() {
    let mut network = diamond();
    max_flow(&mut network, NodeId(0), NodeId(3), MaxFlowAlgorithm::Dinic).unwrap();
    assert!(certificate::conservation_holds(&network, NodeId(0), NodeId(3)).unwrap());
    // a different endpoint pair sees node 3's surplus as a violation
    assert!(!certificate::conservation_holds(&network, NodeId(0), NodeId(1)).unwrap());
}
