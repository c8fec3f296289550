//! Optimality certificates read off the residual network: the minimum cut
//! witnessing a maximum flow, and the checks (no augmenting path, no
//! negative residual cycle, conservation) the integration tests assert
//! after every solve.

use std::collections::VecDeque;

use crate::graph::{ArcId, Network, NodeId};
use crate::shortest_path;
use crate::{Flow, FlowError};

/// A source-sink cut: the saturated arcs crossing it, their total capacity,
/// and the source side that induces it.
#[derive(Debug, Clone)]
pub struct MinCut<F> {
    pub arcs: Vec<ArcId>,
    pub capacity: F,
    pub source_side: Vec<NodeId>,
}

/// Cut induced by residual reachability from `source`. On a maximum flow
/// its capacity equals the flow value, which is the duality certificate.
pub fn min_cut<F: Flow>(network: &Network<F>, source: NodeId) -> Result<MinCut<F>, FlowError> {
    if source.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(source.0));
    }

    let reachable = residual_reachable(network, source.0);
    let mut arcs = Vec::new();
    let mut capacity = F::zero();
    for (id, arc) in network.arcs() {
        if arc.tail == arc.head {
            continue;
        }
        if reachable[arc.tail.0] && !reachable[arc.head.0] {
            arcs.push(id);
            capacity += arc.upper;
        }
    }

    let source_side = reachable
        .iter()
        .enumerate()
        .filter(|(_, &r)| r)
        .map(|(v, _)| NodeId(v))
        .collect();

    Ok(MinCut {
        arcs,
        capacity,
        source_side,
    })
}

/// Whether the residual network still admits a source-sink path.
pub fn has_augmenting_path<F: Flow>(
    network: &Network<F>,
    source: NodeId,
    sink: NodeId,
) -> Result<bool, FlowError> {
    if source.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(source.0));
    }
    if sink.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(sink.0));
    }
    Ok(residual_reachable(network, source.0)[sink.0])
}

/// Max-flow optimality: no augmenting path remains.
pub fn max_flow_is_optimal<F: Flow>(
    network: &Network<F>,
    source: NodeId,
    sink: NodeId,
) -> Result<bool, FlowError> {
    Ok(!has_augmenting_path(network, source, sink)?)
}

/// Whether the residual network carries a negative-cost cycle.
pub fn has_negative_residual_cycle<F: Flow>(network: &Network<F>) -> bool {
    shortest_path::find_negative_residual_cycle(network).is_some()
}

/// Min-cost optimality for the current flow value: no negative-cost
/// residual cycle remains.
pub fn min_cost_is_optimal<F: Flow>(network: &Network<F>) -> bool {
    !has_negative_residual_cycle(network)
}

/// Capacity bounds on every arc and flow conservation at every node other
/// than the endpoints.
pub fn conservation_holds<F: Flow>(
    network: &Network<F>,
    source: NodeId,
    sink: NodeId,
) -> Result<bool, FlowError> {
    if source.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(source.0));
    }
    if sink.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(sink.0));
    }

    let mut net = vec![F::zero(); network.num_nodes()];
    for (_, arc) in network.arcs() {
        if arc.flow < F::zero() || arc.flow > arc.upper {
            return Ok(false);
        }
        net[arc.tail.0] -= arc.flow;
        net[arc.head.0] += arc.flow;
    }

    Ok(net
        .iter()
        .enumerate()
        .all(|(v, &b)| b == F::zero() || v == source.0 || v == sink.0))
}

fn residual_reachable<F: Flow>(network: &Network<F>, source: usize) -> Vec<bool> {
    let mut reachable = vec![false; network.num_nodes()];
    reachable[source] = true;
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        for k in 0..network.res_degree(u) {
            let index = network.res_at(u, k);
            let to = network.res_to(index);
            if !reachable[to] && network.res_cap(index) > F::zero() {
                reachable[to] = true;
                queue.push_back(to);
            }
        }
    }
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_of_the_zero_flow_is_everything_leaving_the_source() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(0), NodeId(1), 2, 0).unwrap();
        network.add_arc(NodeId(1), NodeId(2), 1, 0).unwrap();

        // nothing is saturated yet, so the whole graph is on the source side
        let cut = min_cut(&network, NodeId(0)).unwrap();
        assert!(cut.arcs.is_empty());
        assert_eq!(cut.source_side.len(), 3);

        network.push(1, 1).unwrap();
        let cut = min_cut(&network, NodeId(0)).unwrap();
        assert_eq!(cut.arcs, vec![ArcId(1)]);
        assert_eq!(cut.capacity, 1);
    }

    #[test]
    fn conservation_flags_an_unbalanced_node() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(0), NodeId(1), 2, 0).unwrap();
        network.add_arc(NodeId(1), NodeId(2), 2, 0).unwrap();
        network.push(0, 2).unwrap();

        // node 1 holds excess until the second arc carries it out
        assert!(!conservation_holds(&network, NodeId(0), NodeId(2)).unwrap());
        network.push(1, 2).unwrap();
        assert!(conservation_holds(&network, NodeId(0), NodeId(2)).unwrap());
    }
}
