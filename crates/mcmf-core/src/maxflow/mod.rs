//! Augmenting-path and preflow engines for maximum flow. Every engine
//! mutates the network exclusively through the residual primitives and
//! keeps its search state (levels, current-arc pointers, queues) as
//! per-call scratch that dies with the solve.

pub mod capacity_scaling;
pub mod dinic;
pub mod edmonds_karp;
pub mod ford_fulkerson;
pub mod push_relabel;
pub mod shortest_augmenting_path;

use std::collections::VecDeque;

use crate::graph::{Network, NodeId};
use crate::{Flow, FlowError};

pub use capacity_scaling::CapacityScaling;
pub use dinic::Dinic;
pub use edmonds_karp::EdmondsKarp;
pub use ford_fulkerson::FordFulkerson;
pub use push_relabel::PushRelabelFifo;
pub use shortest_augmenting_path::ShortestAugmentingPath;

/// A maximum-flow engine. `solve` drives the network to a maximum flow and
/// returns its value; the per-arc assignment stays on the network.
pub trait MaxFlowSolver<F: Flow> {
    fn solve(
        &mut self,
        network: &mut Network<F>,
        source: NodeId,
        sink: NodeId,
    ) -> Result<F, FlowError>;
}

pub(crate) fn validate_endpoints<F: Flow>(
    network: &Network<F>,
    source: NodeId,
    sink: NodeId,
) -> Result<(), FlowError> {
    if source.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(source.0));
    }
    if sink.0 >= network.num_nodes() {
        return Err(FlowError::InvalidNode(sink.0));
    }
    Ok(())
}

/// Sum of residual capacity leaving `source`; an exact upper bound on how
/// much more flow any augmentation can send.
pub(crate) fn source_capacity<F: Flow>(network: &Network<F>, source: usize) -> F {
    let mut upper = F::zero();
    for k in 0..network.res_degree(source) {
        upper += network.res_cap(network.res_at(source, k));
    }
    upper
}

/// Residual distance to `sink` for every node, by breadth-first search
/// backwards from the sink. Unreachable nodes get `num_nodes`. With a
/// `threshold`, only residual arcs of capacity at least `threshold` count
/// (capacity scaling's delta-residual network).
pub(crate) fn update_distances<F: Flow>(
    network: &Network<F>,
    source: usize,
    sink: usize,
    distances: &mut [usize],
    threshold: Option<F>,
) {
    let n = network.num_nodes();
    distances.fill(n);
    distances[sink] = 0;

    let mut que = VecDeque::from([sink]);
    while let Some(v) = que.pop_front() {
        for k in 0..network.res_degree(v) {
            // the arc to -> v is the reverse of this one
            let index = network.res_at(v, k);
            let to = network.res_to(index);
            let cap = network.res_cap(network.rev(index));
            let usable = match threshold {
                Some(delta) => cap >= delta,
                None => cap > F::zero(),
            };
            if usable && distances[to] == n {
                distances[to] = distances[v] + 1;
                if to != source {
                    que.push_back(to);
                }
            }
        }
    }
}
