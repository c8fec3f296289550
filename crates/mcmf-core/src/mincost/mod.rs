//! Minimum-cost flow engines. Every solver routes exactly `target` units
//! from source to sink, reports infeasibility as a typed status, and leaves
//! the flow assignment and (for the potential-based engines) dual
//! potentials on the network.

pub mod cost_scaling;
pub mod cycle_canceling;
pub mod out_of_kilter;
pub mod primal_dual;
pub mod successive_shortest_path;

use std::collections::VecDeque;

use crate::graph::{Network, NodeId};
use crate::{maxflow, Flow, FlowError};

pub use cost_scaling::CostScaling;
pub use cycle_canceling::CycleCanceling;
pub use out_of_kilter::OutOfKilter;
pub use primal_dual::PrimalDual;
pub use successive_shortest_path::SuccessiveShortestPath;

/// Typed solve outcome. Infeasible targets are an answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
}

/// A minimum-cost flow engine. On `Status::Optimal` the network carries a
/// flow of value exactly `target` of minimum total cost.
pub trait MinCostFlowSolver<F: Flow> {
    fn solve(
        &mut self,
        network: &mut Network<F>,
        source: NodeId,
        sink: NodeId,
        target: F,
    ) -> Result<Status, FlowError>;
}

/// Shared entry checks: validates the endpoints, clears flow and potentials,
/// and settles the trivial targets so engines only see `target > 0` with
/// distinct endpoints.
pub(crate) fn prepare<F: Flow>(
    network: &mut Network<F>,
    source: NodeId,
    sink: NodeId,
    target: F,
) -> Result<Option<Status>, FlowError> {
    maxflow::validate_endpoints(network, source, sink)?;
    network.reset_flow();
    network.reset_potentials();

    if target < F::zero() {
        return Ok(Some(Status::Infeasible));
    }
    if target == F::zero() {
        return Ok(Some(Status::Optimal));
    }
    if source == sink {
        return Ok(Some(Status::Infeasible));
    }
    Ok(None)
}

/// Pushes up to `target` units from source to sink along breadth-first
/// augmenting paths, ignoring costs. Returns whether the full target was
/// reached. The primal engines that optimize an existing flow start here.
pub(crate) fn establish_flow<F: Flow>(
    network: &mut Network<F>,
    source: NodeId,
    sink: NodeId,
    target: F,
) -> bool {
    let n = network.num_nodes();
    let mut remaining = target;
    let mut prev = vec![(usize::MAX, usize::MAX); n];
    let mut visited = vec![false; n];

    while remaining > F::zero() {
        prev.fill((usize::MAX, usize::MAX));
        visited.fill(false);

        let mut queue = VecDeque::from([source.0]);
        visited[source.0] = true;
        'search: while let Some(u) = queue.pop_front() {
            for k in 0..network.res_degree(u) {
                let index = network.res_at(u, k);
                let to = network.res_to(index);
                if visited[to] || network.res_cap(index) == F::zero() {
                    continue;
                }
                visited[to] = true;
                prev[to] = (u, index);
                if to == sink.0 {
                    break 'search;
                }
                queue.push_back(to);
            }
        }

        if !visited[sink.0] {
            return false;
        }

        let mut delta = remaining;
        let mut v = sink.0;
        while v != source.0 {
            let (u, index) = prev[v];
            delta = delta.min(network.res_cap(index));
            v = u;
        }

        let mut v = sink.0;
        while v != source.0 {
            let (u, index) = prev[v];
            network.push_unchecked(index, delta);
            v = u;
        }
        remaining -= delta;
    }

    true
}
