use log::debug;

use crate::graph::{Network, NodeId};
use crate::mincost::{self, MinCostFlowSolver, Status};
use crate::shortest_path;
use crate::{Flow, FlowError};

/// Repeatedly augments along a cheapest residual path under reduced costs,
/// updating node potentials from the Dijkstra distances after every
/// augmentation. Each path is cheapest in original costs too, so the flow
/// stays cost-optimal for its value throughout.
///
/// Negative arc costs are handled by a one-time Bellman-Ford potential
/// initialization; a negative-cost cycle in the input is rejected.
#[derive(Debug, Default)]
pub struct SuccessiveShortestPath;

impl<F: Flow> MinCostFlowSolver<F> for SuccessiveShortestPath {
    fn solve(
        &mut self,
        network: &mut Network<F>,
        source: NodeId,
        sink: NodeId,
        target: F,
    ) -> Result<Status, FlowError> {
        if let Some(status) = mincost::prepare(network, source, sink, target)? {
            return Ok(status);
        }

        init_potentials(network, source)?;

        let mut remaining = target;
        while remaining > F::zero() {
            let tree = shortest_path::dijkstra_reduced(network, source.0, Some(sink.0), false);
            if !tree.visited[sink.0] {
                return Ok(Status::Infeasible);
            }

            // d(t) is final once the sink is settled; treating every
            // unsettled node as if it sat at d(t) keeps reduced costs
            // non-negative without finishing the search
            let d_sink = tree.dist[sink.0].unwrap_or_else(F::zero);
            for u in 0..network.num_nodes() {
                if tree.visited[u] {
                    let du = tree.dist[u].unwrap_or_else(F::zero);
                    network.potentials[u] = network.potentials[u] - du + d_sink;
                }
            }

            let mut delta = remaining;
            let mut v = sink.0;
            while v != source.0 {
                let index = tree.prev[v].expect("settled node has a tree arc");
                delta = delta.min(network.res_cap(index));
                v = network.res_from(index);
            }

            let mut v = sink.0;
            while v != source.0 {
                let index = tree.prev[v].expect("settled node has a tree arc");
                network.push_unchecked(index, delta);
                v = network.res_from(index);
            }

            debug!("ssp augmented {delta:?}, remaining {:?}", remaining - delta);
            remaining -= delta;
        }

        Ok(Status::Optimal)
    }
}

/// Sets potentials to shortest-path distances from the source when the
/// input carries negative costs, so the first Dijkstra already sees
/// non-negative reduced costs.
pub(crate) fn init_potentials<F: Flow>(
    network: &mut Network<F>,
    source: NodeId,
) -> Result<(), FlowError> {
    if !network.has_negative_cost() {
        return Ok(());
    }
    if network.has_negative_cost_cycle() {
        return Err(FlowError::NegativeCycle);
    }

    let (dist, _) = shortest_path::bellman_ford(network, source.0);
    for (u, d) in dist.into_iter().enumerate() {
        if let Some(d) = d {
            network.potentials[u] -= d;
        }
    }
    Ok(())
}
