use log::debug;

use crate::graph::{Network, NodeId};
use crate::mincost::{self, MinCostFlowSolver, Status};
use crate::shortest_path;
use crate::{Flow, FlowError};

/// Out-of-kilter method. Starts from any flow of the target value, then
/// repairs residual arcs one at a time: an arc with negative reduced cost
/// and positive residual capacity is out of kilter by that capacity, and
/// pushing flow around a cycle through it (found by Dijkstra with reduced
/// costs clamped at zero) or lowering potentials on the far side of the
/// search brings it in. In-kilter arcs never fall back out, so one sweep
/// over the residual arcs suffices.
#[derive(Debug, Default)]
pub struct OutOfKilter;

impl<F: Flow> MinCostFlowSolver<F> for OutOfKilter {
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

        if !mincost::establish_flow(network, source, sink, target) {
            return Ok(Status::Infeasible);
        }

        for index in 0..network.num_residual_arcs() {
            while kilter_number(network, index) > F::zero() {
                let p = network.res_from(index);
                let q = network.res_to(index);
                let tree = shortest_path::dijkstra_reduced(network, q, None, true);

                if !tree.visited[p] {
                    // the arc lies on no residual cycle, so no push can fix
                    // it; lowering the far side's potentials enough does
                    let violation = -network.res_reduced_cost(index);
                    let reach = tree
                        .dist
                        .iter()
                        .flatten()
                        .fold(F::zero(), |acc, &d| acc.max(d));
                    for u in 0..network.num_nodes() {
                        if !tree.visited[u] {
                            network.potentials[u] -= reach + violation;
                        }
                    }
                    debug!("out-of-kilter arc {index} repaired by potentials alone");
                    break;
                }

                for u in 0..network.num_nodes() {
                    if tree.visited[u] {
                        let du = tree.dist[u].unwrap_or_else(F::zero);
                        network.potentials[u] -= du;
                    }
                }

                if network.res_reduced_cost(index) >= F::zero() {
                    continue;
                }

                // cycle: the kilter arc p -> q plus the cheapest residual
                // path q -> p
                let mut path = Vec::new();
                let mut v = p;
                while v != q {
                    let tree_arc = tree.prev[v].expect("reached node has a tree arc");
                    path.push(tree_arc);
                    v = network.res_from(tree_arc);
                }

                let mut delta = network.res_cap(index);
                for &arc in &path {
                    delta = delta.min(network.res_cap(arc));
                }
                debug!("out-of-kilter arc {index} pushed around a cycle by {delta:?}");
                network.push_unchecked(index, delta);
                for &arc in &path {
                    network.push_unchecked(arc, delta);
                }
            }
        }

        Ok(Status::Optimal)
    }
}

/// How far a residual arc is from complementary slackness: its full
/// residual capacity when the reduced cost is negative, zero otherwise.
fn kilter_number<F: Flow>(network: &Network<F>, index: usize) -> F {
    if network.res_cap(index) > F::zero() && network.res_reduced_cost(index) < F::zero() {
        network.res_cap(index)
    } else {
        F::zero()
    }
}
