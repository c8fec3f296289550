use std::collections::VecDeque;

use log::debug;

use crate::graph::{Network, NodeId};
use crate::mincost::{self, successive_shortest_path, MinCostFlowSolver, Status};
use crate::shortest_path;
use crate::{Flow, FlowError};

/// Alternates a dual step with a primal step: Dijkstra under reduced costs
/// turns every cheapest path into a chain of zero-reduced-cost arcs, then a
/// blocking flow over exactly those arcs routes as much of the remaining
/// target as the admissible network allows. Sends the whole bottleneck of a
/// price level per round instead of one path at a time.
#[derive(Debug, Default)]
pub struct PrimalDual {
    distances: Vec<usize>,
    current_arc: Vec<usize>,
}

impl<F: Flow> MinCostFlowSolver<F> for PrimalDual {
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
        successive_shortest_path::init_potentials(network, source)?;

        let n = network.num_nodes();
        self.distances.clear();
        self.distances.resize(n, n);
        self.current_arc.clear();
        self.current_arc.resize(n, 0);

        let mut remaining = target;
        while remaining > F::zero() {
            // dual step: make the cheapest source-sink chains zero-cost
            let tree = shortest_path::dijkstra_reduced(network, source.0, None, false);
            if !tree.visited[sink.0] {
                return Ok(Status::Infeasible);
            }
            for u in 0..n {
                if tree.visited[u] {
                    let du = tree.dist[u].unwrap_or_else(F::zero);
                    network.potentials[u] -= du;
                }
            }

            // primal step: blocking flow over the admissible arcs
            self.zero_cost_distances(network, source.0, sink.0);
            if self.distances[source.0] >= n {
                continue;
            }
            self.current_arc.fill(0);
            let pushed = self.blocking_flow(network, source.0, sink.0, remaining);
            debug!("primal-dual pushed {pushed:?} of {remaining:?}");
            remaining -= pushed;
        }

        Ok(Status::Optimal)
    }
}

impl PrimalDual {
    /// Backward BFS from the sink over residual arcs of zero reduced cost.
    fn zero_cost_distances<F: Flow>(&mut self, network: &Network<F>, source: usize, sink: usize) {
        let n = network.num_nodes();
        self.distances.fill(n);
        self.distances[sink] = 0;

        let mut que = VecDeque::from([sink]);
        while let Some(v) = que.pop_front() {
            for k in 0..network.res_degree(v) {
                let back = network.rev(network.res_at(v, k));
                let to = network.res_from(back);
                if network.res_cap(back) > F::zero()
                    && network.res_reduced_cost(back) == F::zero()
                    && self.distances[to] == n
                {
                    self.distances[to] = self.distances[v] + 1;
                    if to != source {
                        que.push_back(to);
                    }
                }
            }
        }
    }

    fn blocking_flow<F: Flow>(
        &mut self,
        network: &mut Network<F>,
        u: usize,
        sink: usize,
        upper: F,
    ) -> F {
        if u == sink {
            return upper;
        }

        let n = network.num_nodes();
        let mut res = F::zero();
        for k in self.current_arc[u]..network.res_degree(u) {
            self.current_arc[u] = k;
            let index = network.res_at(u, k);
            let residual = network.res_cap(index);
            let to = network.res_to(index);

            if residual == F::zero()
                || network.res_reduced_cost(index) != F::zero()
                || self.distances[u] != self.distances[to] + 1
            {
                continue;
            }

            let delta = self.blocking_flow(network, to, sink, residual.min(upper - res));
            if delta > F::zero() {
                network.push_unchecked(index, delta);
                res += delta;
                if res == upper {
                    return res;
                }
            }
        }

        self.current_arc[u] = network.res_degree(u);
        self.distances[u] = n;

        res
    }
}
