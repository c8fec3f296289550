use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError};

/// Dinic variant that relabels distances on retreat instead of rebuilding
/// the level graph each phase: the distance of a dead-end node becomes one
/// more than its nearest residual neighbor, and the search ends once the
/// source's distance reaches `n`.
#[derive(Debug, Default)]
pub struct ShortestAugmentingPath {
    distances: Vec<usize>,
    current_arc: Vec<usize>,
}

impl<F: Flow> MaxFlowSolver<F> for ShortestAugmentingPath {
    fn solve(
        &mut self,
        network: &mut Network<F>,
        source: NodeId,
        sink: NodeId,
    ) -> Result<F, FlowError> {
        maxflow::validate_endpoints(network, source, sink)?;
        if source == sink {
            return Ok(F::zero());
        }

        let n = network.num_nodes();
        self.distances.clear();
        self.distances.resize(n, n);
        self.current_arc.clear();
        self.current_arc.resize(n, 0);

        maxflow::update_distances(network, source.0, sink.0, &mut self.distances, None);

        let upper = maxflow::source_capacity(network, source.0);
        while self.distances[source.0] < n {
            self.current_arc.fill(0);
            let _ = self.dfs(network, source.0, sink.0, upper);
        }

        Ok(network.total_flow_value(source))
    }
}

impl ShortestAugmentingPath {
    fn dfs<F: Flow>(
        &mut self,
        network: &mut Network<F>,
        u: usize,
        sink: usize,
        upper: F,
    ) -> Option<F> {
        if u == sink {
            return Some(upper);
        }

        for k in self.current_arc[u]..network.res_degree(u) {
            self.current_arc[u] = k;
            let index = network.res_at(u, k);
            let residual = network.res_cap(index);
            let to = network.res_to(index);
            if residual > F::zero() && self.distances[u] == self.distances[to] + 1 {
                // advance
                if let Some(delta) = self.dfs(network, to, sink, upper.min(residual)) {
                    network.push_unchecked(index, delta);
                    return Some(delta);
                }
            }
        }

        // retreat: relabel to one past the nearest residual neighbor
        let n = network.num_nodes();
        self.distances[u] = n;
        for k in 0..network.res_degree(u) {
            let index = network.res_at(u, k);
            if network.res_cap(index) > F::zero() {
                let to = network.res_to(index);
                self.distances[u] = self.distances[u].min(self.distances[to] + 1);
            }
        }

        None
    }
}
