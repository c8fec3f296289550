use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError};

/// Depth-first augmenting paths. With integer capacities bounded by `U`,
/// terminates after at most `O(m * U)` augmentations.
#[derive(Debug, Default)]
pub struct FordFulkerson {
    visited: Vec<bool>,
}

impl<F: Flow> MaxFlowSolver<F> for FordFulkerson {
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

        self.visited.clear();
        self.visited.resize(network.num_nodes(), false);

        let upper = maxflow::source_capacity(network, source.0);
        loop {
            self.visited.fill(false);
            if self.dfs(network, source.0, sink.0, upper).is_none() {
                break;
            }
        }

        Ok(network.total_flow_value(source))
    }
}

impl FordFulkerson {
    fn dfs<F: Flow>(
        &mut self,
        network: &mut Network<F>,
        u: usize,
        sink: usize,
        flow: F,
    ) -> Option<F> {
        if u == sink {
            return Some(flow);
        }
        self.visited[u] = true;

        for k in 0..network.res_degree(u) {
            let index = network.res_at(u, k);
            let residual = network.res_cap(index);
            let to = network.res_to(index);
            if self.visited[to] || residual == F::zero() {
                continue;
            }

            if let Some(delta) = self.dfs(network, to, sink, flow.min(residual)) {
                network.push_unchecked(index, delta);
                return Some(delta);
            }
        }
        None
    }
}
