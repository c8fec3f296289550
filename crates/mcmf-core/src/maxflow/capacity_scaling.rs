use log::debug;

use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError, SolveOptions};

/// Augments only along residual arcs of capacity at least `delta`, halving
/// `delta` down to one. Each scaling phase runs a level-graph search over
/// the delta-residual network, so every augmentation moves at least `delta`
/// units and the number of augmentations per phase stays `O(m)`.
#[derive(Debug, Default)]
pub struct CapacityScaling {
    distances: Vec<usize>,
    current_arc: Vec<usize>,
    options: SolveOptions,
}

impl CapacityScaling {
    pub fn with_options(options: SolveOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl<F: Flow> MaxFlowSolver<F> for CapacityScaling {
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

        let max_upper = network
            .arcs()
            .fold(F::zero(), |acc, (_, arc)| acc.max(arc.upper));
        if max_upper == F::zero() {
            return Ok(F::zero());
        }

        // largest power of two not exceeding the largest capacity
        let two = F::one() + F::one();
        let mut delta = F::one();
        while delta <= max_upper / two {
            delta *= two;
        }

        let mut budget = self.options.budget();
        loop {
            budget.begin_phase()?;
            debug!("capacity scaling delta={delta:?}");

            loop {
                maxflow::update_distances(
                    network,
                    source.0,
                    sink.0,
                    &mut self.distances,
                    Some(delta),
                );
                if self.distances[source.0] >= n {
                    break;
                }
                self.current_arc.fill(0);
                let upper = maxflow::source_capacity(network, source.0);
                while self
                    .dfs(network, source.0, sink.0, upper, delta)
                    .is_some()
                {}
            }

            if delta == F::one() {
                break;
            }
            delta = delta / two;
        }

        Ok(network.total_flow_value(source))
    }
}

impl CapacityScaling {
    fn dfs<F: Flow>(
        &mut self,
        network: &mut Network<F>,
        u: usize,
        sink: usize,
        flow: F,
        delta: F,
    ) -> Option<F> {
        if u == sink {
            return Some(flow);
        }

        for k in self.current_arc[u]..network.res_degree(u) {
            self.current_arc[u] = k;
            let index = network.res_at(u, k);
            let residual = network.res_cap(index);
            let to = network.res_to(index);
            if residual < delta || self.distances[u] != self.distances[to] + 1 {
                continue;
            }

            if let Some(pushed) = self.dfs(network, to, sink, flow.min(residual), delta) {
                network.push_unchecked(index, pushed);
                return Some(pushed);
            }
        }

        self.current_arc[u] = network.res_degree(u);
        self.distances[u] = network.num_nodes();
        None
    }
}
