use log::debug;

use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError, SolveOptions};

/// Level graph plus blocking flow. Each phase recomputes residual
/// distances, then a depth-first search with current-arc pointers pushes a
/// blocking flow along arcs that descend one level toward the sink. The
/// source-sink distance strictly increases per phase, so there are at most
/// `n` phases of `O(n * m)` work each.
#[derive(Debug, Default)]
pub struct Dinic {
    distances: Vec<usize>,
    current_arc: Vec<usize>,
    options: SolveOptions,
}

impl Dinic {
    pub fn with_options(options: SolveOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl<F: Flow> MaxFlowSolver<F> for Dinic {
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

        let mut budget = self.options.budget();
        let upper = maxflow::source_capacity(network, source.0);
        let mut flow = F::zero();
        let mut phase = 0;
        while flow < upper {
            budget.begin_phase()?;
            maxflow::update_distances(network, source.0, sink.0, &mut self.distances, None);

            // no s-t path
            if self.distances[source.0] >= n {
                break;
            }

            self.current_arc.fill(0);
            let delta = self.blocking_flow(network, source.0, sink.0, upper - flow);
            debug!(
                "dinic phase={phase} level={} pushed={delta:?}",
                self.distances[source.0]
            );
            flow += delta;
            phase += 1;
        }

        Ok(network.total_flow_value(source))
    }
}

impl Dinic {
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

            if residual == F::zero() || self.distances[u] != self.distances[to] + 1 {
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

        // dead end within this phase
        self.current_arc[u] = network.res_degree(u);
        self.distances[u] = n;

        res
    }
}
