use std::collections::VecDeque;

use log::debug;

use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError};

/// FIFO push-relabel. Saturates every arc out of the source, then discharges
/// active nodes in first-in first-out order, pushing excess downhill along
/// admissible arcs and relabeling when none remain. Nodes relabeled to `n`
/// or above can no longer reach the sink; their leftover excess is routed
/// back to the source once the preflow is maximal.
///
/// Two heuristics keep the label work down: gap relabeling empties a whole
/// band of labels when a level becomes vacant, and an optional global
/// relabel recomputes exact distances every `alpha * n` relabels.
#[derive(Debug, Default)]
pub struct PushRelabelFifo {
    distances: Vec<usize>,
    distance_count: Vec<usize>,
    current_arc: Vec<usize>,
    in_queue: Vec<bool>,
    alpha: usize,
}

impl PushRelabelFifo {
    /// Recompute exact distance labels every `alpha * n` relabels. Zero
    /// disables the global relabel heuristic.
    pub fn with_global_relabeling(alpha: usize) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }
}

impl<F: Flow> MaxFlowSolver<F> for PushRelabelFifo {
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
        let mut excesses = vec![F::zero(); n];
        self.distances.clear();
        self.distances.resize(n, n);
        self.distance_count.clear();
        self.distance_count.resize(n + 1, 0);
        self.current_arc.clear();
        self.current_arc.resize(n, 0);
        self.in_queue.clear();
        self.in_queue.resize(n, false);

        maxflow::update_distances(network, source.0, sink.0, &mut self.distances, None);
        self.distances[source.0] = n;
        self.rebuild_distance_count(n);

        // saturate everything leaving the source
        let mut active = VecDeque::new();
        for k in 0..network.res_degree(source.0) {
            let index = network.res_at(source.0, k);
            let residual = network.res_cap(index);
            if residual == F::zero() {
                continue;
            }
            let to = network.res_to(index);
            network.push_unchecked(index, residual);
            excesses[to] += residual;
            if to != sink.0 && !self.in_queue[to] {
                self.in_queue[to] = true;
                active.push_back(to);
            }
        }

        let mut relabels = 0usize;
        while let Some(u) = active.pop_front() {
            self.in_queue[u] = false;

            while excesses[u] > F::zero() && self.distances[u] < n {
                if self.current_arc[u] == network.res_degree(u) {
                    self.relabel(network, u, n);
                    relabels += 1;
                    if self.alpha != 0 && relabels >= self.alpha * n {
                        relabels = 0;
                        debug!("push-relabel global relabel");
                        maxflow::update_distances(
                            network,
                            source.0,
                            sink.0,
                            &mut self.distances,
                            None,
                        );
                        self.distances[source.0] = n;
                        self.rebuild_distance_count(n);
                        self.current_arc.fill(0);
                    }
                    continue;
                }

                let index = network.res_at(u, self.current_arc[u]);
                let residual = network.res_cap(index);
                let to = network.res_to(index);
                if residual > F::zero() && self.distances[u] == self.distances[to] + 1 {
                    let delta = excesses[u].min(residual);
                    network.push_unchecked(index, delta);
                    excesses[u] -= delta;
                    excesses[to] += delta;
                    if to != source.0 && to != sink.0 && !self.in_queue[to] {
                        self.in_queue[to] = true;
                        active.push_back(to);
                    }
                } else {
                    self.current_arc[u] += 1;
                }
            }
        }

        // stranded excess flows back to the source
        for v in 0..n {
            if v == source.0 || v == sink.0 {
                continue;
            }
            while excesses[v] > F::zero() {
                let mut visited = vec![false; n];
                visited[sink.0] = true;
                let delta = return_excess(network, v, source.0, excesses[v], &mut visited);
                if delta == F::zero() {
                    break;
                }
                excesses[v] -= delta;
            }
        }

        Ok(network.total_flow_value(source))
    }
}

impl PushRelabelFifo {
    fn rebuild_distance_count(&mut self, n: usize) {
        self.distance_count.fill(0);
        for &d in &self.distances {
            if d < n {
                self.distance_count[d] += 1;
            }
        }
    }

    fn relabel<F: Flow>(&mut self, network: &Network<F>, u: usize, n: usize) {
        let old = self.distances[u];
        let mut new = n;
        for k in 0..network.res_degree(u) {
            let index = network.res_at(u, k);
            if network.res_cap(index) > F::zero() {
                new = new.min(self.distances[network.res_to(index)] + 1);
            }
        }

        self.distance_count[old] -= 1;
        if self.distance_count[old] == 0 {
            // gap: nothing is left at the old level, so every node above it
            // is cut off from the sink
            for d in self.distances.iter_mut() {
                if *d > old && *d < n {
                    self.distance_count[*d] -= 1;
                    *d = n;
                }
            }
            new = n;
        }

        self.distances[u] = new;
        if new < n {
            self.distance_count[new] += 1;
        }
        self.current_arc[u] = 0;
    }
}

fn return_excess<F: Flow>(
    network: &mut Network<F>,
    u: usize,
    source: usize,
    limit: F,
    visited: &mut [bool],
) -> F {
    if u == source {
        return limit;
    }
    visited[u] = true;

    for k in 0..network.res_degree(u) {
        let index = network.res_at(u, k);
        let residual = network.res_cap(index);
        let to = network.res_to(index);
        if visited[to] || residual == F::zero() {
            continue;
        }
        let delta = return_excess(network, to, source, limit.min(residual), visited);
        if delta > F::zero() {
            network.push_unchecked(index, delta);
            return delta;
        }
    }
    F::zero()
}
