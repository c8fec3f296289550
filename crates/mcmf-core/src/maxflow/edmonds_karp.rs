use std::collections::VecDeque;

use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::{Flow, FlowError};

/// Breadth-first augmenting paths: always augments along a path with the
/// fewest arcs, which bounds the number of augmentations by `O(n * m)`.
#[derive(Debug, Default)]
pub struct EdmondsKarp {
    prev: Vec<(usize, usize)>,
    visited: Vec<bool>,
}

impl<F: Flow> MaxFlowSolver<F> for EdmondsKarp {
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
        self.prev.clear();
        self.prev.resize(n, (usize::MAX, usize::MAX));
        self.visited.clear();
        self.visited.resize(n, false);

        loop {
            self.prev.fill((usize::MAX, usize::MAX));
            self.visited.fill(false);

            // bfs
            let mut queue = VecDeque::from([source.0]);
            self.visited[source.0] = true;
            'search: while let Some(u) = queue.pop_front() {
                for k in 0..network.res_degree(u) {
                    let index = network.res_at(u, k);
                    let to = network.res_to(index);
                    if self.visited[to] || network.res_cap(index) == F::zero() {
                        continue;
                    }
                    self.visited[to] = true;
                    self.prev[to] = (u, index);
                    if to == sink.0 {
                        break 'search;
                    }
                    queue.push_back(to);
                }
            }

            if !self.visited[sink.0] {
                break;
            }

            // bottleneck
            let mut delta = network.res_cap(self.prev[sink.0].1);
            let mut v = sink.0;
            while v != source.0 {
                let (u, index) = self.prev[v];
                delta = delta.min(network.res_cap(index));
                v = u;
            }

            // augment
            let mut v = sink.0;
            while v != source.0 {
                let (u, index) = self.prev[v];
                network.push_unchecked(index, delta);
                v = u;
            }
        }

        Ok(network.total_flow_value(source))
    }
}
