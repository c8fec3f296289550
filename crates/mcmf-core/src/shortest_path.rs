//! Shortest-path / potential engine shared by the cost-based solvers:
//! Bellman-Ford over the residual graph and Dijkstra over non-negative
//! reduced costs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::Network;
use crate::Flow;

#[derive(Debug)]
pub(crate) struct ShortestPaths<F> {
    pub dist: Vec<Option<F>>,
    /// Residual index of the tree arc entering each node.
    pub prev: Vec<Option<usize>>,
    pub visited: Vec<bool>,
}

/// Dijkstra from `source` over residual arcs with positive capacity, using
/// reduced costs as lengths. Stops early once `stop_at` is settled.
///
/// `clamp_negative` replaces negative reduced costs by zero, the length
/// function the out-of-kilter repair step uses while some arcs are still out
/// of kilter; the other engines keep reduced costs non-negative and pass
/// `false`.
pub(crate) fn dijkstra_reduced<F: Flow>(
    network: &Network<F>,
    source: usize,
    stop_at: Option<usize>,
    clamp_negative: bool,
) -> ShortestPaths<F> {
    let n = network.num_nodes();
    let mut dist: Vec<Option<F>> = vec![None; n];
    let mut prev = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[source] = Some(F::zero());
    heap.push((Reverse(F::zero()), source));

    while let Some((Reverse(d), u)) = heap.pop() {
        if visited[u] {
            continue;
        }
        visited[u] = true;

        if stop_at == Some(u) {
            break;
        }

        for k in 0..network.res_degree(u) {
            let index = network.res_at(u, k);
            if network.res_cap(index) <= F::zero() {
                continue;
            }

            let mut length = network.res_reduced_cost(index);
            if clamp_negative && length < F::zero() {
                length = F::zero();
            }
            debug_assert!(length >= F::zero());

            let v = network.res_to(index);
            let nd = d + length;
            if dist[v].is_none() || dist[v].unwrap() > nd {
                dist[v] = Some(nd);
                prev[v] = Some(index);
                heap.push((Reverse(nd), v));
            }
        }
    }

    ShortestPaths {
        dist,
        prev,
        visited,
    }
}

/// Bellman-Ford from `source` over residual arcs with positive capacity,
/// using plain (not reduced) costs. Used to initialize potentials when the
/// input carries negative-cost arcs.
pub(crate) fn bellman_ford<F: Flow>(
    network: &Network<F>,
    source: usize,
) -> (Vec<Option<F>>, Vec<Option<usize>>) {
    let n = network.num_nodes();
    let mut dist: Vec<Option<F>> = vec![None; n];
    let mut prev = vec![None; n];
    dist[source] = Some(F::zero());

    for _ in 0..n {
        let mut updated = false;
        for u in 0..n {
            let du = match dist[u] {
                Some(d) => d,
                None => continue,
            };
            for k in 0..network.res_degree(u) {
                let index = network.res_at(u, k);
                if network.res_cap(index) <= F::zero() {
                    continue;
                }
                let v = network.res_to(index);
                let nd = du + network.res_cost(index);
                if dist[v].is_none() || dist[v].unwrap() > nd {
                    dist[v] = Some(nd);
                    prev[v] = Some(index);
                    updated = true;
                }
            }
        }
        if !updated {
            break;
        }
    }

    (dist, prev)
}

/// Finds a negative-cost cycle in the residual graph, returned as residual
/// indices in traversal order, or `None` when the flow is cost-optimal.
pub(crate) fn find_negative_residual_cycle<F: Flow>(network: &Network<F>) -> Option<Vec<usize>> {
    let n = network.num_nodes();
    if n == 0 {
        return None;
    }
    let mut dist = vec![F::zero(); n];
    let mut prev = vec![usize::MAX; n];
    let mut last = usize::MAX;

    for _ in 0..n {
        let mut updated = false;
        for u in 0..n {
            for k in 0..network.res_degree(u) {
                let index = network.res_at(u, k);
                if network.res_cap(index) <= F::zero() {
                    continue;
                }
                let v = network.res_to(index);
                let nd = dist[u] + network.res_cost(index);
                if nd < dist[v] {
                    dist[v] = nd;
                    prev[v] = index;
                    last = v;
                    updated = true;
                }
            }
        }
        if !updated {
            return None;
        }
    }

    // still relaxing after n rounds: walk back n steps to land on the cycle
    let mut v = last;
    for _ in 0..n {
        v = network.res_from(prev[v]);
    }

    let start = v;
    let mut cycle = Vec::new();
    loop {
        let index = prev[v];
        cycle.push(index);
        v = network.res_from(index);
        if v == start {
            break;
        }
    }
    cycle.reverse();
    Some(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Network, NodeId};

    #[test]
    fn dijkstra_follows_cheapest_residual_path() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(0), NodeId(1), 1, 5).unwrap();
        network.add_arc(NodeId(0), NodeId(2), 1, 1).unwrap();
        network.add_arc(NodeId(2), NodeId(1), 1, 1).unwrap();

        let tree = dijkstra_reduced(&network, 0, None, false);
        assert_eq!(tree.dist[1], Some(2));
        // tree arc into node 1 is the cheap two-hop route
        assert_eq!(tree.prev[1], Some(2));
    }

    #[test]
    fn saturated_arcs_are_invisible() {
        let mut network: Network<i64> = Network::new(2);
        network.add_arc(NodeId(0), NodeId(1), 2, 1).unwrap();
        network.push(0, 2).unwrap();

        let tree = dijkstra_reduced(&network, 0, None, false);
        assert_eq!(tree.dist[1], None);
        let (dist, _) = bellman_ford(&network, 1);
        // the reverse residual arc is usable instead
        assert_eq!(dist[0], Some(-1));
    }

    #[test]
    fn residual_cycle_appears_after_a_bad_push() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(0), NodeId(1), 1, 1).unwrap();
        network.add_arc(NodeId(1), NodeId(2), 1, 1).unwrap();
        network.add_arc(NodeId(0), NodeId(2), 1, 1).unwrap();
        assert!(find_negative_residual_cycle(&network).is_none());

        // route 0 -> 1 -> 2 at cost 2 even though the direct arc costs 1:
        // the residual graph now has the cycle 2 -> 1 -> 0 -> 2 of cost -1
        network.push(0, 1).unwrap();
        network.push(1, 1).unwrap();
        let cycle = find_negative_residual_cycle(&network).unwrap();
        let cost: i64 = cycle.iter().map(|&i| network.res_cost(i)).sum();
        assert!(cost < 0);
        assert_eq!(cycle.len(), 3);
    }
}
