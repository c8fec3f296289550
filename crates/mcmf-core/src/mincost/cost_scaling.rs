use std::collections::VecDeque;

use log::debug;

use crate::graph::{Network, NodeId};
use crate::maxflow::{self, MaxFlowSolver};
use crate::mincost::{self, MinCostFlowSolver, Status};
use crate::{Flow, FlowError, SolveOptions};

/// Epsilon halving factor and cost multiplier base.
const SCALING_FACTOR: usize = 16;

/// Cost scaling with push-relabel refinement. Costs are multiplied by
/// `SCALING_FACTOR * n` so that an epsilon below one certifies exact
/// optimality; each phase restores epsilon-optimality by saturating every
/// negative-reduced-cost arc and discharging the resulting excesses, then
/// divides epsilon by the scaling factor.
///
/// The push-relabel refinement loops forever on an infeasible target, so
/// feasibility is settled with a plain max-flow probe up front.
#[derive(Debug, Default)]
pub struct CostScaling {
    options: SolveOptions,
}

impl CostScaling {
    pub fn with_options(options: SolveOptions) -> Self {
        Self { options }
    }
}

impl<F: Flow> MinCostFlowSolver<F> for CostScaling {
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

        let mut probe = network.clone();
        let max_flow = maxflow::Dinic::default().solve(&mut probe, source, sink)?;
        if max_flow < target {
            return Ok(Status::Infeasible);
        }

        let n = network.num_nodes();
        let factor =
            F::from_usize(SCALING_FACTOR * n).expect("scaling factor fits the flow type");
        let alpha = F::from_usize(SCALING_FACTOR).expect("scaling factor fits the flow type");

        let gamma = network.arcs().fold(F::zero(), |acc, (_, arc)| {
            acc.max(if arc.cost < F::zero() {
                -arc.cost
            } else {
                arc.cost
            })
        });

        let mut pi = vec![F::zero(); n];
        let mut epsilon = (gamma * factor).max(F::one());
        let mut budget = self.options.budget();
        loop {
            budget.begin_phase()?;
            debug!("cost scaling epsilon={epsilon:?}");
            refine(network, &mut pi, epsilon, source.0, sink.0, target, factor);
            if epsilon == F::one() {
                break;
            }
            epsilon = (epsilon / alpha).max(F::one());
        }

        settle_potentials(network);
        Ok(Status::Optimal)
    }
}

#[inline]
fn scaled_reduced_cost<F: Flow>(network: &Network<F>, pi: &[F], factor: F, index: usize) -> F {
    network.res_cost(index) * factor - pi[network.res_from(index)]
        + pi[network.res_to(index)]
}

/// Restores epsilon-optimality. Saturating every arc of negative reduced
/// cost leaves excesses and deficits on the nodes; FIFO discharging with
/// relabels of `min reduced cost + epsilon` drains them back to zero.
fn refine<F: Flow>(
    network: &mut Network<F>,
    pi: &mut [F],
    epsilon: F,
    source: usize,
    sink: usize,
    target: F,
    factor: F,
) {
    let n = network.num_nodes();

    for index in 0..network.num_residual_arcs() {
        if network.res_cap(index) > F::zero()
            && scaled_reduced_cost(network, pi, factor, index) < F::zero()
        {
            let cap = network.res_cap(index);
            network.push_unchecked(index, cap);
        }
    }

    let mut excess = vec![F::zero(); n];
    excess[source] += target;
    excess[sink] -= target;
    for (_, arc) in network.arcs() {
        excess[arc.tail.0] -= arc.flow;
        excess[arc.head.0] += arc.flow;
    }

    let mut current_arc = vec![0usize; n];
    let mut in_queue = vec![false; n];
    let mut active = VecDeque::new();
    for v in 0..n {
        if excess[v] > F::zero() {
            in_queue[v] = true;
            active.push_back(v);
        }
    }

    while let Some(u) = active.pop_front() {
        in_queue[u] = false;

        while excess[u] > F::zero() {
            if current_arc[u] == network.res_degree(u) {
                let mut mini: Option<F> = None;
                for k in 0..network.res_degree(u) {
                    let index = network.res_at(u, k);
                    if network.res_cap(index) > F::zero() {
                        let rc = scaled_reduced_cost(network, pi, factor, index);
                        mini = Some(mini.map_or(rc, |m| m.min(rc)));
                    }
                }
                let Some(mini) = mini else { break };
                pi[u] += mini + epsilon;
                current_arc[u] = 0;
                continue;
            }

            let index = network.res_at(u, current_arc[u]);
            let residual = network.res_cap(index);
            if residual > F::zero() && scaled_reduced_cost(network, pi, factor, index) < F::zero()
            {
                let to = network.res_to(index);
                let delta = excess[u].min(residual);
                network.push_unchecked(index, delta);
                excess[u] -= delta;
                excess[to] += delta;
                if excess[to] > F::zero() && !in_queue[to] {
                    in_queue[to] = true;
                    active.push_back(to);
                }
            } else {
                current_arc[u] += 1;
            }
        }
    }
}

/// Replaces the scaled scratch potentials with exact ones: shortest
/// residual distances from a virtual super-source, negated. Valid because
/// the refined flow admits no negative residual cycle.
fn settle_potentials<F: Flow>(network: &mut Network<F>) {
    let n = network.num_nodes();
    let mut dist = vec![F::zero(); n];
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
                    updated = true;
                }
            }
        }
        if !updated {
            break;
        }
    }
    for (v, d) in dist.into_iter().enumerate() {
        network.potentials[v] = -d;
    }
}
