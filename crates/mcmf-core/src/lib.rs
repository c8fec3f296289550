pub mod certificate;
pub mod graph;
pub mod maxflow;
pub mod mincost;
pub mod shortest_path;

use std::fmt;
use std::time::Instant;

use num_traits::{FromPrimitive, NumAssign};

pub use crate::graph::{Arc, ArcId, Network, NodeId, ResidualArc};
pub use crate::maxflow::MaxFlowSolver;
pub use crate::mincost::{MinCostFlowSolver, Status};

/// Integer flow/cost type accepted by every engine.
///
/// The bounds mirror what the algorithms actually need: ring arithmetic with
/// assignment operators, negation for reverse residual costs and potentials,
/// a total order for bottleneck comparisons, and conversion from small
/// machine integers for scaling factors. `i64` is the canonical choice.
pub trait Flow:
    NumAssign + std::ops::Neg<Output = Self> + FromPrimitive + Ord + Copy + fmt::Debug
{
}

impl<T> Flow for T where
    T: NumAssign + std::ops::Neg<Output = T> + FromPrimitive + Ord + Copy + fmt::Debug
{
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Node index outside `0..num_nodes`.
    InvalidNode(usize),
    /// Arc or residual-arc index out of range.
    InvalidArc(usize),
    /// Negative capacity handed to `add_arc`.
    InvalidCapacity { arc: usize },
    /// `push` beyond the residual capacity of an arc. Reaching this through a
    /// solver indicates an engine bug; internal pushes assert instead.
    CapacityExceeded { arc: usize },
    /// Negative-cost cycle in the original graph handed to an engine that is
    /// not designed for one.
    NegativeCycle,
    /// Reserved for engines that admit uncapacitated arcs; capacitated
    /// networks never produce it.
    Unbounded,
    /// The phase budget in [`SolveOptions`] ran out between phases.
    DeadlineExceeded,
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::InvalidNode(node) => write!(f, "node index {node} out of range"),
            FlowError::InvalidArc(arc) => write!(f, "arc index {arc} out of range"),
            FlowError::InvalidCapacity { arc } => {
                write!(f, "negative capacity on arc {arc}")
            }
            FlowError::CapacityExceeded { arc } => {
                write!(f, "push exceeds residual capacity on arc {arc}")
            }
            FlowError::NegativeCycle => write!(f, "negative-cost cycle in the input graph"),
            FlowError::Unbounded => write!(f, "flow value is unbounded"),
            FlowError::DeadlineExceeded => write!(f, "solve budget exhausted between phases"),
        }
    }
}

impl std::error::Error for FlowError {}

/// Optional budget for phase-based engines. Checked between phases only, so
/// the residual invariants always hold when the budget trips.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub max_phases: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl SolveOptions {
    pub(crate) fn budget(&self) -> PhaseBudget {
        PhaseBudget {
            max_phases: self.max_phases,
            time_limit_ms: self.time_limit_ms,
            started: Instant::now(),
            phases: 0,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PhaseBudget {
    max_phases: Option<usize>,
    time_limit_ms: Option<u64>,
    started: Instant,
    phases: usize,
}

impl PhaseBudget {
    pub(crate) fn begin_phase(&mut self) -> Result<(), FlowError> {
        if let Some(limit) = self.max_phases {
            if self.phases >= limit {
                return Err(FlowError::DeadlineExceeded);
            }
        }
        if let Some(limit) = self.time_limit_ms {
            if self.started.elapsed().as_millis() as u64 >= limit && self.phases > 0 {
                return Err(FlowError::DeadlineExceeded);
            }
        }
        self.phases += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFlowAlgorithm {
    FordFulkerson,
    EdmondsKarp,
    Dinic,
    ShortestAugmentingPath,
    CapacityScaling,
    PushRelabelFifo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinCostFlowAlgorithm {
    SuccessiveShortestPath,
    PrimalDual,
    CycleCanceling,
    CostScaling,
    OutOfKilter,
}

#[derive(Debug, Clone)]
pub struct MaxFlowResult<F> {
    pub value: F,
    pub flow: Vec<F>,
    pub min_cut: Vec<ArcId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McfSolution<F> {
    pub flow: Vec<F>,
    pub cost: F,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McfOutcome<F> {
    Optimal(McfSolution<F>),
    Infeasible,
}

/// Solves maximum flow with the selected engine and assembles the value,
/// the per-arc flow assignment, and the minimum cut.
pub fn max_flow<F: Flow>(
    network: &mut Network<F>,
    source: NodeId,
    sink: NodeId,
    algorithm: MaxFlowAlgorithm,
) -> Result<MaxFlowResult<F>, FlowError> {
    let value = match algorithm {
        MaxFlowAlgorithm::FordFulkerson => {
            maxflow::FordFulkerson::default().solve(network, source, sink)?
        }
        MaxFlowAlgorithm::EdmondsKarp => {
            maxflow::EdmondsKarp::default().solve(network, source, sink)?
        }
        MaxFlowAlgorithm::Dinic => maxflow::Dinic::default().solve(network, source, sink)?,
        MaxFlowAlgorithm::ShortestAugmentingPath => {
            maxflow::ShortestAugmentingPath::default().solve(network, source, sink)?
        }
        MaxFlowAlgorithm::CapacityScaling => {
            maxflow::CapacityScaling::default().solve(network, source, sink)?
        }
        MaxFlowAlgorithm::PushRelabelFifo => {
            maxflow::PushRelabelFifo::default().solve(network, source, sink)?
        }
    };

    let cut = certificate::min_cut(network, source)?;
    Ok(MaxFlowResult {
        value,
        flow: network.flows(),
        min_cut: cut.arcs,
    })
}

/// Routes exactly `target` units from `source` to `sink` at minimum cost.
/// Infeasibility is a typed outcome, not an error.
pub fn min_cost_flow<F: Flow>(
    network: &mut Network<F>,
    source: NodeId,
    sink: NodeId,
    target: F,
    algorithm: MinCostFlowAlgorithm,
) -> Result<McfOutcome<F>, FlowError> {
    let status = match algorithm {
        MinCostFlowAlgorithm::SuccessiveShortestPath => {
            mincost::SuccessiveShortestPath::default().solve(network, source, sink, target)?
        }
        MinCostFlowAlgorithm::PrimalDual => {
            mincost::PrimalDual::default().solve(network, source, sink, target)?
        }
        MinCostFlowAlgorithm::CycleCanceling => {
            mincost::CycleCanceling::default().solve(network, source, sink, target)?
        }
        MinCostFlowAlgorithm::CostScaling => {
            mincost::CostScaling::default().solve(network, source, sink, target)?
        }
        MinCostFlowAlgorithm::OutOfKilter => {
            mincost::OutOfKilter::default().solve(network, source, sink, target)?
        }
    };

    match status {
        Status::Optimal => Ok(McfOutcome::Optimal(McfSolution {
            flow: network.flows(),
            cost: network.total_cost(),
        })),
        Status::Infeasible => Ok(McfOutcome::Infeasible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Network<i64>, NodeId, NodeId) {
        let mut network = Network::new(4);
        let s = NodeId(0);
        let a = NodeId(1);
        let b = NodeId(2);
        let t = NodeId(3);
        network.add_arc(s, a, 3, 1).unwrap();
        network.add_arc(s, b, 2, 2).unwrap();
        network.add_arc(a, t, 2, 1).unwrap();
        network.add_arc(b, t, 3, 1).unwrap();
        (network, s, t)
    }

    #[test]
    fn max_flow_result_carries_cut_and_flows() {
        let (mut network, s, t) = diamond();
        let result = max_flow(&mut network, s, t, MaxFlowAlgorithm::Dinic).unwrap();
        assert_eq!(result.value, 4);
        assert_eq!(result.flow.len(), 4);
        let cut_capacity: i64 = result
            .min_cut
            .iter()
            .map(|&arc| network.arc(arc).unwrap().upper)
            .sum();
        assert_eq!(cut_capacity, 4);
    }

    #[test]
    fn min_cost_flow_reports_infeasible_target() {
        let (mut network, s, t) = diamond();
        let outcome = min_cost_flow(
            &mut network,
            s,
            t,
            5,
            MinCostFlowAlgorithm::SuccessiveShortestPath,
        )
        .unwrap();
        assert_eq!(outcome, McfOutcome::Infeasible);
    }

    #[test]
    fn budget_of_zero_phases_trips_immediately() {
        let (mut network, s, t) = diamond();
        let options = SolveOptions {
            max_phases: Some(0),
            time_limit_ms: None,
        };
        let err = maxflow::Dinic::with_options(options)
            .solve(&mut network, s, t)
            .unwrap_err();
        assert_eq!(err, FlowError::DeadlineExceeded);
    }

    #[test]
    fn errors_render_their_context() {
        let message = FlowError::CapacityExceeded { arc: 7 }.to_string();
        assert!(message.contains('7'));
    }
}
