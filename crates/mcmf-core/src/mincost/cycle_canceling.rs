use log::debug;

use crate::graph::{Network, NodeId};
use crate::mincost::{self, MinCostFlowSolver, Status};
use crate::shortest_path;
use crate::{Flow, FlowError};

/// Klein's method: establish any flow of the target value, then cancel
/// negative-cost residual cycles until none remain. The only engine here
/// that accepts inputs with negative-cost cycles, since it never needs
/// shortest paths over the original costs.
#[derive(Debug, Default)]
pub struct CycleCanceling;

impl<F: Flow> MinCostFlowSolver<F> for CycleCanceling {
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

        if !mincost::establish_flow(network, source, sink, target) {
            return Ok(Status::Infeasible);
        }

        while let Some(cycle) = shortest_path::find_negative_residual_cycle(network) {
            let mut delta = network.res_cap(cycle[0]);
            for &index in &cycle[1..] {
                delta = delta.min(network.res_cap(index));
            }
            debug!("canceling a {}-arc cycle by {delta:?}", cycle.len());
            for &index in &cycle {
                network.push_unchecked(index, delta);
            }
        }

        Ok(Status::Optimal)
    }
}
