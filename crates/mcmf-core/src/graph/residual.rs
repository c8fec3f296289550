use crate::graph::{ArcId, Network, NodeId};
use crate::{Flow, FlowError};

/// One direction of a residual arc pair. `direction` is `1` for the forward
/// copy of an original arc and `-1` for its reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidualArc<F> {
    pub index: usize,
    pub arc: ArcId,
    pub from: NodeId,
    pub to: NodeId,
    pub residual_capacity: F,
    pub cost: F,
    pub direction: i8,
}

/// Residual indices are dense: index `a` in `0..m` is the forward direction
/// of arc `a`, index `a + m` its reverse. Residual capacity of the forward
/// direction is `upper - flow`, of the reverse `flow`; a push of `delta`
/// moves `delta` between the two sides of the pair in one update site.
impl<F: Flow> Network<F> {
    #[inline]
    pub fn num_residual_arcs(&self) -> usize {
        2 * self.arcs.len()
    }

    #[inline]
    pub(crate) fn rev(&self, index: usize) -> usize {
        let m = self.arcs.len();
        if index < m {
            index + m
        } else {
            index - m
        }
    }

    #[inline]
    pub(crate) fn res_arc_id(&self, index: usize) -> usize {
        index % self.arcs.len()
    }

    #[inline]
    pub(crate) fn is_forward(&self, index: usize) -> bool {
        index < self.arcs.len()
    }

    #[inline]
    pub(crate) fn res_from(&self, index: usize) -> usize {
        let arc = &self.arcs[self.res_arc_id(index)];
        if self.is_forward(index) {
            arc.tail.0
        } else {
            arc.head.0
        }
    }

    #[inline]
    pub(crate) fn res_to(&self, index: usize) -> usize {
        let arc = &self.arcs[self.res_arc_id(index)];
        if self.is_forward(index) {
            arc.head.0
        } else {
            arc.tail.0
        }
    }

    #[inline]
    pub(crate) fn res_cost(&self, index: usize) -> F {
        let arc = &self.arcs[self.res_arc_id(index)];
        if self.is_forward(index) {
            arc.cost
        } else {
            -arc.cost
        }
    }

    #[inline]
    pub(crate) fn res_cap(&self, index: usize) -> F {
        let arc = &self.arcs[self.res_arc_id(index)];
        if self.is_forward(index) {
            arc.upper - arc.flow
        } else {
            arc.flow
        }
    }

    /// Number of residual arcs leaving `u`, forward copies first.
    #[inline]
    pub(crate) fn res_degree(&self, u: usize) -> usize {
        self.outgoing[u].len() + self.incoming[u].len()
    }

    /// `k`-th residual arc leaving `u`: forward arcs in insertion order,
    /// then reverse arcs in insertion order. This fixed order keeps every
    /// augmenting-path choice deterministic.
    #[inline]
    pub(crate) fn res_at(&self, u: usize, k: usize) -> usize {
        let out = &self.outgoing[u];
        if k < out.len() {
            out[k]
        } else {
            self.incoming[u][k - out.len()] + self.arcs.len()
        }
    }

    #[inline]
    pub(crate) fn push_unchecked(&mut self, index: usize, amount: F) {
        debug_assert!(amount >= F::zero() && amount <= self.res_cap(index));
        let forward = self.is_forward(index);
        let arc_id = self.res_arc_id(index);
        let arc = &mut self.arcs[arc_id];
        if forward {
            arc.flow += amount;
        } else {
            arc.flow -= amount;
        }
    }

    /// Reduced cost of a residual arc under the network potentials:
    /// `cost - potential(from) + potential(to)`. Potential-based engines keep
    /// this non-negative (or above `-epsilon`) on every residual arc.
    #[inline]
    pub(crate) fn res_reduced_cost(&self, index: usize) -> F {
        self.res_cost(index) - self.potentials[self.res_from(index)]
            + self.potentials[self.res_to(index)]
    }

    pub fn residual_capacity(&self, index: usize) -> Result<F, FlowError> {
        if index >= self.num_residual_arcs() {
            return Err(FlowError::InvalidArc(index));
        }
        Ok(self.res_cap(index))
    }

    pub fn push(&mut self, index: usize, amount: F) -> Result<(), FlowError> {
        if index >= self.num_residual_arcs() {
            return Err(FlowError::InvalidArc(index));
        }
        if amount < F::zero() || amount > self.res_cap(index) {
            return Err(FlowError::CapacityExceeded {
                arc: self.res_arc_id(index),
            });
        }
        self.push_unchecked(index, amount);
        Ok(())
    }

    /// Residual arcs leaving `node` with positive residual capacity, in the
    /// deterministic forward-then-reverse order.
    pub fn neighbors(&self, node: NodeId) -> Result<Vec<ResidualArc<F>>, FlowError> {
        if node.0 >= self.num_nodes() {
            return Err(FlowError::InvalidNode(node.0));
        }
        let mut arcs = Vec::new();
        for k in 0..self.res_degree(node.0) {
            let index = self.res_at(node.0, k);
            let residual = self.res_cap(index);
            if residual <= F::zero() {
                continue;
            }
            arcs.push(ResidualArc {
                index,
                arc: ArcId(self.res_arc_id(index)),
                from: NodeId(self.res_from(index)),
                to: NodeId(self.res_to(index)),
                residual_capacity: residual,
                cost: self.res_cost(index),
                direction: if self.is_forward(index) { 1 } else { -1 },
            });
        }
        Ok(arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_updates_both_sides_of_the_pair() {
        let mut network: Network<i64> = Network::new(2);
        let arc = network.add_arc(NodeId(0), NodeId(1), 5, 3).unwrap();
        let forward = arc.0;
        let reverse = network.rev(forward);

        network.push(forward, 2).unwrap();
        assert_eq!(network.residual_capacity(forward).unwrap(), 3);
        assert_eq!(network.residual_capacity(reverse).unwrap(), 2);
        assert_eq!(network.res_cost(reverse), -3);

        network.push(reverse, 2).unwrap();
        assert_eq!(network.residual_capacity(forward).unwrap(), 5);
        assert_eq!(network.flow(arc).unwrap(), 0);
    }

    #[test]
    fn interleaved_unchecked_pushes_keep_the_pair_consistent() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(0), NodeId(1), 4, 1).unwrap();
        network.add_arc(NodeId(1), NodeId(2), 4, 1).unwrap();
        let reverse = network.rev(0);

        network.push_unchecked(0, 3);
        network.push_unchecked(1, 3);
        network.push_unchecked(reverse, 1);

        assert_eq!(network.flow(ArcId(0)).unwrap(), 2);
        assert_eq!(network.res_cap(0), 2);
        assert_eq!(network.res_cap(reverse), 2);
        assert_eq!(network.flow(ArcId(1)).unwrap(), 3);
    }

    #[test]
    fn push_beyond_residual_is_rejected() {
        let mut network: Network<i64> = Network::new(2);
        network.add_arc(NodeId(0), NodeId(1), 1, 0).unwrap();
        assert_eq!(
            network.push(0, 2),
            Err(FlowError::CapacityExceeded { arc: 0 })
        );
        assert_eq!(network.push(9, 1), Err(FlowError::InvalidArc(9)));
    }

    #[test]
    fn neighbors_list_forward_arcs_before_reverse_arcs() {
        let mut network: Network<i64> = Network::new(3);
        network.add_arc(NodeId(1), NodeId(2), 4, 0).unwrap();
        network.add_arc(NodeId(0), NodeId(1), 4, 0).unwrap();
        network.add_arc(NodeId(1), NodeId(0), 4, 0).unwrap();
        network.push(1, 1).unwrap();

        let arcs = network.neighbors(NodeId(1)).unwrap();
        let order: Vec<(usize, i8)> = arcs.iter().map(|a| (a.index, a.direction)).collect();
        // forward arcs of node 1 in insertion order, then the reverse of the
        // arc into node 1
        assert_eq!(order, vec![(0, 1), (2, 1), (4, -1)]);
    }
}
