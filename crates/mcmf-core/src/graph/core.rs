use crate::{Flow, FlowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arc<F> {
    pub tail: NodeId,
    pub head: NodeId,
    pub upper: F,
    pub cost: F,
    pub flow: F,
}

/// Directed network with integer capacities and costs. Topology is fixed
/// after construction; engines mutate flow and potentials only through the
/// residual primitives in `graph::residual`.
#[derive(Debug, Clone)]
pub struct Network<F> {
    pub(crate) arcs: Vec<Arc<F>>,
    // per-node arc ids in insertion order; self-loops are left out so no
    // search can traverse them
    pub(crate) outgoing: Vec<Vec<usize>>,
    pub(crate) incoming: Vec<Vec<usize>>,
    pub(crate) potentials: Vec<F>,
}

impl<F: Flow> Network<F> {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            arcs: Vec::new(),
            outgoing: vec![Vec::new(); num_nodes],
            incoming: vec![Vec::new(); num_nodes],
            potentials: vec![F::zero(); num_nodes],
        }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.potentials.len()
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn add_arc(
        &mut self,
        tail: NodeId,
        head: NodeId,
        capacity: F,
        cost: F,
    ) -> Result<ArcId, FlowError> {
        if tail.0 >= self.num_nodes() {
            return Err(FlowError::InvalidNode(tail.0));
        }
        if head.0 >= self.num_nodes() {
            return Err(FlowError::InvalidNode(head.0));
        }
        if capacity < F::zero() {
            return Err(FlowError::InvalidCapacity {
                arc: self.arcs.len(),
            });
        }

        let arc_id = self.arcs.len();
        self.arcs.push(Arc {
            tail,
            head,
            upper: capacity,
            cost,
            flow: F::zero(),
        });
        if tail != head {
            self.outgoing[tail.0].push(arc_id);
            self.incoming[head.0].push(arc_id);
        }
        Ok(ArcId(arc_id))
    }

    pub fn arc(&self, arc: ArcId) -> Option<&Arc<F>> {
        self.arcs.get(arc.0)
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &Arc<F>)> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(idx, arc)| (ArcId(idx), arc))
    }

    pub fn flow(&self, arc: ArcId) -> Result<F, FlowError> {
        self.arcs
            .get(arc.0)
            .map(|arc| arc.flow)
            .ok_or(FlowError::InvalidArc(arc.0))
    }

    pub fn flows(&self) -> Vec<F> {
        self.arcs.iter().map(|arc| arc.flow).collect()
    }

    pub fn reset_flow(&mut self) {
        for arc in &mut self.arcs {
            arc.flow = F::zero();
        }
    }

    /// Net flow leaving `source`, the maximum-flow objective.
    pub fn total_flow_value(&self, source: NodeId) -> F {
        self.arcs.iter().fold(F::zero(), |mut value, arc| {
            if arc.tail == source {
                value += arc.flow;
            }
            if arc.head == source {
                value -= arc.flow;
            }
            value
        })
    }

    /// Sum over arcs of flow times cost.
    pub fn total_cost(&self) -> F {
        self.arcs
            .iter()
            .fold(F::zero(), |cost, arc| cost + arc.flow * arc.cost)
    }

    pub fn has_negative_cost(&self) -> bool {
        self.arcs.iter().any(|arc| arc.cost < F::zero())
    }

    /// Bellman-Ford over the original arcs with positive capacity. Engines
    /// that rely on non-negative shortest paths reject inputs where this
    /// holds; cycle canceling is designed for them.
    pub fn has_negative_cost_cycle(&self) -> bool {
        let n = self.num_nodes();
        if n == 0 {
            return false;
        }
        let mut dist = vec![F::zero(); n];
        for _ in 0..n {
            let mut updated = false;
            for arc in &self.arcs {
                if arc.upper <= F::zero() || arc.tail == arc.head {
                    continue;
                }
                let nd = dist[arc.tail.0] + arc.cost;
                if nd < dist[arc.head.0] {
                    dist[arc.head.0] = nd;
                    updated = true;
                }
            }
            if !updated {
                return false;
            }
        }
        true
    }

    pub fn potential(&self, node: NodeId) -> Result<F, FlowError> {
        self.potentials
            .get(node.0)
            .copied()
            .ok_or(FlowError::InvalidNode(node.0))
    }

    pub fn potentials(&self) -> &[F] {
        &self.potentials
    }

    /// Potentials are shared solver state; each cost-based engine resets
    /// them at the start of its solve so strategies never leak into each
    /// other.
    pub fn reset_potentials(&mut self) {
        self.potentials.fill(F::zero());
    }
}
