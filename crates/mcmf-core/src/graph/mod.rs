pub mod core;
pub mod residual;

pub use self::core::{Arc, ArcId, Network, NodeId};
pub use self::residual::ResidualArc;
