//! Gas estimation.
//!
//! # Data Flow
//! ```text
//! clauses
//!     → intrinsic.rs (protocol-fixed cost from clause shapes)
//!     → simulation.rs (dry-run on the node, consumed gas per clause)
//!     → Simulation::total_gas() = consumed + intrinsic
//! ```

pub mod intrinsic;
pub mod simulation;

pub use intrinsic::intrinsic_gas;
pub use simulation::{simulate, Simulation};
