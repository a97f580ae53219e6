//! Transaction data model.
//!
//! # Data Flow
//! ```text
//! Clause list + TxBody fields
//!     → tx.rs (Transaction, unsigned)
//!     → signing_hash() / delegator_signing_hash(origin)
//!     → external signer(s)
//!     → with_signature() (signed, 65 or 130 bytes)
//!     → encoded() for submission
//! ```
//!
//! # Design Decisions
//! - Values are immutable; "with" operations return new instances
//! - The object only distinguishes unsigned from signed; submission state
//!   belongs to the caller
//! - Signature length is validated at recovery time, not at attach time

pub mod block_ref;
pub mod clause;
pub mod features;
pub mod tx;

pub use block_ref::BlockRef;
pub use clause::Clause;
pub use features::Features;
pub use tx::{Transaction, TxBody};
