//! Transaction construction.
//!
//! # Responsibilities
//! - Hold caller choices in an immutable [`TxOptions`] value
//! - Resolve every unset field in a fixed order in [`build`]
//! - Offer a fluent [`Transactor`] front end bound to a [`Thor`](crate::Thor)
//!
//! # Design Decisions
//! - Network effects (best block, simulation) come in through [`ChainContext`]
//! - `None` means unset; an explicit zero is kept as given

pub mod options;
pub mod transactor;

pub use options::{build, ChainContext, TxOptions, DEFAULT_EXPIRATION};
pub use transactor::Transactor;
