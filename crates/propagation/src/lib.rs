//! Propagation layer for txflow
//!
//! This crate implements the transaction propagation and synchronization
//! state machine:
//! - SynchronizationContext: execution-scoped listener registry, current
//!   transaction metadata, bound resources, and the suspend/resume bracket
//! - TransactionStatus: per-attempt record of how the current scope was set
//!   up (new transaction, new synchronization, rollback-only, ...)
//! - TransactionExecutor: decides, per definition and existing-transaction
//!   state, whether to reuse, suspend, create, or reject a transaction,
//!   runs the unit of work, and drives the listener lifecycle around it

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod executor;
pub mod status;

pub use context::{SuspendedResources, SynchronizationContext};
pub use executor::{SynchronizationPolicy, TransactionExecutor};
pub use status::TransactionStatus;
