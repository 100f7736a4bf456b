//! txflow - transaction propagation and synchronization core
//!
//! txflow decides how a unit of work relates to an already-active
//! transaction (join it, suspend it, require a fresh one, nest within it,
//! or reject outright), runs the work, and drives synchronization listener
//! callbacks around commit intent and completion. Resource-specific
//! commit/rollback mechanics stay behind the [`ResourceTransaction`] trait.
//!
//! # Quick Start
//!
//! ```
//! use txflow::{
//!     Propagation, ResourceTransaction, SynchronizationContext,
//!     TransactionDefinition, TransactionExecutor, TransactionSynchronization,
//! };
//!
//! struct MyTransaction {
//!     active: bool,
//!     rollback_only: bool,
//! }
//!
//! impl ResourceTransaction for MyTransaction {
//!     fn is_existing_transaction(&self) -> bool {
//!         self.active
//!     }
//!     fn set_rollback_only(&mut self) {
//!         self.rollback_only = true;
//!     }
//!     fn register_after_completion(
//!         &mut self,
//!         _synchronizations: Vec<Box<dyn TransactionSynchronization>>,
//!     ) {
//!     }
//! }
//!
//! # fn main() -> txflow::Result<()> {
//! let executor = TransactionExecutor::default();
//! let mut ctx = SynchronizationContext::new();
//! let mut tx = MyTransaction { active: false, rollback_only: false };
//!
//! let definition = TransactionDefinition::new(Propagation::Required);
//! let value = executor.execute(Some(&definition), &mut tx, &mut ctx, |status, _ctx| {
//!     assert!(status.is_new_transaction());
//!     Ok(7)
//! })?;
//! assert_eq!(value, 7);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Foundational types (definitions, errors, boundary traits) live in
//! `txflow-core`; the execution-scoped [`SynchronizationContext`],
//! [`TransactionStatus`], and [`TransactionExecutor`] live in
//! `txflow-propagation`. This crate re-exports the public API of both.

// Re-export the public API from the member crates
pub use txflow_core::{
    CompletionStatus, Error, Isolation, Propagation, ResourceTransaction, Result,
    TransactionDefinition, TransactionSynchronization, TIMEOUT_DEFAULT,
};
pub use txflow_propagation::{
    SuspendedResources, SynchronizationContext, SynchronizationPolicy, TransactionExecutor,
    TransactionStatus,
};
