//! Core types and traits for txflow
//!
//! This crate defines the foundational types shared by every layer:
//! - Error: error enum + Result alias
//! - Propagation, Isolation, TransactionDefinition: the immutable
//!   descriptor of how a unit of work relates to an active transaction
//! - ResourceTransaction: the opaque capability implemented by
//!   resource-specific transaction wrappers
//! - TransactionSynchronization: lifecycle listener registered for
//!   transaction events (suspend, resume, before/after completion)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod definition;
pub mod error;
pub mod traits;

pub use definition::{
    Isolation, Propagation, TransactionDefinition, TIMEOUT_DEFAULT,
};
pub use error::{Error, Result};
pub use traits::{CompletionStatus, ResourceTransaction, TransactionSynchronization};
