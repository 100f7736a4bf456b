//! Per-attempt transaction status
//!
//! A `TransactionStatus` is created by the executor at the start of status
//! preparation, consulted by the unit of work while it runs, finalized
//! during cleanup, and then discarded. It is never reused across calls.

use std::fmt;

use crate::context::SuspendedResources;

/// Mutable record of one logical transaction attempt.
///
/// Captures how the executor set the current scope up: whether a
/// transaction object is attached and whether it is new, whether this
/// attempt started synchronization, the read-only and debug hints, the
/// local rollback-only flag, and any state suspended on its behalf.
pub struct TransactionStatus {
    has_transaction: bool,
    new_transaction: bool,
    new_synchronization: bool,
    read_only: bool,
    debug: bool,
    rollback_only: bool,
    completed: bool,
    suspended_resources: Option<SuspendedResources>,
}

impl TransactionStatus {
    pub(crate) fn new(
        has_transaction: bool,
        new_transaction: bool,
        new_synchronization: bool,
        read_only: bool,
        debug: bool,
        suspended_resources: Option<SuspendedResources>,
    ) -> Self {
        Self {
            has_transaction,
            new_transaction,
            new_synchronization,
            read_only,
            debug,
            rollback_only: false,
            completed: false,
            suspended_resources,
        }
    }

    /// Whether a transaction object is attached to this scope
    ///
    /// False for "empty" scopes such as SUPPORTS with no existing
    /// transaction or NOT_SUPPORTED after suspension.
    pub fn has_transaction(&self) -> bool {
        self.has_transaction
    }

    /// Whether this scope opened a new transaction (as opposed to
    /// participating in an existing one or running without one)
    pub fn is_new_transaction(&self) -> bool {
        self.has_transaction && self.new_transaction
    }

    /// Whether this scope actually started synchronization
    ///
    /// Reflects what happened, not what was requested: when
    /// synchronization was already active on the context, a participating
    /// scope records `false` here and cleanup is left to the scope that
    /// started it.
    pub fn is_new_synchronization(&self) -> bool {
        self.new_synchronization
    }

    /// Whether the transaction is marked read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether debug logging was enabled when this scope was prepared
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Mark this attempt so the only acceptable outcome is rollback
    ///
    /// This is a local flag on the status; the executor propagates it to
    /// the resource transaction after the unit of work returns.
    pub fn set_rollback_only(&mut self) {
        self.rollback_only = true;
    }

    /// Whether the unit of work requested rollback
    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only
    }

    /// Whether completion has run for this attempt
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether state was suspended on behalf of this scope
    pub fn has_suspended_resources(&self) -> bool {
        self.suspended_resources.is_some()
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub(crate) fn take_suspended_resources(&mut self) -> Option<SuspendedResources> {
        self.suspended_resources.take()
    }
}

impl fmt::Debug for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionStatus")
            .field("has_transaction", &self.has_transaction)
            .field("new_transaction", &self.new_transaction)
            .field("new_synchronization", &self.new_synchronization)
            .field("read_only", &self.read_only)
            .field("rollback_only", &self.rollback_only)
            .field("completed", &self.completed)
            .field("suspended", &self.suspended_resources.is_some())
            .finish()
    }
}
