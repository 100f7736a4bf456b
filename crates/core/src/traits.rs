//! Boundary traits for the transaction core
//!
//! The core treats the resource-specific transaction as an opaque
//! collaborator behind `ResourceTransaction`: all commit/rollback mechanics
//! live on the other side of that boundary. `TransactionSynchronization` is
//! the listener capability registered by resource management code to
//! observe transaction lifecycle events.

use crate::error::Result;

/// Outcome reported to synchronization listeners after completion.
///
/// Handed to `TransactionSynchronization::after_completion` by the resource
/// layer once it has driven the actual commit or rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The transaction committed
    Committed,
    /// The transaction rolled back
    RolledBack,
    /// The outcome is unknown (e.g. a heuristic mixed outcome)
    Unknown,
}

/// Opaque capability implemented by a resource-specific transaction wrapper.
///
/// The core consults `is_existing_transaction` to drive propagation,
/// propagates a locally requested rollback via `set_rollback_only`, and
/// hands over captured synchronization listeners at completion time via
/// `register_after_completion`. Nothing else about the underlying
/// transaction is visible to the core.
pub trait ResourceTransaction {
    /// Whether this object represents an already-begun transaction
    fn is_existing_transaction(&self) -> bool;

    /// Mark the underlying transaction so the only acceptable outcome is
    /// rollback
    fn set_rollback_only(&mut self);

    /// Take ownership of the synchronization listeners captured at
    /// completion time
    ///
    /// The resource layer is expected to invoke
    /// `after_completion` on each listener, in order, once the real
    /// commit or rollback outcome is known.
    fn register_after_completion(
        &mut self,
        synchronizations: Vec<Box<dyn TransactionSynchronization>>,
    );
}

/// Listener for transaction lifecycle events.
///
/// All methods default to no-ops so implementors only override the hooks
/// they care about.
pub trait TransactionSynchronization {
    /// The transaction this listener belongs to is being suspended
    fn suspend(&mut self) {}

    /// The transaction this listener belongs to is being resumed
    fn resume(&mut self) {}

    /// Invoked before commit, after the unit of work has completed
    /// successfully
    ///
    /// # Errors
    /// An error aborts the commit intent and propagates to the caller of
    /// `execute`; completion and cleanup still run.
    fn before_commit(&mut self, read_only: bool) -> Result<()> {
        let _ = read_only;
        Ok(())
    }

    /// Invoked before completion, on every outcome
    ///
    /// # Errors
    /// An error is logged and swallowed so it cannot block other listeners
    /// or abort cleanup.
    fn before_completion(&mut self) -> Result<()> {
        Ok(())
    }

    /// Invoked by the resource layer after completion with the final
    /// outcome
    fn after_completion(&mut self, status: CompletionStatus) {
        let _ = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopListener;

    impl TransactionSynchronization for NoopListener {}

    struct CountingTransaction {
        existing: bool,
        rollback_only: bool,
        registered: usize,
    }

    impl ResourceTransaction for CountingTransaction {
        fn is_existing_transaction(&self) -> bool {
            self.existing
        }

        fn set_rollback_only(&mut self) {
            self.rollback_only = true;
        }

        fn register_after_completion(
            &mut self,
            synchronizations: Vec<Box<dyn TransactionSynchronization>>,
        ) {
            self.registered = synchronizations.len();
        }
    }

    #[test]
    fn test_default_listener_hooks_are_noops() {
        let mut listener = NoopListener;
        listener.suspend();
        listener.resume();
        assert!(listener.before_commit(false).is_ok());
        assert!(listener.before_commit(true).is_ok());
        assert!(listener.before_completion().is_ok());
        listener.after_completion(CompletionStatus::Committed);
    }

    #[test]
    fn test_resource_transaction_object_safety() {
        let mut tx = CountingTransaction {
            existing: true,
            rollback_only: false,
            registered: 0,
        };
        let dyn_tx: &mut dyn ResourceTransaction = &mut tx;
        assert!(dyn_tx.is_existing_transaction());
        dyn_tx.set_rollback_only();
        dyn_tx.register_after_completion(vec![Box::new(NoopListener)]);
        assert!(tx.rollback_only);
        assert_eq!(tx.registered, 1);
    }

    #[test]
    fn test_completion_status_is_comparable() {
        assert_eq!(CompletionStatus::Committed, CompletionStatus::Committed);
        assert_ne!(CompletionStatus::Committed, CompletionStatus::RolledBack);
        assert_ne!(CompletionStatus::RolledBack, CompletionStatus::Unknown);
    }
}
