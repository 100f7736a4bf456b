//! Propagation executor
//!
//! Runs a unit of work inside a transaction scope derived from the
//! caller's definition and the existing-transaction state:
//!
//! ```text
//! 1. prepare_status() - Decision tree over the propagation behavior:
//!    reuse, suspend, create, or reject
//! 2. callback(status, ctx) - Invoke the unit of work exactly once
//! 3. On success: propagate a local rollback-only request to the
//!    resource transaction, or trigger before_commit listeners
//! 4. On every outcome: trigger before_completion listeners, capture the
//!    listener list, clean up context state, resume suspended state, and
//!    hand the captured list to the resource transaction
//! 5. Return the callback's result or error unchanged
//! ```
//!
//! Step 4 runs whether the callback succeeded or failed; no error is
//! swallowed by `execute` itself. Invalid timeouts and contradictory
//! propagation states fail in step 1, before the callback runs and before
//! any context state is touched.

use tracing::Level;

use txflow_core::definition::{Propagation, TransactionDefinition, TIMEOUT_DEFAULT};
use txflow_core::error::{Error, Result};
use txflow_core::traits::ResourceTransaction;

use crate::context::{SuspendedResources, SynchronizationContext};
use crate::status::TransactionStatus;

/// When the executor starts synchronization for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynchronizationPolicy {
    /// Start synchronization for every scope, including empty ones that
    /// run without an actual transaction
    #[default]
    Always,
    /// Start synchronization only for scopes with an actual transaction
    OnActualTransaction,
    /// Never start synchronization
    Never,
}

/// Decides how a unit of work relates to the current transaction state,
/// runs it, and drives the synchronization listener lifecycle around it.
///
/// The executor is stateless apart from its synchronization policy; all
/// per-call state lives on the `TransactionStatus` it creates and the
/// `SynchronizationContext` passed in by the caller.
pub struct TransactionExecutor {
    synchronization: SynchronizationPolicy,
}

impl TransactionExecutor {
    /// Create an executor with the given synchronization policy
    pub fn new(synchronization: SynchronizationPolicy) -> Self {
        Self { synchronization }
    }

    /// The configured synchronization policy
    pub fn synchronization(&self) -> SynchronizationPolicy {
        self.synchronization
    }

    /// Run the unit of work in a scope derived from `definition`.
    ///
    /// A missing definition is substituted with
    /// `TransactionDefinition::default()`. The callback is invoked exactly
    /// once with the prepared status and the context; its result or error
    /// is returned unchanged. Completion and cleanup run on every outcome
    /// once the callback has been invoked.
    ///
    /// # Errors
    /// - `InvalidTimeout` if the definition's timeout is below
    ///   `TIMEOUT_DEFAULT` on a no-existing-transaction path
    /// - `IllegalState` for MANDATORY without an existing transaction, or
    ///   NEVER with one
    /// - any error from the callback or from a `before_commit` listener,
    ///   propagated verbatim
    pub fn execute<T, R, F>(
        &self,
        definition: Option<&TransactionDefinition>,
        transaction: &mut T,
        ctx: &mut SynchronizationContext,
        callback: F,
    ) -> Result<R>
    where
        T: ResourceTransaction + ?Sized,
        F: FnOnce(&mut TransactionStatus, &mut SynchronizationContext) -> Result<R>,
    {
        let defaults;
        let definition = match definition {
            Some(definition) => definition,
            None => {
                defaults = TransactionDefinition::default();
                &defaults
            }
        };

        let mut status = self.prepare_status(definition, transaction, ctx)?;
        let result = self.run_within_scope(&mut status, transaction, ctx, callback);
        self.complete(&mut status, transaction, ctx);
        result
    }

    /// Invoke the callback and, on success, either propagate a local
    /// rollback-only request or trigger the before-commit phase.
    fn run_within_scope<T, R, F>(
        &self,
        status: &mut TransactionStatus,
        transaction: &mut T,
        ctx: &mut SynchronizationContext,
        callback: F,
    ) -> Result<R>
    where
        T: ResourceTransaction + ?Sized,
        F: FnOnce(&mut TransactionStatus, &mut SynchronizationContext) -> Result<R>,
    {
        let result = callback(status, ctx)?;
        if status.is_rollback_only() {
            if status.is_debug() {
                tracing::debug!("transactional code has requested rollback");
            }
            transaction.set_rollback_only();
        } else {
            self.trigger_before_commit(status, ctx)?;
        }
        Ok(result)
    }

    /// Completion path, run on every outcome once a status exists.
    ///
    /// Triggers before_completion, and for scopes that started
    /// synchronization: captures the listener list, cleans up context
    /// state (resuming anything suspended for this scope), and hands the
    /// captured list to the resource transaction.
    fn complete<T>(
        &self,
        status: &mut TransactionStatus,
        transaction: &mut T,
        ctx: &mut SynchronizationContext,
    ) where
        T: ResourceTransaction + ?Sized,
    {
        self.trigger_before_completion(status, ctx);
        if status.is_new_synchronization() {
            let synchronizations = ctx.take_synchronizations();
            self.cleanup_after_completion(status, ctx);
            transaction.register_after_completion(synchronizations);
        } else {
            status.mark_completed();
        }
    }

    /// The decision tree, keyed first on "does an existing transaction
    /// exist".
    fn prepare_status<T>(
        &self,
        definition: &TransactionDefinition,
        transaction: &T,
        ctx: &mut SynchronizationContext,
    ) -> Result<TransactionStatus>
    where
        T: ResourceTransaction + ?Sized,
    {
        // Cache the debug flag to avoid repeated checks.
        let debug = tracing::enabled!(Level::DEBUG);

        if transaction.is_existing_transaction() {
            // Existing transaction found -> check propagation behavior to
            // find out how to behave.
            return self.handle_existing_transaction(definition, ctx, debug);
        }

        // Check definition settings for a new transaction.
        if definition.timeout() < TIMEOUT_DEFAULT {
            return Err(Error::InvalidTimeout {
                timeout: definition.timeout(),
            });
        }

        // No existing transaction found -> check propagation behavior to
        // find out how to behave.
        match definition.propagation() {
            Propagation::Mandatory => Err(Error::IllegalState(
                "transaction propagation 'mandatory' but no existing transaction found"
                    .to_string(),
            )),
            Propagation::Required | Propagation::RequiresNew | Propagation::Nested => {
                if debug {
                    tracing::debug!(name = definition.name(), "creating new transaction");
                }
                let new_synchronization = self.synchronization != SynchronizationPolicy::Never;
                self.new_status(definition, true, true, new_synchronization, debug, None, ctx)
            }
            _ => {
                // "Empty" scope: no actual transaction, but potentially
                // synchronization.
                let new_synchronization = self.synchronization == SynchronizationPolicy::Always;
                self.new_status(
                    definition,
                    false,
                    false,
                    new_synchronization,
                    debug,
                    None,
                    ctx,
                )
            }
        }
    }

    /// Create a status for a scope entered with an existing transaction.
    fn handle_existing_transaction(
        &self,
        definition: &TransactionDefinition,
        ctx: &mut SynchronizationContext,
        debug: bool,
    ) -> Result<TransactionStatus> {
        match definition.propagation() {
            Propagation::Never => Err(Error::IllegalState(
                "transaction propagation 'never' but existing transaction found".to_string(),
            )),
            Propagation::NotSupported => {
                if debug {
                    tracing::debug!("suspending current transaction");
                }
                let suspended = ctx.suspend();
                let new_synchronization = self.synchronization == SynchronizationPolicy::Always;
                self.new_status(
                    definition,
                    false,
                    false,
                    new_synchronization,
                    debug,
                    Some(suspended),
                    ctx,
                )
            }
            Propagation::RequiresNew => {
                if debug {
                    tracing::debug!(
                        name = definition.name(),
                        "suspending current transaction, creating new transaction"
                    );
                }
                let suspended = ctx.suspend();
                let new_synchronization = self.synchronization != SynchronizationPolicy::Never;
                self.new_status(
                    definition,
                    true,
                    true,
                    new_synchronization,
                    debug,
                    Some(suspended),
                    ctx,
                )
            }
            Propagation::Nested => {
                if debug {
                    tracing::debug!(name = definition.name(), "creating nested transaction");
                }
                let new_synchronization = self.synchronization != SynchronizationPolicy::Never;
                self.new_status(definition, true, true, new_synchronization, debug, None, ctx)
            }
            _ => {
                // SUPPORTS, REQUIRED, or MANDATORY with an existing
                // transaction: participate.
                if debug {
                    tracing::debug!("participating in existing transaction");
                }
                let new_synchronization = self.synchronization != SynchronizationPolicy::Never;
                self.new_status(definition, true, false, new_synchronization, debug, None, ctx)
            }
        }
    }

    /// Create a status for the given arguments, initializing
    /// synchronization on the context if appropriate.
    ///
    /// The status records the *actual* new-synchronization flag: when
    /// synchronization is already active on the context, the requested
    /// flag is dropped and cleanup stays with the scope that started it.
    #[allow(clippy::too_many_arguments)]
    fn new_status(
        &self,
        definition: &TransactionDefinition,
        has_transaction: bool,
        new_transaction: bool,
        new_synchronization: bool,
        debug: bool,
        suspended_resources: Option<SuspendedResources>,
        ctx: &mut SynchronizationContext,
    ) -> Result<TransactionStatus> {
        let actual_new_synchronization =
            new_synchronization && !ctx.is_synchronization_active();
        if actual_new_synchronization {
            if new_transaction {
                ctx.set_actual_transaction_active(true);
            }
            ctx.set_read_only(definition.is_read_only());
            ctx.set_current_name(definition.name().map(str::to_owned));
            ctx.init_synchronization()?;
        }
        Ok(TransactionStatus::new(
            has_transaction,
            new_transaction,
            actual_new_synchronization,
            definition.is_read_only(),
            debug,
            suspended_resources,
        ))
    }

    /// Clean up after completion, clearing context state for scopes that
    /// started synchronization and resuming anything suspended for this
    /// scope.
    fn cleanup_after_completion(
        &self,
        status: &mut TransactionStatus,
        ctx: &mut SynchronizationContext,
    ) {
        status.mark_completed();
        if status.is_new_synchronization() {
            ctx.reset_after_completion();
            if status.is_new_transaction() {
                ctx.set_actual_transaction_active(false);
            }
        }
        if let Some(suspended) = status.take_suspended_resources() {
            if status.is_debug() {
                tracing::debug!("resuming suspended transaction");
            }
            ctx.resume(suspended);
        }
    }

    /// Trigger before_commit listeners, in registration order.
    ///
    /// Listener errors propagate to the caller; completion and cleanup
    /// still run afterwards.
    fn trigger_before_commit(
        &self,
        status: &TransactionStatus,
        ctx: &mut SynchronizationContext,
    ) -> Result<()> {
        if status.is_new_synchronization() {
            if status.is_debug() {
                tracing::debug!("triggering before_commit synchronization");
            }
            for synchronization in ctx.synchronizations_mut() {
                synchronization.before_commit(status.is_read_only())?;
            }
        }
        Ok(())
    }

    /// Trigger before_completion listeners, in registration order.
    ///
    /// Listener errors are logged and swallowed so one bad listener
    /// cannot block the others or abort cleanup.
    fn trigger_before_completion(
        &self,
        status: &TransactionStatus,
        ctx: &mut SynchronizationContext,
    ) {
        if status.is_new_synchronization() {
            if status.is_debug() {
                tracing::debug!("triggering before_completion synchronization");
            }
            for synchronization in ctx.synchronizations_mut() {
                if let Err(err) = synchronization.before_completion() {
                    tracing::error!(error = %err, "synchronization before_completion failed");
                }
            }
        }
    }
}

impl Default for TransactionExecutor {
    fn default() -> Self {
        Self::new(SynchronizationPolicy::default())
    }
}
