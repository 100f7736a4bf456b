//! Execution-scoped synchronization state
//!
//! `SynchronizationContext` is the mutable record of everything bound to
//! the current thread of control while transactional work runs: the
//! registered synchronization listeners, the current transaction's name and
//! read-only flag, whether an actual transaction is active, and opaque
//! resource handles keyed by name.
//!
//! The context is passed `&mut` into the executor rather than living in a
//! process-wide singleton. One context belongs to exactly one unit of
//! control; distinct threads never share a context, so no locking is
//! involved.
//!
//! Suspending captures the listener list (after notifying each listener),
//! the transaction name, and the read-only flag into a
//! `SuspendedResources` holder and clears them from the context. The holder
//! must be handed back to `resume` on the same context, in LIFO order
//! relative to any other suspend/resume pairs.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use txflow_core::error::{Error, Result};
use txflow_core::traits::TransactionSynchronization;

/// Holder for state captured by a suspend/resume bracket.
///
/// Created by `SynchronizationContext::suspend`, consumed exactly once by
/// `SynchronizationContext::resume`. An empty holder (produced when
/// synchronization was not active at suspend time) resumes to a no-op.
pub struct SuspendedResources {
    synchronizations: Option<Vec<Box<dyn TransactionSynchronization>>>,
    name: Option<String>,
    read_only: bool,
}

impl SuspendedResources {
    fn empty() -> Self {
        Self {
            synchronizations: None,
            name: None,
            read_only: false,
        }
    }

    /// Whether this holder carries no suspended state
    pub fn is_empty(&self) -> bool {
        self.synchronizations.is_none()
    }

    /// Number of suspended listeners
    pub fn suspended_count(&self) -> usize {
        self.synchronizations.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Debug for SuspendedResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuspendedResources")
            .field("suspended_count", &self.suspended_count())
            .field("name", &self.name)
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// Per-execution-context registry of synchronization listeners, current
/// transaction metadata, and bound resources.
#[derive(Default)]
pub struct SynchronizationContext {
    /// `Some` means synchronization is active, even when the list is empty
    synchronizations: Option<Vec<Box<dyn TransactionSynchronization>>>,
    current_name: Option<String>,
    read_only: bool,
    actual_transaction_active: bool,
    resources: HashMap<String, Box<dyn Any>>,
}

impl SynchronizationContext {
    /// Create an empty context with synchronization inactive
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Listener registry
    // ------------------------------------------------------------------

    /// Whether synchronization is active for this context
    ///
    /// Can be checked before registering to avoid unnecessary listener
    /// construction.
    pub fn is_synchronization_active(&self) -> bool {
        self.synchronizations.is_some()
    }

    /// Activate synchronization for this context
    ///
    /// # Errors
    /// Returns `SynchronizationAlreadyActive` if synchronization is
    /// already active.
    pub fn init_synchronization(&mut self) -> Result<()> {
        if self.is_synchronization_active() {
            return Err(Error::SynchronizationAlreadyActive);
        }
        tracing::debug!("initializing transaction synchronization");
        self.synchronizations = Some(Vec::new());
        Ok(())
    }

    /// Register a listener with the active synchronization
    ///
    /// Listeners are invoked in registration order for every trigger phase.
    ///
    /// # Errors
    /// Returns `SynchronizationNotActive` if synchronization is not active.
    pub fn register_synchronization(
        &mut self,
        synchronization: Box<dyn TransactionSynchronization>,
    ) -> Result<()> {
        match self.synchronizations.as_mut() {
            Some(list) => {
                list.push(synchronization);
                Ok(())
            }
            None => Err(Error::SynchronizationNotActive),
        }
    }

    /// Deactivate synchronization for this context, dropping any
    /// registered listeners
    ///
    /// # Errors
    /// Returns `SynchronizationNotActive` if synchronization is not active.
    pub fn clear_synchronization(&mut self) -> Result<()> {
        if !self.is_synchronization_active() {
            return Err(Error::SynchronizationNotActive);
        }
        tracing::debug!("clearing transaction synchronization");
        self.synchronizations = None;
        Ok(())
    }

    /// Number of currently registered listeners
    pub fn registered_count(&self) -> usize {
        self.synchronizations.as_ref().map_or(0, Vec::len)
    }

    /// Iterate the registered listeners in registration order
    pub(crate) fn synchronizations_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn TransactionSynchronization>> {
        self.synchronizations.iter_mut().flatten()
    }

    /// Capture the registered listeners, leaving synchronization inactive
    pub(crate) fn take_synchronizations(&mut self) -> Vec<Box<dyn TransactionSynchronization>> {
        self.synchronizations.take().unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Current transaction metadata
    // ------------------------------------------------------------------

    /// Name of the current transaction, if any
    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// Set or clear the current transaction name
    pub fn set_current_name(&mut self, name: Option<String>) {
        self.current_name = name;
    }

    /// Whether the current transaction is marked read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set the read-only flag for the current transaction
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether an actual transaction (as opposed to an empty
    /// synchronization-only scope) is active
    pub fn is_actual_transaction_active(&self) -> bool {
        self.actual_transaction_active
    }

    /// Record whether an actual transaction is active
    pub fn set_actual_transaction_active(&mut self, active: bool) {
        self.actual_transaction_active = active;
    }

    // ------------------------------------------------------------------
    // Suspend/resume bracket
    // ------------------------------------------------------------------

    /// Suspend the current synchronization state
    ///
    /// If synchronization is active: notifies each listener via `suspend`,
    /// captures the listener list, transaction name, and read-only flag
    /// into the returned holder, clears all three here, and drops the
    /// actual-transaction-active flag. If synchronization is inactive this
    /// is not an error; an empty holder is returned.
    pub fn suspend(&mut self) -> SuspendedResources {
        if let Some(mut suspended) = self.synchronizations.take() {
            for synchronization in &mut suspended {
                synchronization.suspend();
            }
            let name = self.current_name.take();
            let read_only = std::mem::replace(&mut self.read_only, false);
            self.actual_transaction_active = false;
            tracing::debug!(
                suspended = suspended.len(),
                name = name.as_deref(),
                "suspended transaction synchronization"
            );
            SuspendedResources {
                synchronizations: Some(suspended),
                name,
                read_only,
            }
        } else {
            SuspendedResources::empty()
        }
    }

    /// Restore previously suspended synchronization state
    ///
    /// Only acts on a non-empty holder: restores the
    /// actual-transaction-active flag, read-only flag, and name,
    /// re-activates synchronization, then notifies and re-registers each
    /// listener in its original order.
    pub fn resume(&mut self, holder: SuspendedResources) {
        if let Some(suspended) = holder.synchronizations {
            self.actual_transaction_active = true;
            self.read_only = holder.read_only;
            self.current_name = holder.name;
            let mut restored = Vec::with_capacity(suspended.len());
            for mut synchronization in suspended {
                synchronization.resume();
                restored.push(synchronization);
            }
            tracing::debug!(
                resumed = restored.len(),
                name = self.current_name.as_deref(),
                "resumed transaction synchronization"
            );
            self.synchronizations = Some(restored);
        }
    }

    /// Reset listener registry and metadata after completion
    ///
    /// Used by the executor's cleanup path; unlike `clear_synchronization`
    /// this is idempotent.
    pub(crate) fn reset_after_completion(&mut self) {
        self.synchronizations = None;
        self.current_name = None;
        self.read_only = false;
    }

    // ------------------------------------------------------------------
    // Bound resources
    // ------------------------------------------------------------------

    /// Whether a resource is bound for the given key
    pub fn has_resource(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    /// Borrow the resource bound for the given key
    pub fn resource(&self, key: &str) -> Option<&dyn Any> {
        self.resources.get(key).map(Box::as_ref)
    }

    /// Mutably borrow the resource bound for the given key
    pub fn resource_mut(&mut self, key: &str) -> Option<&mut dyn Any> {
        self.resources.get_mut(key).map(Box::as_mut)
    }

    /// Bind a resource handle for the given key
    ///
    /// One resource per key: the existing binding must be removed before a
    /// new one can be set for the same key.
    ///
    /// # Errors
    /// Returns `ResourceAlreadyBound` if a value is already bound.
    pub fn bind_resource(&mut self, key: impl Into<String>, value: Box<dyn Any>) -> Result<()> {
        let key = key.into();
        if self.resources.contains_key(&key) {
            return Err(Error::ResourceAlreadyBound { key });
        }
        tracing::debug!(key = %key, "bound resource");
        self.resources.insert(key, value);
        Ok(())
    }

    /// Unbind and return the resource for the given key
    ///
    /// # Errors
    /// Returns `ResourceNotBound` if no value is bound.
    pub fn unbind_resource(&mut self, key: &str) -> Result<Box<dyn Any>> {
        match self.resources.remove(key) {
            Some(value) => {
                tracing::debug!(key = %key, "unbound resource");
                Ok(value)
            }
            None => Err(Error::ResourceNotBound {
                key: key.to_string(),
            }),
        }
    }

    /// Number of currently bound resources
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl fmt::Debug for SynchronizationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronizationContext")
            .field("synchronization_active", &self.is_synchronization_active())
            .field("registered_count", &self.registered_count())
            .field("current_name", &self.current_name)
            .field("read_only", &self.read_only)
            .field(
                "actual_transaction_active",
                &self.actual_transaction_active,
            )
            .field("resource_count", &self.resources.len())
            .finish()
    }
}
