//! Transaction definition types
//!
//! This module defines the immutable descriptor a caller supplies per
//! transactional call:
//! - Propagation: how the unit of work relates to an active transaction
//! - Isolation: requested isolation level
//! - TransactionDefinition: propagation + isolation + timeout + read-only
//!   hint + optional name

use std::fmt;

/// Timeout sentinel meaning "use the resource manager's default".
///
/// Caller-supplied timeouts below this value are rejected before any
/// transactional state is created.
pub const TIMEOUT_DEFAULT: i32 = -1;

/// Policy governing how a unit of work relates to an already-active
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// Join the current transaction, create a new one if none exists
    Required,
    /// Join the current transaction if one exists, otherwise run
    /// non-transactionally
    Supports,
    /// Join the current transaction, fail if none exists
    Mandatory,
    /// Suspend the current transaction and create a fresh one
    RequiresNew,
    /// Suspend the current transaction and run non-transactionally
    NotSupported,
    /// Run non-transactionally, fail if a transaction exists
    Never,
    /// Run within a nested transaction inside the current one
    Nested,
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Propagation::Required => "required",
            Propagation::Supports => "supports",
            Propagation::Mandatory => "mandatory",
            Propagation::RequiresNew => "requires_new",
            Propagation::NotSupported => "not_supported",
            Propagation::Never => "never",
            Propagation::Nested => "nested",
        };
        write!(f, "{}", name)
    }
}

/// Requested isolation level for a new transaction.
///
/// Enforcement is the responsibility of the resource-specific transaction
/// object; the core only carries the request through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isolation {
    /// Use the resource manager's default isolation level
    Default,
    /// Read uncommitted (lowest isolation)
    ReadUncommitted,
    /// Read committed
    ReadCommitted,
    /// Repeatable read
    RepeatableRead,
    /// Serializable (highest isolation)
    Serializable,
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Isolation::Default => "default",
            Isolation::ReadUncommitted => "read_uncommitted",
            Isolation::ReadCommitted => "read_committed",
            Isolation::RepeatableRead => "repeatable_read",
            Isolation::Serializable => "serializable",
        };
        write!(f, "{}", name)
    }
}

/// Immutable descriptor of one transactional call.
///
/// Supplied fresh per call and never mutated by the core. A missing
/// definition at the `execute` boundary is substituted with
/// `TransactionDefinition::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDefinition {
    propagation: Propagation,
    isolation: Isolation,
    timeout: i32,
    read_only: bool,
    name: Option<String>,
}

impl TransactionDefinition {
    /// Create a definition with the given propagation behavior and
    /// defaults for everything else
    pub fn new(propagation: Propagation) -> Self {
        Self {
            propagation,
            isolation: Isolation::Default,
            timeout: TIMEOUT_DEFAULT,
            read_only: false,
            name: None,
        }
    }

    /// Set the isolation level
    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Set the timeout in seconds
    ///
    /// `TIMEOUT_DEFAULT` (-1) means "use the resource manager's default".
    /// Values below the sentinel are rejected at execution time.
    pub fn with_timeout(mut self, timeout: i32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Mark the transaction read-only
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set the transaction name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The propagation behavior
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// The requested isolation level
    pub fn isolation(&self) -> Isolation {
        self.isolation
    }

    /// The timeout in seconds, or `TIMEOUT_DEFAULT`
    pub fn timeout(&self) -> i32 {
        self.timeout
    }

    /// Whether the transaction is read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The transaction name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Default for TransactionDefinition {
    fn default() -> Self {
        Self::new(Propagation::Required)
    }
}
