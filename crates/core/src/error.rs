//! Error types for txflow
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for txflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the transaction core
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a timeout below the "use default" sentinel
    #[error("Invalid transaction timeout: {timeout}")]
    InvalidTimeout {
        /// The rejected timeout value in seconds
        timeout: i32,
    },

    /// Propagation behavior contradicts the existing-transaction state
    #[error("Illegal transaction state: {0}")]
    IllegalState(String),

    /// Synchronization was required to be active but is not
    #[error("Transaction synchronization is not active")]
    SynchronizationNotActive,

    /// Synchronization was initialized while already active
    #[error("Cannot activate transaction synchronization - already active")]
    SynchronizationAlreadyActive,

    /// A resource is already bound for the given key
    #[error("A resource is already bound for key '{key}'")]
    ResourceAlreadyBound {
        /// The offending resource key
        key: String,
    },

    /// No resource is bound for the given key
    #[error("No resource bound for key '{key}'")]
    ResourceNotBound {
        /// The missing resource key
        key: String,
    },

    /// A synchronization listener callback failed
    #[error("Synchronization failure: {0}")]
    SynchronizationFailure(String),

    /// The transactional unit of work failed
    #[error("Transaction execution failed: {0}")]
    Execution(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_timeout() {
        let err = Error::InvalidTimeout { timeout: -5 };
        let msg = err.to_string();
        assert!(msg.contains("Invalid transaction timeout"));
        assert!(msg.contains("-5"));
    }

    #[test]
    fn test_error_display_illegal_state() {
        let err = Error::IllegalState("no existing transaction found".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Illegal transaction state"));
        assert!(msg.contains("no existing transaction found"));
    }

    #[test]
    fn test_error_display_synchronization_not_active() {
        let err = Error::SynchronizationNotActive;
        assert!(err.to_string().contains("not active"));
    }

    #[test]
    fn test_error_display_synchronization_already_active() {
        let err = Error::SynchronizationAlreadyActive;
        assert!(err.to_string().contains("already active"));
    }

    #[test]
    fn test_error_display_resource_already_bound() {
        let err = Error::ResourceAlreadyBound {
            key: "session".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("already bound"));
        assert!(msg.contains("session"));
    }

    #[test]
    fn test_error_display_resource_not_bound() {
        let err = Error::ResourceNotBound {
            key: "session".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("No resource bound"));
        assert!(msg.contains("session"));
    }

    #[test]
    fn test_error_display_synchronization_failure() {
        let err = Error::SynchronizationFailure("cache flush failed".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Synchronization failure"));
        assert!(msg.contains("cache flush failed"));
    }

    #[test]
    fn test_error_display_execution() {
        let err = Error::Execution("constraint violated".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Transaction execution failed"));
        assert!(msg.contains("constraint violated"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::SynchronizationNotActive)
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::InvalidTimeout { timeout: -2 };

        match err {
            Error::InvalidTimeout { timeout } => assert_eq!(timeout, -2),
            _ => panic!("Wrong error variant"),
        }
    }
}
