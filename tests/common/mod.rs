//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test's main file.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use txflow::{
    CompletionStatus, Error, ResourceTransaction, Result, TransactionSynchronization,
};

static INIT_TRACING: Once = Once::new();

/// Install a tracing subscriber honoring RUST_LOG, once per process.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shared event log listeners append to, in invocation order.
pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Create an empty event log.
pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Read the log into a plain vec.
pub fn events(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

/// Synchronization listener that records every lifecycle hook into a
/// shared log, optionally failing from `before_commit` or
/// `before_completion`.
pub struct RecordingSynchronization {
    pub label: String,
    pub log: EventLog,
    pub fail_before_commit: bool,
    pub fail_before_completion: bool,
}

impl RecordingSynchronization {
    pub fn boxed(label: &str, log: &EventLog) -> Box<dyn TransactionSynchronization> {
        Box::new(Self {
            label: label.to_string(),
            log: Rc::clone(log),
            fail_before_commit: false,
            fail_before_completion: false,
        })
    }

    pub fn failing_before_commit(
        label: &str,
        log: &EventLog,
    ) -> Box<dyn TransactionSynchronization> {
        Box::new(Self {
            label: label.to_string(),
            log: Rc::clone(log),
            fail_before_commit: true,
            fail_before_completion: false,
        })
    }

    pub fn failing_before_completion(
        label: &str,
        log: &EventLog,
    ) -> Box<dyn TransactionSynchronization> {
        Box::new(Self {
            label: label.to_string(),
            log: Rc::clone(log),
            fail_before_commit: false,
            fail_before_completion: true,
        })
    }

    fn push(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, event));
    }
}

impl TransactionSynchronization for RecordingSynchronization {
    fn suspend(&mut self) {
        self.push("suspend");
    }

    fn resume(&mut self) {
        self.push("resume");
    }

    fn before_commit(&mut self, read_only: bool) -> Result<()> {
        self.push(if read_only {
            "before_commit_ro"
        } else {
            "before_commit"
        });
        if self.fail_before_commit {
            return Err(Error::SynchronizationFailure(format!(
                "{} refused commit",
                self.label
            )));
        }
        Ok(())
    }

    fn before_completion(&mut self) -> Result<()> {
        self.push("before_completion");
        if self.fail_before_completion {
            return Err(Error::SynchronizationFailure(format!(
                "{} failed completion",
                self.label
            )));
        }
        Ok(())
    }

    fn after_completion(&mut self, status: CompletionStatus) {
        self.push(match status {
            CompletionStatus::Committed => "after_completion_committed",
            CompletionStatus::RolledBack => "after_completion_rolled_back",
            CompletionStatus::Unknown => "after_completion_unknown",
        });
    }
}

/// Resource transaction stub tracking what the executor did with it.
///
/// `drive_after_completion` plays the resource layer's part: it invokes
/// `after_completion` on every captured listener with an outcome derived
/// from the rollback-only flag.
pub struct MockTransaction {
    pub existing: bool,
    pub rollback_only: bool,
    pub registered: Option<Vec<Box<dyn TransactionSynchronization>>>,
}

impl MockTransaction {
    pub fn new(existing: bool) -> Self {
        Self {
            existing,
            rollback_only: false,
            registered: None,
        }
    }

    pub fn registered_count(&self) -> usize {
        self.registered.as_ref().map_or(0, Vec::len)
    }

    pub fn drive_after_completion(&mut self) {
        let status = if self.rollback_only {
            CompletionStatus::RolledBack
        } else {
            CompletionStatus::Committed
        };
        if let Some(listeners) = self.registered.as_mut() {
            for listener in listeners {
                listener.after_completion(status);
            }
        }
    }
}

impl ResourceTransaction for MockTransaction {
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
        self.registered = Some(synchronizations);
    }
}
