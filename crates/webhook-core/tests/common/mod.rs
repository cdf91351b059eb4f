//! Test doubles and common utilities for reconciler contract tests
//!
//! The fake registrar keeps an in-memory record table, logs every call in
//! order and can be told to fail or to silently ignore writes.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use webhook_core::error::{Error, Result};
use webhook_core::{Endpoint, RawRecord, RegistrarAdapter};

/// A registrar call as observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Add(String, String, String),
    Remove(String, String, String),
}

impl Call {
    pub fn add(name: &str, record_type: &str, value: &str) -> Self {
        Call::Add(name.to_string(), record_type.to_string(), value.to_string())
    }

    pub fn remove(name: &str, record_type: &str, value: &str) -> Self {
        Call::Remove(name.to_string(), record_type.to_string(), value.to_string())
    }
}

/// In-memory registrar that records every call
pub struct FakeRegistrar {
    zone: String,
    records: Arc<Mutex<Vec<RawRecord>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    add_count: Arc<AtomicUsize>,
    remove_count: Arc<AtomicUsize>,
    /// 1-based index of the add call that fails
    fail_add_at: Option<usize>,
    /// 1-based index of the remove call that fails
    fail_remove_at: Option<usize>,
    fail_list: bool,
    ignore_writes: bool,
}

impl FakeRegistrar {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            zone: "example.com".to_string(),
            records: Arc::new(Mutex::new(records)),
            calls: Arc::new(Mutex::new(Vec::new())),
            add_count: Arc::new(AtomicUsize::new(0)),
            remove_count: Arc::new(AtomicUsize::new(0)),
            fail_add_at: None,
            fail_remove_at: None,
            fail_list: false,
            ignore_writes: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Fail the n-th add call (1-based) with a transport error
    pub fn failing_add_at(mut self, n: usize) -> Self {
        self.fail_add_at = Some(n);
        self
    }

    /// Fail the n-th remove call (1-based) with a transport error
    pub fn failing_remove_at(mut self, n: usize) -> Self {
        self.fail_remove_at = Some(n);
        self
    }

    /// Fail every listing with a transport error
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Report success for writes without changing anything
    pub fn ignoring_writes(mut self) -> Self {
        self.ignore_writes = true;
        self
    }

    /// Create a new FakeRegistrar that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            records: Arc::clone(&other.records),
            calls: Arc::clone(&other.calls),
            add_count: Arc::clone(&other.add_count),
            remove_count: Arc::clone(&other.remove_count),
            fail_add_at: other.fail_add_at,
            fail_remove_at: other.fail_remove_at,
            fail_list: other.fail_list,
            ignore_writes: other.ignore_writes,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than listings
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::List).count()
    }

    pub fn records(&self) -> Vec<RawRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn has_value(&self, name: &str, record_type: &str, value: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.record == name && r.record_type == record_type && r.value == value)
    }
}

#[async_trait::async_trait]
impl RegistrarAdapter for FakeRegistrar {
    async fn list_records(&self) -> Result<Vec<RawRecord>> {
        self.calls.lock().unwrap().push(Call::List);
        if self.fail_list {
            return Err(Error::transport("did not receive a response"));
        }
        Ok(self.records())
    }

    async fn add_record(&self, name: &str, record_type: &str, value: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::add(name, record_type, value));

        let n = self.add_count.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_add_at == Some(n) {
            return Err(Error::transport("registrar rejected add"));
        }

        if !self.ignore_writes {
            self.records.lock().unwrap().push(RawRecord::new(
                self.zone.as_str(),
                name,
                record_type,
                value,
                true,
            ));
        }
        Ok(())
    }

    async fn remove_record(&self, name: &str, record_type: &str, value: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::remove(name, record_type, value));

        let n = self.remove_count.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_remove_at == Some(n) {
            return Err(Error::transport("registrar rejected remove"));
        }

        if !self.ignore_writes {
            self.records.lock().unwrap().retain(|r| {
                !(r.record == name && r.record_type == record_type && r.value == value)
            });
        }
        Ok(())
    }

    fn registrar_name(&self) -> &'static str {
        "fake"
    }
}

/// Editable record in the fake's default zone
pub fn editable(record: &str, record_type: &str, value: &str) -> RawRecord {
    RawRecord::new("example.com", record, record_type, value, true)
}

pub fn endpoint(name: &str, record_type: &str, targets: &[&str]) -> Endpoint {
    Endpoint::new(
        name,
        record_type,
        targets.iter().map(|t| t.to_string()).collect(),
    )
}
