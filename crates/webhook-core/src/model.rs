//! Data model shared by the registrar adapter, the reconciler and the HTTP layer
//!
//! Field names on the wire follow the external-dns webhook contract
//! (`dnsName`, `recordType`, `targets`, `updateOld`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A record row exactly as the registrar lists it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Zone the record lives in (e.g. "example.com")
    pub zone: String,
    /// Fully-qualified record name (e.g. "www.example.com")
    pub record: String,
    /// Record type (A, CNAME, TXT, ...)
    pub record_type: String,
    /// Record value
    pub value: String,
    /// Whether the registrar allows this record to be changed
    pub editable: bool,
}

impl RawRecord {
    /// Create a new raw record
    pub fn new(
        zone: impl Into<String>,
        record: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        editable: bool,
    ) -> Self {
        Self {
            zone: zone.into(),
            record: record.into(),
            record_type: record_type.into(),
            value: value.into(),
            editable,
        }
    }
}

/// A record set: one DNS name and type with all of its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// DNS name of the record set
    pub dns_name: String,
    /// Record type of the record set
    pub record_type: String,
    /// Values of the record set
    #[serde(default)]
    pub targets: Vec<String>,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        targets: Vec<String>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets,
        }
    }

    /// Check that the endpoint carries everything a registrar call needs
    pub fn validate(&self) -> Result<()> {
        if self.dns_name.trim().is_empty() {
            return Err(Error::validation("endpoint dnsName cannot be empty"));
        }
        if self.record_type.trim().is_empty() {
            return Err(Error::validation(format!(
                "endpoint {} has an empty recordType",
                self.dns_name
            )));
        }
        if self.targets.iter().any(|t| t.is_empty()) {
            return Err(Error::validation(format!(
                "endpoint {} ({}) has an empty target",
                self.dns_name, self.record_type
            )));
        }
        Ok(())
    }

    /// Parse a JSON array of endpoints, reporting failures as validation errors
    pub fn list_from_json(body: &[u8]) -> Result<Vec<Endpoint>> {
        serde_json::from_slice(body)
            .map_err(|e| Error::validation(format!("malformed endpoint list: {}", e)))
    }
}

/// The four-way split of endpoints external-dns sends per reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    /// Endpoints to create
    #[serde(default)]
    pub create: Vec<Endpoint>,
    /// Current state of endpoints being updated
    #[serde(default)]
    pub update_old: Vec<Endpoint>,
    /// Desired state of endpoints being updated
    #[serde(default)]
    pub update_new: Vec<Endpoint>,
    /// Endpoints to delete
    #[serde(default)]
    pub delete: Vec<Endpoint>,
}

impl ChangeBatch {
    /// Parse a change batch, reporting failures as validation errors
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| Error::validation(format!("malformed change batch: {}", e)))
    }

    /// Returns true if the batch carries no endpoints at all
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }

    /// Validate every endpoint in the batch
    pub fn validate(&self) -> Result<()> {
        self.delete
            .iter()
            .chain(&self.update_old)
            .chain(&self.create)
            .chain(&self.update_new)
            .try_for_each(Endpoint::validate)
    }
}

/// A single registrar call planned by the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOperation {
    /// Remove one value from a record set
    Remove {
        /// Record name
        name: String,
        /// Record type
        record_type: String,
        /// Record value
        value: String,
    },
    /// Add one value to a record set
    Add {
        /// Record name
        name: String,
        /// Record type
        record_type: String,
        /// Record value
        value: String,
    },
}

impl RecordOperation {
    /// Plan a removal
    pub fn remove(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Remove {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
        }
    }

    /// Plan an addition
    pub fn add(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Add {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
        }
    }

    /// Returns true for removals
    pub fn is_remove(&self) -> bool {
        matches!(self, RecordOperation::Remove { .. })
    }
}

impl fmt::Display for RecordOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOperation::Remove {
                name,
                record_type,
                value,
            } => write!(f, "remove {} {} {}", name, record_type, value),
            RecordOperation::Add {
                name,
                record_type,
                value,
            } => write!(f, "add {} {} {}", name, record_type, value),
        }
    }
}
