//! Reconciler
//!
//! The Reconciler is responsible for:
//! - Deriving the zone list and record sets from the registrar's listing
//! - Turning a change batch into an ordered list of registrar calls
//! - Executing that list, stopping at the first failure
//!
//! ## Architecture
//!
//! ```text
//!   webhook request
//!         │
//!         ▼
//! ┌──────────────┐   plan_changes / plan_adjustments   ┌──────────────────┐
//! │  Reconciler  │ ──────────────────────────────────▶ │ RecordOperation  │
//! └──────────────┘                                      └──────────────────┘
//!         │                                                      │
//!         │ list_records                        add / remove     │
//!         ▼                                                      ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          RegistrarAdapter                            │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure semantics
//!
//! A batch is executed strictly in plan order. The first failing call ends
//! the batch and its error is returned. Calls that already succeeded stay
//! applied at the registrar; there is no compensating rollback.

pub mod normalize;
pub mod plan;

use tracing::{debug, error, info};

use crate::domain_filter::DomainFilter;
use crate::error::Result;
use crate::model::{ChangeBatch, Endpoint, RecordOperation};
use crate::traits::RegistrarAdapter;

pub use normalize::{domains_from_records, endpoints_from_records};
pub use plan::{plan_adjustments, plan_changes};

/// Stateless reconciliation engine over a registrar adapter
///
/// Holds no mutable state: every listing re-queries the registrar and every
/// batch is processed from scratch, so one instance can serve concurrent
/// requests.
pub struct Reconciler {
    /// Registrar the records live in
    registrar: Box<dyn RegistrarAdapter>,

    /// Which record names are exposed by `list_endpoints`
    domain_filter: DomainFilter,
}

impl Reconciler {
    /// Create a reconciler that exposes every record
    pub fn new(registrar: Box<dyn RegistrarAdapter>) -> Self {
        Self {
            registrar,
            domain_filter: DomainFilter::match_all(),
        }
    }

    /// Restrict `list_endpoints` to names accepted by `filter`
    pub fn with_domain_filter(mut self, filter: DomainFilter) -> Self {
        self.domain_filter = filter;
        self
    }

    /// Zone patterns (`*.<zone>`) for every editable zone
    pub async fn list_domains(&self) -> Result<Vec<String>> {
        let records = self.registrar.list_records().await?;
        let domains = domains_from_records(&records);
        debug!(
            "Listed {} domain(s) from {} record(s)",
            domains.len(),
            records.len()
        );
        Ok(domains)
    }

    /// Record sets for every editable record, one per `(name, type)`
    pub async fn list_endpoints(&self) -> Result<Vec<Endpoint>> {
        let records = self.registrar.list_records().await?;
        let endpoints = endpoints_from_records(&records, &self.domain_filter);
        debug!(
            "Listed {} endpoint(s) from {} record(s)",
            endpoints.len(),
            records.len()
        );
        Ok(endpoints)
    }

    /// Apply a change batch: all removals, then all additions
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every planned call succeeded
    /// - `Err(Error::Validation)`: The batch is malformed; nothing was sent
    /// - `Err(Error)`: A registrar call failed; earlier calls remain applied
    pub async fn apply_changes(&self, batch: &ChangeBatch) -> Result<()> {
        batch.validate()?;

        if batch.is_empty() {
            info!("Change batch is empty, nothing to apply");
            return Ok(());
        }

        let plan = plan_changes(batch);
        info!(
            create = batch.create.len(),
            update = batch.update_new.len(),
            delete = batch.delete.len(),
            removals = plan.iter().filter(|op| op.is_remove()).count(),
            "Applying changes: {} registrar call(s)",
            plan.len()
        );

        self.execute(&plan).await
    }

    /// Rewrite every target of `endpoints` at the registrar, then re-read
    ///
    /// Every target is removed and re-added even when it already matches the
    /// registrar. The result is a fresh listing, not an echo of the input.
    pub async fn adjust_endpoints(&self, endpoints: &[Endpoint]) -> Result<Vec<Endpoint>> {
        endpoints.iter().try_for_each(Endpoint::validate)?;

        let plan = plan_adjustments(endpoints);
        info!(
            "Adjusting {} endpoint(s): {} registrar call(s)",
            endpoints.len(),
            plan.len()
        );

        self.execute(&plan).await?;
        self.list_endpoints().await
    }

    /// Execute planned operations in order, stopping at the first failure
    async fn execute(&self, plan: &[RecordOperation]) -> Result<()> {
        for (applied, operation) in plan.iter().enumerate() {
            debug!("[{}/{}] {}", applied + 1, plan.len(), operation);

            if let Err(e) = self.perform(operation).await {
                error!(
                    kind = e.kind(),
                    registrar = self.registrar.registrar_name(),
                    applied,
                    remaining = plan.len() - applied,
                    "Registrar call failed ({}): {}",
                    operation,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    async fn perform(&self, operation: &RecordOperation) -> Result<()> {
        match operation {
            RecordOperation::Remove {
                name,
                record_type,
                value,
            } => self.registrar.remove_record(name, record_type, value).await,
            RecordOperation::Add {
                name,
                record_type,
                value,
            } => self.registrar.add_record(name, record_type, value).await,
        }
    }
}
