//! Turning desired changes into an ordered list of registrar calls
//!
//! Every removal precedes every addition. An update is a removal of the old
//! value followed by an addition of the new one, so a registrar never sees a
//! new value while the value it replaces is still present.

use crate::model::{ChangeBatch, Endpoint, RecordOperation};

/// Plan the registrar calls for a change batch
///
/// Removals come from `delete ++ updateOld`, additions from
/// `create ++ updateNew`; targets are visited in listed order.
pub fn plan_changes(batch: &ChangeBatch) -> Vec<RecordOperation> {
    let removals = batch
        .delete
        .iter()
        .chain(&batch.update_old)
        .flat_map(|endpoint| {
            endpoint.targets.iter().map(move |target| {
                RecordOperation::remove(&endpoint.dns_name, &endpoint.record_type, target)
            })
        });

    let additions = batch
        .create
        .iter()
        .chain(&batch.update_new)
        .flat_map(|endpoint| {
            endpoint.targets.iter().map(move |target| {
                RecordOperation::add(&endpoint.dns_name, &endpoint.record_type, target)
            })
        });

    removals.chain(additions).collect()
}

/// Plan an unconditional remove-then-add for every target of every endpoint
pub fn plan_adjustments(endpoints: &[Endpoint]) -> Vec<RecordOperation> {
    endpoints
        .iter()
        .flat_map(|endpoint| {
            endpoint.targets.iter().flat_map(move |target| {
                [
                    RecordOperation::remove(&endpoint.dns_name, &endpoint.record_type, target),
                    RecordOperation::add(&endpoint.dns_name, &endpoint.record_type, target),
                ]
            })
        })
        .collect()
}
