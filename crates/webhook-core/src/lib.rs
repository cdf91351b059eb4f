// # webhook-core
//
// Reconciliation core for the external-dns DreamHost webhook.
//
// ## Architecture Overview
//
// - **RegistrarAdapter**: Trait for listing and mutating records at a registrar
// - **Reconciler**: Turns registrar listings into webhook views and change
//   batches into ordered registrar calls
// - **DomainFilter**: Include/exclude/regex filter over record names
//
// ## Design Principles
//
// 1. **Stateless**: Every request re-derives what it needs from the registrar
// 2. **Ordered**: Removals always precede additions within a batch
// 3. **No hidden recovery**: No retries, no rollback; failures are reported
// 4. **Library-First**: The HTTP layer and daemon are thin wrappers

pub mod config;
pub mod domain_filter;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::{DomainFilterConfig, RegistrarConfig, ServerConfig, WebhookConfig};
pub use domain_filter::DomainFilter;
pub use error::{Error, Result};
pub use model::{ChangeBatch, Endpoint, RawRecord, RecordOperation};
pub use reconciler::Reconciler;
pub use traits::RegistrarAdapter;
