// # Registrar Adapter Trait
//
// Defines the I/O boundary between the reconciler and a DNS registrar.
//
// ## Implementations
//
// - DreamHost: `webhook-provider-dreamhost` crate
//
// ## Usage
//
// ```rust,ignore
// use webhook_core::RegistrarAdapter;
//
// async fn show(registrar: &dyn RegistrarAdapter) -> webhook_core::Result<()> {
//     for record in registrar.list_records().await? {
//         println!("{} {} {}", record.record, record.record_type, record.value);
//     }
//     registrar.add_record("www.example.com", "A", "192.0.2.1").await
// }
// ```

use async_trait::async_trait;

use crate::model::RawRecord;

/// Trait for registrar implementations
///
/// A registrar adapter is a pure I/O boundary: it lists records and performs
/// single add/remove calls. It makes no decisions about what to change.
///
/// # Thread Safety
///
/// Implementations must be thread-safe; one adapter instance serves every
/// concurrent webhook request.
///
/// ## Allowed
/// - HTTP/HTTPS calls to the registrar's own API
/// - Parsing the registrar's responses
/// - Returning success or failure
///
/// ## Not allowed
/// - Retry or backoff (there is none anywhere in this system)
/// - Caching listings between calls
/// - Deciding whether a change is needed (owned by `Reconciler`)
#[async_trait]
pub trait RegistrarAdapter: Send + Sync {
    /// List every record the registrar knows about
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RawRecord>)`: A fresh snapshot, in registrar order
    /// - `Err(Error::Transport)`: The registrar did not answer with success
    /// - `Err(Error::Format)`: The answer could not be parsed into records
    async fn list_records(&self) -> Result<Vec<RawRecord>, crate::Error>;

    /// Create one record value at the registrar
    ///
    /// Calling this twice is not guaranteed to be a no-op; the registrar may
    /// create a duplicate or reject the second call.
    async fn add_record(
        &self,
        name: &str,
        record_type: &str,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Remove one record value at the registrar
    ///
    /// Removing a value that does not exist must not be reported as an error.
    async fn remove_record(
        &self,
        name: &str,
        record_type: &str,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Get the registrar name (for logging/debugging)
    fn registrar_name(&self) -> &'static str;
}
