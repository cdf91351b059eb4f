// # DreamHost Registrar Adapter
//
// This crate provides the DreamHost implementation of `RegistrarAdapter`.
//
// ## Behaviour
//
// - One HTTP request per adapter call; no retry, no backoff, no caching
// - HTTP timeout configured (30 seconds by default)
// - Dry-run mode: listings are real, mutations are only logged
// - Removing a record that does not exist is reported as success
//
// ## Security Requirements
//
// - API key NEVER appears in logs or error messages
// - API key is passed in through `RegistrarConfig`, never read from the
//   environment here
//
// ## API Reference
//
// - DreamHost API: https://help.dreamhost.com/hc/en-us/articles/217560167
// - List records:  GET /?key=..&cmd=dns-list_records&format=tab
// - Add record:    GET /?key=..&cmd=dns-add_record&record=..&type=..&value=..&comment=..
// - Remove record: GET /?key=..&cmd=dns-remove_record&record=..&type=..&value=..

pub mod listing;

use std::time::Duration;

use async_trait::async_trait;
use webhook_core::{Error, RawRecord, RegistrarAdapter, RegistrarConfig, Result};

use crate::listing::{ApiStatus, parse_records, parse_status};

/// Comment attached to every record this webhook creates
const RECORD_COMMENT: &str = "modified dynamically by external-dns";

/// Error reason DreamHost returns when removing a missing record
const NO_SUCH_RECORD: &str = "no_such_record";

/// DreamHost registrar adapter
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the adapter will:
/// - Perform `dns-list_records` requests
/// - Log the intended add/remove call
/// - **NOT** send any mutation to DreamHost
pub struct DreamhostRegistrar {
    /// DreamHost API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API endpoint
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostRegistrar")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostRegistrar {
    /// Create a new DreamHost adapter
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: If the configuration is invalid or the HTTP
    ///   client cannot be built
    pub fn new(config: &RegistrarConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.dry_run {
            tracing::warn!("DreamHost adapter running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
            dry_run: config.dry_run,
        })
    }

    /// Returns true if mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send one API command and return the payload of a `success` answer
    ///
    /// The reason of an `error` answer is returned as `Err(reason)` inside
    /// `Ok` so callers can tolerate specific reasons.
    async fn command(
        &self,
        cmd: &str,
        params: &[(&str, &str)],
    ) -> Result<std::result::Result<String, String>> {
        tracing::debug!("DreamHost API call: {} {:?}", cmd, params);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cmd", cmd),
                ("format", "tab"),
            ])
            .query(params)
            .send()
            .await
            // The request URL carries the key; keep it out of the message.
            .map_err(|e| {
                Error::transport(format!("{} request failed: {}", cmd, e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => Error::transport(format!(
                    "{}: authentication failed (invalid API key or missing permission). Status: {}",
                    cmd, status
                )),
                429 => Error::transport(format!(
                    "{}: rate limit exceeded. Status: {}",
                    cmd, status
                )),
                500..=599 => Error::transport(format!(
                    "{}: DreamHost server error. Status: {}",
                    cmd, status
                )),
                _ => Error::transport(format!("{}: unexpected status {}", cmd, status)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::transport(format!(
                    "{}: failed to read response: {}",
                    cmd,
                    e.without_url()
                ))
            })?;

        Ok(match parse_status(&body)? {
            ApiStatus::Success(payload) => Ok(payload.to_string()),
            ApiStatus::Error(reason) => Err(reason.to_string()),
        })
    }
}

#[async_trait]
impl RegistrarAdapter for DreamhostRegistrar {
    async fn list_records(&self) -> Result<Vec<RawRecord>> {
        let table = self
            .command("dns-list_records", &[])
            .await?
            .map_err(|reason| Error::transport(format!("dns-list_records: {}", reason)))?;

        let records = parse_records(&table)?;
        tracing::debug!("DreamHost listed {} record(s)", records.len());
        Ok(records)
    }

    async fn add_record(&self, name: &str, record_type: &str, value: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!("[DRY-RUN] Would add {} {} {}", name, record_type, value);
            return Ok(());
        }

        self.command(
            "dns-add_record",
            &[
                ("record", name),
                ("type", record_type),
                ("value", value),
                ("comment", RECORD_COMMENT),
            ],
        )
        .await?
        .map_err(|reason| {
            Error::transport(format!(
                "dns-add_record {} {} {}: {}",
                name, record_type, value, reason
            ))
        })?;

        tracing::info!("Added {} {} {}", name, record_type, value);
        Ok(())
    }

    async fn remove_record(&self, name: &str, record_type: &str, value: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!("[DRY-RUN] Would remove {} {} {}", name, record_type, value);
            return Ok(());
        }

        match self
            .command(
                "dns-remove_record",
                &[("record", name), ("type", record_type), ("value", value)],
            )
            .await?
        {
            Ok(_) => {
                tracing::info!("Removed {} {} {}", name, record_type, value);
                Ok(())
            }
            Err(reason) if reason == NO_SUCH_RECORD => {
                tracing::debug!(
                    "Record {} {} {} already absent at DreamHost",
                    name,
                    record_type,
                    value
                );
                Ok(())
            }
            Err(reason) => Err(Error::transport(format!(
                "dns-remove_record {} {} {}: {}",
                name, record_type, value, reason
            ))),
        }
    }

    fn registrar_name(&self) -> &'static str {
        "dreamhost"
    }
}
