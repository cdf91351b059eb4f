// # webhookd - external-dns DreamHost webhook daemon
//
// This is a thin integration layer: all reconciliation logic lives in
// webhook-core, the DreamHost client in webhook-provider-dreamhost, and the
// HTTP surface in webhook-api.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the DreamHost adapter and the reconciler
// 4. Serving the webhook and health listeners until SIGTERM/SIGINT
//
// ## Configuration
//
// ### DreamHost
// - `DREAMHOST_API_KEY`: API key (falls back to `DREAMHOST_ACCESS_KEY`)
// - `DREAMHOST_API_URL`: API endpoint (default `https://api.dreamhost.com/`)
// - `DREAMHOST_TIMEOUT_SECS`: HTTP request timeout (default 30)
// - `DRY_RUN`: log mutations instead of sending them (default false)
//
// ### Domain filter
// - `DOMAIN_FILTER`: comma-separated domains to expose
// - `EXCLUDE_DOMAIN_FILTER`: comma-separated domains to hide
// - `REGEXP_DOMAIN_FILTER`: regex of names to expose
// - `REGEXP_DOMAIN_FILTER_EXCLUSION`: regex of names to hide
//
// ### Listeners
// - `WEBHOOK_HOST` / `WEBHOOK_PORT`: webhook listener (default localhost:8888)
// - `HEALTH_HOST` / `HEALTH_PORT`: probe listener (default 0.0.0.0:8080)
// - `READ_TIMEOUT` / `WRITE_TIMEOUT`: webhook request deadlines in seconds (default 60)
//
// ### Logging
// - `LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// export DREAMHOST_API_KEY=6SHU5P2HLDAYECUM
// export DOMAIN_FILTER=example.com
//
// webhookd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use webhook_api::{HealthState, ServerTimeouts, health_router, webhook_router, with_timeouts};
use webhook_core::{
    DomainFilter, DomainFilterConfig, Reconciler, RegistrarConfig, ServerConfig, WebhookConfig,
};
use webhook_provider_dreamhost::DreamhostRegistrar;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Upper bound on draining in-flight requests once a signal arrives
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum WebhookExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<WebhookExitCode> for ExitCode {
    fn from(code: WebhookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    webhook: WebhookConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("DREAMHOST_API_KEY")
            .or_else(|| var("DREAMHOST_ACCESS_KEY"))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "DREAMHOST_API_KEY is required. \
                    Set it via: export DREAMHOST_API_KEY=your_key"
                )
            })?;

        let mut registrar = RegistrarConfig::new(api_key);
        if let Some(url) = var("DREAMHOST_API_URL") {
            registrar = registrar.with_base_url(url);
        }
        if let Some(dry_run) = var("DRY_RUN") {
            registrar = registrar.with_dry_run(parse_bool("DRY_RUN", &dry_run)?);
        }
        if let Some(secs) = var("DREAMHOST_TIMEOUT_SECS") {
            registrar.timeout_secs = parse_number("DREAMHOST_TIMEOUT_SECS", &secs)?;
        }

        let mut server = ServerConfig::default();
        if let Some(host) = var("WEBHOOK_HOST") {
            server.webhook_host = host;
        }
        if let Some(port) = var("WEBHOOK_PORT") {
            server.webhook_port = parse_number("WEBHOOK_PORT", &port)?;
        }
        if let Some(host) = var("HEALTH_HOST") {
            server.health_host = host;
        }
        if let Some(port) = var("HEALTH_PORT") {
            server.health_port = parse_number("HEALTH_PORT", &port)?;
        }
        if let Some(secs) = var("READ_TIMEOUT") {
            server.read_timeout_secs = parse_number("READ_TIMEOUT", &secs)?;
        }
        if let Some(secs) = var("WRITE_TIMEOUT") {
            server.write_timeout_secs = parse_number("WRITE_TIMEOUT", &secs)?;
        }

        let domain_filter = DomainFilterConfig {
            include: split_list(var("DOMAIN_FILTER")),
            exclude: split_list(var("EXCLUDE_DOMAIN_FILTER")),
            regex: var("REGEXP_DOMAIN_FILTER"),
            regex_exclusion: var("REGEXP_DOMAIN_FILTER_EXCLUSION"),
        };

        Ok(Self {
            webhook: WebhookConfig {
                registrar,
                server,
                domain_filter,
            },
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.webhook.validate()?;
        self.level()?;
        Ok(())
    }

    /// The tracing level named by `LOG_LEVEL`
    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be true or false. Got: {}", name, value),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a number. Got: {}", name, value))
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WebhookExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WebhookExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WebhookExitCode::ConfigError.into();
    }

    info!("Starting webhookd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WebhookExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config.webhook).await {
            error!("Daemon error: {:#}", e);
            WebhookExitCode::RuntimeError
        } else {
            WebhookExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: WebhookConfig) -> Result<()> {
    let health = Arc::new(HealthState::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let health_listener = TcpListener::bind(config.server.health_address()).await?;
    info!("Health server listening on {}", health_listener.local_addr()?);
    let health_app = health_router(Arc::clone(&health));
    let health_rx = shutdown_rx.clone();
    let health_server = tokio::spawn(async move {
        axum::serve(health_listener, health_app)
            .with_graceful_shutdown(shutdown_requested(health_rx))
            .await
    });

    let registrar = DreamhostRegistrar::new(&config.registrar)?;
    info!(
        dry_run = registrar.is_dry_run(),
        "DreamHost adapter ready for {}", config.registrar.base_url
    );

    let filter = DomainFilter::from_config(&config.domain_filter)?;
    if filter.is_match_all() {
        info!("No domain filter configured, exposing every editable record");
    } else {
        info!("Domain filter: {}", filter.describe());
    }

    let reconciler = Arc::new(Reconciler::new(Box::new(registrar)).with_domain_filter(filter));

    let timeouts = ServerTimeouts::from(&config.server);
    let webhook_app = with_timeouts(webhook_router(reconciler), timeouts);

    let webhook_listener = TcpListener::bind(config.server.webhook_address()).await?;
    info!(
        read_timeout = ?timeouts.read,
        write_timeout = ?timeouts.write,
        "Webhook listening on {}",
        webhook_listener.local_addr()?
    );
    let webhook_server = tokio::spawn(async move {
        axum::serve(webhook_listener, webhook_app)
            .with_graceful_shutdown(shutdown_requested(shutdown_rx))
            .await
    });

    health.set_live(true);
    health.set_ready(true);
    info!("Daemon initialized successfully");

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    health.set_ready(false);
    health.set_live(false);
    // A send error means every server already stopped.
    let _ = shutdown_tx.send(true);

    let drained = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
        let (webhook, health) = tokio::join!(webhook_server, health_server);
        webhook??;
        health??;
        Ok::<(), anyhow::Error>(())
    })
    .await;

    match drained {
        Ok(result) => {
            result?;
            info!("Shutting down daemon");
            Ok(())
        }
        Err(_) => {
            warn!("Servers did not drain within {:?}", SHUTDOWN_TIMEOUT);
            Err(anyhow::anyhow!(
                "Shutdown timeout after {:?}",
                SHUTDOWN_TIMEOUT
            ))
        }
    }
}

/// Resolves once the daemon asks its servers to stop
async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    // A closed channel also means stop.
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DREAMHOST_API_KEY", "6SHU5P2HLDAYECUM")]).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.webhook.registrar.api_key, "6SHU5P2HLDAYECUM");
        assert_eq!(config.webhook.registrar.base_url, "https://api.dreamhost.com/");
        assert!(!config.webhook.registrar.dry_run);
        assert_eq!(config.webhook.registrar.timeout_secs, 30);
        assert_eq!(config.webhook.server.webhook_address(), "localhost:8888");
        assert_eq!(config.webhook.server.health_address(), "0.0.0.0:8080");
        assert_eq!(config.webhook.server.read_timeout_secs, 60);
        assert_eq!(config.webhook.server.write_timeout_secs, 60);
        assert!(config.webhook.domain_filter.include.is_empty());
        assert_eq!(config.level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_missing_key_is_error() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DREAMHOST_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_access_key_fallback() {
        let config = load(&[("DREAMHOST_ACCESS_KEY", "legacy")]).unwrap();
        assert_eq!(config.webhook.registrar.api_key, "legacy");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DREAMHOST_API_KEY", "key"),
            ("DREAMHOST_API_URL", "http://127.0.0.1:9000/"),
            ("DRY_RUN", "true"),
            ("DREAMHOST_TIMEOUT_SECS", "5"),
            ("WEBHOOK_HOST", "0.0.0.0"),
            ("WEBHOOK_PORT", "9888"),
            ("HEALTH_PORT", "9080"),
            ("READ_TIMEOUT", "15"),
            ("WRITE_TIMEOUT", "45"),
            ("DOMAIN_FILTER", "example.com, .example.org,"),
            ("EXCLUDE_DOMAIN_FILTER", "internal.example.com"),
            ("LOG_LEVEL", "DEBUG"),
        ])
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.webhook.registrar.base_url, "http://127.0.0.1:9000/");
        assert!(config.webhook.registrar.dry_run);
        assert_eq!(config.webhook.registrar.timeout_secs, 5);
        assert_eq!(config.webhook.server.webhook_address(), "0.0.0.0:9888");
        assert_eq!(config.webhook.server.health_address(), "0.0.0.0:9080");
        assert_eq!(
            ServerTimeouts::from(&config.webhook.server),
            ServerTimeouts {
                read: Duration::from_secs(15),
                write: Duration::from_secs(45),
            }
        );
        assert_eq!(
            config.webhook.domain_filter.include,
            vec!["example.com", ".example.org"]
        );
        assert_eq!(
            config.webhook.domain_filter.exclude,
            vec!["internal.example.com"]
        );
        assert_eq!(config.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(load(&[("DREAMHOST_API_KEY", "key"), ("DRY_RUN", "maybe")]).is_err());
        assert!(load(&[("DREAMHOST_API_KEY", "key"), ("WEBHOOK_PORT", "http")]).is_err());
        assert!(load(&[("DREAMHOST_API_KEY", "key"), ("HEALTH_PORT", "70000")]).is_err());
        assert!(load(&[("DREAMHOST_API_KEY", "key"), ("READ_TIMEOUT", "60s")]).is_err());
    }

    #[test]
    fn test_validation_failures() {
        let config = load(&[("DREAMHOST_API_KEY", "key"), ("LOG_LEVEL", "verbose")]).unwrap();
        assert!(config.validate().is_err());

        let config = load(&[
            ("DREAMHOST_API_KEY", "key"),
            ("REGEXP_DOMAIN_FILTER", "([unclosed"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = load(&[("DREAMHOST_API_KEY", "key"), ("WRITE_TIMEOUT", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = load(&[
            ("DREAMHOST_API_KEY", "key"),
            ("HEALTH_HOST", "localhost"),
            ("HEALTH_PORT", "8888"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
