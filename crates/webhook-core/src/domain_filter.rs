//! Domain filter applied to record listings
//!
//! Mirrors the filter options external-dns providers accept: plain
//! include/exclude suffix lists, or a regex with an optional exclusion regex.
//! When a regex is configured the plain lists are ignored.

use regex::Regex;

use crate::config::DomainFilterConfig;
use crate::error::{Error, Result};

/// Decides which record names this webhook exposes
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    regex: Option<Regex>,
    regex_exclusion: Option<Regex>,
}

impl DomainFilter {
    /// A filter that matches every name
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Build a filter from configuration
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: If either regex fails to compile
    pub fn from_config(config: &DomainFilterConfig) -> Result<Self> {
        let regex = compile(config.regex.as_deref(), "REGEXP_DOMAIN_FILTER")?;
        let regex_exclusion = compile(
            config.regex_exclusion.as_deref(),
            "REGEXP_DOMAIN_FILTER_EXCLUSION",
        )?;

        Ok(Self {
            include: normalize_list(&config.include),
            exclude: normalize_list(&config.exclude),
            regex,
            regex_exclusion,
        })
    }

    /// Create a filter from include and exclude suffix lists
    pub fn with_exclusions(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: normalize_list(include),
            exclude: normalize_list(exclude),
            regex: None,
            regex_exclusion: None,
        }
    }

    /// Returns true if the filter lets `name` through
    pub fn matches(&self, name: &str) -> bool {
        let name = normalize(name);

        if let Some(regex) = &self.regex {
            let excluded = self
                .regex_exclusion
                .as_ref()
                .is_some_and(|r| r.is_match(&name));
            return regex.is_match(&name) && !excluded;
        }

        let included =
            self.include.is_empty() || self.include.iter().any(|d| suffix_match(&name, d));
        included && !self.exclude.iter().any(|d| suffix_match(&name, d))
    }

    /// Returns true if no filtering is configured
    pub fn is_match_all(&self) -> bool {
        self.regex.is_none() && self.include.is_empty() && self.exclude.is_empty()
    }

    /// Human-readable summary for the startup log
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if let Some(regex) = &self.regex {
            parts.push(format!("Regexp domain filter: '{}'", regex.as_str()));
            if let Some(exclusion) = &self.regex_exclusion {
                parts.push(format!("with exclusion: '{}'", exclusion.as_str()));
            }
        } else {
            if !self.include.is_empty() {
                parts.push(format!("domain filter: '{}'", self.include.join(",")));
            }
            if !self.exclude.is_empty() {
                parts.push(format!("exclude domain filter: '{}'", self.exclude.join(",")));
            }
        }

        if parts.is_empty() {
            "no kind of domain filters".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn compile(pattern: Option<&str>, variable: &str) -> Result<Option<Regex>> {
    match pattern.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|e| Error::config(format!("{} is not a valid regex: {}", variable, e))),
        None => Ok(None),
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

fn normalize_list(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .map(|d| normalize(d))
        .filter(|d| !d.is_empty())
        .collect()
}

/// `".example.com"` matches subdomains only; `"example.com"` also matches itself.
fn suffix_match(name: &str, domain: &str) -> bool {
    if domain.starts_with('.') {
        return name.ends_with(domain);
    }
    name == domain
        || name
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
