//! Request classification.

use http::header;
use regex::RegexSet;
use skiff_core::Request;

use crate::config::{ConfigError, WorkerConfig};

/// How an intercepted request should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Hit the network first; cache the result for offline recovery.
    AlwaysFetch,
    /// Hit the network first; never write the result to the cache.
    NeverCache,
    /// Fetch live and capture into the cache, recovering from cache when
    /// the network is down.
    FetchAndCache,
    /// Serve from cache, touching the network only on a miss.
    CacheFirst,
}

/// Classifies requests by URL pattern and Accept header.
///
/// Pattern sets are compiled once at construction and immutable after.
/// `never_cache` takes precedence over `always_fetch`; both take
/// precedence over the Accept header check.
#[derive(Debug)]
pub struct Classifier {
    always_fetch: RegexSet,
    never_cache: RegexSet,
}

impl Classifier {
    /// Compile a classifier from configuration.
    pub fn from_config(config: &WorkerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            always_fetch: compile_set(&config.always_fetch)?,
            never_cache: compile_set(&config.never_cache)?,
        })
    }

    /// Classify one request. Pure; no side effects.
    pub fn classify(&self, request: &Request) -> Classification {
        if self.never_cache.is_match(request.url()) {
            return Classification::NeverCache;
        }
        if self.always_fetch.is_match(request.url()) {
            return Classification::AlwaysFetch;
        }
        if wants_html(request) {
            return Classification::FetchAndCache;
        }
        Classification::CacheFirst
    }
}

/// Whether the Accept header asks for an HTML document.
fn wants_html(request: &Request) -> bool {
    request
        .header(header::ACCEPT)
        .map(|accept| accept.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

fn compile_set(patterns: &[String]) -> Result<RegexSet, ConfigError> {
    RegexSet::new(patterns).map_err(|e| ConfigError::Pattern(e.to_string()))
}
