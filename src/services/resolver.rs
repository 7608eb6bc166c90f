//! Remote media resolver
//!
//! Maps an experiment id to a playable video URL. The storage-backed
//! implementation probes the bucket's public URL with a HEAD request; any
//! non-success answer counts as "not found".

use crate::config::Config;
use crate::error::ResolverError;
use crate::model::{media_key, ExperimentId};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

/// Key-to-URL resolution service
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, experiment: &ExperimentId) -> Resolution;
}

/// Resolver for public objects in a storage bucket
pub struct StorageResolver {
    client: Client,
    base_url: String,
    bucket: String,
}

impl StorageResolver {
    pub fn new(base_url: &str, bucket: &str, timeout: Duration) -> Result<Self, ResolverError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ResolverError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .redirect(Policy::limited(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            bucket: bucket.trim_matches('/').to_string(),
        })
    }

    pub fn public_url(&self, experiment: &ExperimentId) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            media_key(experiment)
        )
    }
}

impl MediaResolver for StorageResolver {
    fn resolve(&self, experiment: &ExperimentId) -> Resolution {
        let url = self.public_url(experiment);

        match self.client.head(&url).send() {
            Ok(resp) if resp.status().is_success() => Resolution::Found(url),
            Ok(resp) => {
                tracing::debug!(%experiment, status = resp.status().as_u16(), "media not available");
                Resolution::NotFound
            }
            Err(e) => {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                tracing::warn!(%experiment, kind, error = %e, "media lookup failed");
                Resolution::NotFound
            }
        }
    }
}

/// Resolver used when no media storage is configured
pub struct OfflineResolver;

impl MediaResolver for OfflineResolver {
    fn resolve(&self, _experiment: &ExperimentId) -> Resolution {
        Resolution::NotFound
    }
}

/// Build the resolver described by the config, falling back to offline mode
pub fn resolver_from_config(config: &Config) -> Arc<dyn MediaResolver> {
    let Some(base_url) = config.media_base_url.as_deref() else {
        tracing::info!("no media_base_url configured, media lookups disabled");
        return Arc::new(OfflineResolver);
    };

    match StorageResolver::new(
        base_url,
        &config.media_bucket,
        Duration::from_secs(config.lookup_timeout_secs),
    ) {
        Ok(resolver) => Arc::new(resolver),
        Err(e) => {
            tracing::warn!(error = %e, "media resolver unavailable");
            Arc::new(OfflineResolver)
        }
    }
}
