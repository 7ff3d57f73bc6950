//! # Cross-Origin Policy
//!
//! The admin UI is often served from a different origin than this API, so every
//! response carries CORS headers. The policy is parsed once at startup; the
//! resulting `CorsLayer` also answers every `OPTIONS` pre-flight request.

use crate::config::{ConfigError, CorsConfig};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: OriginPolicy,
    allow_methods: Vec<Method>,
    allow_headers: Vec<HeaderName>,
}

#[derive(Debug, Clone)]
enum OriginPolicy {
    Any,
    List(Vec<HeaderValue>),
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, ConfigError> {
        let allow_origin = if config.allow_origin.trim() == "*" {
            warn!("CORS configured to allow all origins.");
            OriginPolicy::Any
        } else {
            let origins = config
                .allow_origin
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(|origin| {
                    HeaderValue::from_str(origin).map_err(|e| {
                        ConfigError::Invalid(format!("CORS origin '{origin}': {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            OriginPolicy::List(origins)
        };

        let allow_methods = config
            .allow_methods
            .iter()
            .map(|method| {
                Method::from_bytes(method.trim().as_bytes())
                    .map_err(|e| ConfigError::Invalid(format!("CORS method '{method}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let allow_headers = config
            .allow_headers
            .iter()
            .map(|header| {
                HeaderName::from_bytes(header.trim().as_bytes())
                    .map_err(|e| ConfigError::Invalid(format!("CORS header '{header}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            allow_origin,
            allow_methods,
            allow_headers,
        })
    }

    pub fn layer(&self) -> CorsLayer {
        let allow_origin = match &self.allow_origin {
            OriginPolicy::Any => AllowOrigin::any(),
            OriginPolicy::List(origins) => AllowOrigin::list(origins.clone()),
        };
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(self.allow_methods.clone())
            .allow_headers(self.allow_headers.clone())
    }
}
