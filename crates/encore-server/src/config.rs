use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// HTTP-side settings. Database settings live in `encore_db::DatabaseConfig`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let raw_addr = std::env::var("ENCORE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw_addr.parse().unwrap_or_else(|e| {
            tracing::warn!("invalid ENCORE_ADDR {raw_addr:?} ({e}), using {DEFAULT_ADDR}");
            Self::default().addr
        });

        Self {
            addr,
            cors_origins: parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_default()),
        }
    }

    /// Restrictive when no origins are configured: cross-origin requests
    /// are only allowed from the server's own address.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = if origins.is_empty() {
            tracing::warn!(
                "CORS_ORIGINS not set, defaulting to restrictive CORS. Set CORS_ORIGINS=http://localhost:3000 for dev."
            );
            let origin = format!("http://{}", self.addr);
            AllowOrigin::exact(
                HeaderValue::from_str(&origin)
                    .unwrap_or_else(|_| HeaderValue::from_static("http://localhost")),
            )
        } else {
            tracing::info!("CORS allowed origins: {:?}", origins);
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
            .expose_headers(Any)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
