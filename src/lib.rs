pub mod config;
pub mod errors;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use gateway::{CollectionGateway, DirectusGateway, GatewayResult};
use services::assets::AssetUrls;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Anonymous client; per-request clients are derived with [`DirectusGateway::with_token`].
    pub directus: DirectusGateway,
    pub assets: AssetUrls,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn new(config: config::AppConfig) -> GatewayResult<Self> {
        let directus = DirectusGateway::new(&config.directus_url, config.request_timeout())?;
        Ok(Self {
            assets: AssetUrls::new(&config.directus_url),
            directus,
            config,
        })
    }

    /// Collection gateway acting with `token`, or anonymously without one.
    pub fn gateway(&self, token: Option<&str>) -> Arc<dyn CollectionGateway> {
        match token {
            Some(token) => Arc::new(self.directus.with_token(token)),
            None => Arc::new(self.directus.clone()),
        }
    }
}
