pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;
use crate::store::{SessionStore, StoreError};

pub async fn create_app(config: &Config) -> Result<axum::Router, StoreError> {
    let store = SessionStore::from_config(config).await?;
    let state = AppState::new(store);

    Ok(routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
