// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::console::{routes, state::AppState};

/// Console server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Origin allowed to call the API from a browser, e.g. the console URL
    pub allowed_origin: Option<String>,
}

/// Start the console HTTP server
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting VM status console API on port {}", config.port);

    let cors = cors_layer(config.allowed_origin.as_deref())?;
    let app = app(AppState::new(), cors);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Console API listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  - POST /api/v1/status");
    tracing::info!("  - POST /api/v1/statuses");
    tracing::info!("  - GET  /api/v1/statuses/catalog");
    tracing::info!("  - GET  /healthz");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with its middleware layers
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .nest("/api/v1", routes::status_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// CORS for the console; cross-origin calls are refused unless an origin is configured.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match allowed_origin {
        Some(origin) => cors.allow_origin(origin.parse::<HeaderValue>()?),
        None => cors,
    })
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// The engine has no dependencies to wait for.
async fn ready_check() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}
