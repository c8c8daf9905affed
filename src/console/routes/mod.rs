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

use axum::{
    Router,
    routing::{get, post},
};

use crate::console::{handlers, state::AppState};

/// Status resolution routes
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/status", post(handlers::status::resolve_status))
        .route("/statuses", post(handlers::status::resolve_statuses))
        .route("/statuses/catalog", get(handlers::status::catalog))
}
