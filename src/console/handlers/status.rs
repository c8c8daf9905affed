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
    Json,
    extract::{Query, State},
};
use snafu::ResultExt;

use crate::console::{
    error::{self, Error, Result},
    models::status::*,
    state::AppState,
};
use crate::statuses::vm::{self, StatusCounts, StatusFilter};
use crate::types::snapshot::{Inventory, ResourceSnapshot};

/// Resolve the status of one VM from its snapshot
pub async fn resolve_status(body: String) -> Result<Json<StatusResponse>> {
    let snapshot = ResourceSnapshot::from_document(&body).context(error::SnapshotSnafu)?;
    Ok(Json(vm::resolve(&snapshot).into()))
}

/// Resolve every VM of a Kubernetes `List`, optionally filtered by status
pub async fn resolve_statuses(
    Query(query): Query<StatusListQuery>,
    body: String,
) -> Result<Json<StatusListResponse>> {
    let filter = match query.status.as_deref() {
        Some(raw) => StatusFilter::parse(raw).map_err(|e| Error::BadRequest {
            message: e.to_string(),
        })?,
        None => StatusFilter::default(),
    };

    let inventory = Inventory::from_document(&body).context(error::SnapshotSnafu)?;
    let entries = vm::resolve_all(&inventory);
    let counts: StatusCounts = entries.iter().collect();

    let items = entries
        .into_iter()
        .filter(|entry| filter.matches(entry.bundle.status))
        .collect();

    Ok(Json(StatusListResponse { items, counts }))
}

/// List every VM status with its label and flags
pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        statuses: state.catalog.as_ref().clone(),
    })
}
