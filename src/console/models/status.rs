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

use serde::{Deserialize, Serialize};

use crate::statuses::taxonomy::{SimpleLabel, StatusFlags, StatusValue, VmStatus};
use crate::statuses::vm::{StatusBundle, StatusCounts, VmStatusEntry};

/// Resolved status of one VM
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(flatten)]
    pub bundle: StatusBundle,
    pub label: &'static str,
    pub simple_label: SimpleLabel,
}

impl From<StatusBundle> for StatusResponse {
    fn from(bundle: StatusBundle) -> Self {
        Self {
            label: bundle.status.label(),
            simple_label: bundle.status.simple_label(),
            bundle,
        }
    }
}

/// Query of the batch endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StatusListQuery {
    /// Comma separated status keys or simple labels
    pub status: Option<String>,
}

/// Resolved statuses of every VM in a list
#[derive(Debug, Serialize)]
pub struct StatusListResponse {
    pub items: Vec<VmStatusEntry>,
    /// Counts over all VMs, before filtering
    pub counts: StatusCounts,
}

/// One entry of the VM status catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub simple_label: SimpleLabel,
    #[serde(flatten)]
    pub flags: StatusFlags,
}

impl From<VmStatus> for CatalogEntry {
    fn from(status: VmStatus) -> Self {
        Self {
            key: status.key(),
            label: status.label(),
            simple_label: status.simple_label(),
            flags: status.flags(),
        }
    }
}

/// Catalog response
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub statuses: Vec<CatalogEntry>,
}
