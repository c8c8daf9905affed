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

use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::console::models::status::CatalogEntry;
use crate::statuses::taxonomy::VmStatus;

/// Console application state
///
/// The API is stateless apart from the status catalog, which is built once.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Vec<CatalogEntry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(VmStatus::iter().map(CatalogEntry::from).collect()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
