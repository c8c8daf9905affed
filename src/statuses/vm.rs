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

use crate::statuses::taxonomy::VmStatus;
use crate::types::snapshot::{Inventory, ResourceSnapshot};
use tracing::debug;

mod bundle;
pub mod joins;
pub mod rules;
mod summary;

pub use bundle::{ImporterPodStatus, StatusBundle};
pub use summary::{StatusCounts, StatusFilter, VmStatusEntry};

/// Resolves the status of one VM (or standalone VMI).
///
/// Always returns a bundle; `Unknown` when no rule applies.
pub fn resolve(snapshot: &ResourceSnapshot) -> StatusBundle {
    let ctx = rules::RuleContext::new(snapshot);

    for rule in rules::RULES {
        if let Some(bundle) = (rule.detect)(&ctx) {
            debug!(
                subject = ?ctx.subject,
                rule = rule.name,
                status = %bundle.status,
                "status resolved"
            );
            return bundle;
        }
    }

    debug!(subject = ?ctx.subject, "no rule matched");
    StatusBundle::new(VmStatus::Unknown)
}

/// Resolves every VM and standalone VMI of an inventory.
pub fn resolve_all(inventory: &Inventory) -> Vec<VmStatusEntry> {
    inventory
        .snapshots()
        .iter()
        .map(|snapshot| {
            let key = snapshot.subject().unwrap_or_default();
            VmStatusEntry::new(key, resolve(snapshot))
        })
        .collect()
}
