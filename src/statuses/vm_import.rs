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

use crate::statuses::taxonomy::ImportStatus;
use crate::types::kubevirt::condition;
use crate::types::kubevirt::vm_import::{
    CONDITION_MAPPING_RULES_CHECKING, CONDITION_PROCESSING, CONDITION_SUCCEEDED,
    CONDITION_VALIDATING, VirtualMachineImport,
};
use serde::Serialize;

pub const IMPORT_FAILED_MESSAGE: &str = "The virtual machine could not be imported.";

/// Checked in this order; the first one present and not true fails the import.
const FAILURE_CONDITIONS: [&str; 3] = [
    CONDITION_MAPPING_RULES_CHECKING,
    CONDITION_VALIDATING,
    CONDITION_PROCESSING,
];

/// Checked in this order for the step currently running.
const PROGRESS_CONDITIONS: [&str; 3] = [
    CONDITION_PROCESSING,
    CONDITION_VALIDATING,
    CONDITION_MAPPING_RULES_CHECKING,
];

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatusBundle {
    pub status: ImportStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl ImportStatusBundle {
    fn new(status: ImportStatus) -> Self {
        Self {
            status,
            message: None,
            detailed_message: None,
            progress: None,
        }
    }
}

/// Resolves the status of a VirtualMachineImport.
///
/// Returns `None` when there is no import at all, which callers read as
/// "not applicable".
pub fn resolve(vm_import: Option<&VirtualMachineImport>) -> Option<ImportStatusBundle> {
    let vm_import = vm_import?;
    let conditions = vm_import.conditions();

    if let Some(succeeded) = condition::find(conditions, CONDITION_SUCCEEDED) {
        if succeeded.is_true() {
            return Some(ImportStatusBundle::new(ImportStatus::Complete));
        }
        return Some(failed(succeeded.reason_message()));
    }

    if let Some(failure) = FAILURE_CONDITIONS
        .iter()
        .filter_map(|type_| condition::find(conditions, type_))
        .find(|c| !c.is_true())
    {
        return Some(failed(failure.reason_message()));
    }

    let Some(current) = PROGRESS_CONDITIONS
        .iter()
        .filter_map(|type_| condition::find(conditions, type_))
        .find(|c| c.is_true())
        .or_else(|| conditions.first())
    else {
        return Some(ImportStatusBundle {
            progress: Some(0),
            ..ImportStatusBundle::new(ImportStatus::Pending)
        });
    };

    Some(ImportStatusBundle {
        message: current.message.clone(),
        progress: Some(vm_import.progress()),
        ..ImportStatusBundle::new(ImportStatus::InProgress)
    })
}

fn failed(detailed_message: Option<String>) -> ImportStatusBundle {
    ImportStatusBundle {
        message: Some(IMPORT_FAILED_MESSAGE.to_owned()),
        detailed_message,
        ..ImportStatusBundle::new(ImportStatus::Error)
    }
}
