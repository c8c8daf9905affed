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

use super::condition::Condition;
use crate::utils::progress;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const PROGRESS_ANNOTATION: &str = "vmimport.v2v.kubevirt.io/progress";

pub const CONDITION_SUCCEEDED: &str = "Succeeded";
pub const CONDITION_PROCESSING: &str = "Processing";
pub const CONDITION_VALIDATING: &str = "Validating";
pub const CONDITION_MAPPING_RULES_CHECKING: &str = "MappingRulesChecking";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[kube(
    group = "v2v.kubevirt.io",
    version = "v1beta1",
    kind = "VirtualMachineImport",
    namespaced,
    status = "VirtualMachineImportStatus",
    derive = "Default",
    derive = "PartialEq",
    shortname = "vmimport",
    plural = "virtualmachineimports",
    singular = "virtualmachineimport",
    crates(serde_json = "k8s_openapi::serde_json")
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineImportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_vm_name: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineImportStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_vm_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl VirtualMachineImport {
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    /// Import progress from the progress annotation, 0 when missing or malformed.
    pub fn progress(&self) -> u8 {
        self.annotations()
            .get(PROGRESS_ANNOTATION)
            .map(|p| progress::parse(p))
            .unwrap_or(0)
    }
}
