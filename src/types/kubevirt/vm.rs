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

use super::condition::{self, Condition};
use super::vmi::VirtualMachineInstanceSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};

pub const CONDITION_FAILURE: &str = "Failure";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachine",
    namespaced,
    status = "VirtualMachineStatus",
    derive = "Default",
    derive = "PartialEq",
    shortname = "vm",
    plural = "virtualmachines",
    singular = "virtualmachine",
    printcolumn = r#"{"name":"Status", "type":"string", "jsonPath":".status.printableStatus"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#,
    crates(serde_json = "k8s_openapi::serde_json")
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_strategy: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_volume_templates: Vec<DataVolumeTemplate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<VirtualMachineInstanceTemplate>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeTemplate {
    #[serde(default)]
    pub metadata: metav1::ObjectMeta,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<VirtualMachineInstanceSpec>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineStatus {
    /// Set once a VMI has been created for this VM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printable_status: Option<String>,
}

/// Run strategy of a VM, used when `spec.running` is not set.
///
/// https://kubevirt.io/user-guide/compute/run_strategies/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
pub enum RunStrategy {
    Always,
    RerunOnFailure,
    Manual,
    Halted,
}

impl VirtualMachine {
    pub fn is_created(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.created)
            .unwrap_or(false)
    }

    pub fn run_strategy(&self) -> Option<RunStrategy> {
        self.spec
            .run_strategy
            .as_deref()
            .and_then(|s| s.parse().ok())
    }

    /// Whether the VM should be running.
    ///
    /// `spec.running` wins when set. A `Manual` run strategy follows whatever
    /// was last started, so it reports `created`.
    pub fn is_expected_running(&self, created: bool) -> bool {
        if let Some(running) = self.spec.running {
            return running;
        }

        match self.run_strategy() {
            Some(RunStrategy::Always | RunStrategy::RerunOnFailure) => true,
            Some(RunStrategy::Manual) => created,
            Some(RunStrategy::Halted) | None => false,
        }
    }

    pub fn failure_condition(&self) -> Option<&Condition> {
        let conditions = self
            .status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default();
        condition::find(conditions, CONDITION_FAILURE).filter(|c| c.is_true())
    }

    /// Names of every DataVolume backing this VM: its templates plus
    /// volumes that reference an existing DataVolume.
    pub fn data_volume_names(&self) -> BTreeSet<String> {
        let templates = self
            .spec
            .data_volume_templates
            .iter()
            .filter_map(|t| t.metadata.name.clone());

        let volumes = self
            .spec
            .template
            .iter()
            .filter_map(|t| t.spec.as_ref())
            .flat_map(|spec| spec.volumes.iter())
            .filter_map(|v| v.data_volume.as_ref().map(|dv| dv.name.clone()));

        templates.chain(volumes).collect()
    }
}
