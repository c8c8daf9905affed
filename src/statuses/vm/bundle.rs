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

use crate::statuses::taxonomy::{PodStatus, VmStatus};
use crate::types::kubevirt::data_volume::DataVolume;
use crate::types::kubevirt::migration::VirtualMachineInstanceMigration;
use crate::types::kubevirt::vm_import::VirtualMachineImport;
use k8s_openapi::api::core::v1 as corev1;
use serde::Serialize;

/// The resolved status of one VM, with the resource that explains it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusBundle {
    pub status: VmStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_message: Option<String>,

    /// Percentage, 0..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<corev1::Pod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<VirtualMachineInstanceMigration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_import: Option<VirtualMachineImport>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub importer_pods_statuses: Vec<ImporterPodStatus>,
}

impl StatusBundle {
    pub fn new(status: VmStatus) -> Self {
        Self {
            status,
            message: None,
            detailed_message: None,
            progress: None,
            pod: None,
            migration: None,
            vm_import: None,
            importer_pods_statuses: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the message only when there is one.
    pub fn with_optional_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn with_detailed_message(mut self, detailed_message: Option<String>) -> Self {
        self.detailed_message = detailed_message;
        self
    }

    pub fn with_progress(mut self, progress: Option<u8>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_pod(mut self, pod: &corev1::Pod) -> Self {
        self.pod = Some(pod.clone());
        self
    }
}

/// Status of one CDI importer pod, joined to the DataVolume it populates.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImporterPodStatus {
    pub pod: corev1::Pod,

    pub status: PodStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_volume: Option<DataVolume>,
}
