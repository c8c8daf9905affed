//  Copyright 2025 RustFS Team
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http:www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

// Fixture builders shared by the unit tests of every module.

use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use std::collections::BTreeMap;

use crate::statuses::vm::joins::{IMPORT_PVC_NAME_KEY, IMPORTER_APP, IMPORTER_APP_LABEL};
use crate::types::kubevirt::condition::Condition;
use crate::types::kubevirt::data_volume::{DataVolume, DataVolumeSpec, DataVolumeStatus};
use crate::types::kubevirt::migration::{
    VirtualMachineInstanceMigration, VirtualMachineInstanceMigrationSpec,
    VirtualMachineInstanceMigrationStatus,
};
use crate::types::kubevirt::vm::{DataVolumeTemplate, VirtualMachine, VirtualMachineSpec};
use crate::types::kubevirt::vm_import::{
    VirtualMachineImport, VirtualMachineImportSpec, VirtualMachineImportStatus,
};
use crate::types::kubevirt::vmi::{
    VirtualMachineInstance, VirtualMachineInstanceSpec, VirtualMachineInstanceStatus,
};

const NAMESPACE: &str = "default";

fn object_meta(name: &str, uid: String) -> metav1::ObjectMeta {
    metav1::ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(NAMESPACE.to_string()),
        uid: Some(uid),
        ..Default::default()
    }
}

pub fn create_test_vm(name: &str, running: Option<bool>) -> VirtualMachine {
    VirtualMachine {
        metadata: object_meta(name, format!("vm-uid-{name}")),
        spec: VirtualMachineSpec {
            running,
            ..Default::default()
        },
        status: None,
    }
}

pub fn with_data_volume_templates(mut vm: VirtualMachine, names: &[&str]) -> VirtualMachine {
    vm.spec.data_volume_templates = names
        .iter()
        .map(|name| DataVolumeTemplate {
            metadata: metav1::ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
        })
        .collect();
    vm
}

pub fn create_test_vmi(name: &str, phase: Option<&str>) -> VirtualMachineInstance {
    VirtualMachineInstance {
        metadata: object_meta(name, format!("vmi-uid-{name}")),
        spec: VirtualMachineInstanceSpec::default(),
        status: Some(VirtualMachineInstanceStatus {
            phase: phase.map(str::to_string),
            ..Default::default()
        }),
    }
}

pub fn condition(
    type_: &str,
    status: &str,
    reason: Option<&str>,
    message: Option<&str>,
) -> Condition {
    Condition {
        type_: type_.to_string(),
        status: status.to_string(),
        reason: reason.map(str::to_string),
        message: message.map(str::to_string),
    }
}

pub fn owner_reference(kind: &str, name: &str, uid: &str) -> metav1::OwnerReference {
    metav1::OwnerReference {
        api_version: "kubevirt.io/v1".to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        controller: Some(true),
        ..Default::default()
    }
}

pub fn create_test_pod(name: &str, phase: Option<&str>) -> corev1::Pod {
    corev1::Pod {
        metadata: object_meta(name, format!("pod-uid-{name}")),
        spec: None,
        status: Some(corev1::PodStatus {
            phase: phase.map(str::to_string),
            ..Default::default()
        }),
    }
}

/// A virt-launcher pod owned by `vmi`, named `virt-launcher-<vmi>-<suffix>`.
pub fn create_test_launcher_pod(
    vmi: &VirtualMachineInstance,
    suffix: &str,
    phase: Option<&str>,
) -> corev1::Pod {
    let vmi_name = vmi.metadata.name.clone().unwrap_or_default();
    let mut pod = create_test_pod(&format!("virt-launcher-{vmi_name}-{suffix}"), phase);
    pod.metadata.owner_references = Some(vec![owner_reference(
        "VirtualMachineInstance",
        &vmi_name,
        vmi.metadata.uid.as_deref().unwrap_or_default(),
    )]);
    pod
}

/// A CDI importer pod populating the PVC `pvc`.
pub fn create_test_importer_pod(pvc: &str, phase: Option<&str>) -> corev1::Pod {
    let mut pod = create_test_pod(&format!("importer-{pvc}"), phase);
    pod.metadata.labels = Some(BTreeMap::from([(
        IMPORTER_APP_LABEL.to_string(),
        IMPORTER_APP.to_string(),
    )]));
    pod.metadata.annotations = Some(BTreeMap::from([(
        IMPORT_PVC_NAME_KEY.to_string(),
        pvc.to_string(),
    )]));
    pod
}

pub fn pod_condition(
    type_: &str,
    status: &str,
    reason: Option<&str>,
    message: Option<&str>,
) -> corev1::PodCondition {
    corev1::PodCondition {
        type_: type_.to_string(),
        status: status.to_string(),
        reason: reason.map(str::to_string),
        message: message.map(str::to_string),
        ..Default::default()
    }
}

/// A container that is not ready and waiting with `reason`.
pub fn waiting_container(name: &str, reason: &str) -> corev1::ContainerStatus {
    corev1::ContainerStatus {
        name: name.to_string(),
        ready: false,
        state: Some(corev1::ContainerState {
            waiting: Some(corev1::ContainerStateWaiting {
                reason: Some(reason.to_string()),
                message: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn create_test_migration(
    vmi_name: &str,
    phase: Option<&str>,
) -> VirtualMachineInstanceMigration {
    VirtualMachineInstanceMigration {
        metadata: object_meta(
            &format!("{vmi_name}-migration"),
            format!("vmim-uid-{vmi_name}"),
        ),
        spec: VirtualMachineInstanceMigrationSpec {
            vmi_name: Some(vmi_name.to_string()),
        },
        status: Some(VirtualMachineInstanceMigrationStatus {
            phase: phase.map(str::to_string),
        }),
    }
}

pub fn create_test_data_volume(name: &str, progress: Option<&str>) -> DataVolume {
    DataVolume {
        metadata: object_meta(name, format!("dv-uid-{name}")),
        spec: DataVolumeSpec::default(),
        status: Some(DataVolumeStatus {
            phase: Some("ImportInProgress".to_string()),
            progress: progress.map(str::to_string),
        }),
    }
}

pub fn create_test_vm_import(name: &str, conditions: Vec<Condition>) -> VirtualMachineImport {
    VirtualMachineImport {
        metadata: object_meta(name, format!("vmimport-uid-{name}")),
        spec: VirtualMachineImportSpec::default(),
        status: Some(VirtualMachineImportStatus {
            target_vm_name: None,
            conditions,
        }),
    }
}
