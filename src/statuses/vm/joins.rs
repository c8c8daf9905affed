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

//! Joins between a VM and the resources around it.
//!
//! Kubevirt, CDI and the V2V providers relate their objects through naming
//! conventions, labels and owner references. Each predicate here encodes one
//! of those conventions.

use crate::types::kubevirt::data_volume::DataVolume;
use crate::types::kubevirt::migration::VirtualMachineInstanceMigration;
use crate::types::kubevirt::vm::VirtualMachine;
use crate::types::kubevirt::vm_import::VirtualMachineImport;
use crate::types::kubevirt::vmi::VirtualMachineInstance;
use crate::types::snapshot::ObjectKey;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::{Resource, ResourceExt};
use std::collections::BTreeSet;

pub const LAUNCHER_POD_PREFIX: &str = "virt-launcher-";
pub const CONVERSION_POD_PREFIX: &str = "kubevirt-v2v-conversion-";
pub const IMPORTER_POD_PREFIX: &str = "importer-";

pub const IMPORTER_APP_LABEL: &str = "app";
pub const IMPORTER_APP: &str = "containerized-data-importer";
pub const IMPORT_PVC_NAME_KEY: &str = "cdi.kubevirt.io/storage.import.importPvcName";

fn in_namespace<K: Resource>(resource: &K, namespace: &str) -> bool {
    resource.namespace().unwrap_or_default() == namespace
}

fn owner_of_kind<'a, K: Resource>(resource: &'a K, kind: &str) -> Option<&'a metav1::OwnerReference> {
    resource.owner_references().iter().find(|o| o.kind == kind)
}

/// Whether `owner` points at `target`. UIDs are compared when both sides
/// have one, names otherwise.
fn references<K: Resource>(owner: &metav1::OwnerReference, target: &K) -> bool {
    match target.meta().uid.as_deref() {
        Some(uid) if !owner.uid.is_empty() => owner.uid == uid,
        _ => owner.name == target.name_any(),
    }
}

/// A virt-launcher pod of the VMI named `subject.name`.
///
/// The name must carry the `virt-launcher-<name>-` prefix. When the pod is
/// owned by a VMI, that owner must be this VMI.
pub fn is_launcher_pod(
    pod: &corev1::Pod,
    subject: &ObjectKey,
    vmi: Option<&VirtualMachineInstance>,
) -> bool {
    let prefix = format!("{LAUNCHER_POD_PREFIX}{}-", subject.name);
    if !in_namespace(pod, &subject.namespace) || !pod.name_any().starts_with(&prefix) {
        return false;
    }

    match owner_of_kind(pod, "VirtualMachineInstance") {
        Some(owner) => match vmi {
            Some(vmi) => references(owner, vmi),
            None => owner.name == subject.name,
        },
        None => true,
    }
}

/// The newest launcher pod; a VMI may have two while it migrates.
pub fn find_launcher_pod<'a>(
    pods: &'a [corev1::Pod],
    subject: &ObjectKey,
    vmi: Option<&VirtualMachineInstance>,
) -> Option<&'a corev1::Pod> {
    pods.iter()
        .filter(|pod| is_launcher_pod(pod, subject, vmi))
        .max_by_key(|pod| pod.metadata.creation_timestamp.clone())
}

/// A VMware conversion pod, either named `kubevirt-v2v-conversion-<vm>-...`
/// or owned by the VM with the conversion prefix.
pub fn is_conversion_pod(pod: &corev1::Pod, vm: &VirtualMachine) -> bool {
    let key = ObjectKey::of(vm);
    if !in_namespace(pod, &key.namespace) {
        return false;
    }

    let name = pod.name_any();
    if name.starts_with(&format!("{CONVERSION_POD_PREFIX}{}-", key.name)) {
        return true;
    }

    name.starts_with(CONVERSION_POD_PREFIX)
        && owner_of_kind(pod, "VirtualMachine").is_some_and(|owner| references(owner, vm))
}

pub fn find_conversion_pod<'a>(
    pods: &'a [corev1::Pod],
    vm: &VirtualMachine,
) -> Option<&'a corev1::Pod> {
    pods.iter().find(|pod| is_conversion_pod(pod, vm))
}

/// Name of the PVC (and DataVolume) an importer pod populates.
///
/// CDI records it as an annotation or label; the `importer-<pvc>` pod name is
/// the fallback.
pub fn importer_pvc_name(pod: &corev1::Pod) -> Option<String> {
    pod.annotations()
        .get(IMPORT_PVC_NAME_KEY)
        .or_else(|| pod.labels().get(IMPORT_PVC_NAME_KEY))
        .cloned()
        .or_else(|| {
            pod.name_any()
                .strip_prefix(IMPORTER_POD_PREFIX)
                .map(str::to_owned)
        })
}

pub fn is_importer_pod(pod: &corev1::Pod) -> bool {
    pod.labels().get(IMPORTER_APP_LABEL).map(String::as_str) == Some(IMPORTER_APP)
}

/// An importer pod populating one of the VM's DataVolumes.
pub fn is_importer_pod_of(
    pod: &corev1::Pod,
    namespace: &str,
    data_volume_names: &BTreeSet<String>,
) -> bool {
    in_namespace(pod, namespace)
        && is_importer_pod(pod)
        && importer_pvc_name(pod).is_some_and(|pvc| data_volume_names.contains(&pvc))
}

pub fn find_importer_pods<'a>(
    pods: &'a [corev1::Pod],
    vm: &VirtualMachine,
) -> Vec<&'a corev1::Pod> {
    let namespace = vm.namespace().unwrap_or_default();
    let data_volume_names = vm.data_volume_names();
    if data_volume_names.is_empty() {
        return Vec::new();
    }

    pods.iter()
        .filter(|pod| is_importer_pod_of(pod, &namespace, &data_volume_names))
        .collect()
}

/// The DataVolume an importer pod works for, matched by PVC name.
pub fn find_data_volume<'a>(
    pod: &corev1::Pod,
    data_volumes: &'a [DataVolume],
) -> Option<&'a DataVolume> {
    let namespace = pod.namespace().unwrap_or_default();
    let pvc = importer_pvc_name(pod)?;
    data_volumes
        .iter()
        .find(|dv| in_namespace(*dv, &namespace) && dv.name_any() == pvc)
}

pub fn is_migration_of(migration: &VirtualMachineInstanceMigration, subject: &ObjectKey) -> bool {
    in_namespace(migration, &subject.namespace)
        && migration.spec.vmi_name.as_deref() == Some(subject.name.as_str())
}

pub fn find_active_migration<'a>(
    migrations: &'a [VirtualMachineInstanceMigration],
    subject: &ObjectKey,
) -> Option<&'a VirtualMachineInstanceMigration> {
    migrations
        .iter()
        .find(|m| is_migration_of(m, subject) && m.is_active())
}

/// The VirtualMachineImport listed among the VM's owner references.
pub fn find_vm_import<'a>(
    vm: &VirtualMachine,
    vm_imports: &'a [VirtualMachineImport],
) -> Option<&'a VirtualMachineImport> {
    let namespace = vm.namespace().unwrap_or_default();
    vm.owner_references()
        .iter()
        .filter(|o| o.kind == "VirtualMachineImport")
        .find_map(|owner| {
            vm_imports
                .iter()
                .find(|i| in_namespace(*i, &namespace) && references(owner, *i))
        })
}
