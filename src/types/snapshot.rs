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

use crate::types::error::{DecodeItemSnafu, Error, MissingKindSnafu, ReadSnapshotSnafu};
use crate::types::kubevirt::data_volume::DataVolume;
use crate::types::kubevirt::migration::VirtualMachineInstanceMigration;
use crate::types::kubevirt::vm::VirtualMachine;
use crate::types::kubevirt::vm_import::VirtualMachineImport;
use crate::types::kubevirt::vmi::VirtualMachineInstance;
use k8s_openapi::api::core::v1 as corev1;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Everything known about one logical VM at a point in time.
///
/// This is the input of the status resolver. Every field may be missing;
/// a missing collection means "no evidence".
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm: Option<VirtualMachine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmi: Option<VirtualMachineInstance>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pods: Vec<corev1::Pod>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub migrations: Vec<VirtualMachineInstanceMigration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_volumes: Vec<DataVolume>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_imports: Vec<VirtualMachineImport>,
}

/// `namespace/name` of the VM a snapshot describes.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl ObjectKey {
    pub fn of<K: Resource>(resource: &K) -> Self {
        Self {
            namespace: resource.namespace().unwrap_or_default(),
            name: resource.name_any(),
        }
    }
}

impl ResourceSnapshot {
    /// Reads a snapshot written as YAML or JSON.
    pub fn from_document(doc: &str) -> Result<Self, Error> {
        Ok(serde_yaml_ng::from_str(doc)?)
    }

    /// The VM this snapshot is about, falling back to the VMI when there is
    /// no VM (standalone VMI).
    pub fn subject(&self) -> Option<ObjectKey> {
        self.vm
            .as_ref()
            .map(ObjectKey::of)
            .or_else(|| self.vmi.as_ref().map(ObjectKey::of))
    }
}

/// Resources of every supported kind, as read from a Kubernetes `List`.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    pub vms: Vec<VirtualMachine>,
    pub vmis: Vec<VirtualMachineInstance>,
    pub pods: Vec<corev1::Pod>,
    pub migrations: Vec<VirtualMachineInstanceMigration>,
    pub data_volumes: Vec<DataVolume>,
    pub vm_imports: Vec<VirtualMachineImport>,
}

impl Inventory {
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let doc = tokio::fs::read_to_string(path)
            .await
            .context(ReadSnapshotSnafu { path })?;
        Self::from_document(&doc)
    }

    /// Reads one or more YAML (or JSON) documents. Each document is either a
    /// `List` with `items` or a single object. Items of kinds the status
    /// engine does not consume are skipped.
    pub fn from_document(doc: &str) -> Result<Self, Error> {
        let mut inventory = Self::default();
        let mut index = 0;

        for document in serde_yaml_ng::Deserializer::from_str(doc) {
            let value = Value::deserialize(document)?;
            let items = match value {
                Value::Null => continue,
                Value::Array(items) => items,
                Value::Object(mut object) => match object.remove("items") {
                    Some(Value::Array(items)) => items,
                    Some(_) | None if object.contains_key("kind") => {
                        vec![Value::Object(object)]
                    }
                    _ => Vec::new(),
                },
                other => {
                    warn!("skipping non-object document: {other}");
                    continue;
                }
            };

            for item in items {
                inventory.push(index, item)?;
                index += 1;
            }
        }

        Ok(inventory)
    }

    fn push(&mut self, index: usize, item: Value) -> Result<(), Error> {
        let kind = item
            .get("kind")
            .and_then(Value::as_str)
            .context(MissingKindSnafu { index })?
            .to_owned();
        let name = item
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        match kind.as_str() {
            "VirtualMachine" => keep(&mut self.vms, decode(item, &kind, &name)),
            "VirtualMachineInstance" => keep(&mut self.vmis, decode(item, &kind, &name)),
            "Pod" => keep(&mut self.pods, decode(item, &kind, &name)),
            "VirtualMachineInstanceMigration" => {
                keep(&mut self.migrations, decode(item, &kind, &name))
            }
            "DataVolume" => keep(&mut self.data_volumes, decode(item, &kind, &name)),
            "VirtualMachineImport" => keep(&mut self.vm_imports, decode(item, &kind, &name)),
            _ => warn!("skipping unsupported {kind} {name}"),
        }

        Ok(())
    }

    /// One snapshot per VM, plus one per VMI that has no VM. Related
    /// resources are narrowed to the VM's namespace; the resolver does the
    /// precise joins.
    pub fn snapshots(&self) -> Vec<ResourceSnapshot> {
        let mut snapshots: Vec<ResourceSnapshot> = self
            .vms
            .iter()
            .map(|vm| {
                let key = ObjectKey::of(vm);
                let vmi = self.vmis.iter().find(|vmi| ObjectKey::of(*vmi) == key);
                self.snapshot_for(&key.namespace, Some(vm), vmi)
            })
            .collect();

        for vmi in &self.vmis {
            let key = ObjectKey::of(vmi);
            if !self.vms.iter().any(|vm| ObjectKey::of(vm) == key) {
                snapshots.push(self.snapshot_for(&key.namespace, None, Some(vmi)));
            }
        }

        snapshots
    }

    fn snapshot_for(
        &self,
        namespace: &str,
        vm: Option<&VirtualMachine>,
        vmi: Option<&VirtualMachineInstance>,
    ) -> ResourceSnapshot {
        ResourceSnapshot {
            vm: vm.cloned(),
            vmi: vmi.cloned(),
            pods: in_namespace(&self.pods, namespace),
            migrations: in_namespace(&self.migrations, namespace),
            data_volumes: in_namespace(&self.data_volumes, namespace),
            vm_imports: in_namespace(&self.vm_imports, namespace),
        }
    }
}

fn decode<T: DeserializeOwned>(item: Value, kind: &str, name: &str) -> Result<T, Error> {
    serde_json::from_value(item).context(DecodeItemSnafu { kind, name })
}

/// A malformed item only drops itself, never the rest of the list.
fn keep<T>(items: &mut Vec<T>, decoded: Result<T, Error>) {
    match decoded {
        Ok(item) => items.push(item),
        Err(err) => warn!("skipping item: {err}"),
    }
}

fn in_namespace<K: Resource + Clone>(items: &[K], namespace: &str) -> Vec<K> {
    items
        .iter()
        .filter(|item| item.namespace().unwrap_or_default() == namespace)
        .cloned()
        .collect()
}
