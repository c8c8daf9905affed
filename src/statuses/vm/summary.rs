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

use super::bundle::StatusBundle;
use crate::statuses::taxonomy::{SimpleLabel, StatusValue, VmStatus};
use crate::types::error::{Error, UnknownStatusKeySnafu};
use crate::types::snapshot::ObjectKey;
use serde::Serialize;
use snafu::OptionExt;
use std::collections::BTreeMap;

/// A resolved bundle together with the VM it belongs to.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmStatusEntry {
    pub namespace: String,
    pub name: String,

    #[serde(flatten)]
    pub bundle: StatusBundle,
}

impl VmStatusEntry {
    pub fn new(key: ObjectKey, bundle: StatusBundle) -> Self {
        Self {
            namespace: key.namespace,
            name: key.name,
            bundle,
        }
    }
}

/// Number of VMs per simple label.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts(BTreeMap<SimpleLabel, usize>);

impl StatusCounts {
    pub fn get(&self, label: SimpleLabel) -> usize {
        self.0.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn add(&mut self, status: VmStatus) {
        *self.0.entry(status.simple_label()).or_default() += 1;
    }
}

impl<'a> FromIterator<&'a VmStatusEntry> for StatusCounts {
    fn from_iter<T: IntoIterator<Item = &'a VmStatusEntry>>(iter: T) -> Self {
        let mut counts = Self::default();
        for entry in iter {
            counts.add(entry.bundle.status);
        }
        counts
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterTerm {
    Status(VmStatus),
    Label(SimpleLabel),
}

/// Status filter in the list view URL format: comma separated status keys
/// or simple labels, e.g. `Running,Error,CDIImporting`.
///
/// An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusFilter {
    terms: Vec<FilterTerm>,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let terms = raw
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                VmStatus::from_key(key)
                    .map(FilterTerm::Status)
                    .or_else(|| key.parse().ok().map(FilterTerm::Label))
                    .context(UnknownStatusKeySnafu { key })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, status: VmStatus) -> bool {
        self.is_empty()
            || self.terms.iter().any(|term| match term {
                FilterTerm::Status(s) => *s == status,
                FilterTerm::Label(l) => *l == status.simple_label(),
            })
    }
}
