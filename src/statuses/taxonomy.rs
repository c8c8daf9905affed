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

//! Status catalogs.
//!
//! Every status value is a variant of a closed enum with a `const`
//! descriptor: a human label, the metadata flags and the coarse "simple
//! label" used to group and filter statuses in list views. The string key of
//! a value (its strum serialization) is used as a filter identifier in URLs
//! and must stay stable.

use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Metadata flags of a status value.
///
/// Only constructed through the `const` builders below, which keep the
/// derived flags consistent: `is_in_progress` holds whenever `is_pending` or
/// `is_importing` does, and `is_unknown` is cleared as soon as any other flag
/// is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFlags {
    pub is_error: bool,
    pub is_pending: bool,
    pub is_importing: bool,
    pub is_in_progress: bool,
    pub is_completed: bool,
    pub is_unknown: bool,
}

impl StatusFlags {
    pub const NONE: Self = Self {
        is_error: false,
        is_pending: false,
        is_importing: false,
        is_in_progress: false,
        is_completed: false,
        is_unknown: false,
    };

    pub const fn error(self) -> Self {
        Self {
            is_error: true,
            ..self
        }
        .normalize()
    }

    pub const fn pending(self) -> Self {
        Self {
            is_pending: true,
            ..self
        }
        .normalize()
    }

    pub const fn importing(self) -> Self {
        Self {
            is_importing: true,
            ..self
        }
        .normalize()
    }

    pub const fn in_progress(self) -> Self {
        Self {
            is_in_progress: true,
            ..self
        }
        .normalize()
    }

    pub const fn completed(self) -> Self {
        Self {
            is_completed: true,
            ..self
        }
        .normalize()
    }

    pub const fn unknown(self) -> Self {
        Self {
            is_unknown: true,
            ..self
        }
        .normalize()
    }

    const fn normalize(self) -> Self {
        let is_in_progress = self.is_in_progress || self.is_pending || self.is_importing;
        let known = self.is_error || is_in_progress || self.is_completed;
        Self {
            is_in_progress,
            is_unknown: self.is_unknown && !known,
            ..self
        }
    }
}

/// Coarse status category used for grouping and filtering.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum SimpleLabel {
    Error,
    Completed,
    Pending,
    Importing,
    Running,
    Paused,
    Off,
    InProgress,
    Other,
}

impl Serialize for SimpleLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let key: &'static str = self.into();
        serializer.serialize_str(key)
    }
}

/// Derives the simple label of a status.
///
/// Priority: Error > Completed > Pending > Importing > steady label >
/// InProgress > Other. The steady label is only declared by settled
/// statuses (Running, Paused, Off) that carry no flag.
pub const fn simple_label(flags: StatusFlags, steady: Option<SimpleLabel>) -> SimpleLabel {
    if flags.is_error {
        SimpleLabel::Error
    } else if flags.is_completed {
        SimpleLabel::Completed
    } else if flags.is_pending {
        SimpleLabel::Pending
    } else if flags.is_importing {
        SimpleLabel::Importing
    } else if let Some(steady) = steady {
        steady
    } else if flags.is_in_progress {
        SimpleLabel::InProgress
    } else {
        SimpleLabel::Other
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub label: &'static str,
    pub flags: StatusFlags,
    pub simple_label: SimpleLabel,
}

impl StatusDescriptor {
    pub const fn new(label: &'static str, flags: StatusFlags, steady: Option<SimpleLabel>) -> Self {
        Self {
            label,
            flags,
            simple_label: simple_label(flags, steady),
        }
    }
}

/// Behavior shared by every status catalog.
pub trait StatusValue: Copy + Into<&'static str> {
    fn descriptor(self) -> StatusDescriptor;

    /// Stable string key, suitable for URL filters.
    fn key(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        self.descriptor().label
    }

    fn flags(self) -> StatusFlags {
        self.descriptor().flags
    }

    fn simple_label(self) -> SimpleLabel {
        self.descriptor().simple_label
    }

    fn is_error(self) -> bool {
        self.flags().is_error
    }

    fn is_pending(self) -> bool {
        self.flags().is_pending
    }

    fn is_importing(self) -> bool {
        self.flags().is_importing
    }

    fn is_in_progress(self) -> bool {
        self.flags().is_in_progress
    }

    fn is_completed(self) -> bool {
        self.flags().is_completed
    }

    fn is_unknown(self) -> bool {
        self.flags().is_unknown
    }
}

macro_rules! serialize_as_key {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.key())
                }
            }
        )*
    };
}

serialize_as_key!(VmStatus, PodStatus, ImportStatus);

/// Status of a virtual machine as shown to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum VmStatus {
    #[strum(serialize = "V2VConversionError")]
    V2vConversionError,
    #[strum(serialize = "V2VConversionPending")]
    V2vConversionPending,
    #[strum(serialize = "V2VConversionInProgress")]
    V2vConversionInProgress,
    #[strum(serialize = "V2VVMImportError")]
    V2vVmImportError,
    #[strum(serialize = "V2VVMImportPending")]
    V2vVmImportPending,
    #[strum(serialize = "V2VVMImportInProgress")]
    V2vVmImportInProgress,
    #[strum(serialize = "CDIImportError")]
    CdiImportError,
    #[strum(serialize = "CDIImportPending")]
    CdiImportPending,
    #[strum(serialize = "CDIImporting")]
    CdiImporting,
    Migrating,
    Stopping,
    Starting,
    #[strum(serialize = "VMIWaiting")]
    VmiWaiting,
    Paused,
    Running,
    Off,
    #[strum(serialize = "VMError")]
    VmError,
    #[strum(serialize = "VMIError")]
    VmiError,
    LauncherPodError,
    Unknown,
}

impl StatusValue for VmStatus {
    fn descriptor(self) -> StatusDescriptor {
        let error = StatusFlags::NONE.error();
        let pending = StatusFlags::NONE.pending();
        let importing = StatusFlags::NONE.importing();
        let in_progress = StatusFlags::NONE.in_progress();

        match self {
            Self::V2vConversionError => {
                StatusDescriptor::new("Import error (VMware)", error.importing(), None)
            }
            Self::V2vConversionPending => {
                StatusDescriptor::new("Import pending (VMware)", pending.importing(), None)
            }
            Self::V2vConversionInProgress => {
                StatusDescriptor::new("Importing (VMware)", importing, None)
            }
            Self::V2vVmImportError => {
                StatusDescriptor::new("Import error (RHV)", error.importing(), None)
            }
            Self::V2vVmImportPending => {
                StatusDescriptor::new("Import pending (RHV)", pending.importing(), None)
            }
            Self::V2vVmImportInProgress => StatusDescriptor::new("Importing (RHV)", importing, None),
            Self::CdiImportError => StatusDescriptor::new("Import error", error.importing(), None),
            Self::CdiImportPending => {
                StatusDescriptor::new("Import pending", pending.importing(), None)
            }
            Self::CdiImporting => StatusDescriptor::new("Importing", importing, None),
            Self::Migrating => StatusDescriptor::new("Migrating", in_progress, None),
            Self::Stopping => StatusDescriptor::new("Stopping", in_progress, None),
            Self::Starting => StatusDescriptor::new("Starting", in_progress, None),
            Self::VmiWaiting => StatusDescriptor::new("Pending", pending, None),
            Self::Paused => {
                StatusDescriptor::new("Paused", StatusFlags::NONE, Some(SimpleLabel::Paused))
            }
            Self::Running => {
                StatusDescriptor::new("Running", StatusFlags::NONE, Some(SimpleLabel::Running))
            }
            Self::Off => StatusDescriptor::new("Off", StatusFlags::NONE, Some(SimpleLabel::Off)),
            Self::VmError => StatusDescriptor::new("VM error", error, None),
            Self::VmiError => StatusDescriptor::new("VMI error", error, None),
            Self::LauncherPodError => StatusDescriptor::new("Pod error", error, None),
            Self::Unknown => StatusDescriptor::new("Unknown", StatusFlags::NONE.unknown(), None),
        }
    }
}

impl VmStatus {
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

/// Status of a single pod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum PodStatus {
    NotSchedulable,
    Failed,
    CrashLoopBackOff,
    ContainerFailing,
    NotReady,
    Pending,
    Running,
    Completed,
    Succeeded,
    Unknown,
}

impl StatusValue for PodStatus {
    fn descriptor(self) -> StatusDescriptor {
        let error = StatusFlags::NONE.error();
        let pending = StatusFlags::NONE.pending();
        let completed = StatusFlags::NONE.completed();

        match self {
            Self::NotSchedulable => StatusDescriptor::new("Not schedulable", error, None),
            Self::Failed => StatusDescriptor::new("Failed", error, None),
            Self::CrashLoopBackOff => StatusDescriptor::new("Crash loop back-off", error, None),
            Self::ContainerFailing => StatusDescriptor::new("Container failing", error, None),
            Self::NotReady => StatusDescriptor::new("Not ready", pending, None),
            Self::Pending => StatusDescriptor::new("Pending", pending, None),
            Self::Running => {
                StatusDescriptor::new("Running", StatusFlags::NONE, Some(SimpleLabel::Running))
            }
            Self::Completed => StatusDescriptor::new("Completed", completed, None),
            Self::Succeeded => StatusDescriptor::new("Succeeded", completed, None),
            Self::Unknown => StatusDescriptor::new("Unknown", StatusFlags::NONE.unknown(), None),
        }
    }
}

impl PodStatus {
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    /// Running or finished successfully.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Running | Self::Completed | Self::Succeeded)
    }
}

/// Status of a VirtualMachineImport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum ImportStatus {
    Error,
    Pending,
    InProgress,
    Complete,
    Unknown,
}

impl StatusValue for ImportStatus {
    fn descriptor(self) -> StatusDescriptor {
        match self {
            Self::Error => StatusDescriptor::new("Import error", StatusFlags::NONE.error(), None),
            Self::Pending => StatusDescriptor::new(
                "Import pending",
                StatusFlags::NONE.pending().importing(),
                None,
            ),
            Self::InProgress => {
                StatusDescriptor::new("Importing", StatusFlags::NONE.importing(), None)
            }
            Self::Complete => {
                StatusDescriptor::new("Import complete", StatusFlags::NONE.completed(), None)
            }
            Self::Unknown => StatusDescriptor::new("Unknown", StatusFlags::NONE.unknown(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn assert_flags_consistent<T: StatusValue + std::fmt::Debug>(value: T) {
        let flags = value.flags();
        if flags.is_pending || flags.is_importing {
            assert!(flags.is_in_progress, "{value:?}: pending/importing implies in progress");
        }
        let others = flags.is_error
            || flags.is_pending
            || flags.is_importing
            || flags.is_in_progress
            || flags.is_completed;
        if flags.is_unknown {
            assert!(!others, "{value:?}: unknown must exclude every other flag");
        }
    }

    #[test]
    fn test_flags_are_consistent_across_catalogs() {
        VmStatus::iter().for_each(assert_flags_consistent);
        PodStatus::iter().for_each(assert_flags_consistent);
        ImportStatus::iter().for_each(assert_flags_consistent);
    }

    #[test]
    fn test_unknown_is_cleared_by_other_flags() {
        let flags = StatusFlags::NONE.unknown().error();
        assert!(flags.is_error);
        assert!(!flags.is_unknown);

        let flags = StatusFlags::NONE.importing().unknown();
        assert!(flags.is_in_progress);
        assert!(!flags.is_unknown);
    }

    #[test]
    fn test_keys_round_trip_through_from_key() {
        for status in VmStatus::iter() {
            assert_eq!(VmStatus::from_key(status.key()), Some(status));
        }
        for status in PodStatus::iter() {
            assert_eq!(PodStatus::from_key(status.key()), Some(status));
        }
        assert_eq!(VmStatus::from_key("NoSuchStatus"), None);
    }

    #[test]
    fn test_vm_status_keys_are_stable() {
        let keys: Vec<&str> = VmStatus::iter().map(|s| s.key()).collect();
        assert_eq!(
            keys,
            vec![
                "V2VConversionError",
                "V2VConversionPending",
                "V2VConversionInProgress",
                "V2VVMImportError",
                "V2VVMImportPending",
                "V2VVMImportInProgress",
                "CDIImportError",
                "CDIImportPending",
                "CDIImporting",
                "Migrating",
                "Stopping",
                "Starting",
                "VMIWaiting",
                "Paused",
                "Running",
                "Off",
                "VMError",
                "VMIError",
                "LauncherPodError",
                "Unknown",
            ]
        );
    }

    #[test]
    fn test_simple_label_priority() {
        assert_eq!(VmStatus::CdiImportError.simple_label(), SimpleLabel::Error);
        assert_eq!(VmStatus::V2vVmImportPending.simple_label(), SimpleLabel::Pending);
        assert_eq!(VmStatus::VmiWaiting.simple_label(), SimpleLabel::Pending);
        assert_eq!(VmStatus::CdiImporting.simple_label(), SimpleLabel::Importing);
        assert_eq!(VmStatus::Migrating.simple_label(), SimpleLabel::InProgress);
        assert_eq!(VmStatus::Running.simple_label(), SimpleLabel::Running);
        assert_eq!(VmStatus::Paused.simple_label(), SimpleLabel::Paused);
        assert_eq!(VmStatus::Off.simple_label(), SimpleLabel::Off);
        assert_eq!(VmStatus::Unknown.simple_label(), SimpleLabel::Other);
        assert_eq!(PodStatus::Succeeded.simple_label(), SimpleLabel::Completed);
    }

    #[test]
    fn test_every_vm_status_has_a_label() {
        for status in VmStatus::iter() {
            assert!(!status.label().is_empty(), "{status:?} needs a label");
        }
    }

    #[test]
    fn test_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&VmStatus::VmiWaiting).ok().as_deref(),
            Some("\"VMIWaiting\"")
        );
        assert_eq!(
            serde_json::to_string(&SimpleLabel::InProgress).ok().as_deref(),
            Some("\"InProgress\"")
        );
    }
}
