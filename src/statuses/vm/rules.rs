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

//! Detector rules of the VM status resolver.
//!
//! A rule returns `None` when it does not apply. Transient states that can
//! coexist with a healthy looking VMI (paused, converting, importing,
//! migrating) come before the steady-state rules, so [`RULES`] order is the
//! precedence order.

use super::bundle::{ImporterPodStatus, StatusBundle};
use super::joins;
use crate::statuses::pod;
use crate::statuses::taxonomy::{ImportStatus, PodStatus, StatusValue, VmStatus};
use crate::statuses::vm_import;
use crate::types::kubevirt::vm::VirtualMachine;
use crate::types::kubevirt::vmi::{VirtualMachineInstance, VmiPhase};
use crate::types::snapshot::{ObjectKey, ResourceSnapshot};
use crate::utils::progress;
use k8s_openapi::api::core::v1 as corev1;
use kube::ResourceExt;

pub const CONVERSION_PROGRESS_ANNOTATION: &str = "v2vConversionProgress";

pub const CONVERSION_PENDING_MESSAGE: &str = "The VMware virtual machine import is pending.";
pub const CONVERSION_ERROR_MESSAGE: &str = "The VMware virtual machine could not be imported.";
pub const CONVERSION_IN_PROGRESS_MESSAGE: &str = "The VMware virtual machine is being imported.";

pub const CDI_IMPORT_ERROR_MESSAGE: &str = "Importing one or more disks failed.";
pub const CDI_IMPORT_PENDING_MESSAGE: &str = "Disk import is waiting to start.";
pub const CDI_IMPORTING_MESSAGE: &str = "Disks are being imported.";

/// Inputs shared by every rule, with the joins most rules need done once.
pub struct RuleContext<'a> {
    pub snapshot: &'a ResourceSnapshot,
    pub vm: Option<&'a VirtualMachine>,
    pub vmi: Option<&'a VirtualMachineInstance>,
    pub subject: Option<ObjectKey>,
    pub launcher_pod: Option<&'a corev1::Pod>,
    /// A VMI or launcher pod exists, or the VM reports one was created.
    pub created: bool,
    pub expected_running: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(snapshot: &'a ResourceSnapshot) -> Self {
        let vm = snapshot.vm.as_ref();
        let vmi = snapshot.vmi.as_ref();
        let subject = snapshot.subject();
        let launcher_pod = subject
            .as_ref()
            .and_then(|key| joins::find_launcher_pod(&snapshot.pods, key, vmi));

        let created =
            vm.is_some_and(VirtualMachine::is_created) || vmi.is_some() || launcher_pod.is_some();
        let expected_running = vm.is_some_and(|vm| vm.is_expected_running(created));

        Self {
            snapshot,
            vm,
            vmi,
            subject,
            launcher_pod,
            created,
            expected_running,
        }
    }
}

pub type Detect = fn(&RuleContext<'_>) -> Option<StatusBundle>;

pub struct Rule {
    pub name: &'static str,
    pub detect: Detect,
}

pub const RULES: &[Rule] = &[
    Rule { name: "paused", detect: paused },
    Rule { name: "v2v-conversion", detect: v2v_conversion },
    Rule { name: "vm-import", detect: v2v_vm_import },
    Rule { name: "migrating", detect: migrating },
    Rule { name: "importing", detect: importing },
    Rule { name: "vm-error", detect: vm_error },
    Rule { name: "stopping", detect: stopping },
    Rule { name: "off", detect: off },
    Rule { name: "vmi-or-pod-error", detect: vmi_or_pod_error },
    Rule { name: "running", detect: running },
    Rule { name: "starting", detect: starting },
    Rule { name: "waiting-for-vmi", detect: waiting_for_vmi },
    Rule { name: "vmi-phase", detect: vmi_phase },
];

pub fn paused(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let condition = ctx.vmi?.paused_condition()?;
    Some(StatusBundle::new(VmStatus::Paused).with_optional_message(condition.message.clone()))
}

pub fn v2v_conversion(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let pod = joins::find_conversion_pod(&ctx.snapshot.pods, ctx.vm?)?;
    let phase = pod.status.as_ref().and_then(|s| s.phase.as_deref());
    if phase == Some("Succeeded") {
        return None;
    }

    let pod_status = pod::classify(pod);
    let bundle = if phase == Some("Pending") {
        StatusBundle::new(VmStatus::V2vConversionPending)
            .with_message(CONVERSION_PENDING_MESSAGE)
            .with_detailed_message(pod_status.message)
    } else if pod_status.status.is_error() {
        StatusBundle::new(VmStatus::V2vConversionError)
            .with_message(CONVERSION_ERROR_MESSAGE)
            .with_detailed_message(pod_status.message)
    } else {
        let progress = pod
            .annotations()
            .get(CONVERSION_PROGRESS_ANNOTATION)
            .map(|p| progress::parse(p))
            .unwrap_or(0);
        StatusBundle::new(VmStatus::V2vConversionInProgress)
            .with_message(CONVERSION_IN_PROGRESS_MESSAGE)
            .with_progress(Some(progress))
    };

    Some(bundle.with_pod(pod))
}

pub fn v2v_vm_import(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let import = joins::find_vm_import(ctx.vm?, &ctx.snapshot.vm_imports)?;
    let import_status = vm_import::resolve(Some(import))?;

    let status = match import_status.status {
        ImportStatus::Error => VmStatus::V2vVmImportError,
        ImportStatus::Pending => VmStatus::V2vVmImportPending,
        ImportStatus::InProgress => VmStatus::V2vVmImportInProgress,
        ImportStatus::Complete | ImportStatus::Unknown => return None,
    };

    let mut bundle = StatusBundle::new(status)
        .with_optional_message(import_status.message)
        .with_detailed_message(import_status.detailed_message)
        .with_progress(import_status.progress);
    bundle.vm_import = Some(import.clone());
    Some(bundle)
}

pub fn migrating(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let subject = ctx.subject.as_ref()?;
    let migration = joins::find_active_migration(&ctx.snapshot.migrations, subject)?;

    let mut bundle = StatusBundle::new(VmStatus::Migrating)
        .with_detailed_message(migration.phase_name().map(str::to_owned));
    bundle.migration = Some(migration.clone());
    Some(bundle)
}

pub fn importing(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let vm = ctx.vm?;
    if ctx.created {
        return None;
    }

    let importer_pods = joins::find_importer_pods(&ctx.snapshot.pods, vm);
    if importer_pods.is_empty() {
        return None;
    }

    let statuses: Vec<ImporterPodStatus> = importer_pods
        .into_iter()
        .map(|pod| {
            let pod_status = pod::classify(pod);
            let data_volume = joins::find_data_volume(pod, &ctx.snapshot.data_volumes);
            ImporterPodStatus {
                pod: pod.clone(),
                status: pod_status.status,
                message: pod_status.message,
                progress: data_volume.and_then(|dv| dv.progress()),
                data_volume: data_volume.cloned(),
            }
        })
        .collect();

    let representative = statuses
        .iter()
        .find(|s| s.status.is_error())
        .or_else(|| statuses.iter().find(|s| s.status.is_pending()))
        .or_else(|| statuses.first());
    let pod_status = representative.map_or(PodStatus::Pending, |s| s.status);

    let (status, message) = if pod_status.is_error() {
        (VmStatus::CdiImportError, CDI_IMPORT_ERROR_MESSAGE)
    } else if pod_status.is_pending() {
        (VmStatus::CdiImportPending, CDI_IMPORT_PENDING_MESSAGE)
    } else {
        (VmStatus::CdiImporting, CDI_IMPORTING_MESSAGE)
    };

    let mut bundle = StatusBundle::new(status).with_message(message);
    if let Some(representative) = representative {
        bundle = bundle
            .with_detailed_message(representative.message.clone())
            .with_pod(&representative.pod);
    }
    bundle.importer_pods_statuses = statuses;
    Some(bundle)
}

pub fn vm_error(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let condition = ctx.vm?.failure_condition()?;
    Some(
        StatusBundle::new(VmStatus::VmError)
            .with_optional_message(condition.message.clone())
            .with_detailed_message(condition.reason.clone()),
    )
}

pub fn stopping(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    ctx.vm?;
    (ctx.created && !ctx.expected_running).then(|| StatusBundle::new(VmStatus::Stopping))
}

pub fn off(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    ctx.vm?;
    (!ctx.expected_running).then(|| StatusBundle::new(VmStatus::Off))
}

pub fn vmi_or_pod_error(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    if let Some(condition) = ctx.vmi.and_then(VirtualMachineInstance::failure_condition) {
        return Some(
            StatusBundle::new(VmStatus::VmiError)
                .with_optional_message(condition.message.clone())
                .with_detailed_message(condition.reason.clone()),
        );
    }

    let launcher_pod = ctx.launcher_pod?;
    let pod_status = pod::classify(launcher_pod);
    pod_status.status.is_error().then(|| {
        StatusBundle::new(VmStatus::LauncherPodError)
            .with_optional_message(pod_status.message)
            .with_detailed_message(Some(pod_status.status.label().to_owned()))
            .with_pod(launcher_pod)
    })
}

pub fn running(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    (ctx.vmi?.phase()? == VmiPhase::Running).then(|| StatusBundle::new(VmStatus::Running))
}

pub fn starting(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    ctx.vm?;
    if !ctx.expected_running || !ctx.created {
        return None;
    }

    let Some(launcher_pod) = ctx.launcher_pod else {
        return Some(StatusBundle::new(VmStatus::Starting));
    };

    let pod_status = pod::classify(launcher_pod);
    let bundle = StatusBundle::new(VmStatus::Starting).with_pod(launcher_pod);
    if pod_status.status.is_ready() {
        Some(bundle)
    } else {
        Some(bundle.with_detailed_message(pod_status.message))
    }
}

pub fn waiting_for_vmi(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    ctx.vm?;
    (ctx.expected_running && !ctx.created).then(|| StatusBundle::new(VmStatus::VmiWaiting))
}

pub fn vmi_phase(ctx: &RuleContext<'_>) -> Option<StatusBundle> {
    let status = match ctx.vmi?.phase()? {
        VmiPhase::Scheduling | VmiPhase::Scheduled => VmStatus::Starting,
        VmiPhase::Pending => VmStatus::VmiWaiting,
        VmiPhase::Failed => VmStatus::VmiError,
        VmiPhase::Running | VmiPhase::Succeeded | VmiPhase::Unknown => return None,
    };
    Some(StatusBundle::new(status))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tests::{
        condition, create_test_launcher_pod, create_test_pod, create_test_vm, create_test_vm_import,
        create_test_vmi, owner_reference, pod_condition, waiting_container,
    };
    use crate::types::kubevirt::vm_import::{PROGRESS_ANNOTATION, VirtualMachineImport};

    fn snapshot(
        vm: Option<VirtualMachine>,
        vmi: Option<VirtualMachineInstance>,
        pods: Vec<corev1::Pod>,
    ) -> ResourceSnapshot {
        ResourceSnapshot {
            vm,
            vmi,
            pods,
            ..Default::default()
        }
    }

    fn imported_vm_snapshot(vm_import: VirtualMachineImport) -> ResourceSnapshot {
        let mut vm = create_test_vm("fedora", Some(false));
        vm.metadata.owner_references = Some(vec![owner_reference(
            "VirtualMachineImport",
            &vm_import.name_any(),
            &format!("vmimport-uid-{}", vm_import.name_any()),
        )]);
        ResourceSnapshot {
            vm: Some(vm),
            vm_imports: vec![vm_import],
            ..Default::default()
        }
    }

    #[test]
    fn test_vm_import_processing_carries_progress() {
        let mut vm_import = create_test_vm_import(
            "fedora-import",
            vec![condition("Processing", "True", None, Some("copying disks"))],
        );
        vm_import
            .metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(PROGRESS_ANNOTATION.to_owned(), "37".to_owned());

        let snapshot = imported_vm_snapshot(vm_import);
        let bundle = v2v_vm_import(&RuleContext::new(&snapshot)).expect("import in progress");

        assert_eq!(bundle.status, VmStatus::V2vVmImportInProgress);
        assert_eq!(bundle.progress, Some(37));
        assert_eq!(bundle.message.as_deref(), Some("copying disks"));
        assert!(bundle.vm_import.is_some());
    }

    #[test]
    fn test_vm_import_without_conditions_is_pending() {
        let snapshot = imported_vm_snapshot(create_test_vm_import("fedora-import", Vec::new()));
        let bundle = v2v_vm_import(&RuleContext::new(&snapshot)).expect("import pending");

        assert_eq!(bundle.status, VmStatus::V2vVmImportPending);
    }

    #[test]
    fn test_completed_vm_import_falls_through() {
        let snapshot = imported_vm_snapshot(create_test_vm_import(
            "fedora-import",
            vec![condition("Succeeded", "True", None, None)],
        ));
        assert!(v2v_vm_import(&RuleContext::new(&snapshot)).is_none());
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn test_context_created_from_launcher_pod() {
        let vm = create_test_vm("fedora", Some(false));
        let vmi = create_test_vmi("fedora", Some("Running"));
        let pod = create_test_launcher_pod(&vmi, "x7k2p", Some("Running"));
        let snap = snapshot(Some(vm), None, vec![pod]);

        let ctx = RuleContext::new(&snap);
        assert!(ctx.launcher_pod.is_some());
        assert!(ctx.created);
        assert!(!ctx.expected_running);
    }

    #[test]
    fn test_paused_needs_vmi() {
        let snap = snapshot(Some(create_test_vm("fedora", Some(true))), None, Vec::new());
        assert!(paused(&RuleContext::new(&snap)).is_none());
    }

    #[test]
    fn test_v2v_conversion_pending_phase() {
        let vm = create_test_vm("fedora", Some(false));
        let pod = create_test_pod("kubevirt-v2v-conversion-fedora-abcde", Some("Pending"));
        let snap = snapshot(Some(vm), None, vec![pod]);

        let bundle = v2v_conversion(&RuleContext::new(&snap)).expect("conversion pending");
        assert_eq!(bundle.status, VmStatus::V2vConversionPending);
        assert!(bundle.pod.is_some());
    }

    #[test]
    fn test_v2v_conversion_error_from_failing_container() {
        let vm = create_test_vm("fedora", Some(false));
        let mut pod = create_test_pod("kubevirt-v2v-conversion-fedora-abcde", Some("Running"));
        pod.status.get_or_insert_with(Default::default).container_statuses =
            Some(vec![waiting_container("virt-v2v", "CrashLoopBackOff")]);
        let snap = snapshot(Some(vm), None, vec![pod]);

        let bundle = v2v_conversion(&RuleContext::new(&snap)).expect("conversion failing");
        assert_eq!(bundle.status, VmStatus::V2vConversionError);
        assert_eq!(bundle.message.as_deref(), Some(CONVERSION_ERROR_MESSAGE));
        assert_eq!(
            bundle.detailed_message.as_deref(),
            Some("virt-v2v: CrashLoopBackOff")
        );
    }

    #[test]
    fn test_v2v_conversion_progress_from_annotation() {
        let vm = create_test_vm("fedora", Some(false));
        let mut pod = create_test_pod("kubevirt-v2v-conversion-fedora-abcde", Some("Running"));
        pod.metadata.annotations = Some(
            [(CONVERSION_PROGRESS_ANNOTATION.to_owned(), "63".to_owned())]
                .into_iter()
                .collect(),
        );
        let snap = snapshot(Some(vm), None, vec![pod]);

        let bundle = v2v_conversion(&RuleContext::new(&snap)).expect("conversion running");
        assert_eq!(bundle.status, VmStatus::V2vConversionInProgress);
        assert_eq!(bundle.progress, Some(63));
    }

    #[test]
    fn test_v2v_conversion_succeeded_falls_through() {
        let vm = create_test_vm("fedora", Some(false));
        let pod = create_test_pod("kubevirt-v2v-conversion-fedora-abcde", Some("Succeeded"));
        let snap = snapshot(Some(vm), None, vec![pod]);

        assert!(v2v_conversion(&RuleContext::new(&snap)).is_none());
    }

    #[test]
    fn test_stopping_and_off_need_vm() {
        let vmi = create_test_vmi("fedora", Some("Succeeded"));
        let snap = snapshot(None, Some(vmi), Vec::new());
        let ctx = RuleContext::new(&snap);

        assert!(stopping(&ctx).is_none());
        assert!(off(&ctx).is_none());
        assert!(starting(&ctx).is_none());
        assert!(waiting_for_vmi(&ctx).is_none());
    }

    #[test]
    fn test_vm_error_carries_condition_message() {
        let mut vm = create_test_vm("fedora", Some(true));
        vm.status.get_or_insert_with(Default::default).conditions = vec![condition(
            "Failure",
            "True",
            Some("FailedCreate"),
            Some("admission webhook denied the request"),
        )];
        let snap = snapshot(Some(vm), None, Vec::new());

        let bundle = vm_error(&RuleContext::new(&snap)).expect("VM failure");
        assert_eq!(bundle.status, VmStatus::VmError);
        assert_eq!(
            bundle.message.as_deref(),
            Some("admission webhook denied the request")
        );
    }

    #[test]
    fn test_vmi_failure_condition_is_vmi_error() {
        let mut vmi = create_test_vmi("fedora", Some("Scheduling"));
        vmi.status.get_or_insert_with(Default::default).conditions =
            vec![condition("Failure", "True", None, Some("boot failed"))];
        let snap = snapshot(Some(create_test_vm("fedora", Some(true))), Some(vmi), Vec::new());

        let bundle = vmi_or_pod_error(&RuleContext::new(&snap)).expect("VMI failure");
        assert_eq!(bundle.status, VmStatus::VmiError);
        assert_eq!(bundle.message.as_deref(), Some("boot failed"));
    }

    #[test]
    fn test_launcher_pod_error_carries_pod() {
        let vmi = create_test_vmi("fedora", Some("Scheduling"));
        let mut pod = create_test_launcher_pod(&vmi, "x7k2p", Some("Pending"));
        pod.status.get_or_insert_with(Default::default).conditions = Some(vec![pod_condition(
            "PodScheduled",
            "False",
            Some("Unschedulable"),
            Some("Insufficient memory"),
        )]);
        let snap = snapshot(Some(create_test_vm("fedora", Some(true))), Some(vmi), vec![pod]);

        let bundle = vmi_or_pod_error(&RuleContext::new(&snap)).expect("pod error");
        assert_eq!(bundle.status, VmStatus::LauncherPodError);
        assert_eq!(bundle.message.as_deref(), Some("Insufficient memory"));
        assert_eq!(bundle.detailed_message.as_deref(), Some("Not schedulable"));
        assert!(bundle.pod.is_some());
    }

    #[test]
    fn test_starting_reports_unready_pod_message() {
        let vmi = create_test_vmi("fedora", Some("Scheduled"));
        let mut pod = create_test_launcher_pod(&vmi, "x7k2p", Some("Running"));
        pod.status.get_or_insert_with(Default::default).conditions =
            Some(vec![pod_condition("ContainersReady", "False", None, None)]);
        let snap = snapshot(Some(create_test_vm("fedora", Some(true))), Some(vmi), vec![pod]);

        let bundle = starting(&RuleContext::new(&snap)).expect("starting");
        assert_eq!(bundle.status, VmStatus::Starting);
        assert_eq!(
            bundle.detailed_message.as_deref(),
            Some("Step: ContainersReady")
        );
    }

    #[test]
    fn test_starting_with_ready_pod_has_no_detail() {
        let vmi = create_test_vmi("fedora", Some("Scheduled"));
        let pod = create_test_launcher_pod(&vmi, "x7k2p", Some("Running"));
        let snap = snapshot(Some(create_test_vm("fedora", Some(true))), Some(vmi), vec![pod]);

        let bundle = starting(&RuleContext::new(&snap)).expect("starting");
        assert_eq!(bundle.detailed_message, None);
        assert!(bundle.pod.is_some());
    }

    #[test]
    fn test_vmi_phase_fallbacks() {
        for (phase, expected) in [
            ("Scheduling", Some(VmStatus::Starting)),
            ("Scheduled", Some(VmStatus::Starting)),
            ("Pending", Some(VmStatus::VmiWaiting)),
            ("Failed", Some(VmStatus::VmiError)),
            ("Succeeded", None),
        ] {
            let snap = snapshot(None, Some(create_test_vmi("fedora", Some(phase))), Vec::new());
            assert_eq!(
                vmi_phase(&RuleContext::new(&snap)).map(|b| b.status),
                expected,
                "phase {phase}"
            );
        }
    }
}
