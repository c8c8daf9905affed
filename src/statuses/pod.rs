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

use crate::statuses::taxonomy::PodStatus;
use k8s_openapi::api::core::v1 as corev1;
use serde::Serialize;

const CONDITION_POD_SCHEDULED: &str = "PodScheduled";
const REASON_UNSCHEDULABLE: &str = "Unschedulable";
const REASON_CRASH_LOOP_BACK_OFF: &str = "CrashLoopBackOff";
const REASON_TERMINATED_ERROR: &str = "Error";
const FAILING_WAITING_REASONS: [&str; 3] =
    ["ImagePullBackOff", "ErrImagePull", REASON_CRASH_LOOP_BACK_OFF];

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodStatusBundle {
    pub status: PodStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PodStatusBundle {
    fn new(status: PodStatus, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// Classifies a pod. Checks run in order and the first match wins:
/// scheduling failure, failed/unknown phase, failing container, a condition
/// that is not true, then the plain phase.
pub fn classify(pod: &corev1::Pod) -> PodStatusBundle {
    not_schedulable(pod)
        .or_else(|| error_phase(pod))
        .or_else(|| failing_container(pod))
        .or_else(|| not_ready(pod))
        .or_else(|| phase(pod))
        .unwrap_or_else(|| PodStatusBundle::new(PodStatus::Unknown, None))
}

fn status(pod: &corev1::Pod) -> Option<&corev1::PodStatus> {
    pod.status.as_ref()
}

fn conditions(pod: &corev1::Pod) -> &[corev1::PodCondition] {
    status(pod)
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or_default()
}

fn container_statuses(pod: &corev1::Pod) -> impl Iterator<Item = &corev1::ContainerStatus> {
    status(pod).into_iter().flat_map(|s| {
        s.init_container_statuses
            .iter()
            .chain(s.container_statuses.iter())
            .flatten()
    })
}

fn waiting_reason(cs: &corev1::ContainerStatus) -> Option<&str> {
    cs.state.as_ref()?.waiting.as_ref()?.reason.as_deref()
}

fn terminated_reason(cs: &corev1::ContainerStatus) -> Option<&str> {
    cs.state.as_ref()?.terminated.as_ref()?.reason.as_deref()
}

/// `"<container>: <reason>"`, with the runtime message appended when present.
fn container_message(cs: &corev1::ContainerStatus) -> Option<String> {
    let state = cs.state.as_ref()?;
    let (reason, message) = match (&state.waiting, &state.terminated) {
        (Some(waiting), _) => (waiting.reason.as_deref(), waiting.message.as_deref()),
        (None, Some(terminated)) => (terminated.reason.as_deref(), terminated.message.as_deref()),
        (None, None) => return None,
    };

    let reason = reason?;
    Some(match message {
        Some(message) if !message.is_empty() => format!("{}: {reason} - {message}", cs.name),
        _ => format!("{}: {reason}", cs.name),
    })
}

fn is_failing(cs: &corev1::ContainerStatus) -> bool {
    !cs.ready
        && (waiting_reason(cs).is_some_and(|r| FAILING_WAITING_REASONS.contains(&r))
            || terminated_reason(cs) == Some(REASON_TERMINATED_ERROR))
}

fn not_schedulable(pod: &corev1::Pod) -> Option<PodStatusBundle> {
    conditions(pod)
        .iter()
        .find(|c| c.type_ == CONDITION_POD_SCHEDULED)
        .filter(|c| c.status != "True" && c.reason.as_deref() == Some(REASON_UNSCHEDULABLE))
        .map(|c| PodStatusBundle::new(PodStatus::NotSchedulable, c.message.clone()))
}

fn error_phase(pod: &corev1::Pod) -> Option<PodStatusBundle> {
    let status = match status(pod)?.phase.as_deref()? {
        "Failed" => PodStatus::Failed,
        "Unknown" => PodStatus::Unknown,
        _ => return None,
    };

    let message = container_statuses(pod)
        .find(|cs| waiting_reason(cs).is_some() || terminated_reason(cs).is_some())
        .and_then(container_message)
        .or_else(|| {
            let pod_status = pod.status.as_ref()?;
            pod_status.message.clone().or_else(|| pod_status.reason.clone())
        });

    Some(PodStatusBundle::new(status, message))
}

fn failing_container(pod: &corev1::Pod) -> Option<PodStatusBundle> {
    let cs = container_statuses(pod).find(|cs| is_failing(cs))?;
    let status = if waiting_reason(cs) == Some(REASON_CRASH_LOOP_BACK_OFF) {
        PodStatus::CrashLoopBackOff
    } else {
        PodStatus::ContainerFailing
    };

    Some(PodStatusBundle::new(status, container_message(cs)))
}

fn not_ready(pod: &corev1::Pod) -> Option<PodStatusBundle> {
    conditions(pod)
        .iter()
        .find(|c| c.status != "True")
        .map(|c| {
            let message = c
                .message
                .clone()
                .unwrap_or_else(|| format!("Step: {}", c.type_));
            PodStatusBundle::new(PodStatus::NotReady, Some(message))
        })
}

fn phase(pod: &corev1::Pod) -> Option<PodStatusBundle> {
    let status = match status(pod)?.phase.as_deref()? {
        "Pending" => PodStatus::Pending,
        "Running" => PodStatus::Running,
        "Succeeded" => PodStatus::Succeeded,
        "Completed" => PodStatus::Completed,
        _ => return None,
    };

    Some(PodStatusBundle::new(status, None))
}
