// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pod and claim spec construction for workspaces.

use std::collections::BTreeMap;

use cs_core::{UnitPhase, WorkspaceName, WorkspaceSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimVolumeSource, Pod, PodSpec, ResourceRequirements, Volume, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::adapters::cluster::ComputeUnit;

/// Label selecting every workspace pod
pub(crate) const KIND_LABEL: (&str, &str) = ("kind", "cloud-ide");

/// Label carrying the workspace name
pub(crate) const WORKSPACE_LABEL: &str = "cloudspace.dev/workspace";

/// Claim size used when a create request leaves storage unset
pub(crate) const DEFAULT_STORAGE_SIZE: &str = "10Gi";

const VOLUME_NAME: &str = "workspace";

/// Label selector string for the pod watcher
pub(crate) fn workspace_selector() -> String {
    format!("{}={}", KIND_LABEL.0, KIND_LABEL.1)
}

/// Parameters for building a workspace pod.
pub(super) struct PodParams<'a> {
    pub spec: &'a WorkspaceSpec,
    pub namespace: &'a str,
    /// Mount point of the storage claim inside the container
    pub mount_path: &'a str,
}

fn labels(name: &WorkspaceName) -> BTreeMap<String, String> {
    [
        (KIND_LABEL.0.to_string(), KIND_LABEL.1.to_string()),
        (WORKSPACE_LABEL.to_string(), name.to_string()),
    ]
    .into_iter()
    .collect()
}

fn quantities(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, Quantity>> {
    let map: BTreeMap<String, Quantity> = pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), Quantity(v.to_string())))
        .collect();
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Build the Pod for a workspace, mounting its storage claim.
pub(super) fn build_pod(params: &PodParams<'_>) -> Pod {
    let spec = params.spec;
    let name = spec.name.to_string();

    let limits = quantities(&[("cpu", &spec.limits.cpu), ("memory", &spec.limits.memory)]);

    let container = Container {
        name: name.clone(),
        image: Some(spec.image.clone()),
        image_pull_policy: Some("IfNotPresent".to_string()),
        ports: Some(vec![ContainerPort {
            container_port: i32::from(spec.port),
            ..Default::default()
        }]),
        resources: limits.map(|limits| ResourceRequirements {
            limits: Some(limits),
            ..Default::default()
        }),
        volume_mounts: Some(vec![VolumeMount {
            name: VOLUME_NAME.to_string(),
            mount_path: params.mount_path.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    };

    Pod {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(params.namespace.to_string()),
            labels: Some(labels(&spec.name)),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![container],
            volumes: Some(vec![Volume {
                name: VOLUME_NAME.to_string(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: name,
                    read_only: None,
                }),
                ..Default::default()
            }]),
            restart_policy: Some("Always".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Build the PersistentVolumeClaim for a workspace.
pub(super) fn build_claim(
    name: &WorkspaceName,
    namespace: &str,
    size: &str,
    storage_class: Option<&str>,
) -> PersistentVolumeClaim {
    let size = if size.is_empty() { DEFAULT_STORAGE_SIZE } else { size };
    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels(name)),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            resources: Some(VolumeResourceRequirements {
                requests: quantities(&[("storage", size)]),
                ..Default::default()
            }),
            storage_class_name: storage_class.map(str::to_string),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Extract the observed state of a workspace pod.
///
/// Returns `None` for a pod without a name.
pub(crate) fn unit_from_pod(pod: &Pod) -> Option<ComputeUnit> {
    let name = pod.metadata.name.as_ref()?;
    let status = pod.status.as_ref();
    let port = pod
        .spec
        .as_ref()
        .and_then(|s| s.containers.first())
        .and_then(|c| c.ports.as_ref())
        .and_then(|ports| ports.first())
        .and_then(|p| u16::try_from(p.container_port).ok());

    Some(ComputeUnit {
        name: WorkspaceName::from_string(name.as_str()),
        phase: pod_phase(pod),
        node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
        ip: status.and_then(|s| s.pod_ip.clone()).filter(|ip| !ip.is_empty()),
        port,
    })
}

/// Phase of a pod, with a pending deletion taking precedence over the
/// reported phase.
pub(crate) fn pod_phase(pod: &Pod) -> UnitPhase {
    if pod.metadata.deletion_timestamp.is_some() {
        return UnitPhase::Terminating;
    }
    UnitPhase::from_phase(pod.status.as_ref().and_then(|s| s.phase.as_deref()))
}

#[cfg(test)]
#[path = "pod_tests.rs"]
mod tests;
