// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cs_core::ResourceLimits;
use k8s_openapi::api::core::v1::PodStatus;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;

fn spec() -> WorkspaceSpec {
    WorkspaceSpec::new(WorkspaceName::parse("ws-1").unwrap(), "ide:latest", 8080)
        .limits(ResourceLimits::new("500m", "1Gi"))
}

fn pod_for(spec: &WorkspaceSpec) -> Pod {
    build_pod(&PodParams { spec, namespace: "cloud-ide", mount_path: "/root/workspace" })
}

#[test]
fn pod_carries_name_labels_and_namespace() {
    let pod = pod_for(&spec());
    assert_eq!(pod.metadata.name.as_deref(), Some("ws-1"));
    assert_eq!(pod.metadata.namespace.as_deref(), Some("cloud-ide"));

    let labels = pod.metadata.labels.unwrap();
    assert_eq!(labels.get("kind").map(String::as_str), Some("cloud-ide"));
    assert_eq!(labels.get(WORKSPACE_LABEL).map(String::as_str), Some("ws-1"));
}

#[test]
fn pod_container_matches_spec() {
    let pod = pod_for(&spec());
    let pod_spec = pod.spec.unwrap();
    assert_eq!(pod_spec.restart_policy.as_deref(), Some("Always"));
    assert_eq!(pod_spec.containers.len(), 1);

    let c = &pod_spec.containers[0];
    assert_eq!(c.name, "ws-1");
    assert_eq!(c.image.as_deref(), Some("ide:latest"));
    assert_eq!(c.image_pull_policy.as_deref(), Some("IfNotPresent"));
    assert_eq!(c.ports.as_ref().unwrap()[0].container_port, 8080);

    let limits = c.resources.as_ref().unwrap().limits.as_ref().unwrap();
    assert_eq!(limits.get("cpu"), Some(&Quantity("500m".to_string())));
    assert_eq!(limits.get("memory"), Some(&Quantity("1Gi".to_string())));
}

#[test]
fn pod_mounts_claim_named_after_workspace() {
    let pod = pod_for(&spec());
    let pod_spec = pod.spec.unwrap();

    let volume = &pod_spec.volumes.as_ref().unwrap()[0];
    assert_eq!(volume.persistent_volume_claim.as_ref().unwrap().claim_name, "ws-1");

    let mount = &pod_spec.containers[0].volume_mounts.as_ref().unwrap()[0];
    assert_eq!(mount.name, volume.name);
    assert_eq!(mount.mount_path, "/root/workspace");
}

#[test]
fn empty_limits_leave_resources_unset() {
    let spec = WorkspaceSpec::new(WorkspaceName::parse("ws-1").unwrap(), "ide:latest", 8080);
    let pod = pod_for(&spec);
    assert!(pod.spec.unwrap().containers[0].resources.is_none());
}

#[test]
fn claim_requests_size_and_class() {
    let name = WorkspaceName::parse("ws-1").unwrap();
    let claim = build_claim(&name, "cloud-ide", "20Gi", Some("fast"));
    assert_eq!(claim.metadata.name.as_deref(), Some("ws-1"));

    let spec = claim.spec.unwrap();
    assert_eq!(spec.access_modes, Some(vec!["ReadWriteOnce".to_string()]));
    assert_eq!(spec.storage_class_name.as_deref(), Some("fast"));
    let requests = spec.resources.unwrap().requests.unwrap();
    assert_eq!(requests.get("storage"), Some(&Quantity("20Gi".to_string())));
}

#[test]
fn claim_defaults_empty_size() {
    let name = WorkspaceName::parse("ws-1").unwrap();
    let claim = build_claim(&name, "cloud-ide", "", None);
    let spec = claim.spec.unwrap();
    assert_eq!(spec.storage_class_name, None);
    let requests = spec.resources.unwrap().requests.unwrap();
    assert_eq!(requests.get("storage"), Some(&Quantity(DEFAULT_STORAGE_SIZE.to_string())));
}

#[test]
fn unit_from_scheduled_pod() {
    let mut pod = pod_for(&spec());
    if let Some(s) = pod.spec.as_mut() {
        s.node_name = Some("node-a".to_string());
    }
    pod.status = Some(PodStatus {
        phase: Some("Running".to_string()),
        pod_ip: Some("10.1.2.3".to_string()),
        ..Default::default()
    });

    let unit = unit_from_pod(&pod).unwrap();
    assert_eq!(unit.name, "ws-1");
    assert_eq!(unit.phase, UnitPhase::Running);
    assert_eq!(unit.node_name.as_deref(), Some("node-a"));
    assert_eq!(unit.ip.as_deref(), Some("10.1.2.3"));
    assert_eq!(unit.port, Some(8080));
}

#[test]
fn unit_from_fresh_pod_is_unknown_without_address() {
    let unit = unit_from_pod(&pod_for(&spec())).unwrap();
    assert_eq!(unit.phase, UnitPhase::Unknown);
    assert_eq!(unit.ip, None);
    assert_eq!(unit.space_info(), None);
}

#[test]
fn pod_being_deleted_is_terminating_not_ready() {
    let mut pod = pod_for(&spec());
    pod.metadata.deletion_timestamp = Some(Time(Utc::now()));
    pod.status = Some(PodStatus {
        phase: Some("Running".to_string()),
        pod_ip: Some("10.1.1.1".to_string()),
        ..Default::default()
    });

    let unit = unit_from_pod(&pod).unwrap();
    assert_eq!(unit.phase, UnitPhase::Terminating);
    assert!(!unit.phase.is_ready());
}

#[test]
fn unnamed_pod_is_skipped() {
    assert!(unit_from_pod(&Pod::default()).is_none());
}

#[test]
fn selector_matches_kind_label() {
    assert_eq!(workspace_selector(), "kind=cloud-ide");
}
