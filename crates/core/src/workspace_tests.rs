// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pending = { Some("Pending"), UnitPhase::Pending },
    running = { Some("Running"), UnitPhase::Running },
    succeeded = { Some("Succeeded"), UnitPhase::Succeeded },
    failed = { Some("Failed"), UnitPhase::Failed },
    unknown = { Some("Unknown"), UnitPhase::Unknown },
    garbage = { Some("running"), UnitPhase::Unknown },
    missing = { None, UnitPhase::Unknown },
)]
fn phase_from_pod_status(raw: Option<&str>, expected: UnitPhase) {
    assert_eq!(UnitPhase::from_phase(raw), expected);
}

#[test]
fn only_running_is_ready() {
    assert!(UnitPhase::Running.is_ready());
    for phase in [
        UnitPhase::Pending,
        UnitPhase::Succeeded,
        UnitPhase::Failed,
        UnitPhase::Unknown,
        UnitPhase::Terminating,
    ] {
        assert!(!phase.is_ready(), "{} should not be ready", phase);
    }
}

#[test]
fn status_display_matches_pod_phase() {
    assert_eq!(WorkspaceStatus::NotExist.to_string(), "NotExist");
    assert_eq!(WorkspaceStatus::Exist { phase: UnitPhase::Pending }.to_string(), "Pending");
    assert_eq!(
        WorkspaceStatus::Exist { phase: UnitPhase::Terminating }.to_string(),
        "Terminating"
    );
}

#[test]
fn spec_setters() {
    let name = WorkspaceName::parse("ws-1").unwrap();
    let spec = WorkspaceSpec::new(name, "code-server:latest", 8080)
        .limits(ResourceLimits::new("2", "4Gi").storage("10Gi"));
    assert_eq!(spec.port, 8080);
    assert_eq!(spec.limits.cpu, "2");
    assert_eq!(spec.limits.memory, "4Gi");
    assert_eq!(spec.limits.storage, "10Gi");
}

#[test]
fn limits_default_missing_fields() {
    let limits: ResourceLimits = serde_json::from_str(r#"{"cpu":"1"}"#).unwrap();
    assert_eq!(limits, ResourceLimits { cpu: "1".into(), ..Default::default() });
}
