// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn unit() -> ComputeUnit {
    ComputeUnit {
        name: WorkspaceName::parse("ws-1").unwrap(),
        phase: UnitPhase::Running,
        node_name: Some("node-a".to_string()),
        ip: Some("10.1.2.3".to_string()),
        port: Some(8080),
    }
}

#[test]
fn space_info_from_running_unit() {
    assert_eq!(
        unit().space_info(),
        Some(SpaceInfo { node_name: "node-a".into(), ip: "10.1.2.3".into(), port: 8080 })
    );
}

#[test]
fn space_info_requires_address() {
    let no_ip = ComputeUnit { ip: None, ..unit() };
    assert_eq!(no_ip.space_info(), None);

    let empty_ip = ComputeUnit { ip: Some(String::new()), ..unit() };
    assert_eq!(empty_ip.space_info(), None);
}

#[test]
fn space_info_requires_port() {
    assert_eq!(ComputeUnit { port: None, ..unit() }.space_info(), None);
}

#[test]
fn timeout_error_mentions_deadline() {
    let err = ClusterError::Timeout(Duration::from_millis(1500));
    assert_eq!(err.to_string(), "cluster call exceeded 1500ms deadline");
}
