// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edge detection over pod watch events.

use std::collections::HashSet;

use cs_core::WorkspaceName;
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::watcher::Event;

use crate::adapters::cluster::k8s::pod::pod_phase;

/// Turns a stream of pod observations into "became Running" transitions.
///
/// Pods are keyed by UID so a pod deleted and recreated under the same name
/// is reported again. A re-list (`Init` .. `InitDone`) replaces the running
/// set wholesale; pods that started while the stream was down are reported
/// once, and pods that vanished are forgotten.
#[derive(Debug, Default)]
pub struct ReadyTracker {
    running: HashSet<String>,
    relist: Option<HashSet<String>>,
}

impl ReadyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one watcher event; returns the workspaces that just became ready.
    pub fn apply(&mut self, event: Event<Pod>) -> Vec<WorkspaceName> {
        match event {
            Event::Apply(pod) => self.observe(&pod).into_iter().collect(),
            Event::InitApply(pod) => self.observe_relisted(&pod).into_iter().collect(),
            Event::Delete(pod) => {
                if let Some(uid) = pod_key(&pod) {
                    self.running.remove(&uid);
                }
                Vec::new()
            }
            Event::Init => {
                self.relist = Some(HashSet::new());
                Vec::new()
            }
            Event::InitDone => {
                if let Some(seen) = self.relist.take() {
                    self.running = seen;
                }
                Vec::new()
            }
        }
    }

    /// Number of pods currently tracked as Running
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    fn observe(&mut self, pod: &Pod) -> Option<WorkspaceName> {
        let uid = pod_key(pod)?;
        if is_running(pod) {
            if self.running.insert(uid) {
                return pod_name(pod);
            }
        } else {
            self.running.remove(&uid);
        }
        None
    }

    fn observe_relisted(&mut self, pod: &Pod) -> Option<WorkspaceName> {
        let uid = pod_key(pod)?;
        if !is_running(pod) {
            return None;
        }
        let relist = self.relist.get_or_insert_with(HashSet::new);
        let fresh = !self.running.contains(&uid) && relist.insert(uid.clone());
        relist.insert(uid);
        if fresh {
            pod_name(pod)
        } else {
            None
        }
    }
}

fn is_running(pod: &Pod) -> bool {
    pod_phase(pod).is_ready()
}

fn pod_key(pod: &Pod) -> Option<String> {
    pod.metadata.uid.clone().or_else(|| pod.metadata.name.clone())
}

fn pod_name(pod: &Pod) -> Option<WorkspaceName> {
    pod.metadata.name.as_deref().map(WorkspaceName::from_string)
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
