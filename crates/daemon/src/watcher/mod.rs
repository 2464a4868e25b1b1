// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pod watcher feeding readiness transitions into the bridge.

mod tracker;

pub use tracker::ReadyTracker;

use futures_util::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::{watcher, WatchStreamExt};
use kube::Api;
use tokio_util::sync::CancellationToken;

use crate::adapters::cluster::k8s::pod::workspace_selector;
use crate::readiness::ReadinessBridge;

/// Watch workspace pods until `cancel` fires.
///
/// Stream errors are logged and the watcher backs off and resumes; this only
/// returns on cancellation or if the stream ends.
pub async fn run(pods: Api<Pod>, bridge: ReadinessBridge, cancel: CancellationToken) {
    let config = watcher::Config::default().labels(&workspace_selector());
    let stream = watcher(pods, config).default_backoff();
    tokio::pin!(stream);

    let mut tracker = ReadyTracker::new();
    tracing::info!("pod watcher started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => match next {
                Some(Ok(event)) => {
                    for name in tracker.apply(event) {
                        tracing::debug!(workspace = %name, "pod became running");
                        bridge.notify_ready(&name);
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "pod watch error");
                }
                None => {
                    tracing::warn!("pod watch stream ended");
                    break;
                }
            },
        }
    }

    tracing::info!(tracked = tracker.running_count(), "pod watcher stopped");
}
