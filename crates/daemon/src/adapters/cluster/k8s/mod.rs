// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes cluster adapter.
//!
//! # Module layout
//!
//! - [`pod`] - Pod and claim spec construction helpers
//!
//! Each workspace is one pod plus one PersistentVolumeClaim in the configured
//! namespace, both named after the workspace. Every API call is bounded by the
//! caller's deadline; 404 and 409 responses surface as
//! [`ClusterError::NotFound`] and [`ClusterError::AlreadyExists`].

pub(crate) mod pod;

pub use adapter::KubeCluster;

mod adapter {
    use super::pod::{self, PodParams};
    use crate::adapters::cluster::{ClusterApi, ClusterError, ComputeUnit};
    use async_trait::async_trait;
    use cs_core::{WorkspaceName, WorkspaceSpec};
    use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
    use kube::api::{Api, DeleteParams, PostParams};
    use kube::Client;
    use std::future::Future;
    use std::time::Duration;

    /// Cluster adapter backed by the Kubernetes API.
    #[derive(Clone)]
    pub struct KubeCluster {
        client: Client,
        namespace: String,
        mount_path: String,
        storage_class: Option<String>,
    }

    impl KubeCluster {
        pub fn new(client: Client, namespace: impl Into<String>) -> Self {
            Self {
                client,
                namespace: namespace.into(),
                mount_path: "/root/workspace".to_string(),
                storage_class: None,
            }
        }

        /// Mount point of the workspace volume inside the container.
        pub fn with_mount_path(mut self, mount_path: impl Into<String>) -> Self {
            self.mount_path = mount_path.into();
            self
        }

        /// Storage class for new claims; cluster default when unset.
        pub fn with_storage_class(mut self, storage_class: Option<String>) -> Self {
            self.storage_class = storage_class;
            self
        }

        pub fn namespace(&self) -> &str {
            &self.namespace
        }

        /// Client handle, shared with the pod watcher.
        pub fn client(&self) -> Client {
            self.client.clone()
        }

        fn pods(&self) -> Api<Pod> {
            Api::namespaced(self.client.clone(), &self.namespace)
        }

        fn claims(&self) -> Api<PersistentVolumeClaim> {
            Api::namespaced(self.client.clone(), &self.namespace)
        }
    }

    /// Run `fut` under `deadline`, classifying API failures.
    async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, ClusterError>
    where
        F: Future<Output = Result<T, kube::Error>>,
    {
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(ClusterError::Timeout(deadline)),
        }
    }

    fn classify(err: kube::Error) -> ClusterError {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => ClusterError::NotFound,
            kube::Error::Api(resp) if resp.code == 409 => ClusterError::AlreadyExists,
            other => ClusterError::Api(other.to_string()),
        }
    }

    #[async_trait]
    impl ClusterApi for KubeCluster {
        async fn create_compute_unit(
            &self,
            spec: &WorkspaceSpec,
            deadline: Duration,
        ) -> Result<(), ClusterError> {
            let pod = pod::build_pod(&PodParams {
                spec,
                namespace: &self.namespace,
                mount_path: &self.mount_path,
            });
            let pods = self.pods();
            with_deadline(deadline, pods.create(&PostParams::default(), &pod)).await?;
            tracing::debug!(name = %spec.name, namespace = %self.namespace, "pod created");
            Ok(())
        }

        async fn get_compute_unit(
            &self,
            name: &WorkspaceName,
            deadline: Duration,
        ) -> Result<ComputeUnit, ClusterError> {
            let pods = self.pods();
            let pod = with_deadline(deadline, pods.get(name.as_str())).await?;
            pod::unit_from_pod(&pod)
                .ok_or_else(|| ClusterError::Api(format!("pod {} has no name", name)))
        }

        async fn delete_compute_unit(
            &self,
            name: &WorkspaceName,
            deadline: Duration,
        ) -> Result<(), ClusterError> {
            let pods = self.pods();
            with_deadline(deadline, pods.delete(name.as_str(), &DeleteParams::default())).await?;
            tracing::debug!(%name, "pod delete accepted");
            Ok(())
        }

        async fn create_storage_claim(
            &self,
            name: &WorkspaceName,
            size: &str,
            deadline: Duration,
        ) -> Result<(), ClusterError> {
            let claim =
                pod::build_claim(name, &self.namespace, size, self.storage_class.as_deref());
            let claims = self.claims();
            with_deadline(deadline, claims.create(&PostParams::default(), &claim)).await?;
            tracing::debug!(%name, "storage claim created");
            Ok(())
        }

        async fn delete_storage_claim(
            &self,
            name: &WorkspaceName,
            deadline: Duration,
        ) -> Result<(), ClusterError> {
            let claims = self.claims();
            with_deadline(deadline, claims.delete(name.as_str(), &DeleteParams::default()))
                .await?;
            tracing::debug!(%name, "storage claim delete accepted");
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use kube::core::ErrorResponse;

        fn api_error(code: u16) -> kube::Error {
            kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: "boom".to_string(),
                reason: "Test".to_string(),
                code,
            })
        }

        #[test]
        fn classify_maps_status_codes() {
            assert_eq!(classify(api_error(404)), ClusterError::NotFound);
            assert_eq!(classify(api_error(409)), ClusterError::AlreadyExists);
            assert!(matches!(classify(api_error(500)), ClusterError::Api(_)));
        }

        #[tokio::test(start_paused = true)]
        async fn deadline_elapses_to_timeout() {
            let deadline = Duration::from_millis(50);
            let result: Result<(), ClusterError> =
                with_deadline(deadline, std::future::pending()).await;
            assert_eq!(result, Err(ClusterError::Timeout(deadline)));
        }

        #[tokio::test]
        async fn deadline_passes_through_errors() {
            let result: Result<(), ClusterError> =
                with_deadline(Duration::from_secs(1), async { Err(api_error(404)) }).await;
            assert_eq!(result, Err(ClusterError::NotFound));
        }
    }
}
