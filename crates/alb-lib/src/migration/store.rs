//! Service storage backends

use crate::error::MigrationError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::{
    api::{ListParams, Patch, PatchParams},
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use std::path::PathBuf;

/// Access to the services the migration reads and annotates
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// List services across all namespaces
    async fn list_services(&self) -> Result<Vec<Service>, MigrationError>;

    /// Set a single annotation on a service
    async fn annotate(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
        value: &str,
    ) -> Result<(), MigrationError>;
}

/// JSON merge patch that sets one annotation and leaves the others alone
pub fn annotation_patch(key: &str, value: &str) -> serde_json::Value {
    serde_json::json!({
        "metadata": {
            "annotations": { key: value }
        }
    })
}

/// Read kubeconfig files and merge them in order, the first file winning
pub fn load_kubeconfigs(paths: &[PathBuf]) -> Result<Kubeconfig, MigrationError> {
    let mut merged: Option<Kubeconfig> = None;
    for path in paths {
        let next = Kubeconfig::read_from(path)?;
        merged = Some(match merged {
            Some(current) => current.merge(next)?,
            None => next,
        });
    }
    merged.ok_or(MigrationError::NoKubeconfig)
}

/// [`ServiceStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeServiceStore {
    client: Client,
}

impl KubeServiceStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from one or more kubeconfig files
    pub async fn from_kubeconfigs(paths: &[PathBuf]) -> Result<Self, MigrationError> {
        let kubeconfig = load_kubeconfigs(paths)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        let client = Client::try_from(config).map_err(MigrationError::Client)?;
        tracing::debug!(kubeconfigs = ?paths, "Kubernetes client configured");
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ServiceStore for KubeServiceStore {
    async fn list_services(&self) -> Result<Vec<Service>, MigrationError> {
        let api: Api<Service> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(MigrationError::List)?;
        Ok(list.items)
    }

    async fn annotate(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
        value: &str,
    ) -> Result<(), MigrationError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let patch = annotation_patch(key, value);

        api.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|source| MigrationError::Annotate {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}
