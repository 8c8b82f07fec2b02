//! Load balancer IP annotation migration
//!
//! Copies the ingress IP of every `LoadBalancer` service into the
//! `load-balancer-ips` annotation when the annotation is missing. Services
//! that already carry it are reported and left untouched.

mod plan;
mod store;

pub use plan::{plan, MigrationAction, MigrationPlan, PlannedService, ServiceSummary};
pub use store::{annotation_patch, load_kubeconfigs, KubeServiceStore, ServiceStore};

use crate::error::MigrationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Annotation written on migrated services
pub const DEFAULT_ANNOTATION_KEY: &str = "load-balancer-ips";

/// A patch that the API server rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUpdate {
    pub service: String,
    pub error: String,
}

/// Outcome of a migration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub dry_run: bool,
    pub annotation_key: String,
    /// Services annotated (or that would be, in dry-run mode)
    pub updated: Vec<String>,
    /// LoadBalancer services that already had the annotation
    pub not_updated: Vec<String>,
    /// LoadBalancer services with no ingress IP to copy
    pub skipped: Vec<String>,
    pub failed: Vec<FailedUpdate>,
    pub services: Vec<ServiceSummary>,
    pub generated_at: DateTime<Utc>,
}

impl MigrationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// List services, plan, and apply the annotation patches
///
/// A rejected patch is recorded in the report and the run continues.
pub async fn run<S: ServiceStore + ?Sized>(
    store: &S,
    annotation_key: &str,
    dry_run: bool,
) -> Result<MigrationReport, MigrationError> {
    let services = store.list_services().await?;
    let plan = plan(&services, annotation_key);
    info!(
        services = plan.services.len(),
        to_update = plan.to_update().count(),
        dry_run,
        "Migration planned"
    );

    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for (summary, ip) in plan.to_update() {
        if dry_run {
            updated.push(summary.key());
            continue;
        }

        match store
            .annotate(&summary.namespace, &summary.name, annotation_key, ip)
            .await
        {
            Ok(()) => {
                info!(service = %summary.key(), %ip, "Service annotated");
                updated.push(summary.key());
            }
            Err(e) => {
                warn!(service = %summary.key(), error = %e, "Failed to annotate service");
                failed.push(FailedUpdate {
                    service: summary.key(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(MigrationReport {
        dry_run,
        annotation_key: annotation_key.to_string(),
        updated,
        not_updated: plan.already_annotated().map(ServiceSummary::key).collect(),
        skipped: plan.awaiting_ingress().map(ServiceSummary::key).collect(),
        failed,
        services: plan.summaries().cloned().collect(),
        generated_at: Utc::now(),
    })
}
