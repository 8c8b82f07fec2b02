//! Migration planning over a snapshot of cluster services

use k8s_openapi::api::core::v1::Service;
use serde::{Deserialize, Serialize};

const LOAD_BALANCER: &str = "LoadBalancer";

/// Identifying fields of a service, as reported to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

impl ServiceSummary {
    pub fn from_service(service: &Service) -> Self {
        let spec = service.spec.as_ref();
        Self {
            name: service.metadata.name.clone().unwrap_or_default(),
            namespace: service.metadata.namespace.clone().unwrap_or_default(),
            cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
            service_type: spec.and_then(|s| s.type_.clone()),
        }
    }

    /// `namespace/name` key used in reports
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn is_load_balancer(&self) -> bool {
        self.service_type.as_deref() == Some(LOAD_BALANCER)
    }
}

/// What the migration will do with one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MigrationAction {
    /// Copy the ingress IP into the annotation
    Annotate { ip: String },
    /// The annotation is already present
    AlreadyAnnotated,
    /// LoadBalancer service without an ingress IP yet
    AwaitingIngress,
    NotLoadBalancer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedService {
    pub summary: ServiceSummary,
    #[serde(flatten)]
    pub action: MigrationAction,
}

/// Planned actions for every listed service, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub services: Vec<PlannedService>,
}

impl MigrationPlan {
    /// Services that will receive the annotation, with the IP to write
    pub fn to_update(&self) -> impl Iterator<Item = (&ServiceSummary, &str)> {
        self.services.iter().filter_map(|planned| match &planned.action {
            MigrationAction::Annotate { ip } => Some((&planned.summary, ip.as_str())),
            _ => None,
        })
    }

    pub fn already_annotated(&self) -> impl Iterator<Item = &ServiceSummary> {
        self.with_action(MigrationAction::AlreadyAnnotated)
    }

    pub fn awaiting_ingress(&self) -> impl Iterator<Item = &ServiceSummary> {
        self.with_action(MigrationAction::AwaitingIngress)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &ServiceSummary> {
        self.services.iter().map(|planned| &planned.summary)
    }

    fn with_action(&self, action: MigrationAction) -> impl Iterator<Item = &ServiceSummary> {
        self.services
            .iter()
            .filter(move |planned| planned.action == action)
            .map(|planned| &planned.summary)
    }
}

/// Decide the action for each service
pub fn plan(services: &[Service], annotation_key: &str) -> MigrationPlan {
    let services = services
        .iter()
        .map(|service| {
            let summary = ServiceSummary::from_service(service);
            let action = action_for(service, &summary, annotation_key);
            PlannedService { summary, action }
        })
        .collect();

    MigrationPlan { services }
}

fn action_for(service: &Service, summary: &ServiceSummary, annotation_key: &str) -> MigrationAction {
    if !summary.is_load_balancer() {
        return MigrationAction::NotLoadBalancer;
    }

    let annotated = service
        .metadata
        .annotations
        .as_ref()
        .is_some_and(|annotations| annotations.contains_key(annotation_key));
    if annotated {
        return MigrationAction::AlreadyAnnotated;
    }

    // Only the first ingress entry is considered.
    let ip = service
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .and_then(|ingress| ingress.first())
        .and_then(|first| first.ip.clone());

    match ip {
        Some(ip) => MigrationAction::Annotate { ip },
        None => MigrationAction::AwaitingIngress,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::migration::DEFAULT_ANNOTATION_KEY;

    #[test]
    fn test_load_balancer_without_annotation_is_annotated() {
        let services = vec![with_ingress(
            service("web", "frontend", "LoadBalancer"),
            Some("192.0.2.10"),
            None,
        )];

        let plan = plan(&services, DEFAULT_ANNOTATION_KEY);

        let updates: Vec<_> = plan.to_update().collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0.key(), "web/frontend");
        assert_eq!(updates[0].1, "192.0.2.10");
    }

    #[test]
    fn test_existing_annotation_is_left_alone() {
        let services = vec![with_annotation(
            with_ingress(service("web", "frontend", "LoadBalancer"), Some("192.0.2.10"), None),
            DEFAULT_ANNOTATION_KEY,
            "192.0.2.99",
        )];

        let plan = plan(&services, DEFAULT_ANNOTATION_KEY);

        assert_eq!(plan.to_update().count(), 0);
        assert_eq!(plan.already_annotated().count(), 1);
    }

    #[test]
    fn test_other_annotations_do_not_count() {
        let services = vec![with_annotation(
            with_ingress(service("web", "frontend", "LoadBalancer"), Some("192.0.2.10"), None),
            "owner",
            "team-a",
        )];

        let plan = plan(&services, DEFAULT_ANNOTATION_KEY);
        assert_eq!(plan.to_update().count(), 1);
    }

    #[test]
    fn test_non_load_balancer_services_are_only_summarised() {
        let services = vec![
            service("kube-system", "kube-dns", "ClusterIP"),
            service("web", "nodeport", "NodePort"),
        ];

        let plan = plan(&services, DEFAULT_ANNOTATION_KEY);

        assert_eq!(plan.summaries().count(), 2);
        assert!(plan
            .services
            .iter()
            .all(|p| p.action == MigrationAction::NotLoadBalancer));
        let dns = &plan.services[0].summary;
        assert_eq!(dns.cluster_ip.as_deref(), Some("10.96.0.10"));
        assert_eq!(dns.service_type.as_deref(), Some("ClusterIP"));
    }

    #[test]
    fn test_missing_or_hostname_only_ingress_waits() {
        let services = vec![
            service("web", "pending", "LoadBalancer"),
            with_ingress(
                service("web", "elb", "LoadBalancer"),
                None,
                Some("a1.elb.example.com"),
            ),
        ];

        let plan = plan(&services, DEFAULT_ANNOTATION_KEY);

        assert_eq!(plan.to_update().count(), 0);
        assert_eq!(plan.awaiting_ingress().count(), 2);
    }

    #[test]
    fn test_custom_annotation_key() {
        let services = vec![with_annotation(
            with_ingress(service("web", "frontend", "LoadBalancer"), Some("192.0.2.10"), None),
            DEFAULT_ANNOTATION_KEY,
            "192.0.2.10",
        )];

        let plan = plan(&services, "ako.vmware.com/load-balancer-ip");
        assert_eq!(plan.to_update().count(), 1);
    }

    #[test]
    fn test_summary_serializes_type_key() {
        let summary = ServiceSummary::from_service(&service("web", "frontend", "LoadBalancer"));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["type"], "LoadBalancer");
        assert_eq!(value["cluster_ip"], "10.96.0.10");
    }

    #[test]
    fn test_missing_namespace_is_not_invented() {
        let mut svc = service("web", "frontend", "LoadBalancer");
        svc.metadata.namespace = None;

        let summary = ServiceSummary::from_service(&svc);

        assert_eq!(summary.namespace, "");
        assert_eq!(summary.key(), "/frontend");
    }
}
