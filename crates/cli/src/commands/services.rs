//! Kubernetes service CLI commands

use alb_lib::migration::{self, ServiceStore, ServiceSummary};
use alb_lib::MigrationReport;
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::output::{
    color_service_type, print_error, print_info, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

/// Row for the services table
#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    service_type: String,
    #[tabled(rename = "Cluster IP")]
    cluster_ip: String,
}

impl From<&ServiceSummary> for ServiceRow {
    fn from(summary: &ServiceSummary) -> Self {
        Self {
            namespace: summary.namespace.clone(),
            name: summary.name.clone(),
            service_type: color_service_type(summary.service_type.as_deref().unwrap_or("-")),
            cluster_ip: summary.cluster_ip.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// List services in all namespaces
pub async fn list_services(store: &dyn ServiceStore, format: OutputFormat) -> Result<()> {
    let services = store.list_services().await?;
    let summaries: Vec<ServiceSummary> = services.iter().map(ServiceSummary::from_service).collect();

    match format {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Table => {
            let rows: Vec<ServiceRow> = summaries.iter().map(ServiceRow::from).collect();
            print_table(&rows);
            println!("\nTotal: {} services", summaries.len());
        }
    }

    Ok(())
}

/// Annotate LoadBalancer services with their ingress IP
pub async fn migrate_services(
    store: &dyn ServiceStore,
    annotation_key: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let report = migration::run(store, annotation_key, dry_run).await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    if report.has_failures() {
        anyhow::bail!("{} service(s) could not be annotated", report.failed.len());
    }

    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!("{}", "Service Migration".bold());
    println!("{}", "=".repeat(50));
    println!("Annotation: {}", report.annotation_key.cyan());
    println!(
        "Generated:  {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    let rows: Vec<ServiceRow> = report.services.iter().map(ServiceRow::from).collect();
    print_table(&rows);
    println!();

    let updated_label = if report.dry_run {
        "Services that would be updated"
    } else {
        "Services updated"
    };
    if report.updated.is_empty() {
        print_info(&format!("{}: none", updated_label));
    } else {
        print_success(&format!("{}: {}", updated_label, report.updated.join(", ")));
    }

    if !report.not_updated.is_empty() {
        print_info(&format!(
            "Services not updated: {}",
            report.not_updated.join(", ")
        ));
    }
    if !report.skipped.is_empty() {
        print_warning(&format!(
            "Awaiting ingress IP: {}",
            report.skipped.join(", ")
        ));
    }
    for failure in &report.failed {
        print_error(&format!("{}: {}", failure.service, failure.error));
    }

    if report.dry_run {
        print_info("Dry run: no services were patched");
    }
}
