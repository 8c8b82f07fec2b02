//! Library for ALB autoscale tooling
//!
//! This crate provides:
//! - The auto-scale manager debug filter wire model
//! - Load balancer IP annotation migration for Kubernetes services

pub mod error;
pub mod migration;
pub mod models;

pub use error::{MigrationError, ModelError};
pub use migration::{
    KubeServiceStore, MigrationAction, MigrationPlan, MigrationReport, PlannedService,
    ServiceStore, ServiceSummary, DEFAULT_ANNOTATION_KEY,
};
pub use models::{AutoScaleMgrDebugFilter, FilterField};
