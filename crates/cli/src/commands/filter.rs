//! Debug filter CLI commands

use alb_lib::{AutoScaleMgrDebugFilter, FilterField};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::Path;
use tabled::Tabled;

use crate::output::{format_optional, print_json, print_success, print_table, OutputFormat};

/// Row for the filter table
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Changes requested by `filter set`
#[derive(Debug, Default)]
pub struct FilterEdit {
    pub enable_aws_autoscale_integration: Option<bool>,
    pub intelligent_autoscale_period: Option<i32>,
    pub pool_ref: Option<String>,
    pub clear: Vec<FilterField>,
}

impl FilterEdit {
    /// Apply clears first, then the set fields
    pub fn apply(&self, filter: &mut AutoScaleMgrDebugFilter) {
        for field in &self.clear {
            filter.clear(*field);
        }
        filter.merge(&AutoScaleMgrDebugFilter {
            enable_aws_autoscale_integration: self.enable_aws_autoscale_integration,
            intelligent_autoscale_period: self.intelligent_autoscale_period,
            pool_ref: self.pool_ref.clone(),
        });
    }
}

/// Read a filter from a file, or from stdin when `source` is `-`
pub fn read_filter(source: &str) -> Result<AutoScaleMgrDebugFilter> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read filter from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read filter file {}", source))?
    };

    AutoScaleMgrDebugFilter::from_json(&content)
        .with_context(|| format!("Invalid debug filter in {}", source))
}

/// Show a debug filter
pub fn show_filter(source: &str, format: OutputFormat) -> Result<()> {
    let filter = read_filter(source)?;

    match format {
        OutputFormat::Json => print_json(&filter)?,
        OutputFormat::Table => {
            println!("{}", "Auto-scale Manager Debug Filter".bold());
            println!("{}", "=".repeat(50));
            print_table(&field_rows(&filter));
        }
    }

    Ok(())
}

fn field_rows(filter: &AutoScaleMgrDebugFilter) -> Vec<FieldRow> {
    FilterField::ALL
        .into_iter()
        .map(|field| FieldRow {
            field: field.to_string(),
            value: match field {
                FilterField::EnableAwsAutoscaleIntegration => {
                    format_optional(filter.enable_aws_autoscale_integration)
                }
                FilterField::IntelligentAutoscalePeriod => {
                    format_optional(filter.intelligent_autoscale_period)
                }
                FilterField::PoolRef => format_optional(filter.pool_ref.as_deref()),
            },
        })
        .collect()
}

/// Build or edit a debug filter and write it out as JSON
pub fn set_filter(input: Option<&Path>, edit: &FilterEdit, output: Option<&Path>) -> Result<()> {
    let mut filter = match input {
        Some(path) => read_filter(&path.to_string_lossy())?,
        None => AutoScaleMgrDebugFilter::new(),
    };
    edit.apply(&mut filter);
    tracing::info!(
        fields = ?filter.set_fields().map(|f| f.wire_key()).collect::<Vec<_>>(),
        "Debug filter updated"
    );

    let json = filter.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Debug filter written to {}", path.display()));
        }
        None => println!("{}", json),
    }

    Ok(())
}
