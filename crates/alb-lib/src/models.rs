//! Wire models exchanged with the load balancer controller

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Debug filter for the auto-scale manager
///
/// Every field is optional. An absent field is omitted on the wire, which
/// keeps it distinct from an explicit `false`, `0` or empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScaleMgrDebugFilter {
    /// Enable AWS autoscale integration. Alpha feature, introduced in 17.1.1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_aws_autoscale_integration: Option<bool>,

    /// Period of the intelligent autoscale check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligent_autoscale_period: Option<i32>,

    /// Reference (uuid or URI) to a Pool object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_ref: Option<String>,
}

impl AutoScaleMgrDebugFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aws_autoscale_integration(mut self, enabled: bool) -> Self {
        self.enable_aws_autoscale_integration = Some(enabled);
        self
    }

    pub fn with_intelligent_autoscale_period(mut self, period: i32) -> Self {
        self.intelligent_autoscale_period = Some(period);
        self
    }

    pub fn with_pool_ref(mut self, pool_ref: impl Into<String>) -> Self {
        self.pool_ref = Some(pool_ref.into());
        self
    }

    /// Decode a filter from its JSON wire form
    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        serde_json::from_str(input).map_err(ModelError::Decode)
    }

    /// Encode the filter as compact JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(ModelError::Encode)
    }

    /// Encode the filter as indented JSON
    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(ModelError::Encode)
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.enable_aws_autoscale_integration.is_none()
            && self.intelligent_autoscale_period.is_none()
            && self.pool_ref.is_none()
    }

    /// Overwrite every field that is set in `overlay`
    pub fn merge(&mut self, overlay: &Self) {
        if let Some(enabled) = overlay.enable_aws_autoscale_integration {
            self.enable_aws_autoscale_integration = Some(enabled);
        }
        if let Some(period) = overlay.intelligent_autoscale_period {
            self.intelligent_autoscale_period = Some(period);
        }
        if let Some(pool_ref) = &overlay.pool_ref {
            self.pool_ref = Some(pool_ref.clone());
        }
    }

    /// Unset a single field
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::EnableAwsAutoscaleIntegration => {
                self.enable_aws_autoscale_integration = None
            }
            FilterField::IntelligentAutoscalePeriod => self.intelligent_autoscale_period = None,
            FilterField::PoolRef => self.pool_ref = None,
        }
    }

    pub fn is_set(&self, field: FilterField) -> bool {
        match field {
            FilterField::EnableAwsAutoscaleIntegration => {
                self.enable_aws_autoscale_integration.is_some()
            }
            FilterField::IntelligentAutoscalePeriod => self.intelligent_autoscale_period.is_some(),
            FilterField::PoolRef => self.pool_ref.is_some(),
        }
    }

    /// Fields currently present, in wire order
    pub fn set_fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        FilterField::ALL
            .into_iter()
            .filter(move |field| self.is_set(*field))
    }
}

/// Field of [`AutoScaleMgrDebugFilter`], named by its wire key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    EnableAwsAutoscaleIntegration,
    IntelligentAutoscalePeriod,
    PoolRef,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::EnableAwsAutoscaleIntegration,
        FilterField::IntelligentAutoscalePeriod,
        FilterField::PoolRef,
    ];

    pub fn wire_key(&self) -> &'static str {
        match self {
            FilterField::EnableAwsAutoscaleIntegration => "enable_aws_autoscale_integration",
            FilterField::IntelligentAutoscalePeriod => "intelligent_autoscale_period",
            FilterField::PoolRef => "pool_ref",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

impl FromStr for FilterField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .into_iter()
            .find(|field| field.wire_key() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_encodes_to_empty_object() {
        let filter = AutoScaleMgrDebugFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_period_only_encodes_single_key() {
        let filter = AutoScaleMgrDebugFilter::new().with_intelligent_autoscale_period(30);
        assert_eq!(
            filter.to_json().unwrap(),
            r#"{"intelligent_autoscale_period":30}"#
        );

        let decoded = AutoScaleMgrDebugFilter::from_json(r#"{"intelligent_autoscale_period":30}"#)
            .unwrap();
        assert_eq!(decoded.intelligent_autoscale_period, Some(30));
        assert_eq!(decoded.enable_aws_autoscale_integration, None);
        assert_eq!(decoded.pool_ref, None);
    }

    #[test]
    fn test_zero_values_stay_distinct_from_absent() {
        let filter = AutoScaleMgrDebugFilter::new()
            .with_aws_autoscale_integration(false)
            .with_intelligent_autoscale_period(0)
            .with_pool_ref("");

        let value: serde_json::Value = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            value,
            json!({
                "enable_aws_autoscale_integration": false,
                "intelligent_autoscale_period": 0,
                "pool_ref": ""
            })
        );

        let decoded = AutoScaleMgrDebugFilter::from_json(&filter.to_json().unwrap()).unwrap();
        assert_eq!(decoded, filter);
        assert!(!decoded.is_empty());
    }

    #[test]
    fn test_partial_records_survive_round_trip() {
        let cases = [
            AutoScaleMgrDebugFilter::new().with_aws_autoscale_integration(true),
            AutoScaleMgrDebugFilter::new().with_pool_ref("pool-3c9d"),
            AutoScaleMgrDebugFilter::new()
                .with_aws_autoscale_integration(true)
                .with_pool_ref("https://ctrl/api/pool/pool-3c9d"),
        ];

        for filter in cases {
            let decoded = AutoScaleMgrDebugFilter::from_json(&filter.to_json().unwrap()).unwrap();
            assert_eq!(decoded, filter);
        }
    }

    #[test]
    fn test_explicit_null_decodes_as_absent() {
        let decoded = AutoScaleMgrDebugFilter::from_json(
            r#"{"enable_aws_autoscale_integration":null,"pool_ref":"p1"}"#,
        )
        .unwrap();
        assert_eq!(decoded.enable_aws_autoscale_integration, None);
        assert_eq!(decoded.pool_ref.as_deref(), Some("p1"));
        assert_eq!(decoded.to_json().unwrap(), r#"{"pool_ref":"p1"}"#);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let decoded =
            AutoScaleMgrDebugFilter::from_json(r#"{"se_uuid":"se-1","intelligent_autoscale_period":5}"#)
                .unwrap();
        assert_eq!(
            decoded,
            AutoScaleMgrDebugFilter::new().with_intelligent_autoscale_period(5)
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            AutoScaleMgrDebugFilter::from_json(r#"{"enable_aws_autoscale_integration":"yes"}"#),
            Err(ModelError::Decode(_))
        ));
        assert!(matches!(
            AutoScaleMgrDebugFilter::from_json(r#"{"intelligent_autoscale_period":3000000000}"#),
            Err(ModelError::Decode(_))
        ));
        assert!(AutoScaleMgrDebugFilter::from_json("[]").is_err());
    }

    #[test]
    fn test_merge_only_overwrites_set_fields() {
        let mut base = AutoScaleMgrDebugFilter::new()
            .with_aws_autoscale_integration(true)
            .with_intelligent_autoscale_period(60);
        let overlay = AutoScaleMgrDebugFilter::new()
            .with_intelligent_autoscale_period(0)
            .with_pool_ref("pool-1");

        base.merge(&overlay);

        assert_eq!(base.enable_aws_autoscale_integration, Some(true));
        assert_eq!(base.intelligent_autoscale_period, Some(0));
        assert_eq!(base.pool_ref.as_deref(), Some("pool-1"));
    }

    #[test]
    fn test_clear_and_set_fields() {
        let mut filter = AutoScaleMgrDebugFilter::new()
            .with_aws_autoscale_integration(false)
            .with_pool_ref("pool-1");
        assert_eq!(
            filter.set_fields().collect::<Vec<_>>(),
            vec![FilterField::EnableAwsAutoscaleIntegration, FilterField::PoolRef]
        );

        filter.clear(FilterField::PoolRef);
        assert!(!filter.is_set(FilterField::PoolRef));
        assert_eq!(filter.to_json().unwrap(), r#"{"enable_aws_autoscale_integration":false}"#);
    }

    #[test]
    fn test_filter_field_parses_wire_keys() {
        for field in FilterField::ALL {
            assert_eq!(field.to_string().parse::<FilterField>().unwrap(), field);
        }
        assert!(matches!(
            "period".parse::<FilterField>(),
            Err(ModelError::UnknownField(name)) if name == "period"
        ));
    }
}
