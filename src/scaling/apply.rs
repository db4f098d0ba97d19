//! Autoscaling registration.
//!
//! For each scalable target: RegisterScalableTarget sets the capacity bounds,
//! PutScalingPolicy attaches the target-tracking policy. Calls run strictly in
//! sequence with no retry; the first failure stops the run and names the
//! resource that failed, leaving earlier pairs configured.

use aws_sdk_applicationautoscaling::Client;
use aws_sdk_applicationautoscaling::types::{
    MetricType, PolicyType, PredefinedMetricSpecification, ScalableDimension, ServiceNamespace,
    TargetTrackingScalingPolicyConfiguration,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::{ErrorFamily, ProvisionError, classify_sdk_error};
use crate::scaling::target::ScalingTarget;

/// Capacity bounds and target-tracking settings shared by every scalable
/// target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingSettings {
    pub min_capacity: i32,
    pub max_capacity: i32,
    /// Consumed/provisioned capacity percentage the policy holds.
    pub target_utilization: f64,
    pub scale_in_cooldown: i32,
    pub scale_out_cooldown: i32,
}

impl Default for ScalingSettings {
    fn default() -> Self {
        Self {
            min_capacity: 1,
            max_capacity: 10,
            target_utilization: 70.0,
            scale_in_cooldown: 60,
            scale_out_cooldown: 60,
        }
    }
}

/// Register the scalable target for one resource/dimension pair.
pub async fn register_scalable_target(
    client: &Client,
    target: &ScalingTarget,
    settings: &ScalingSettings,
) -> Result<(), ProvisionError> {
    client
        .register_scalable_target()
        .service_namespace(ServiceNamespace::Dynamodb)
        .resource_id(target.resource_id())
        .scalable_dimension(ScalableDimension::from(
            target.scalable_dimension().as_str(),
        ))
        .min_capacity(settings.min_capacity)
        .max_capacity(settings.max_capacity)
        .send()
        .await
        .map_err(|e| classify_sdk_error(e, ErrorFamily::Autoscaling))?;
    Ok(())
}

/// Attach the target-tracking policy for one resource/dimension pair.
pub async fn put_scaling_policy(
    client: &Client,
    target: &ScalingTarget,
    settings: &ScalingSettings,
) -> Result<(), ProvisionError> {
    let configuration = TargetTrackingScalingPolicyConfiguration::builder()
        .target_value(settings.target_utilization)
        .predefined_metric_specification(
            PredefinedMetricSpecification::builder()
                .predefined_metric_type(MetricType::from(target.dimension.metric_type()))
                .build()?,
        )
        .scale_in_cooldown(settings.scale_in_cooldown)
        .scale_out_cooldown(settings.scale_out_cooldown)
        .build()?;

    client
        .put_scaling_policy()
        .service_namespace(ServiceNamespace::Dynamodb)
        .resource_id(target.resource_id())
        .scalable_dimension(ScalableDimension::from(
            target.scalable_dimension().as_str(),
        ))
        .policy_name(target.policy_name())
        .policy_type(PolicyType::TargetTrackingScaling)
        .target_tracking_scaling_policy_configuration(configuration)
        .send()
        .await
        .map_err(|e| classify_sdk_error(e, ErrorFamily::Autoscaling))?;
    Ok(())
}

/// Register targets and attach policies for the base table and every index, in
/// both capacity dimensions.
pub async fn apply_autoscaling(
    client: &Client,
    table: &str,
    indexes: &[String],
    settings: &ScalingSettings,
) -> Result<(), ProvisionError> {
    let targets = ScalingTarget::enumerate(table, indexes);
    info!(
        table = %table,
        targets = targets.len(),
        min = settings.min_capacity,
        max = settings.max_capacity,
        "applying autoscaling configuration"
    );

    for target in &targets {
        let resource = target.resource_id();

        info!(
            resource = %resource,
            dimension = %target.scalable_dimension(),
            "registering scalable target"
        );
        register_scalable_target(client, target, settings)
            .await
            .inspect_err(|_| error!(resource = %resource, "failed to register scalable target"))?;

        info!(
            resource = %resource,
            policy = %target.policy_name(),
            "attaching scaling policy"
        );
        put_scaling_policy(client, target, settings)
            .await
            .inspect_err(|_| error!(resource = %resource, "failed to attach scaling policy"))?;
    }

    Ok(())
}

/// One row of the dry-run plan.
#[derive(Debug, Serialize)]
pub struct PlanEntry {
    pub resource_id: String,
    pub scalable_dimension: String,
    pub policy_name: String,
    pub metric_type: &'static str,
}

/// Derive the full autoscaling plan without calling AWS.
pub fn scaling_plan(table: &str, indexes: &[String]) -> Vec<PlanEntry> {
    ScalingTarget::enumerate(table, indexes)
        .iter()
        .map(|target| PlanEntry {
            resource_id: target.resource_id(),
            scalable_dimension: target.scalable_dimension(),
            policy_name: target.policy_name(),
            metric_type: target.dimension.metric_type(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_original_constants() {
        let settings = ScalingSettings::default();
        assert_eq!(settings.min_capacity, 1);
        assert_eq!(settings.max_capacity, 10);
        assert_eq!(settings.target_utilization, 70.0);
        assert_eq!(settings.scale_in_cooldown, 60);
        assert_eq!(settings.scale_out_cooldown, 60);
    }

    #[test]
    fn empty_settings_file_means_defaults() {
        let settings: ScalingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ScalingSettings::default());
    }

    #[test]
    fn partial_settings_file_overrides_only_named_fields() {
        let settings: ScalingSettings =
            serde_json::from_str(r#"{"max_capacity": 40, "target_utilization": 50.0}"#).unwrap();
        assert_eq!(settings.max_capacity, 40);
        assert_eq!(settings.target_utilization, 50.0);
        assert_eq!(settings.min_capacity, 1);
    }

    #[test]
    fn plan_covers_table_and_indexes_in_both_dimensions() {
        let indexes: Vec<String> = (1..=10).map(|i| format!("GSI{i}")).collect();
        let plan = scaling_plan("krabber", &indexes);
        assert_eq!(plan.len(), 22);

        let read_policies = plan
            .iter()
            .filter(|e| e.metric_type == "DynamoDBReadCapacityUtilization")
            .count();
        assert_eq!(read_policies, 11);

        let gsi3_read = plan
            .iter()
            .find(|e| e.resource_id == "table/krabber/index/GSI3" && e.scalable_dimension.contains("Read"))
            .expect("GSI3 read entry");
        assert_eq!(gsi3_read.scalable_dimension, "dynamodb:index:ReadCapacityUnits");
        assert_eq!(
            gsi3_read.policy_name,
            "krabber-index-GSI3-read-capacity-scaling-policy"
        );
    }
}
