//! Autoscaling configuration for the table and its indexes.
//!
//! - `target` - scalable-target derivation (resource ids, dimensions, policy names)
//! - `apply` - RegisterScalableTarget / PutScalingPolicy orchestration

mod apply;
mod target;

pub use apply::{
    PlanEntry, ScalingSettings, apply_autoscaling, put_scaling_policy, register_scalable_target,
    scaling_plan,
};
pub use target::{CapacityDimension, ScalingTarget};
