//! Scalable-target derivation.
//!
//! Everything Application Auto Scaling needs to address a resource is derived
//! from three inputs: table name, optional index name, capacity dimension.
//! Nothing is stored or fetched; repeated derivation with the same inputs
//! yields identical identifiers, so re-applying a policy updates the existing
//! one instead of creating a duplicate.

/// Capacity axis an autoscaling policy targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityDimension {
    Read,
    Write,
}

impl CapacityDimension {
    /// Both axes, read first.
    pub const ALL: [CapacityDimension; 2] = [CapacityDimension::Read, CapacityDimension::Write];

    /// The capacity-units suffix of the scalable dimension string.
    fn capacity_units(self) -> &'static str {
        match self {
            CapacityDimension::Read => "ReadCapacityUnits",
            CapacityDimension::Write => "WriteCapacityUnits",
        }
    }

    /// Predefined metric tracked by the target-tracking policy.
    pub fn metric_type(self) -> &'static str {
        match self {
            CapacityDimension::Read => "DynamoDBReadCapacityUtilization",
            CapacityDimension::Write => "DynamoDBWriteCapacityUtilization",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            CapacityDimension::Read => "read",
            CapacityDimension::Write => "write",
        }
    }
}

/// One scalable resource: the base table or a single index, on one capacity
/// axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingTarget {
    pub table: String,
    pub index: Option<String>,
    pub dimension: CapacityDimension,
}

impl ScalingTarget {
    /// Target the base table.
    pub fn table(table: impl Into<String>, dimension: CapacityDimension) -> Self {
        Self {
            table: table.into(),
            index: None,
            dimension,
        }
    }

    /// Target a secondary index.
    pub fn index(
        table: impl Into<String>,
        index: impl Into<String>,
        dimension: CapacityDimension,
    ) -> Self {
        Self {
            table: table.into(),
            index: Some(index.into()),
            dimension,
        }
    }

    /// `table/<name>` for the base table, `table/<name>/index/<index>` for an
    /// index.
    pub fn resource_id(&self) -> String {
        match &self.index {
            Some(index) => format!("table/{}/index/{}", self.table, index),
            None => format!("table/{}", self.table),
        }
    }

    /// `dynamodb:{table|index}:{Read|Write}CapacityUnits`.
    pub fn scalable_dimension(&self) -> String {
        let scope = if self.index.is_some() { "index" } else { "table" };
        format!("dynamodb:{}:{}", scope, self.dimension.capacity_units())
    }

    /// Deterministic policy name; together with the resource id it identifies
    /// the policy on the AWS side, so re-registration is an update.
    pub fn policy_name(&self) -> String {
        match &self.index {
            Some(index) => format!(
                "{}-index-{}-{}-capacity-scaling-policy",
                self.table,
                index,
                self.dimension.slug()
            ),
            None => format!(
                "{}-{}-capacity-scaling-policy",
                self.table,
                self.dimension.slug()
            ),
        }
    }

    /// Every (resource, dimension) pair for a table: the base table first, then
    /// each index in order, read before write within each resource.
    pub fn enumerate(table: &str, indexes: &[String]) -> Vec<ScalingTarget> {
        let mut targets = Vec::with_capacity((indexes.len() + 1) * 2);
        for dimension in CapacityDimension::ALL {
            targets.push(Self::table(table, dimension));
        }
        for index in indexes {
            for dimension in CapacityDimension::ALL {
                targets.push(Self::index(table, index, dimension));
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_table_has_no_index_segment() {
        for dimension in CapacityDimension::ALL {
            let target = ScalingTarget::table("orders", dimension);
            assert!(!target.resource_id().contains("/index/"));
            assert!(target.scalable_dimension().contains("table:"));
        }
    }

    #[test]
    fn index_target_ends_with_index_segment() {
        for dimension in CapacityDimension::ALL {
            let target = ScalingTarget::index("orders", "GSI_k", dimension);
            assert!(target.resource_id().ends_with("/index/GSI_k"));
            assert!(target.scalable_dimension().contains("index:"));
        }
    }

    #[test]
    fn krabber_table_write() {
        let target = ScalingTarget::table("krabber", CapacityDimension::Write);
        assert_eq!(target.resource_id(), "table/krabber");
        assert_eq!(
            target.scalable_dimension(),
            "dynamodb:table:WriteCapacityUnits"
        );
    }

    #[test]
    fn krabber_gsi3_read() {
        let target = ScalingTarget::index("krabber", "GSI3", CapacityDimension::Read);
        assert_eq!(target.resource_id(), "table/krabber/index/GSI3");
        assert_eq!(
            target.scalable_dimension(),
            "dynamodb:index:ReadCapacityUnits"
        );
    }

    #[test]
    fn policy_names_are_deterministic() {
        let a = ScalingTarget::index("krabber", "GSI7", CapacityDimension::Read);
        let b = ScalingTarget::index("krabber", "GSI7", CapacityDimension::Read);
        assert_eq!(a.policy_name(), b.policy_name());
        assert_eq!(
            a.policy_name(),
            "krabber-index-GSI7-read-capacity-scaling-policy"
        );

        let base = ScalingTarget::table("krabber", CapacityDimension::Write);
        assert_eq!(base.policy_name(), "krabber-write-capacity-scaling-policy");
    }

    #[test]
    fn enumeration_covers_every_pair_once() {
        let indexes: Vec<String> = (1..=10).map(|i| format!("GSI{i}")).collect();
        let targets = ScalingTarget::enumerate("krabber", &indexes);
        // (base table + 10 indexes) * 2 dimensions
        assert_eq!(targets.len(), 22);

        let mut resource_ids: Vec<String> = targets
            .iter()
            .map(|t| format!("{}#{}", t.resource_id(), t.scalable_dimension()))
            .collect();
        resource_ids.sort();
        resource_ids.dedup();
        assert_eq!(resource_ids.len(), 22);

        // Base table comes first so its capacity scales before the indexes.
        assert_eq!(targets[0].resource_id(), "table/krabber");
        assert_eq!(targets[0].dimension, CapacityDimension::Read);
        assert_eq!(targets[1].dimension, CapacityDimension::Write);
    }
}
