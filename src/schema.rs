//! The krabber table layout.
//!
//! Single-table design: every item lives under a PK/SK pair, and ten global
//! secondary indexes (GSI1..GSI10) provide the alternate access paths. All key
//! attributes are strings and every index projects the full item.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType,
};

use crate::errors::ProvisionError;

/// Default table name.
pub const TABLE_NAME: &str = "krabber";

/// Number of global secondary indexes.
pub const INDEX_COUNT: u32 = 10;

/// Provisioned throughput floor shared by the table and each index.
pub const READ_CAPACITY_UNITS: i64 = 1;
pub const WRITE_CAPACITY_UNITS: i64 = 1;

/// Table layout: name plus the number of GSI ordinals to generate.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table_name: String,
    pub index_count: u32,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new(TABLE_NAME)
    }
}

impl TableSchema {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_count: INDEX_COUNT,
        }
    }

    /// Index names in ordinal order: GSI1..GSI{n}.
    pub fn index_names(&self) -> Vec<String> {
        (1..=self.index_count).map(|i| format!("GSI{i}")).collect()
    }

    /// Names of every key attribute: the primary pair plus one PK/SK pair per
    /// index.
    pub fn key_attribute_names(&self) -> Vec<String> {
        let mut names = vec!["PK".to_string(), "SK".to_string()];
        for i in 1..=self.index_count {
            names.push(format!("GSI{i}PK"));
            names.push(format!("GSI{i}SK"));
        }
        names
    }

    /// Attribute type declarations for every key attribute (all strings).
    pub fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>, ProvisionError> {
        self.key_attribute_names()
            .into_iter()
            .map(|name| {
                AttributeDefinition::builder()
                    .attribute_name(name)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(ProvisionError::from)
            })
            .collect()
    }

    /// Key schema of the base table: PK HASH, SK RANGE.
    pub fn primary_key_schema(&self) -> Result<Vec<KeySchemaElement>, ProvisionError> {
        Self::key_schema("PK", "SK")
    }

    /// Definitions for every index, each keyed on its own PK/SK pair with full
    /// projection and the shared throughput floor.
    pub fn global_secondary_indexes(&self) -> Result<Vec<GlobalSecondaryIndex>, ProvisionError> {
        (1..=self.index_count)
            .map(|i| {
                let index = GlobalSecondaryIndex::builder()
                    .index_name(format!("GSI{i}"))
                    .set_key_schema(Some(Self::key_schema(
                        &format!("GSI{i}PK"),
                        &format!("GSI{i}SK"),
                    )?))
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .provisioned_throughput(Self::throughput()?)
                    .build()?;
                Ok(index)
            })
            .collect()
    }

    /// 1 RCU / 1 WCU; autoscaling raises capacity from this floor.
    pub fn throughput() -> Result<ProvisionedThroughput, ProvisionError> {
        ProvisionedThroughput::builder()
            .read_capacity_units(READ_CAPACITY_UNITS)
            .write_capacity_units(WRITE_CAPACITY_UNITS)
            .build()
            .map_err(ProvisionError::from)
    }

    fn key_schema(hash: &str, range: &str) -> Result<Vec<KeySchemaElement>, ProvisionError> {
        Ok(vec![
            KeySchemaElement::builder()
                .attribute_name(hash)
                .key_type(KeyType::Hash)
                .build()?,
            KeySchemaElement::builder()
                .attribute_name(range)
                .key_type(KeyType::Range)
                .build()?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_targets_krabber() {
        let schema = TableSchema::default();
        assert_eq!(schema.table_name, "krabber");
        assert_eq!(schema.index_count, 10);
    }

    #[test]
    fn index_names_are_ordinal() {
        let schema = TableSchema::default();
        let names = schema.index_names();
        assert_eq!(names.len(), 10);
        assert_eq!(names.first().map(String::as_str), Some("GSI1"));
        assert_eq!(names.last().map(String::as_str), Some("GSI10"));
    }

    #[test]
    fn key_attributes_cover_primary_and_every_index() {
        let schema = TableSchema::default();
        let names = schema.key_attribute_names();
        // PK + SK + 10 * (GSIkPK + GSIkSK)
        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "PK");
        assert_eq!(names[1], "SK");
        assert!(names.contains(&"GSI1PK".to_string()));
        assert!(names.contains(&"GSI10SK".to_string()));
    }

    #[test]
    fn builders_produce_one_definition_per_key_attribute() {
        let schema = TableSchema::default();
        let definitions = schema.attribute_definitions().unwrap();
        assert_eq!(definitions.len(), 22);
        assert_eq!(schema.primary_key_schema().unwrap().len(), 2);
        assert_eq!(schema.global_secondary_indexes().unwrap().len(), 10);
    }
}
