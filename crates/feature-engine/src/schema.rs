//! Training Column Schema

use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column layout produced by drop-first one-hot encoding of the full
/// German credit dataset (48 columns).
const REFERENCE_COLUMNS: [&str; 48] = [
    "duration",
    "credit_amount",
    "installment_rate",
    "present_residence_since",
    "age",
    "number_of_existing_credits",
    "number_of_people_liable",
    "existing_checking_account_A12",
    "existing_checking_account_A13",
    "existing_checking_account_A14",
    "credit_history_A31",
    "credit_history_A32",
    "credit_history_A33",
    "credit_history_A34",
    "purpose_A41",
    "purpose_A410",
    "purpose_A42",
    "purpose_A43",
    "purpose_A44",
    "purpose_A45",
    "purpose_A46",
    "purpose_A48",
    "purpose_A49",
    "savings_account_A62",
    "savings_account_A63",
    "savings_account_A64",
    "savings_account_A65",
    "present_employment_A72",
    "present_employment_A73",
    "present_employment_A74",
    "present_employment_A75",
    "personal_status_sex_A92",
    "personal_status_sex_A93",
    "personal_status_sex_A94",
    "other_debtors_guarantors_A102",
    "other_debtors_guarantors_A103",
    "property_A122",
    "property_A123",
    "property_A124",
    "other_installment_plans_A142",
    "other_installment_plans_A143",
    "housing_A152",
    "housing_A153",
    "job_A172",
    "job_A173",
    "job_A174",
    "telephone_A192",
    "foreign_worker_A202",
];

/// Columns a model trained on the complete dataset expects
pub fn reference_columns() -> Vec<String> {
    REFERENCE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Ordered feature columns frozen at training time
///
/// Serialized as a plain JSON array of column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TrainingColumnSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TrainingColumnSchema {
    /// Create a schema, rejecting duplicate column names
    pub fn new(columns: Vec<String>) -> Result<Self, FeatureError> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), idx).is_some() {
                return Err(FeatureError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self { columns, positions })
    }

    /// Parse a schema from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of a column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Whether a column is part of the schema
    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }
}

impl TryFrom<Vec<String>> for TrainingColumnSchema {
    type Error = FeatureError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<TrainingColumnSchema> for Vec<String> {
    fn from(schema: TrainingColumnSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_order() {
        let schema = TrainingColumnSchema::new(reference_columns()).unwrap();
        assert_eq!(schema.len(), 48);
        assert_eq!(schema.position("duration"), Some(0));
        assert_eq!(schema.position("age"), Some(4));
        assert_eq!(schema.position("foreign_worker_A202"), Some(47));
        assert!(!schema.contains("foreign_worker_A201"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let columns = vec!["age".to_string(), "duration".to_string(), "age".to_string()];
        assert_eq!(
            TrainingColumnSchema::new(columns).unwrap_err(),
            FeatureError::DuplicateColumn("age".to_string())
        );
    }

    #[test]
    fn test_json_form_is_plain_array() {
        let schema = TrainingColumnSchema::from_json(r#"["age", "duration", "job_A173"]"#).unwrap();
        assert_eq!(schema.columns(), ["age", "duration", "job_A173"]);
        assert_eq!(schema.position("job_A173"), Some(2));

        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["age","duration","job_A173"]"#);
    }

    #[test]
    fn test_json_with_duplicates_fails() {
        assert!(TrainingColumnSchema::from_json(r#"["age", "age"]"#).is_err());
    }
}
