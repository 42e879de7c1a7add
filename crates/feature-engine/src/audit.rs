//! Startup comparison of expected indicator columns against a training schema

use crate::features::{FeatureBuilder, IndicatorStatus, NUMERIC_COLUMNS, UNEXPOSED_DEFAULTS};
use crate::mapping::{Attribute, CategoryMapping};
use serde::Serialize;
use tracing::{info, warn};

/// Which expected indicator columns a schema can and cannot represent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaAudit {
    /// Indicator columns found in the schema
    pub present: Vec<String>,
    /// Reference levels dropped at training time
    pub baseline: Vec<String>,
    /// Indicator columns the builder writes but the schema lacks
    pub missing: Vec<String>,
    /// Schema columns that are neither numeric nor a known indicator
    pub unrecognized: Vec<String>,
}

impl SchemaAudit {
    /// Whether every expected column can be represented
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unrecognized.is_empty()
    }

    /// Emit the audit through tracing
    pub fn log(&self) {
        info!(
            present = self.present.len(),
            baseline = self.baseline.len(),
            missing = self.missing.len(),
            unrecognized = self.unrecognized.len(),
            "Training schema audit"
        );
        for column in &self.missing {
            warn!(%column, "Expected indicator column missing from training schema");
        }
        for column in &self.unrecognized {
            warn!(%column, "Training schema column not produced by any known attribute");
        }
    }
}

impl FeatureBuilder {
    /// Compare every indicator the builder may write against the schema
    pub fn audit(&self) -> SchemaAudit {
        let mut audit = SchemaAudit::default();

        let selectable = Attribute::EXPOSED
            .iter()
            .filter_map(|attribute| CategoryMapping::for_attribute(*attribute))
            .flat_map(|mapping| {
                let attribute = mapping.attribute();
                mapping.entries().iter().map(move |(_, code)| (attribute, *code))
            });

        for (attribute, code) in selectable.chain(UNEXPOSED_DEFAULTS) {
            let outcome = self.classify(attribute, code);
            let bucket = match outcome.status {
                IndicatorStatus::Applied => &mut audit.present,
                IndicatorStatus::Baseline => &mut audit.baseline,
                IndicatorStatus::Missing => &mut audit.missing,
            };
            bucket.push(outcome.column);
        }

        audit.unrecognized = self
            .schema()
            .columns()
            .iter()
            .filter(|column| {
                !NUMERIC_COLUMNS.contains(&column.as_str()) && Attribute::parse_column(column).is_none()
            })
            .cloned()
            .collect();

        audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{reference_columns, TrainingColumnSchema};

    fn builder_for(columns: Vec<String>) -> FeatureBuilder {
        FeatureBuilder::new(TrainingColumnSchema::new(columns).unwrap()).unwrap()
    }

    #[test]
    fn test_reference_schema_is_clean() {
        let audit = builder_for(reference_columns()).audit();
        assert!(audit.is_clean(), "{audit:?}");
        // One dropped reference level per exposed attribute, plus three defaults
        assert_eq!(
            audit.baseline,
            [
                "personal_status_sex_A91",
                "job_A171",
                "purpose_A40",
                "credit_history_A30",
                "existing_checking_account_A11",
                "savings_account_A61",
                "other_debtors_guarantors_A101",
                "telephone_A191",
                "foreign_worker_A201",
            ]
        );
        // 31 selectable labels + 7 defaults
        assert_eq!(audit.present.len() + audit.baseline.len(), 38);
    }

    #[test]
    fn test_missing_and_unrecognized_columns() {
        let mut columns: Vec<String> = reference_columns()
            .into_iter()
            .filter(|c| c != "purpose_A49" && c != "housing_A152")
            .collect();
        columns.push("loan_officer_notes".to_string());
        let audit = builder_for(columns).audit();

        assert!(!audit.is_clean());
        assert_eq!(audit.missing, ["purpose_A49", "housing_A152"]);
        assert_eq!(audit.unrecognized, ["loan_officer_notes"]);
    }
}
