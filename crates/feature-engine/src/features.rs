//! Feature Vector Assembly

use crate::mapping::{Attribute, CategoryMapping};
use crate::profile::ApplicantProfile;
use crate::schema::TrainingColumnSchema;
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Numeric columns every training schema must carry
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "age",
    "duration",
    "credit_amount",
    "installment_rate",
    "present_residence_since",
    "number_of_existing_credits",
    "number_of_people_liable",
];

/// Numeric attributes not collected from the applicant
pub const FIXED_NUMERIC_DEFAULTS: [(&str, f64); 4] = [
    ("installment_rate", 4.0),
    ("present_residence_since", 4.0),
    ("number_of_existing_credits", 1.0),
    ("number_of_people_liable", 1.0),
];

/// Indicator set for each categorical attribute not collected from the applicant
pub const UNEXPOSED_DEFAULTS: [(Attribute, &str); 7] = [
    (Attribute::Property, "A122"),
    (Attribute::PresentEmployment, "A75"),
    (Attribute::OtherDebtors, "A101"),
    (Attribute::OtherInstallmentPlans, "A143"),
    (Attribute::Housing, "A152"),
    (Attribute::Telephone, "A191"),
    (Attribute::ForeignWorker, "A201"),
];

/// Feature row aligned with the training schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// One value per schema column, in schema order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero row of the given width
    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0.0; width],
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// How an indicator column was handled for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    /// Column present and set to 1
    Applied,
    /// Column dropped at training time as the reference level; all zeros
    /// encode it
    Baseline,
    /// Column absent although the schema should carry it
    Missing,
}

/// Trace of a single indicator write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorOutcome {
    pub attribute: Attribute,
    pub code: &'static str,
    pub column: String,
    pub status: IndicatorStatus,
}

/// Feature vector together with the indicator trace that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFeatures {
    pub vector: FeatureVector,
    pub indicators: Vec<IndicatorOutcome>,
}

impl BuiltFeatures {
    /// Columns that were set to 1
    pub fn applied_columns(&self) -> impl Iterator<Item = &str> {
        self.with_status(IndicatorStatus::Applied)
    }

    /// Columns that could not be written
    pub fn missing_columns(&self) -> impl Iterator<Item = &str> {
        self.with_status(IndicatorStatus::Missing)
    }

    fn with_status(&self, status: IndicatorStatus) -> impl Iterator<Item = &str> {
        self.indicators
            .iter()
            .filter(move |outcome| outcome.status == status)
            .map(|outcome| outcome.column.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct NumericSlots {
    age: usize,
    duration: usize,
    credit_amount: usize,
}

/// Builds feature vectors for a fixed training schema
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    schema: TrainingColumnSchema,
    numeric: NumericSlots,
    fixed: Vec<(usize, f64)>,
    /// Level drop-first removed, per attribute with indicator columns
    dropped_levels: HashMap<Attribute, &'static str>,
}

impl FeatureBuilder {
    /// Create a builder, failing if any numeric column is absent
    pub fn new(schema: TrainingColumnSchema) -> Result<Self, FeatureError> {
        let missing: Vec<String> = NUMERIC_COLUMNS
            .iter()
            .filter(|column| !schema.contains(column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FeatureError::SchemaMismatch { missing });
        }

        let slot = |column: &str| schema.position(column).unwrap_or_default();
        let numeric = NumericSlots {
            age: slot("age"),
            duration: slot("duration"),
            credit_amount: slot("credit_amount"),
        };
        let fixed = FIXED_NUMERIC_DEFAULTS
            .iter()
            .map(|(column, value)| (slot(column), *value))
            .collect();

        let dropped_levels = Attribute::EXPOSED
            .iter()
            .chain(Attribute::UNEXPOSED.iter())
            .filter_map(|attribute| Some((*attribute, infer_dropped_level(&schema, *attribute)?)))
            .collect();

        debug!("Feature builder ready for {} columns", schema.len());

        Ok(Self {
            schema,
            numeric,
            fixed,
            dropped_levels,
        })
    }

    /// Schema the builder aligns with
    pub fn schema(&self) -> &TrainingColumnSchema {
        &self.schema
    }

    /// Code whose indicator column drop-first removed for `attribute`
    pub fn dropped_level(&self, attribute: Attribute) -> Option<&'static str> {
        self.dropped_levels.get(&attribute).copied()
    }

    /// Assemble the feature vector for an applicant
    pub fn build(&self, profile: &ApplicantProfile) -> Result<BuiltFeatures, FeatureError> {
        let mut vector = FeatureVector::zeros(self.schema.len());
        let values = &mut vector.values;

        values[self.numeric.age] = f64::from(profile.age);
        values[self.numeric.duration] = f64::from(profile.duration_months);
        values[self.numeric.credit_amount] = profile.credit_amount;
        for (idx, value) in &self.fixed {
            values[*idx] = *value;
        }

        let mut indicators = Vec::with_capacity(Attribute::EXPOSED.len() + UNEXPOSED_DEFAULTS.len());

        for attribute in Attribute::EXPOSED {
            let label = profile.selection(attribute).unwrap_or_default();
            let code = match CategoryMapping::for_attribute(attribute) {
                Some(mapping) => mapping.encode(label)?,
                None => continue,
            };
            indicators.push(self.set_indicator(values, attribute, code));
        }

        for (attribute, code) in UNEXPOSED_DEFAULTS {
            indicators.push(self.set_indicator(values, attribute, code));
        }

        for outcome in indicators.iter().filter(|o| o.status == IndicatorStatus::Missing) {
            warn!(
                column = %outcome.column,
                attribute = %outcome.attribute,
                "Indicator column absent from training schema, selection has no effect"
            );
        }

        Ok(BuiltFeatures { vector, indicators })
    }

    /// Classify an indicator column against the schema without writing it
    pub fn classify(&self, attribute: Attribute, code: &'static str) -> IndicatorOutcome {
        let column = attribute.indicator_column(code);
        let status = if self.schema.contains(&column) {
            IndicatorStatus::Applied
        } else if self.dropped_level(attribute) == Some(code) {
            IndicatorStatus::Baseline
        } else {
            IndicatorStatus::Missing
        };
        IndicatorOutcome {
            attribute,
            code,
            column,
            status,
        }
    }

    fn set_indicator(&self, values: &mut [f64], attribute: Attribute, code: &'static str) -> IndicatorOutcome {
        let outcome = self.classify(attribute, code);
        if let Some(idx) = self.schema.position(&outcome.column) {
            values[idx] = 1.0;
        }
        outcome
    }
}

/// The absent code sorting immediately before the attribute's first column
///
/// Drop-first removes the smallest code seen at training time, which is
/// also the smallest code that could have had a column. Codes absent further
/// down were never seen. `None` when the attribute has no columns or the
/// smallest code kept its column.
fn infer_dropped_level(schema: &TrainingColumnSchema, attribute: Attribute) -> Option<&'static str> {
    let codes = attribute.codes();
    let first_kept = codes
        .iter()
        .position(|code| schema.contains(&attribute.indicator_column(code)))?;
    first_kept.checked_sub(1).map(|idx| codes[idx])
}
