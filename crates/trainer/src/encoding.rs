//! Drop-first one-hot encoding of the raw dataset

use crate::dataset::{CreditDataset, DatasetColumn, FieldValue, Record, DATASET_COLUMNS};
use crate::TrainingError;
use feature_engine::{Attribute, TrainingColumnSchema};
use ndarray::Array2;
use std::collections::BTreeSet;
use tracing::debug;

/// How one raw field lands in the encoded row
#[derive(Debug, Clone)]
enum Slot {
    Numeric { field: usize },
    Indicators {
        field: usize,
        attribute: Attribute,
        codes: Vec<&'static str>,
    },
}

/// Encoder whose column layout is learned from the observed categories
///
/// Numeric columns come first in file order. Each categorical column then
/// contributes one indicator per observed code except the lexicographically
/// smallest, which is dropped.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    slots: Vec<Slot>,
    schema: TrainingColumnSchema,
}

/// Encoded feature matrix with its column schema
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub schema: TrainingColumnSchema,
    pub features: Array2<f64>,
    pub targets: Vec<u8>,
}

impl OneHotEncoder {
    /// Learn the column layout from a dataset
    pub fn fit(dataset: &CreditDataset) -> Result<Self, TrainingError> {
        if dataset.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let mut numeric = Vec::new();
        let mut indicators = Vec::new();
        for (field, column) in DATASET_COLUMNS.iter().enumerate() {
            match column {
                DatasetColumn::Numeric(_) => numeric.push(Slot::Numeric { field }),
                DatasetColumn::Categorical(attribute) => {
                    let observed: BTreeSet<&'static str> = dataset
                        .records
                        .iter()
                        .filter_map(|record| record.code(*attribute))
                        .collect();
                    let codes: Vec<&'static str> = observed.into_iter().skip(1).collect();
                    debug!("{}: {} indicator column(s)", attribute.column_prefix(), codes.len());
                    indicators.push(Slot::Indicators {
                        field,
                        attribute: *attribute,
                        codes,
                    });
                }
            }
        }

        let slots: Vec<Slot> = numeric.into_iter().chain(indicators).collect();
        let columns = slots
            .iter()
            .flat_map(|slot| match slot {
                Slot::Numeric { field } => vec![DATASET_COLUMNS[*field].name().to_string()],
                Slot::Indicators {
                    attribute, codes, ..
                } => codes.iter().map(|code| attribute.indicator_column(code)).collect(),
            })
            .collect();

        Ok(Self {
            slots,
            schema: TrainingColumnSchema::new(columns)?,
        })
    }

    /// Learned column layout
    pub fn schema(&self) -> &TrainingColumnSchema {
        &self.schema
    }

    /// Encode one record into a row of `schema().len()` values
    pub fn transform(&self, record: &Record) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.schema.len());
        for slot in &self.slots {
            match slot {
                Slot::Numeric { field } => row.push(match record.fields[*field] {
                    FieldValue::Number(value) => value,
                    FieldValue::Code(_) => 0.0,
                }),
                Slot::Indicators { field, codes, .. } => {
                    let value = record.fields[*field];
                    row.extend(codes.iter().map(|code| {
                        if value == FieldValue::Code(*code) {
                            1.0
                        } else {
                            0.0
                        }
                    }));
                }
            }
        }
        row
    }

    /// Encode every record into a feature matrix
    pub fn encode(&self, dataset: &CreditDataset) -> Result<EncodedDataset, TrainingError> {
        let width = self.schema.len();
        let values: Vec<f64> = dataset
            .records
            .iter()
            .flat_map(|record| self.transform(record))
            .collect();
        let features = Array2::from_shape_vec((dataset.len(), width), values)?;
        Ok(EncodedDataset {
            schema: self.schema.clone(),
            features,
            targets: dataset.targets(),
        })
    }
}
