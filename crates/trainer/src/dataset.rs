//! German credit dataset loading

use crate::TrainingError;
use csv::{ReaderBuilder, Trim};
use feature_engine::Attribute;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Public location of the Statlog German credit data
pub const DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/statlog/german/german.data";

/// Feature column of the raw dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetColumn {
    Numeric(&'static str),
    Categorical(Attribute),
}

impl DatasetColumn {
    /// Column name as used in the training schema
    pub fn name(&self) -> &'static str {
        match self {
            DatasetColumn::Numeric(name) => name,
            DatasetColumn::Categorical(attribute) => attribute.column_prefix(),
        }
    }
}

/// The 20 feature columns in file order; the 21st field is the target
pub const DATASET_COLUMNS: [DatasetColumn; 20] = [
    DatasetColumn::Categorical(Attribute::CheckingAccount),
    DatasetColumn::Numeric("duration"),
    DatasetColumn::Categorical(Attribute::CreditHistory),
    DatasetColumn::Categorical(Attribute::Purpose),
    DatasetColumn::Numeric("credit_amount"),
    DatasetColumn::Categorical(Attribute::SavingsAccount),
    DatasetColumn::Categorical(Attribute::PresentEmployment),
    DatasetColumn::Numeric("installment_rate"),
    DatasetColumn::Categorical(Attribute::PersonalStatus),
    DatasetColumn::Categorical(Attribute::OtherDebtors),
    DatasetColumn::Numeric("present_residence_since"),
    DatasetColumn::Categorical(Attribute::Property),
    DatasetColumn::Numeric("age"),
    DatasetColumn::Categorical(Attribute::OtherInstallmentPlans),
    DatasetColumn::Categorical(Attribute::Housing),
    DatasetColumn::Numeric("number_of_existing_credits"),
    DatasetColumn::Categorical(Attribute::Job),
    DatasetColumn::Numeric("number_of_people_liable"),
    DatasetColumn::Categorical(Attribute::Telephone),
    DatasetColumn::Categorical(Attribute::ForeignWorker),
];

/// Parsed field of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Code(&'static str),
}

/// One applicant row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Values aligned with [`DATASET_COLUMNS`]
    pub fields: Vec<FieldValue>,
    /// 1 creditworthy, 0 bad risk
    pub target: u8,
}

impl Record {
    /// Parse the 21 raw fields of a dataset line
    pub fn parse(raw: &[&str], line: usize) -> Result<Self, TrainingError> {
        let err = |message: String| TrainingError::Dataset { line, message };

        if raw.len() != DATASET_COLUMNS.len() + 1 {
            return Err(err(format!(
                "expected {} fields, found {}",
                DATASET_COLUMNS.len() + 1,
                raw.len()
            )));
        }

        let fields = DATASET_COLUMNS
            .iter()
            .zip(raw)
            .map(|(column, value)| match column {
                DatasetColumn::Numeric(name) => value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(FieldValue::Number)
                    .ok_or_else(|| err(format!("{name} is not a number: {value:?}"))),
                DatasetColumn::Categorical(attribute) => attribute
                    .codes()
                    .iter()
                    .find(|code| *code == value)
                    .map(|code| FieldValue::Code(*code))
                    .ok_or_else(|| err(format!("unknown {} code {value:?}", attribute.column_prefix()))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // 1 = good, 2 = bad
        let target = match raw[DATASET_COLUMNS.len()] {
            "1" => 1,
            "2" => 0,
            other => return Err(err(format!("unknown creditworthiness {other:?}"))),
        };

        Ok(Self { fields, target })
    }

    /// Code recorded for a categorical attribute
    pub fn code(&self, attribute: Attribute) -> Option<&'static str> {
        DATASET_COLUMNS
            .iter()
            .zip(&self.fields)
            .find_map(|(column, value)| match (column, value) {
                (DatasetColumn::Categorical(a), FieldValue::Code(code)) if *a == attribute => Some(*code),
                _ => None,
            })
    }

    /// Value of a numeric column
    pub fn number(&self, name: &str) -> Option<f64> {
        DATASET_COLUMNS
            .iter()
            .zip(&self.fields)
            .find_map(|(column, value)| match (column, value) {
                (DatasetColumn::Numeric(n), FieldValue::Number(v)) if *n == name => Some(*v),
                _ => None,
            })
    }
}

/// All records of the dataset
#[derive(Debug, Clone, Default)]
pub struct CreditDataset {
    pub records: Vec<Record>,
}

impl CreditDataset {
    /// Parse whitespace separated rows
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TrainingError> {
        let mut csv = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in csv.records().enumerate() {
            let row = row?;
            // Runs of spaces show up as empty fields
            let raw: Vec<&str> = row.iter().filter(|f| !f.is_empty()).collect();
            if raw.is_empty() {
                continue;
            }
            records.push(Record::parse(&raw, idx + 1)?);
        }

        if records.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        debug!("Parsed {} dataset records", records.len());
        Ok(Self { records })
    }

    /// Read a local copy of the dataset
    pub fn from_path(path: &Path) -> Result<Self, TrainingError> {
        info!("Reading dataset from {}", path.display());
        Self::from_reader(fs::File::open(path)?)
    }

    /// Download the dataset, optionally caching the raw text
    pub fn download(url: &str, cache: Option<&Path>) -> Result<Self, TrainingError> {
        info!("Downloading dataset from {}", url);
        let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
        if let Some(path) = cache {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &body)?;
            info!("Cached dataset at {}", path.display());
        }
        Self::from_reader(body.as_bytes())
    }

    /// Local file when present, download otherwise
    pub fn load(path: Option<&Path>, url: &str) -> Result<Self, TrainingError> {
        match path {
            Some(path) if path.is_file() => Self::from_path(path),
            _ => Self::download(url, path),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Targets in record order
    pub fn targets(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.target).collect()
    }
}
