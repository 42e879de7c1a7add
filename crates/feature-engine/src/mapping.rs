//! Category Encoding
//!
//! Display labels offered to the applicant and the dataset codes they stand
//! for. Codes are the fixed values used by the German credit dataset.

use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credit history label that triggers the unconditional decline rule
pub const CRITICAL_CREDIT_HISTORY: &str = "Critical account / Other loans existing";

const PERSONAL_STATUS: &[(&str, &str)] = &[
    ("Male: Single", "A93"),
    ("Female: Divorced/Separated/Married", "A92"),
    ("Male: Married/Widowed", "A94"),
    ("Male: Divorced/Separated", "A91"),
];

const JOB: &[(&str, &str)] = &[
    ("Skilled Employee / Salaried", "A173"),
    ("Unskilled - Resident", "A172"),
    ("Management / Self-employed / Professional", "A174"),
    ("Unemployed / Unskilled", "A171"),
];

const PURPOSE: &[(&str, &str)] = &[
    ("New Car", "A40"),
    ("Used Car", "A41"),
    ("Furniture/Equipment", "A42"),
    ("Electronics/TV", "A43"),
    ("Home Appliances", "A44"),
    ("Repairs", "A45"),
    ("Education", "A46"),
    ("Business", "A49"),
    ("Other", "A410"),
];

const CREDIT_HISTORY: &[(&str, &str)] = &[
    ("All existing loans paid back on time", "A32"),
    (CRITICAL_CREDIT_HISTORY, "A34"),
    ("Delay in paying loans in the past", "A33"),
    ("All loans at this bank paid back on time", "A31"),
    ("No previous loans / All loans paid back", "A30"),
];

const CHECKING_ACCOUNT: &[(&str, &str)] = &[
    ("No Checking Account", "A14"),
    ("< ₹0 Balance", "A11"),
    ("₹0 to ₹20,000 Balance", "A12"),
    (">= ₹20,000 Balance", "A13"),
];

const SAVINGS_ACCOUNT: &[(&str, &str)] = &[
    ("Unknown / No Savings Account", "A65"),
    ("< ₹10,000", "A61"),
    ("₹10,000 to ₹50,000", "A62"),
    ("₹50,000 to ₹1,00,000", "A63"),
    (">= ₹1,00,000", "A64"),
];

/// Categorical attribute of the German credit dataset
///
/// The first six are selectable by the applicant, the remaining seven are
/// filled with fixed defaults during feature assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    PersonalStatus,
    Job,
    Purpose,
    CreditHistory,
    CheckingAccount,
    SavingsAccount,
    PresentEmployment,
    OtherDebtors,
    Property,
    OtherInstallmentPlans,
    Housing,
    Telephone,
    ForeignWorker,
}

impl Attribute {
    /// Attributes the applicant selects
    pub const EXPOSED: [Attribute; 6] = [
        Attribute::PersonalStatus,
        Attribute::Job,
        Attribute::Purpose,
        Attribute::CreditHistory,
        Attribute::CheckingAccount,
        Attribute::SavingsAccount,
    ];

    /// Attributes filled with fixed defaults
    pub const UNEXPOSED: [Attribute; 7] = [
        Attribute::PresentEmployment,
        Attribute::OtherDebtors,
        Attribute::Property,
        Attribute::OtherInstallmentPlans,
        Attribute::Housing,
        Attribute::Telephone,
        Attribute::ForeignWorker,
    ];

    /// Dataset column name, used as the indicator column prefix
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Attribute::PersonalStatus => "personal_status_sex",
            Attribute::Job => "job",
            Attribute::Purpose => "purpose",
            Attribute::CreditHistory => "credit_history",
            Attribute::CheckingAccount => "existing_checking_account",
            Attribute::SavingsAccount => "savings_account",
            Attribute::PresentEmployment => "present_employment",
            Attribute::OtherDebtors => "other_debtors_guarantors",
            Attribute::Property => "property",
            Attribute::OtherInstallmentPlans => "other_installment_plans",
            Attribute::Housing => "housing",
            Attribute::Telephone => "telephone",
            Attribute::ForeignWorker => "foreign_worker",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Attribute::PersonalStatus => "Personal Status & Sex",
            Attribute::Job => "Job Type",
            Attribute::Purpose => "Purpose of Loan",
            Attribute::CreditHistory => "Credit History",
            Attribute::CheckingAccount => "Checking Account Status",
            Attribute::SavingsAccount => "Savings Account / Deposits",
            Attribute::PresentEmployment => "Present Employment Since",
            Attribute::OtherDebtors => "Other Debtors / Guarantors",
            Attribute::Property => "Property",
            Attribute::OtherInstallmentPlans => "Other Installment Plans",
            Attribute::Housing => "Housing",
            Attribute::Telephone => "Telephone",
            Attribute::ForeignWorker => "Foreign Worker",
        }
    }

    /// Every code the dataset defines for this attribute, in lexicographic order
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            Attribute::PersonalStatus => &["A91", "A92", "A93", "A94", "A95"],
            Attribute::Job => &["A171", "A172", "A173", "A174"],
            Attribute::Purpose => &[
                "A40", "A41", "A410", "A42", "A43", "A44", "A45", "A46", "A47", "A48", "A49",
            ],
            Attribute::CreditHistory => &["A30", "A31", "A32", "A33", "A34"],
            Attribute::CheckingAccount => &["A11", "A12", "A13", "A14"],
            Attribute::SavingsAccount => &["A61", "A62", "A63", "A64", "A65"],
            Attribute::PresentEmployment => &["A71", "A72", "A73", "A74", "A75"],
            Attribute::OtherDebtors => &["A101", "A102", "A103"],
            Attribute::Property => &["A121", "A122", "A123", "A124"],
            Attribute::OtherInstallmentPlans => &["A141", "A142", "A143"],
            Attribute::Housing => &["A151", "A152", "A153"],
            Attribute::Telephone => &["A191", "A192"],
            Attribute::ForeignWorker => &["A201", "A202"],
        }
    }

    /// Level dropped by drop-first one-hot encoding when training data covers
    /// every code
    ///
    /// Categories are sorted as strings before the first one is dropped, so
    /// this is the lexicographically smallest code.
    pub fn reference_code(&self) -> &'static str {
        self.codes()[0]
    }

    /// Whether the applicant selects this attribute
    pub fn is_exposed(&self) -> bool {
        Self::EXPOSED.contains(self)
    }

    /// Indicator column name for a code of this attribute
    pub fn indicator_column(&self, code: &str) -> String {
        format!("{}_{}", self.column_prefix(), code)
    }

    /// Attribute and code encoded in an indicator column name
    pub fn parse_column(column: &str) -> Option<(Attribute, &'static str)> {
        Self::EXPOSED
            .iter()
            .chain(Self::UNEXPOSED.iter())
            .find_map(|attribute| {
                let code = column
                    .strip_prefix(attribute.column_prefix())?
                    .strip_prefix('_')?;
                attribute
                    .codes()
                    .iter()
                    .find(|known| **known == code)
                    .map(|known| (*attribute, *known))
            })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable label-to-code table for one selectable attribute
#[derive(Debug, Clone, Copy)]
pub struct CategoryMapping {
    attribute: Attribute,
    entries: &'static [(&'static str, &'static str)],
}

impl CategoryMapping {
    /// Mapping for a selectable attribute, `None` for defaulted ones
    pub fn for_attribute(attribute: Attribute) -> Option<Self> {
        let entries = match attribute {
            Attribute::PersonalStatus => PERSONAL_STATUS,
            Attribute::Job => JOB,
            Attribute::Purpose => PURPOSE,
            Attribute::CreditHistory => CREDIT_HISTORY,
            Attribute::CheckingAccount => CHECKING_ACCOUNT,
            Attribute::SavingsAccount => SAVINGS_ACCOUNT,
            _ => return None,
        };
        Some(Self { attribute, entries })
    }

    /// Attribute this mapping belongs to
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Display labels in presentation order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(label, _)| *label)
    }

    /// `(label, code)` pairs in presentation order
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Dataset code for a display label
    pub fn encode(&self, label: &str) -> Result<&'static str, FeatureError> {
        self.entries
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, code)| *code)
            .ok_or_else(|| FeatureError::UnknownCategory {
                attribute: self.attribute,
                label: label.to_string(),
            })
    }
}

/// Encode a display label of an attribute into its dataset code
pub fn encode(attribute: Attribute, label: &str) -> Result<&'static str, FeatureError> {
    match CategoryMapping::for_attribute(attribute) {
        Some(mapping) => mapping.encode(label),
        None => Err(FeatureError::UnknownCategory {
            attribute,
            label: label.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_labels() {
        assert_eq!(encode(Attribute::PersonalStatus, "Male: Single").unwrap(), "A93");
        assert_eq!(encode(Attribute::Job, "Unemployed / Unskilled").unwrap(), "A171");
        assert_eq!(encode(Attribute::Purpose, "Other").unwrap(), "A410");
        assert_eq!(encode(Attribute::CreditHistory, CRITICAL_CREDIT_HISTORY).unwrap(), "A34");
        assert_eq!(encode(Attribute::CheckingAccount, "< ₹0 Balance").unwrap(), "A11");
        assert_eq!(
            encode(Attribute::SavingsAccount, "Unknown / No Savings Account").unwrap(),
            "A65"
        );
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = encode(Attribute::Job, "Astronaut").unwrap_err();
        assert_eq!(
            err,
            FeatureError::UnknownCategory {
                attribute: Attribute::Job,
                label: "Astronaut".to_string(),
            }
        );
    }

    #[test]
    fn test_defaulted_attribute_has_no_mapping() {
        assert!(CategoryMapping::for_attribute(Attribute::Housing).is_none());
        assert!(encode(Attribute::Housing, "Own").is_err());
    }

    #[test]
    fn test_mapped_codes_are_dataset_codes() {
        for attribute in Attribute::EXPOSED {
            let mapping = CategoryMapping::for_attribute(attribute).unwrap();
            for (label, code) in mapping.entries() {
                assert!(
                    attribute.codes().contains(code),
                    "{label} maps to {code}, not a {attribute} code"
                );
            }
        }
    }

    #[test]
    fn test_codes_are_unique_per_mapping() {
        for attribute in Attribute::EXPOSED {
            let mapping = CategoryMapping::for_attribute(attribute).unwrap();
            let mut codes: Vec<_> = mapping.entries().iter().map(|(_, c)| *c).collect();
            let total = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), total, "{attribute} has duplicate codes");
        }
    }

    #[test]
    fn test_reference_code_is_smallest_string() {
        assert_eq!(Attribute::Purpose.reference_code(), "A40");
        assert_eq!(Attribute::Telephone.reference_code(), "A191");
        for attribute in Attribute::EXPOSED.iter().chain(Attribute::UNEXPOSED.iter()) {
            let smallest = attribute.codes().iter().min().unwrap();
            assert_eq!(attribute.reference_code(), *smallest);
        }
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(
            Attribute::parse_column("purpose_A410"),
            Some((Attribute::Purpose, "A410"))
        );
        assert_eq!(
            Attribute::parse_column("existing_checking_account_A14"),
            Some((Attribute::CheckingAccount, "A14"))
        );
        assert_eq!(Attribute::parse_column("purpose_A99"), None);
        assert_eq!(Attribute::parse_column("age"), None);
    }
}
