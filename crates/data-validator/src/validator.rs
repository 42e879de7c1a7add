//! Applicant Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::{ApplicantProfile, Attribute, CategoryMapping, FeatureError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Applicant age range (years)
    pub age_range: (f64, f64),
    /// Loan duration range (months)
    pub duration_range: (f64, f64),
    /// Loan amount range (₹)
    pub amount_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (21.0, 70.0),
            duration_range: (6.0, 60.0),
            amount_range: (25_000.0, 2_500_000.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// First error, if any
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Validator for applicant profiles
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite(field));
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate applicant age
    pub fn validate_age(&self, age: u32) -> Result<(), ValidationError> {
        self.validate_range("age", f64::from(age), self.config.age_range)
    }

    /// Validate loan duration
    pub fn validate_duration(&self, months: u32) -> Result<(), ValidationError> {
        self.validate_range("duration_months", f64::from(months), self.config.duration_range)
    }

    /// Validate loan amount
    pub fn validate_amount(&self, amount: f64) -> Result<(), ValidationError> {
        self.validate_range("credit_amount", amount, self.config.amount_range)
    }

    /// Validate that a label is one of the attribute's options
    pub fn validate_selection(&self, attribute: Attribute, label: &str) -> Result<(), ValidationError> {
        let mapping = CategoryMapping::for_attribute(attribute).ok_or_else(|| {
            ValidationError::UnknownCategory {
                attribute,
                label: label.to_string(),
            }
        })?;
        mapping.encode(label).map(|_| ()).map_err(|err| match err {
            FeatureError::UnknownCategory { attribute, label } => {
                ValidationError::UnknownCategory { attribute, label }
            }
            _ => ValidationError::UnknownCategory {
                attribute,
                label: label.to_string(),
            },
        })
    }

    /// Validate every field of a profile, collecting all errors
    pub fn validate(&self, profile: &ApplicantProfile) -> ValidationResult {
        let mut errors = Vec::new();
        let mut checked = 0;

        let numeric = [
            self.validate_age(profile.age),
            self.validate_duration(profile.duration_months),
            self.validate_amount(profile.credit_amount),
        ];
        for check in numeric {
            checked += 1;
            if let Err(err) = check {
                errors.push(err);
            }
        }

        for attribute in Attribute::EXPOSED {
            checked += 1;
            let label = profile.selection(attribute).unwrap_or_default();
            if let Err(err) = self.validate_selection(attribute, label) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            ValidationResult::valid(checked)
        } else {
            debug!("Profile rejected with {} error(s)", errors.len());
            ValidationResult::invalid(errors, checked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_profile_is_valid() {
        let result = Validator::default().validate(&ApplicantProfile::default());
        assert!(result.valid);
        assert_eq!(result.fields_checked, 9);
    }

    #[test]
    fn test_age_bounds() {
        let validator = Validator::default();
        assert!(validator.validate_age(21).is_ok());
        assert!(validator.validate_age(70).is_ok());
        assert!(validator.validate_age(20).is_err());
        assert!(validator.validate_age(71).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        let validator = Validator::default();
        assert!(validator.validate_duration(6).is_ok());
        assert!(validator.validate_duration(60).is_ok());
        assert_eq!(
            validator.validate_duration(72).unwrap_err(),
            ValidationError::OutOfRange {
                field: "duration_months",
                value: 72.0,
                min: 6.0,
                max: 60.0,
            }
        );
    }

    #[test]
    fn test_amount_must_be_finite() {
        let validator = Validator::default();
        assert_eq!(
            validator.validate_amount(f64::NAN).unwrap_err(),
            ValidationError::NotFinite("credit_amount")
        );
        assert!(validator.validate_amount(f64::INFINITY).is_err());
        assert!(validator.validate_amount(1_500_000.0).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let profile = ApplicantProfile {
            age: 18,
            credit_amount: 10.0,
            ..Default::default()
        }
        .with_selection(Attribute::SavingsAccount, "Offshore");

        let result = Validator::default().validate(&profile);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains(&ValidationError::UnknownCategory {
            attribute: Attribute::SavingsAccount,
            label: "Offshore".to_string(),
        }));
    }

    #[test]
    fn test_into_result_returns_first_error() {
        let profile = ApplicantProfile {
            age: 90,
            ..Default::default()
        };
        let err = Validator::default().validate(&profile).into_result().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn test_config_from_json() {
        let config: ValidationConfig =
            serde_json::from_str(r#"{"amount_range": [10000.0, 500000.0]}"#).unwrap();
        assert_eq!(config.amount_range, (10_000.0, 500_000.0));
        assert_eq!(config.age_range, (21.0, 70.0));
    }

    proptest! {
        #[test]
        fn prop_in_range_profiles_pass(
            age in 21u32..=70,
            duration in 6u32..=60,
            amount in 25_000.0f64..=2_500_000.0,
        ) {
            let profile = ApplicantProfile {
                age,
                duration_months: duration,
                credit_amount: amount,
                ..Default::default()
            };
            prop_assert!(Validator::default().validate(&profile).valid);
        }

        #[test]
        fn prop_out_of_range_age_fails(age in prop_oneof![0u32..21, 71u32..200]) {
            let profile = ApplicantProfile { age, ..Default::default() };
            prop_assert!(!Validator::default().validate(&profile).valid);
        }
    }
}
