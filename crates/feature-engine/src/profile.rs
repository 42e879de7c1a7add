//! Applicant input

use crate::mapping::Attribute;
use serde::{Deserialize, Serialize};

/// Raw applicant input as entered on the application form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicantProfile {
    /// Age in years
    pub age: u32,
    /// Loan duration in months
    pub duration_months: u32,
    /// Requested loan amount (₹)
    pub credit_amount: f64,
    /// Personal status & sex label
    pub personal_status: String,
    /// Job type label
    pub job: String,
    /// Loan purpose label
    pub purpose: String,
    /// Credit history label
    pub credit_history: String,
    /// Checking account status label
    pub checking_account: String,
    /// Savings account / deposits label
    pub savings_account: String,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            age: 50,
            duration_months: 12,
            credit_amount: 150_000.0,
            personal_status: "Male: Married/Widowed".to_string(),
            job: "Management / Self-employed / Professional".to_string(),
            purpose: "Furniture/Equipment".to_string(),
            credit_history: "All existing loans paid back on time".to_string(),
            checking_account: ">= ₹20,000 Balance".to_string(),
            savings_account: ">= ₹1,00,000".to_string(),
        }
    }
}

impl ApplicantProfile {
    /// Label selected for an attribute; `None` for defaulted attributes
    pub fn selection(&self, attribute: Attribute) -> Option<&str> {
        let label = match attribute {
            Attribute::PersonalStatus => &self.personal_status,
            Attribute::Job => &self.job,
            Attribute::Purpose => &self.purpose,
            Attribute::CreditHistory => &self.credit_history,
            Attribute::CheckingAccount => &self.checking_account,
            Attribute::SavingsAccount => &self.savings_account,
            _ => return None,
        };
        Some(label.as_str())
    }

    /// Replace the label selected for an attribute
    ///
    /// Defaulted attributes have no selection and are left untouched.
    pub fn with_selection(mut self, attribute: Attribute, label: impl Into<String>) -> Self {
        let slot = match attribute {
            Attribute::PersonalStatus => &mut self.personal_status,
            Attribute::Job => &mut self.job,
            Attribute::Purpose => &mut self.purpose,
            Attribute::CreditHistory => &mut self.credit_history,
            Attribute::CheckingAccount => &mut self.checking_account,
            Attribute::SavingsAccount => &mut self.savings_account,
            _ => return self,
        };
        *slot = label.into();
        self
    }
}
