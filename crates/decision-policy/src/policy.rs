//! Decision Policy Implementation

use feature_engine::{ApplicantProfile, CRITICAL_CREDIT_HISTORY};
use inference_engine::RawPrediction;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Outcome of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Decline,
}

impl Decision {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Decline => "decline",
        }
    }

    /// Decision for a classifier label
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Decision::Approve
        } else {
            Decision::Decline
        }
    }
}

/// What produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Classifier output passed through unchanged
    Model,
    /// Declined because of a critical credit history
    CriticalCreditHistory,
}

impl DecisionReason {
    /// Explanation shown to the applicant
    pub fn description(&self) -> &'static str {
        match self {
            DecisionReason::Model => "Model prediction",
            DecisionReason::CriticalCreditHistory => "Critical Credit History",
        }
    }
}

/// Decision presented for one application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub decision: Decision,
    /// Probability of the chosen class; absent when a rule overrode the model
    pub confidence: Option<f64>,
    pub reason: DecisionReason,
}

impl PredictionResult {
    /// Whether a business rule replaced the classifier output
    pub fn is_override(&self) -> bool {
        self.reason != DecisionReason::Model
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.decision {
            Decision::Approve => "Loan Approved",
            Decision::Decline => "Loan Declined",
        };
        match (self.reason, self.confidence) {
            (DecisionReason::Model, Some(confidence)) => {
                write!(f, "{outcome} (Confidence: {:.2}%)", confidence * 100.0)
            }
            (reason, _) => write!(f, "{outcome} (Reason: {})", reason.description()),
        }
    }
}

/// Business rules applied after classification
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionPolicy;

impl DecisionPolicy {
    /// Create the policy
    pub fn new() -> Self {
        Self
    }

    /// Combine classifier output with the override rules
    pub fn decide(&self, raw: &RawPrediction, profile: &ApplicantProfile) -> PredictionResult {
        if profile.credit_history == CRITICAL_CREDIT_HISTORY {
            info!(
                model_label = raw.label,
                "Critical credit history: declining regardless of model output"
            );
            return PredictionResult {
                decision: Decision::Decline,
                confidence: None,
                reason: DecisionReason::CriticalCreditHistory,
            };
        }

        let decision = Decision::from_label(raw.label);
        debug!("Model decision {} passed through", decision.as_str());
        PredictionResult {
            decision,
            confidence: Some(raw.label_probability()),
            reason: DecisionReason::Model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{Attribute, CategoryMapping};
    use proptest::prelude::*;

    fn raw(label: u8, p_good: f64) -> RawPrediction {
        RawPrediction {
            label,
            probabilities: [1.0 - p_good, p_good],
        }
    }

    fn critical_profile() -> ApplicantProfile {
        ApplicantProfile::default().with_selection(Attribute::CreditHistory, CRITICAL_CREDIT_HISTORY)
    }

    #[test]
    fn test_critical_history_declines_confident_approval() {
        let result = DecisionPolicy::new().decide(&raw(1, 0.99), &critical_profile());
        assert_eq!(result.decision, Decision::Decline);
        assert_eq!(result.confidence, None);
        assert_eq!(result.reason, DecisionReason::CriticalCreditHistory);
        assert!(result.is_override());
    }

    #[test]
    fn test_pass_through_approval() {
        let result = DecisionPolicy::new().decide(&raw(1, 0.82), &ApplicantProfile::default());
        assert_eq!(result.decision, Decision::Approve);
        assert_eq!(result.confidence, Some(0.82));
        assert!(!result.is_override());
    }

    #[test]
    fn test_pass_through_decline_uses_class_zero_probability() {
        let result = DecisionPolicy::new().decide(&raw(0, 0.3), &ApplicantProfile::default());
        assert_eq!(result.decision, Decision::Decline);
        assert!((result.confidence.unwrap() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let approved = PredictionResult {
            decision: Decision::Approve,
            confidence: Some(0.875),
            reason: DecisionReason::Model,
        };
        assert_eq!(approved.to_string(), "Loan Approved (Confidence: 87.50%)");

        let overridden = DecisionPolicy::new().decide(&raw(1, 0.9), &critical_profile());
        assert_eq!(
            overridden.to_string(),
            "Loan Declined (Reason: Critical Credit History)"
        );
    }

    #[test]
    fn test_override_serializes_null_confidence() {
        let result = DecisionPolicy::new().decide(&raw(0, 0.1), &critical_profile());
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"decision":"decline","confidence":null,"reason":"critical_credit_history"}"#
        );
    }

    fn non_critical_history() -> impl Strategy<Value = &'static str> {
        let labels: Vec<&'static str> = CategoryMapping::for_attribute(Attribute::CreditHistory)
            .unwrap()
            .labels()
            .filter(|label| *label != CRITICAL_CREDIT_HISTORY)
            .collect();
        prop::sample::select(labels)
    }

    proptest! {
        #[test]
        fn prop_critical_history_always_declines(label in 0u8..=1, p_good in 0.0f64..=1.0) {
            let result = DecisionPolicy::new().decide(&raw(label, p_good), &critical_profile());
            prop_assert_eq!(result.decision, Decision::Decline);
            prop_assert_eq!(result.confidence, None);
        }

        #[test]
        fn prop_other_histories_pass_through(
            history in non_critical_history(),
            p_good in 0.0f64..=1.0,
        ) {
            let label = u8::from(p_good > 0.5);
            let profile = ApplicantProfile::default().with_selection(Attribute::CreditHistory, history);
            let prediction = raw(label, p_good);
            let result = DecisionPolicy::new().decide(&prediction, &profile);

            prop_assert_eq!(result.decision, Decision::from_label(label));
            prop_assert_eq!(result.confidence, Some(prediction.probabilities[usize::from(label)]));
            prop_assert_eq!(result.reason, DecisionReason::Model);
        }
    }
}
