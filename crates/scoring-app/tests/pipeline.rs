//! End-to-end scoring scenarios

use data_validator::ValidationConfig;
use decision_policy::{Decision, DecisionReason};
use feature_engine::{
    reference_columns, ApplicantProfile, Attribute, CategoryMapping, TrainingColumnSchema,
    CRITICAL_CREDIT_HISTORY, FIXED_NUMERIC_DEFAULTS, UNEXPOSED_DEFAULTS,
};
use inference_engine::{ConstantClassifier, LogisticRegression, ModelArtifact, StandardScaler};
use proptest::prelude::*;
use scoring_app::{AppConfig, CreditScorer, ScoringError};
use storage::{ArtifactBundle, ArtifactRepository};

fn schema() -> TrainingColumnSchema {
    TrainingColumnSchema::new(reference_columns()).unwrap()
}

fn identity_scaler(width: usize) -> StandardScaler {
    StandardScaler {
        mean: vec![0.0; width],
        scale: vec![1.0; width],
    }
}

fn constant_scorer(p_good: f64) -> CreditScorer {
    let width = schema().len();
    CreditScorer::new(
        schema(),
        identity_scaler(width),
        Box::new(ConstantClassifier::new(p_good)),
        ValidationConfig::default(),
    )
    .unwrap()
}

/// Logistic model leaning on a few columns so outputs vary with the profile
fn logistic_bundle() -> ArtifactBundle {
    let schema = schema();
    let width = schema.len();
    let mut coefficients = vec![0.0; width];
    coefficients[schema.position("age").unwrap()] = 0.02;
    coefficients[schema.position("credit_amount").unwrap()] = -0.000_001;
    coefficients[schema.position("existing_checking_account_A14").unwrap()] = 0.8;
    coefficients[schema.position("credit_history_A34").unwrap()] = 0.5;
    ArtifactBundle {
        model: ModelArtifact::LogisticRegression(LogisticRegression {
            coefficients,
            intercept: -0.3,
        }),
        scaler: identity_scaler(width),
        schema,
    }
}

fn boundary_profile() -> ApplicantProfile {
    ApplicantProfile {
        age: 21,
        duration_months: 60,
        credit_amount: 1_500_000.0,
        personal_status: "Male: Single".to_string(),
        job: "Unemployed / Unskilled".to_string(),
        purpose: "Used Car".to_string(),
        credit_history: CRITICAL_CREDIT_HISTORY.to_string(),
        checking_account: "< ₹0 Balance".to_string(),
        savings_account: "Unknown / No Savings Account".to_string(),
    }
}

#[test]
fn boundary_scenario_declines_via_override() {
    for p_good in [0.0, 0.5, 0.99, 1.0] {
        let result = constant_scorer(p_good).predict(&boundary_profile()).unwrap();
        assert_eq!(result.decision, Decision::Decline);
        assert_eq!(result.reason, DecisionReason::CriticalCreditHistory);
        assert_eq!(result.confidence, None);
        assert_eq!(
            result.to_string(),
            "Loan Declined (Reason: Critical Credit History)"
        );
    }
}

#[test]
fn default_fill_scenario() {
    let assessment = constant_scorer(0.7)
        .assess(&ApplicantProfile::default())
        .unwrap();
    let schema = schema();
    let values = &assessment.features.values;

    for (attribute, code) in UNEXPOSED_DEFAULTS {
        let column = attribute.indicator_column(code);
        match schema.position(&column) {
            Some(idx) => assert_eq!(values[idx], 1.0, "{column}"),
            // Dropped reference level, represented by all-zero siblings
            None => assert_eq!(code, attribute.reference_code()),
        }
    }
    for (column, expected) in FIXED_NUMERIC_DEFAULTS {
        assert_eq!(values[schema.position(column).unwrap()], expected, "{column}");
    }
    assert_eq!(values[schema.position("age").unwrap()], 50.0);
    assert_eq!(values[schema.position("duration").unwrap()], 12.0);
    assert_eq!(values[schema.position("credit_amount").unwrap()], 150_000.0);
}

#[test]
fn approval_reports_model_confidence() {
    let result = constant_scorer(0.875)
        .predict(&ApplicantProfile::default())
        .unwrap();
    assert_eq!(result.decision, Decision::Approve);
    assert_eq!(result.to_string(), "Loan Approved (Confidence: 87.50%)");

    let declined = constant_scorer(0.25)
        .predict(&ApplicantProfile::default())
        .unwrap();
    assert_eq!(declined.decision, Decision::Decline);
    assert_eq!(declined.confidence, Some(0.75));
}

#[test]
fn unknown_label_is_rejected() {
    let profile = ApplicantProfile::default().with_selection(Attribute::Purpose, "Yacht");
    let err = constant_scorer(0.5).predict(&profile).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidProfile(_)));
}

#[test]
fn loads_artifacts_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    ArtifactRepository::new(dir.path())
        .save_bundle(&logistic_bundle())
        .unwrap();

    let config = AppConfig {
        artifacts_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let scorer = CreditScorer::load(&config).unwrap();
    assert_eq!(scorer.classifier_name(), "logistic_regression");
    assert_eq!(scorer.schema().len(), 48);
    assert!(scorer.audit().is_clean());
    assert!(scorer.predict(&ApplicantProfile::default()).is_ok());
}

#[test]
fn missing_artifacts_fail_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        artifacts_dir: dir.path().join("nowhere"),
        ..AppConfig::default()
    };
    assert!(matches!(
        CreditScorer::load(&config),
        Err(ScoringError::Storage(_))
    ));
}

fn labels(attribute: Attribute) -> Vec<&'static str> {
    CategoryMapping::for_attribute(attribute)
        .unwrap()
        .labels()
        .collect()
}

prop_compose! {
    fn any_profile()(
        age in 21u32..=70,
        duration_months in 6u32..=60,
        credit_amount in 25_000.0f64..=2_500_000.0,
        personal_status in prop::sample::select(labels(Attribute::PersonalStatus)),
        job in prop::sample::select(labels(Attribute::Job)),
        purpose in prop::sample::select(labels(Attribute::Purpose)),
        credit_history in prop::sample::select(labels(Attribute::CreditHistory)),
        checking_account in prop::sample::select(labels(Attribute::CheckingAccount)),
        savings_account in prop::sample::select(labels(Attribute::SavingsAccount)),
    ) -> ApplicantProfile {
        ApplicantProfile {
            age,
            duration_months,
            credit_amount,
            personal_status: personal_status.to_string(),
            job: job.to_string(),
            purpose: purpose.to_string(),
            credit_history: credit_history.to_string(),
            checking_account: checking_account.to_string(),
            savings_account: savings_account.to_string(),
        }
    }
}

proptest! {
    #[test]
    fn prop_pipeline_is_idempotent(profile in any_profile()) {
        let bundle = logistic_bundle();
        let scorer = CreditScorer::from_bundle(
            bundle,
            std::path::Path::new("."),
            ValidationConfig::default(),
        ).unwrap();

        let first = scorer.assess(&profile).unwrap();
        let second = scorer.assess(&profile).unwrap();
        prop_assert_eq!(first.result, second.result);
        prop_assert_eq!(first.features, second.features);
    }

    #[test]
    fn prop_critical_history_always_declines(profile in any_profile(), p_good in 0.0f64..=1.0) {
        let profile = profile.with_selection(Attribute::CreditHistory, CRITICAL_CREDIT_HISTORY);
        let result = constant_scorer(p_good).predict(&profile).unwrap();
        prop_assert_eq!(result.decision, Decision::Decline);
        prop_assert!(result.is_override());
    }
}
