//! Scoring pipeline

use crate::config::AppConfig;
use crate::ScoringError;
use data_validator::{ValidationConfig, Validator};
use decision_policy::{DecisionPolicy, PredictionResult};
use feature_engine::{
    ApplicantProfile, FeatureBuilder, FeatureVector, IndicatorOutcome, SchemaAudit,
    TrainingColumnSchema,
};
use inference_engine::{Classifier, InferenceEngine, RawPrediction, StandardScaler};
use metrics::counter;
use serde::Serialize;
use std::path::Path;
use storage::{ArtifactBundle, ArtifactRepository};
use tracing::{info, warn};

/// Everything produced for one application
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub result: PredictionResult,
    /// Classifier output before the decision policy
    pub raw: RawPrediction,
    /// Aligned, unscaled feature row
    pub features: FeatureVector,
    /// What happened to each indicator the builder tried to set
    pub indicators: Vec<IndicatorOutcome>,
}

/// Validator, feature builder, inference engine and policy, created once
///
/// Every component is immutable after construction; `assess` takes `&self`.
pub struct CreditScorer {
    validator: Validator,
    builder: FeatureBuilder,
    engine: InferenceEngine,
    policy: DecisionPolicy,
    audit: SchemaAudit,
}

impl CreditScorer {
    /// Assemble the pipeline from loaded parts
    ///
    /// Fails when the schema lacks a numeric column or the scaler and
    /// classifier widths disagree with the schema.
    pub fn new(
        schema: TrainingColumnSchema,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        bounds: ValidationConfig,
    ) -> Result<Self, ScoringError> {
        let width = schema.len();
        let builder = FeatureBuilder::new(schema)?;
        let audit = builder.audit();
        audit.log();

        let engine = InferenceEngine::new(scaler, classifier, width)?;

        Ok(Self {
            validator: Validator::new(bounds),
            builder,
            engine,
            policy: DecisionPolicy::new(),
            audit,
        })
    }

    /// Build from persisted artifacts; ONNX paths resolve against `base_dir`
    pub fn from_bundle(
        bundle: ArtifactBundle,
        base_dir: &Path,
        bounds: ValidationConfig,
    ) -> Result<Self, ScoringError> {
        let classifier = bundle.model.into_classifier(base_dir)?;
        Self::new(bundle.schema, bundle.scaler, classifier, bounds)
    }

    /// Load the artifacts named by the configuration
    pub fn load(config: &AppConfig) -> Result<Self, ScoringError> {
        let repository = ArtifactRepository::new(&config.artifacts_dir);
        let bundle = repository.load_bundle()?;
        let scorer = Self::from_bundle(bundle, repository.dir(), config.bounds.clone())?;
        info!(
            "Scorer ready: {} classifier over {} columns",
            scorer.engine.classifier_name(),
            scorer.engine.width()
        );
        Ok(scorer)
    }

    /// Validate, encode, classify and apply the decision policy
    pub fn assess(&self, profile: &ApplicantProfile) -> Result<Assessment, ScoringError> {
        let validation = self.validator.validate(profile);
        if !validation.valid {
            counter!("credit_scoring_rejected_profiles_total").increment(1);
            return Err(ScoringError::InvalidProfile(validation.errors));
        }

        let built = self.builder.build(profile)?;
        let skipped = built.missing_columns().count();
        if skipped > 0 {
            warn!(skipped, "Assessment made without some indicator columns");
            counter!("credit_scoring_missing_indicators_total").increment(skipped as u64);
        }

        let raw = self.engine.predict(&built.vector)?;
        let result = self.policy.decide(&raw, profile);

        counter!("credit_scoring_assessments_total", "decision" => result.decision.as_str())
            .increment(1);
        if result.is_override() {
            counter!("credit_scoring_overrides_total").increment(1);
        }
        info!(
            decision = result.decision.as_str(),
            reason = result.reason.description(),
            "Application assessed"
        );

        Ok(Assessment {
            result,
            raw,
            features: built.vector,
            indicators: built.indicators,
        })
    }

    /// Decision only
    pub fn predict(&self, profile: &ApplicantProfile) -> Result<PredictionResult, ScoringError> {
        self.assess(profile).map(|assessment| assessment.result)
    }

    /// Startup comparison of expected indicators against the schema
    pub fn audit(&self) -> &SchemaAudit {
        &self.audit
    }

    pub fn schema(&self) -> &TrainingColumnSchema {
        self.builder.schema()
    }

    pub fn bounds(&self) -> &ValidationConfig {
        self.validator.config()
    }

    pub fn classifier_name(&self) -> &str {
        self.engine.classifier_name()
    }
}
