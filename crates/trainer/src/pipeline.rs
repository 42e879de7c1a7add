//! End-to-end training run

use crate::config::{ModelKind, TrainConfig};
use crate::dataset::CreditDataset;
use crate::encoding::OneHotEncoder;
use crate::forest::{ForestParams, ForestTrainer};
use crate::logistic::{LogisticParams, LogisticTrainer};
use crate::metrics::EvaluationMetrics;
use crate::split::train_test_split;
use crate::TrainingError;
use inference_engine::{ModelArtifact, StandardScaler};
use ndarray::{Array2, Axis};
use serde::Serialize;
use std::path::Path;
use storage::{ArtifactBundle, ArtifactRepository};
use tracing::info;

/// Summary of a finished training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model: ModelKind,
    pub train_rows: usize,
    pub test_rows: usize,
    pub columns: usize,
    pub metrics: EvaluationMetrics,
}

fn to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn scale(scaler: &StandardScaler, rows: &[Vec<f64>]) -> Result<Array2<f64>, TrainingError> {
    let width = scaler.width();
    let mut values = Vec::with_capacity(rows.len() * width);
    for row in rows {
        values.extend(scaler.transform(row)?);
    }
    Ok(Array2::from_shape_vec((rows.len(), width), values)?)
}

/// Fit on an already loaded dataset and return the artifacts with a report
pub fn fit(
    dataset: &CreditDataset,
    config: &TrainConfig,
) -> Result<(ArtifactBundle, TrainingReport), TrainingError> {
    config.validate()?;

    let encoder = OneHotEncoder::fit(dataset)?;
    let encoded = encoder.encode(dataset)?;
    let split = train_test_split(dataset.len(), config.test_ratio, config.seed);
    info!(
        "Encoded {} rows into {} columns; {} train / {} test",
        dataset.len(),
        encoded.schema.len(),
        split.train.len(),
        split.test.len()
    );

    let pick = |indices: &[usize]| -> (Array2<f64>, Vec<u8>) {
        (
            encoded.features.select(Axis(0), indices),
            indices.iter().map(|&i| encoded.targets[i]).collect(),
        )
    };
    let (x_train, y_train) = pick(&split.train);
    let (x_test, y_test) = pick(&split.test);

    let train_rows = to_rows(&x_train);
    let scaler = StandardScaler::fit(&train_rows)?;
    let x_train = scale(&scaler, &train_rows)?;
    let x_test = scale(&scaler, &to_rows(&x_test))?;

    let model = match config.model {
        ModelKind::LogisticRegression => {
            let fitted = LogisticTrainer::new(LogisticParams {
                epochs: config.epochs,
                learning_rate: config.learning_rate,
                c: config.c,
                balanced: true,
            })
            .fit(&x_train, &y_train)?;
            ModelArtifact::LogisticRegression(fitted)
        }
        ModelKind::RandomForest => {
            let forest = ForestTrainer::new(ForestParams {
                n_trees: config.n_trees,
                max_depth: config.max_depth,
                seed: config.seed,
                ..ForestParams::default()
            })
            .fit(&x_train, &y_train)?;
            ModelArtifact::RandomForest(forest)
        }
    };
    let classifier = model.clone().into_classifier(Path::new("."))?;

    let predictions = x_test
        .rows()
        .into_iter()
        .map(|row| classifier.predict(&row.to_vec()))
        .collect::<Result<Vec<u8>, _>>()?;
    let metrics = EvaluationMetrics::compute(&predictions, &y_test)?;
    info!("Test split: {}", metrics);

    let report = TrainingReport {
        model: config.model,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        columns: encoded.schema.len(),
        metrics,
    };
    let bundle = ArtifactBundle {
        model,
        scaler,
        schema: encoded.schema,
    };
    Ok((bundle, report))
}

/// Load the dataset, fit the configured model and persist the artifacts
pub fn train(
    config: &TrainConfig,
    repository: &ArtifactRepository,
) -> Result<TrainingReport, TrainingError> {
    let dataset = CreditDataset::load(config.dataset_path.as_deref(), &config.dataset_url)?;
    let (bundle, report) = fit(&dataset, config)?;
    repository.save_bundle(&bundle)?;
    info!(
        "Trained {} on {} rows; artifacts in {}",
        report.model.as_str(),
        report.train_rows,
        repository.dir().display()
    );
    Ok(report)
}
