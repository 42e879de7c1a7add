//! Loan Eligibility Scoring - Command Line Entry Point

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use feature_engine::ApplicantProfile;
use scoring_app::{
    audit_report, init_logging, options_report, AppConfig, CreditScorer, LogFormat,
};
use std::path::{Path, PathBuf};
use storage::ArtifactRepository;
use tracing::info;
use trainer::ModelKind;

#[derive(Parser)]
#[command(
    name = "credit-scoring",
    version,
    about = "Loan eligibility scoring on the German credit model"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Extra configuration file layered over credit-scoring.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Artifact directory (overrides configuration)
    #[arg(long = "artifacts-dir", value_name = "DIR", global = true)]
    artifacts_dir: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "feature_engine=trace"
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_enum, global = true)]
    log_format: Option<LogFormatArg>,
}

#[derive(Subcommand)]
enum Command {
    /// Score one applicant
    Predict(PredictArgs),
    /// List selectable options and accepted ranges
    Options,
    /// Compare expected indicator columns with the training schema
    Audit,
    /// Fit a model on the German credit dataset and write the artifacts
    Train(TrainArgs),
}

#[derive(Args)]
struct PredictArgs {
    /// JSON file with an applicant profile; flags override its fields
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// Age in years
    #[arg(long)]
    age: Option<u32>,

    /// Loan duration in months
    #[arg(long)]
    duration: Option<u32>,

    /// Requested loan amount (₹)
    #[arg(long)]
    amount: Option<f64>,

    #[arg(long = "personal-status")]
    personal_status: Option<String>,

    #[arg(long)]
    job: Option<String>,

    #[arg(long)]
    purpose: Option<String>,

    #[arg(long = "credit-history")]
    credit_history: Option<String>,

    #[arg(long = "checking-account")]
    checking_account: Option<String>,

    #[arg(long = "savings-account")]
    savings_account: Option<String>,

    /// Print the decision as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TrainArgs {
    /// Local german.data; downloaded there when absent
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Classifier to fit
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// Number of trees for the random forest
    #[arg(long)]
    trees: Option<usize>,

    /// Seed for the split and the forest
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    LogisticRegression,
    RandomForest,
}

impl PredictArgs {
    fn profile(&self) -> Result<ApplicantProfile> {
        let mut profile = match &self.profile {
            Some(path) => read_profile(path)?,
            None => ApplicantProfile::default(),
        };
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(duration) = self.duration {
            profile.duration_months = duration;
        }
        if let Some(amount) = self.amount {
            profile.credit_amount = amount;
        }
        let labels = [
            (&self.personal_status, &mut profile.personal_status),
            (&self.job, &mut profile.job),
            (&self.purpose, &mut profile.purpose),
            (&self.credit_history, &mut profile.credit_history),
            (&self.checking_account, &mut profile.checking_account),
            (&self.savings_account, &mut profile.savings_account),
        ];
        for (flag, slot) in labels {
            if let Some(label) = flag {
                slot.clone_from(label);
            }
        }
        Ok(profile)
    }
}

fn read_profile(path: &Path) -> Result<ApplicantProfile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    let profile = serde_json::from_str(&text)
        .with_context(|| format!("parsing profile {}", path.display()))?;
    Ok(profile)
}

fn predict(config: &AppConfig, args: &PredictArgs) -> Result<()> {
    let scorer = CreditScorer::load(config)?;
    let profile = args.profile()?;
    let result = scorer.predict(&profile)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

fn audit(config: &AppConfig) -> Result<()> {
    let scorer = CreditScorer::load(config)?;
    print!("{}", audit_report(scorer.audit()));
    Ok(())
}

fn train(config: &AppConfig, args: &TrainArgs) -> Result<()> {
    let mut training = config.training.clone();
    if let Some(path) = &args.dataset {
        training.dataset_path = Some(path.clone());
    }
    if let Some(model) = args.model {
        training.model = match model {
            ModelArg::LogisticRegression => ModelKind::LogisticRegression,
            ModelArg::RandomForest => ModelKind::RandomForest,
        };
    }
    if let Some(trees) = args.trees {
        training.n_trees = trees;
    }
    if let Some(seed) = args.seed {
        training.seed = seed;
    }

    let repository = ArtifactRepository::new(&config.artifacts_dir);
    let report = trainer::train(&training, &repository)?;
    println!(
        "Trained {} on {} rows ({} columns), evaluated on {} rows",
        report.model.as_str(),
        report.train_rows,
        report.columns,
        report.test_rows
    );
    println!("{}", report.metrics);
    println!("Artifacts written to {}", repository.dir().display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.artifacts_dir {
        config.artifacts_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = match format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        };
    }
    init_logging(&config.logging)?;

    info!("Credit scoring v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Predict(args) => predict(&config, args),
        Command::Options => {
            print!("{}", options_report(&config.bounds));
            Ok(())
        }
        Command::Audit => audit(&config),
        Command::Train(args) => train(&config, args),
    }
}
