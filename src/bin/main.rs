//! supervise Command Line Interface
//!
//! A command-line interface for training, evaluating, and using SVM models
//! on the student-performance data or generic numeric CSV files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use supervise::api::{EvaluationMetrics, SVM};
use supervise::core::{Result, Sample, SvmConfig};
use supervise::data::{CSVDataset, StudentDataset, StudentOptions};
use supervise::kernel::KernelKind;
use supervise::persistence::SerializableModel;
use supervise::search::GridSearch;
use supervise::utils::stats::label_balance;
use supervise::{Dataset, SVMModel};

#[derive(Parser)]
#[command(name = "supervise")]
#[command(about = "Pass/fail prediction with an SMO-trained Support Vector Machine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on one file, classify another and report the F1 score
    Run(RunArgs),
    /// Train a new SVM model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Grid search over C, sigma and epsilon for the Gaussian kernel
    Grid(GridArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CliKernel {
    Gaussian,
    Linear,
    Polynomial,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DataFormat {
    /// `;`-separated student-performance file
    Student,
    /// Comma-separated numeric file, label in the last column
    Csv,
}

#[derive(Args, Clone)]
struct HyperArgs {
    /// Soft margin penalty
    #[arg(short = 'C', long, default_value = "200")]
    c: f64,

    /// Tolerance of the KKT conditions
    #[arg(short = 't', long = "toler", default_value = "0.0001")]
    epsilon: f64,

    /// Kernel function
    #[arg(long, value_enum, default_value = "gaussian")]
    kernel: CliKernel,

    /// Width of the Gaussian kernel
    #[arg(short, long, default_value = "10")]
    sigma: f64,

    /// Degree of the polynomial kernel
    #[arg(short = 'p', long, default_value = "2")]
    degree: u32,

    /// Maximum number of passes over the training set
    #[arg(long, default_value = "1000")]
    max_passes: usize,
}

impl HyperArgs {
    fn kernel(&self) -> KernelKind {
        match self.kernel {
            CliKernel::Gaussian => KernelKind::Gaussian { sigma: self.sigma },
            CliKernel::Linear => KernelKind::Linear,
            CliKernel::Polynomial => KernelKind::Polynomial {
                degree: self.degree,
            },
        }
    }

    fn config(&self) -> SvmConfig {
        SvmConfig {
            kernel: self.kernel(),
            c: self.c,
            epsilon: self.epsilon,
            max_passes: self.max_passes,
            ..SvmConfig::default()
        }
    }
}

#[derive(Args, Clone)]
struct DataArgs {
    /// Data format
    #[arg(short, long, value_enum, default_value = "student")]
    format: DataFormat,

    /// Keep raw attribute values (student format)
    #[arg(long)]
    no_normalize: bool,

    /// Leave out the G1 and G2 grades (student format)
    #[arg(long)]
    no_grades: bool,
}

impl DataArgs {
    fn student_options(&self) -> StudentOptions {
        StudentOptions {
            normalize: !self.no_normalize,
            include_grades: !self.no_grades,
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Training data file
    #[arg(long)]
    train: PathBuf,

    /// Test data file
    #[arg(long)]
    test: PathBuf,

    #[command(flatten)]
    hyper: HyperArgs,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    hyper: HyperArgs,

    #[command(flatten)]
    format: DataArgs,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    format: DataArgs,

    /// Show confidence scores
    #[arg(long)]
    confidence: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    #[command(flatten)]
    format: DataArgs,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct GridArgs {
    /// Training data file
    #[arg(long)]
    train: PathBuf,

    /// Test data file
    #[arg(long)]
    test: PathBuf,

    /// Number of leading training samples used for each fit
    #[arg(long, default_value = "100")]
    subset: usize,

    /// Maximum number of passes for each fit
    #[arg(long, default_value = "1000")]
    max_passes: usize,

    #[command(flatten)]
    data: DataArgs,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Grid(args) => grid_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

/// Load a data file and return its samples
fn load_samples(path: &Path, args: &DataArgs) -> Result<Vec<Sample>> {
    info!("Loading {:?} as {:?}", path, args.format);
    let samples = match args.format {
        DataFormat::Student => {
            let dataset = StudentDataset::from_file(path, args.student_options())?;
            info!(
                "Loaded {} samples with {} dimensions",
                dataset.len(),
                dataset.dim()
            );
            dataset.samples().to_vec()
        }
        DataFormat::Csv => {
            if args.no_normalize || args.no_grades {
                warn!("--no-normalize and --no-grades only apply to the student format");
            }
            let dataset = CSVDataset::from_file(path)?;
            info!(
                "Loaded {} samples with {} dimensions",
                dataset.len(),
                dataset.dim()
            );
            dataset.samples().to_vec()
        }
    };

    let balance = label_balance(&samples);
    info!(
        "Class balance: {} positive, {} negative",
        balance.positive, balance.negative
    );
    Ok(samples)
}

fn run_command(args: RunArgs) -> Result<()> {
    let start = Instant::now();

    let train = load_samples(&args.train, &args.data)?;
    let test = load_samples(&args.test, &args.data)?;

    let config = args.hyper.config();
    info!(
        "Parameters: kernel={}, C={}, epsilon={}",
        config.kernel, config.c, config.epsilon
    );

    let predicted = supervise::api::predict(&train, &test, &config)?;
    let truth: Vec<f64> = test.iter().map(|s| s.label).collect();
    let metrics = EvaluationMetrics::from_labels(&truth, &predicted)?;

    println!(
        "TP = {:3}  TN = {:3}",
        metrics.true_positives, metrics.true_negatives
    );
    println!(
        "FP = {:3}  FN = {:3}",
        metrics.false_positives, metrics.false_negatives
    );
    println!("Elapsed time: {:.4}s", start.elapsed().as_secs_f64());
    println!("F1 score: {:.4}%", metrics.f1_score() * 100.0);

    Ok(())
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training SVM model...");
    info!("Data file: {:?}", args.data);

    let samples = load_samples(&args.data, &args.format)?;
    let config = args.hyper.config();
    info!(
        "Parameters: kernel={}, C={}, epsilon={}, max_passes={}",
        config.kernel, config.c, config.epsilon, config.max_passes
    );

    let model = SVM::with_config(config).train_samples(&samples)?;

    let info = model.info();
    info!("Training completed after {} passes", info.passes);
    info!("Support vectors: {}", info.n_support_vectors);
    info!("Bias: {:.6}", info.bias);

    let serializable = SerializableModel::from_trained_model(&model);
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    let predicted: Vec<f64> = model
        .predict_batch(&samples)?
        .iter()
        .map(|p| p.label)
        .collect();
    let truth: Vec<f64> = samples.iter().map(|s| s.label).collect();
    let accuracy = EvaluationMetrics::from_labels(&truth, &predicted)?.accuracy();
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    let samples = load_samples(&args.data, &args.format)?;
    info!(
        "Making predictions using model with {} support vectors",
        model.inner().n_support_vectors()
    );

    let predictions = model.predict_batch(&samples)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    writeln!(out, "# Predictions for {} samples", predictions.len())?;
    writeln!(
        out,
        "# Format: sample_index predicted_label{}",
        if args.confidence { " confidence" } else { "" }
    )?;
    for (i, pred) in predictions.iter().enumerate() {
        if args.confidence {
            writeln!(out, "{} {:.0} {:.6}", i, pred.label, pred.confidence())?;
        } else {
            writeln!(out, "{} {:.0}", i, pred.label)?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.output {
        info!("Predictions saved to: {path:?}");
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    let samples = load_samples(&args.data, &args.format)?;
    let classifier = model.inner().classifier();
    let predicted = classifier.classify_all(&samples)?;
    let truth: Vec<f64> = samples.iter().map(|s| s.label).collect();
    let metrics = EvaluationMetrics::from_labels(&truth, &predicted)?;

    println!("=== Model Evaluation ===");
    serializable_model.print_summary();

    println!("\nTest Results:");
    println!("{metrics}");

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;

    serializable_model.print_summary();

    println!("\nAlpha*Y values:");
    let alpha_y = &serializable_model.alpha_y;
    let n_show = alpha_y.len().min(10);
    for (i, &alpha_y_val) in alpha_y.iter().enumerate().take(n_show) {
        println!("  α{i}*y{i}: {alpha_y_val:.6}");
    }
    if alpha_y.len() > n_show {
        println!("  ... ({} more)", alpha_y.len() - n_show);
    }

    Ok(())
}

fn grid_command(args: GridArgs) -> Result<()> {
    let train = load_samples(&args.train, &args.data)?;
    let test = load_samples(&args.test, &args.data)?;

    let search = GridSearch::new()
        .with_subset(args.subset)
        .with_max_passes(args.max_passes);
    let result = search.run(&train, &test)?;

    println!("=== Grid Search Results ===");
    println!("Combinations: {}", result.evaluated.len());
    match result.best {
        Some(best) => {
            println!("Best F1: {:.4}", best.f1);
            println!("C: {}", best.c);
            println!("Sigma: {}", best.sigma);
            println!("Epsilon: {}", best.epsilon);
        }
        None => println!("No combination scored above zero"),
    }

    Ok(())
}
