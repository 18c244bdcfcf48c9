use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ocr_eval::{
    prediction_paths_for, EvaluatorBuilder, EvaluatorConfig, FileTextSource, GroundTruth,
    ProgressObserver,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[path = "eval_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "eval_report/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "eval_report")]
#[command(about = "Compute character error rates and confusions of OCR predictions")]
struct Args {
    /// Ground truth files, or directories searched recursively for them.
    #[arg(long, required = true, num_args = 1.., env = "OCR_EVAL_GT", value_delimiter = ',')]
    gt: Vec<PathBuf>,
    /// Prediction files in ground-truth order. Derived from --gt when omitted.
    #[arg(long, num_args = 1.., env = "OCR_EVAL_PRED", value_delimiter = ',')]
    pred: Vec<PathBuf>,
    #[arg(long, env = "OCR_EVAL_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "OCR_EVAL_GT_EXT")]
    gt_ext: Option<String>,
    #[arg(long, env = "OCR_EVAL_PRED_EXT")]
    pred_ext: Option<String>,
    #[arg(long, env = "OCR_EVAL_WORKERS")]
    workers: Option<usize>,
    #[arg(long, env = "OCR_EVAL_N_CONFUSIONS")]
    n_confusions: Option<usize>,
    #[arg(long, env = "OCR_EVAL_SKIP_EMPTY_GT", default_value_t = false)]
    skip_empty_gt: bool,
    #[arg(long, env = "OCR_EVAL_NO_NORMALIZE", default_value_t = false)]
    no_normalize: bool,
    #[arg(
        long,
        env = "OCR_EVAL_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    format: OutputFormat,
    #[arg(long, env = "OCR_EVAL_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "OCR_EVAL_NO_PROGRESS", default_value_t = false)]
    no_progress: bool,
}

struct ProgressBarObserver(ProgressBar);

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&self, total: usize) {
        self.0.set_length(total as u64);
    }

    fn on_pair_scored(&self) {
        self.0.inc(1);
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(message) = run() {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let gt_files = collect_ground_truth_files(&args.gt, &config.ground_truth_extension)?;
    if gt_files.is_empty() {
        return Err("No ground truth files found.".to_string());
    }
    let pred_files = if args.pred.is_empty() {
        prediction_paths_for(
            &gt_files,
            &config.ground_truth_extension,
            &config.prediction_extension,
        )
        .map_err(|err| err.to_string())?
    } else {
        args.pred.clone()
    };
    for path in &pred_files {
        require_path_exists(path, "Missing prediction file.")?;
    }

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        // sized by the evaluator once empty lines are filtered
        ProgressBar::new(0)
    };
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("evaluating...");

    let evaluator = EvaluatorBuilder::new(config.clone())
        .with_progress_observer(Arc::new(ProgressBarObserver(progress.clone())))
        .build()
        .map_err(|err| format!("Failed to build evaluator: {err}"))?;

    let started = Instant::now();
    let gt_source = FileTextSource::new(gt_files.clone());
    let pred_source = FileTextSource::new(pred_files.clone());
    let report = evaluator
        .run(GroundTruth::Source(&gt_source), &pred_source)
        .map_err(|err| format!("Evaluation failed: {err}"))?;
    progress.finish_with_message("evaluation complete");
    tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "evaluation timing");

    let rendered = match args.format {
        OutputFormat::Text => {
            text_report_formatter::render_report(&report, config.confusion_top_n)
        }
        OutputFormat::Json => {
            let meta = json_report_formatter::Meta {
                generated_at: Utc::now().to_rfc3339(),
                ground_truth_files: gt_files.len(),
                prediction_files: pred_files.len(),
                workers: evaluator.strategy().workers(),
                normalize_text: config.normalize_text,
                skip_empty_ground_truth: config.skip_empty_ground_truth,
            };
            json_report_formatter::render_report(&meta, &report)?
        }
    };

    match args.out.as_ref() {
        Some(path) => write_output(path, &rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<EvaluatorConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => EvaluatorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => EvaluatorConfig::default(),
    };
    if let Some(ext) = args.gt_ext.as_ref() {
        config.ground_truth_extension = ext.clone();
    }
    if let Some(ext) = args.pred_ext.as_ref() {
        config.prediction_extension = ext.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(n) = args.n_confusions {
        config.confusion_top_n = n;
    }
    if args.skip_empty_gt {
        config.skip_empty_ground_truth = true;
    }
    if args.no_normalize {
        config.normalize_text = false;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn collect_ground_truth_files(inputs: &[PathBuf], gt_ext: &str) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            collect_files_with_suffix(input, gt_ext, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            require_path_exists(input, "Missing ground truth file.")?;
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn collect_files_with_suffix(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read directory '{}': {err}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            format!(
                "Failed to read directory entry in '{}': {err}",
                dir.display()
            )
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files_with_suffix(&path, suffix, out)?;
            continue;
        }
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix))
        {
            out.push(path);
        }
    }
    Ok(())
}

fn write_output(path: &Path, rendered: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    fs::write(path, rendered)
        .map_err(|err| format!("Failed to write report file '{}': {err}", path.display()))
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
