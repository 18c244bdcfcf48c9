pub mod alignment;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod pipeline;
pub mod types;

pub use alignment::align;
pub use config::EvaluatorConfig;
pub use error::EvaluationError;
pub use evaluation::confusion::{ConfusionEntry, ConfusionKey, ConfusionTable};
pub use evaluation::parallel::ExecutionStrategy;
pub use evaluation::report::{AggregateReport, Tally};
pub use evaluation::scorer::score_pair;
pub use evaluation::{evaluate, evaluate_with};
pub use pipeline::builder::EvaluatorBuilder;
pub use pipeline::defaults::{
    prediction_paths_for, DefaultTextPostprocessor, FileTextSource, InMemoryTextSource,
    NoopTextPostprocessor,
};
pub use pipeline::runtime::{Evaluator, GroundTruth, PreloadedGroundTruth};
pub use pipeline::traits::{ProgressObserver, TextPostprocessor, TextSource};
pub use types::{Alignment, Corpus, PairResult, SyncSegment, TextSample};
