use std::sync::Arc;

use crate::config::EvaluatorConfig;
use crate::error::EvaluationError;
use crate::evaluation::parallel::ExecutionStrategy;
use crate::pipeline::defaults::{DefaultTextPostprocessor, NoopTextPostprocessor};
use crate::pipeline::runtime::{Evaluator, EvaluatorParts};
use crate::pipeline::traits::{ProgressObserver, TextPostprocessor};

pub struct EvaluatorBuilder {
    config: EvaluatorConfig,
    strategy: Option<ExecutionStrategy>,
    postprocessor: Option<Box<dyn TextPostprocessor>>,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl EvaluatorBuilder {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            strategy: None,
            postprocessor: None,
            progress: None,
        }
    }

    /// Overrides the strategy derived from `config.workers`.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_postprocessor(mut self, postprocessor: Box<dyn TextPostprocessor>) -> Self {
        self.postprocessor = Some(postprocessor);
        self
    }

    pub fn with_progress_observer(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn build(self) -> Result<Evaluator, EvaluationError> {
        self.config.validate()?;
        let workers = if self.config.workers == 0 {
            EvaluatorConfig::DEFAULT_WORKERS
        } else {
            self.config.workers
        };
        let normalize_text = self.config.normalize_text;

        Ok(Evaluator::from_parts(EvaluatorParts {
            strategy: self
                .strategy
                .unwrap_or_else(|| ExecutionStrategy::from_worker_count(workers)),
            skip_empty_ground_truth: self.config.skip_empty_ground_truth,
            postprocessor: self.postprocessor.unwrap_or_else(|| {
                if normalize_text {
                    Box::new(DefaultTextPostprocessor)
                } else {
                    Box::new(NoopTextPostprocessor)
                }
            }),
            progress: self.progress,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::evaluation::confusion::ConfusionKey;
    use crate::pipeline::defaults::InMemoryTextSource;
    use crate::pipeline::runtime::GroundTruth;
    use crate::pipeline::traits::TextSource;
    use crate::types::{Corpus, TextSample};

    struct CountingSource {
        texts: Vec<&'static str>,
        loads: AtomicUsize,
    }

    impl TextSource for CountingSource {
        fn load_samples(&self) -> Result<Corpus, EvaluationError> {
            self.loads.fetch_add(1, Ordering::Relaxed);
            Ok(Corpus::from_texts(&self.texts))
        }
    }

    struct FailingSource;

    impl TextSource for FailingSource {
        fn load_samples(&self) -> Result<Corpus, EvaluationError> {
            Err(EvaluationError::collaborator("load predictions", "disk on fire"))
        }
    }

    struct DroppingPostprocessor;

    impl TextPostprocessor for DroppingPostprocessor {
        fn apply(&self, corpus: Corpus) -> Result<Corpus, EvaluationError> {
            Ok(corpus.into_samples().into_iter().skip(1).collect())
        }
    }

    struct UppercasePostprocessor;

    impl TextPostprocessor for UppercasePostprocessor {
        fn apply(&self, corpus: Corpus) -> Result<Corpus, EvaluationError> {
            Ok(corpus
                .iter()
                .map(|sample| TextSample::new(&sample.to_string().to_uppercase()))
                .collect())
        }
    }

    #[test]
    fn builder_defaults_to_sequential_with_normalization() {
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .build()
            .expect("build should succeed");
        assert_eq!(evaluator.strategy(), ExecutionStrategy::Sequential);

        let report = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["  hello   world "])),
                &InMemoryTextSource::new(["hello world"]),
            )
            .unwrap();
        assert_eq!(report.total_char_errors, 0);
        assert_eq!(report.total_chars, 11);
    }

    #[test]
    fn builder_maps_workers_to_thread_pool() {
        let config = EvaluatorConfig {
            workers: 4,
            ..EvaluatorConfig::default()
        };
        let evaluator = EvaluatorBuilder::new(config).build().unwrap();
        assert_eq!(
            evaluator.strategy(),
            ExecutionStrategy::ThreadPool { workers: 4 }
        );
    }

    #[test]
    fn builder_treats_zero_workers_as_default() {
        let config = EvaluatorConfig {
            workers: 0,
            ..EvaluatorConfig::default()
        };
        let evaluator = EvaluatorBuilder::new(config).build().unwrap();
        assert_eq!(evaluator.strategy(), ExecutionStrategy::Sequential);
    }

    #[test]
    fn build_fails_on_invalid_config() {
        let config = EvaluatorConfig {
            prediction_extension: String::new(),
            ..EvaluatorConfig::default()
        };
        assert!(EvaluatorBuilder::new(config).build().is_err());
    }

    #[test]
    fn preloaded_ground_truth_is_loaded_once() {
        let gt_source = CountingSource {
            texts: vec!["cat", "dog"],
            loads: AtomicUsize::new(0),
        };
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .build()
            .unwrap();
        let preloaded = evaluator.preload_ground_truth(&gt_source).unwrap();

        let first = evaluator
            .run(
                GroundTruth::Preloaded(&preloaded),
                &InMemoryTextSource::new(["cot", "dog"]),
            )
            .unwrap();
        let second = evaluator
            .run(
                GroundTruth::Preloaded(&preloaded),
                &InMemoryTextSource::new(["cat", "dig"]),
            )
            .unwrap();

        assert_eq!(gt_source.loads.load(Ordering::Relaxed), 1);
        assert_eq!(first.confusion.get(&ConfusionKey::new("a", "o")), 1);
        assert_eq!(second.confusion.get(&ConfusionKey::new("o", "i")), 1);
        assert_eq!(preloaded.corpus(), &Corpus::from_texts(["cat", "dog"]));
    }

    #[test]
    fn custom_postprocessor_applies_to_both_sides() {
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .with_postprocessor(Box::new(UppercasePostprocessor))
            .build()
            .unwrap();
        let report = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["Word"])),
                &InMemoryTextSource::new(["WORD"]),
            )
            .unwrap();
        assert_eq!(report.total_char_errors, 0);
    }

    #[test]
    fn collaborator_errors_propagate() {
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .build()
            .unwrap();
        let err = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["a"])),
                &FailingSource,
            )
            .unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn postprocessor_changing_length_is_rejected() {
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .with_postprocessor(Box::new(DroppingPostprocessor))
            .build()
            .unwrap();
        let err = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["a", "b"])),
                &InMemoryTextSource::new(["a", "b"]),
            )
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Collaborator { .. }));
    }

    #[test]
    fn skip_empty_ground_truth_drops_pairs() {
        let config = EvaluatorConfig {
            skip_empty_ground_truth: true,
            ..EvaluatorConfig::default()
        };
        let evaluator = EvaluatorBuilder::new(config).build().unwrap();
        let report = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["abc", "   ", "de"])),
                &InMemoryTextSource::new(["abc", "noise", "df"]),
            )
            .unwrap();
        assert_eq!(report.pair_count(), 2);
        assert_eq!(report.total_chars, 5);
        assert_eq!(report.total_char_errors, 1);
        assert_eq!(report.skipped_pairs, vec![1]);
        assert_eq!(report.input_count(), 3);
    }

    #[test]
    fn progress_total_excludes_skipped_pairs() {
        #[derive(Default)]
        struct Recorder {
            total: AtomicUsize,
            scored: AtomicUsize,
        }
        impl ProgressObserver for Recorder {
            fn on_start(&self, total: usize) {
                self.total.store(total, Ordering::Relaxed);
            }

            fn on_pair_scored(&self) {
                self.scored.fetch_add(1, Ordering::Relaxed);
            }
        }

        let recorder = Arc::new(Recorder::default());
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig {
            skip_empty_ground_truth: true,
            ..EvaluatorConfig::default()
        })
        .with_progress_observer(recorder.clone())
        .build()
        .unwrap();
        let report = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["", "ab", "", "cd"])),
                &InMemoryTextSource::new(["x", "ab", "y", "cb"]),
            )
            .unwrap();

        assert_eq!(recorder.total.load(Ordering::Relaxed), 2);
        assert_eq!(recorder.scored.load(Ordering::Relaxed), 2);
        assert_eq!(report.skipped_pairs, vec![0, 2]);
        assert_eq!(report.pairs[1].edit_errors, 1);
    }

    #[test]
    fn length_mismatch_surfaces_from_run() {
        let evaluator = EvaluatorBuilder::new(EvaluatorConfig::default())
            .build()
            .unwrap();
        let err = evaluator
            .run(
                GroundTruth::Source(&InMemoryTextSource::new(["a", "b", "c"])),
                &InMemoryTextSource::new(["a", "b"]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::LengthMismatch {
                ground_truth: 3,
                prediction: 2
            }
        ));
    }
}
