use std::path::Path;

use serde::Deserialize;

use crate::error::EvaluationError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub workers: usize,
    pub ground_truth_extension: String,
    pub prediction_extension: String,
    /// Drop pairs whose processed ground truth is empty.
    pub skip_empty_ground_truth: bool,
    pub confusion_top_n: usize,
    /// Apply the default text regularization before scoring.
    pub normalize_text: bool,
}

impl EvaluatorConfig {
    pub const DEFAULT_WORKERS: usize = 1;
    pub const DEFAULT_CONFUSION_TOP_N: usize = 10;
    pub const DEFAULT_GT_EXTENSION: &'static str = ".gt.txt";
    pub const DEFAULT_PRED_EXTENSION: &'static str = ".pred.txt";

    pub fn load(path: &Path) -> Result<Self, EvaluationError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EvaluationError::io("read evaluator config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| EvaluationError::json("parse evaluator config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.ground_truth_extension.is_empty() || self.prediction_extension.is_empty() {
            return Err(EvaluationError::invalid_input(
                "ground truth and prediction extensions must not be empty",
            ));
        }
        if self.ground_truth_extension == self.prediction_extension {
            return Err(EvaluationError::invalid_input(format!(
                "ground truth and prediction share the extension '{}'",
                self.ground_truth_extension
            )));
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            workers: Self::DEFAULT_WORKERS,
            ground_truth_extension: Self::DEFAULT_GT_EXTENSION.to_string(),
            prediction_extension: Self::DEFAULT_PRED_EXTENSION.to_string(),
            skip_empty_ground_truth: false,
            confusion_top_n: Self::DEFAULT_CONFUSION_TOP_N,
            normalize_text: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluator_config_default() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.workers, 1);
        assert_eq!(config.ground_truth_extension, ".gt.txt");
        assert_eq!(config.prediction_extension, ".pred.txt");
        assert!(!config.skip_empty_ground_truth);
        assert_eq!(config.confusion_top_n, 10);
        assert!(config.normalize_text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EvaluatorConfig =
            serde_json::from_str(r#"{"workers": 8, "skip_empty_ground_truth": true}"#)
                .expect("valid config json");
        assert_eq!(config.workers, 8);
        assert!(config.skip_empty_ground_truth);
        assert_eq!(config.prediction_extension, ".pred.txt");
    }

    #[test]
    fn load_rejects_shared_extension() {
        let path = std::env::temp_dir().join(format!(
            "ocr_eval_config_shared_ext_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"ground_truth_extension": ".txt", "prediction_extension": ".txt"}"#,
        )
        .expect("write config");
        let result = EvaluatorConfig::load(&path);
        assert!(matches!(result, Err(EvaluationError::InvalidInput { .. })));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let result = EvaluatorConfig::load(Path::new("/nonexistent/ocr_eval.json"));
        assert!(matches!(result, Err(EvaluationError::Io { .. })));
    }
}
