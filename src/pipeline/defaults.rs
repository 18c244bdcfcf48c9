use std::path::{Path, PathBuf};

use crate::error::EvaluationError;
use crate::pipeline::traits::{TextPostprocessor, TextSource};
use crate::types::{Corpus, TextSample};

/// Typographic variants folded onto a single plain form.
const REGULARIZATION_TABLE: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{201B}', "'"),
    ('\u{00B4}', "'"),
    ('`', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{201F}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
];

pub struct InMemoryTextSource {
    texts: Vec<String>,
}

impl InMemoryTextSource {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextSource for InMemoryTextSource {
    fn load_samples(&self) -> Result<Corpus, EvaluationError> {
        Ok(Corpus::from_texts(&self.texts))
    }

    fn describe(&self) -> String {
        format!("{} in-memory lines", self.texts.len())
    }
}

/// One sample per UTF-8 file, in the order the paths were given.
pub struct FileTextSource {
    paths: Vec<PathBuf>,
}

impl FileTextSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl TextSource for FileTextSource {
    fn load_samples(&self) -> Result<Corpus, EvaluationError> {
        let corpus = self
            .paths
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .map(|text| TextSample::new(&text))
                    .map_err(|e| EvaluationError::file(path, e))
            })
            .collect::<Result<Corpus, _>>()?;
        tracing::debug!(files = corpus.len(), "loaded text files");
        Ok(corpus)
    }

    fn describe(&self) -> String {
        format!("{} text files", self.paths.len())
    }
}

/// Maps every ground-truth file to its prediction sibling by swapping
/// `gt_extension` for `pred_extension`. Files without `gt_extension` lose
/// everything from the first `.` of their name instead.
pub fn prediction_paths_for(
    gt_paths: &[PathBuf],
    gt_extension: &str,
    pred_extension: &str,
) -> Result<Vec<PathBuf>, EvaluationError> {
    gt_paths
        .iter()
        .map(|path| prediction_path_for(path, gt_extension, pred_extension))
        .collect()
}

fn prediction_path_for(
    path: &Path,
    gt_extension: &str,
    pred_extension: &str,
) -> Result<PathBuf, EvaluationError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            EvaluationError::invalid_input(format!(
                "ground truth path has no UTF-8 file name: '{}'",
                path.display()
            ))
        })?;

    let stem = match file_name.strip_suffix(gt_extension) {
        Some(stem) => stem,
        None => file_name.split('.').next().unwrap_or(file_name),
    };
    if stem.is_empty() {
        return Err(EvaluationError::invalid_input(format!(
            "cannot derive prediction file name from '{}'",
            path.display()
        )));
    }
    Ok(path.with_file_name(format!("{stem}{pred_extension}")))
}

/// Folds typographic quotes and dashes, collapses whitespace runs to a
/// single space and trims both ends.
pub struct DefaultTextPostprocessor;

impl DefaultTextPostprocessor {
    pub fn normalize_line(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pending_space = false;
        for c in text.chars() {
            if c.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            match REGULARIZATION_TABLE.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => out.push_str(to),
                None => out.push(c),
            }
        }
        out
    }
}

impl TextPostprocessor for DefaultTextPostprocessor {
    fn apply(&self, corpus: Corpus) -> Result<Corpus, EvaluationError> {
        Ok(corpus
            .into_samples()
            .into_iter()
            .map(|sample| TextSample::new(&Self::normalize_line(&sample.to_string())))
            .collect())
    }
}

pub struct NoopTextPostprocessor;

impl TextPostprocessor for NoopTextPostprocessor {
    fn apply(&self, corpus: Corpus) -> Result<Corpus, EvaluationError> {
        Ok(corpus)
    }
}
