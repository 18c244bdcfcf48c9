use std::fmt;

use serde::Serialize;

use crate::evaluation::confusion::ConfusionTable;

/// A single line of text, tokenized into Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TextSample {
    chars: Vec<char>,
}

impl TextSample {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn from_chars(chars: Vec<char>) -> Self {
        Self { chars }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl From<&str> for TextSample {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextSample {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl fmt::Display for TextSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Ordered samples; index `i` of a ground-truth corpus and a prediction corpus
/// refer to the same line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    samples: Vec<TextSample>,
}

impl Corpus {
    pub fn new(samples: Vec<TextSample>) -> Self {
        Self { samples }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| TextSample::new(text.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TextSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&TextSample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextSample> {
        self.samples.iter()
    }

    pub fn into_samples(self) -> Vec<TextSample> {
        self.samples
    }

    /// Total number of tokens across all samples.
    pub fn char_count(&self) -> usize {
        self.samples.iter().map(TextSample::len).sum()
    }
}

impl FromIterator<TextSample> for Corpus {
    fn from_iter<T: IntoIterator<Item = TextSample>>(iter: T) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl Extend<TextSample> for Corpus {
    fn extend<T: IntoIterator<Item = TextSample>>(&mut self, iter: T) {
        self.samples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a TextSample;
    type IntoIter = std::slice::Iter<'a, TextSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Aligned region of a ground-truth/prediction pair. Either side may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SyncSegment {
    pub ground_truth: String,
    pub prediction: String,
}

impl SyncSegment {
    pub fn is_match(&self) -> bool {
        self.ground_truth == self.prediction
    }

    /// Width charged for a mismatched segment: the longer side in tokens.
    pub fn width(&self) -> usize {
        self.ground_truth
            .chars()
            .count()
            .max(self.prediction.chars().count())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Minimum number of single-token edits turning ground truth into prediction.
    pub errors: usize,
    /// Matched tokens on the chosen minimum-cost path.
    pub matches: usize,
    pub segments: Vec<SyncSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairResult {
    pub gt_length: usize,
    pub edit_errors: usize,
    pub sync_errors: usize,
    pub confusion: ConfusionTable,
}
