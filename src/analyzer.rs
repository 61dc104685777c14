use crate::normalize::{normalize, tokenize};
use crate::{Corpus, Error, TextSource};
use rayon::current_num_threads;
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Options {
    /// If true, words are matched exactly as written: no case folding and no
    /// punctuation stripping on either the text or the target words.
    pub case_sensitive: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            case_sensitive: false,
        }
    }
}

impl Options {
    pub fn build(self) -> Analyzer {
        Analyzer { options: self }
    }
}

/// A stateless word-frequency counter over a [`Corpus`].
pub struct Analyzer {
    options: Options,
}

impl Default for Analyzer {
    fn default() -> Self {
        Options::default().build()
    }
}

impl Analyzer {
    pub fn builder() -> Options {
        Options::default()
    }

    /// Counts every target word in every source of `corpus`.
    ///
    /// All-or-nothing: an empty corpus or an empty target list is an error and
    /// no partial result is produced. Each call is independent and free of
    /// side effects.
    pub fn analyze<S: AsRef<str>>(
        &self,
        corpus: &Corpus,
        target_words: &[S],
    ) -> Result<Analysis, Error> {
        if corpus.is_empty() {
            return Err(Error::EmptySources);
        }
        if target_words.is_empty() {
            return Err(Error::EmptyTargets);
        }

        let words = self.fold_targets(target_words);
        let sources = corpus.sources();
        // Sources are independent, so fan out when a thread pool is configured.
        let tallies = if current_num_threads() > 1 && sources.len() > 1 {
            sources
                .par_iter()
                .map(|source| self.tally(source, &words))
                .collect()
        } else {
            sources
                .iter()
                .map(|source| self.tally(source, &words))
                .collect()
        };

        Ok(Analysis { words, tallies })
    }

    // Target words go through the same folding as the text. Duplicates are
    // permitted but redundant; they collapse to the first occurrence.
    fn fold_targets<S: AsRef<str>>(&self, target_words: &[S]) -> Vec<String> {
        let mut words = Vec::with_capacity(target_words.len());
        for word in target_words {
            let word = if self.options.case_sensitive {
                word.as_ref().to_string()
            } else {
                normalize(word.as_ref())
            };
            if !words.contains(&word) {
                words.push(word);
            }
        }
        words
    }

    fn tally(&self, source: &TextSource, words: &[String]) -> SourceTally {
        let text = if self.options.case_sensitive {
            Cow::Borrowed(source.text.as_str())
        } else {
            Cow::Owned(normalize(&source.text))
        };

        let mut total_words = 0;
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for token in tokenize(&text) {
            total_words += 1;
            *freq.entry(token).or_insert(0) += 1;
        }

        SourceTally {
            name: source.name.clone(),
            total_words,
            counts: words
                .iter()
                .map(|word| freq.get(word.as_str()).copied().unwrap_or(0))
                .collect(),
        }
    }
}

/// Occurrences of each target word among `tokens`.
///
/// Every target appears in the result; absent words count 0, never an error.
pub fn count<'a, S: AsRef<str>>(
    tokens: impl IntoIterator<Item = &'a str>,
    target_words: &[S],
) -> HashMap<String, usize> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *freq.entry(token).or_insert(0) += 1;
    }
    target_words
        .iter()
        .map(|word| {
            let word = word.as_ref();
            (word.to_string(), freq.get(word).copied().unwrap_or(0))
        })
        .collect()
}

/// The result of one [`Analyzer::analyze`] call.
///
/// Holds one [`SourceTally`] per source, in registration order, each aligned
/// with the folded target-word list. Every (source, word) pair is present,
/// zero counts included.
#[derive(Debug)]
pub struct Analysis {
    pub(crate) words: Vec<String>,
    pub(crate) tallies: Vec<SourceTally>,
}

impl Analysis {
    /// The folded target words, duplicates collapsed, in first-seen order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn tallies(&self) -> &[SourceTally] {
        &self.tallies
    }
}

/// Per-source counts, aligned with [`Analysis::words`].
#[derive(Debug)]
pub struct SourceTally {
    pub name: String,
    /// Token count of the source after normalization.
    pub total_words: usize,
    pub(crate) counts: Vec<usize>,
}

impl SourceTally {
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::{count, Analyzer};
    use crate::normalize::tokenize;
    use crate::Error;

    #[test]
    fn counts_across_sources() {
        let corpus = corpus! {
            "A" => "Security and architecture. Security first!",
            "B" => "privacy, Privacy and PRIVACY",
        };
        let analysis = Analyzer::default()
            .analyze(&corpus, &["security", "privacy"])
            .unwrap();

        assert_eq!(analysis.words(), ["security", "privacy"]);
        let a = &analysis.tallies()[0];
        assert_eq!(a.total_words, 5);
        assert_eq!(a.counts(), [2, 0]);
        let b = &analysis.tallies()[1];
        assert_eq!(b.total_words, 4);
        assert_eq!(b.counts(), [0, 3]);
    }

    #[test]
    fn unrequested_words_are_not_counted() {
        let corpus = corpus! { "A" => "Security and architecture. Security first!" };
        let analysis = Analyzer::default()
            .analyze(&corpus, &["security", "privacy"])
            .unwrap();
        // "architecture" occurs but was not requested; "privacy" is absent.
        assert_eq!(analysis.tallies()[0].counts(), [2, 0]);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let corpus = crate::Corpus::new();
        let err = Analyzer::default()
            .analyze(&corpus, &["anything"])
            .unwrap_err();
        assert!(matches!(err, Error::EmptySources));
    }

    #[test]
    fn empty_target_list_is_an_error() {
        let corpus = corpus! { "A" => "some words" };
        let err = Analyzer::default()
            .analyze(&corpus, &[] as &[&str])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTargets));
    }

    #[test]
    fn case_sensitive_matches_exact_case_only() {
        let corpus = corpus! { "A" => "Security security" };
        let mut options = Analyzer::builder();
        options.case_sensitive = true;
        let analysis = options.build().analyze(&corpus, &["Security"]).unwrap();
        assert_eq!(analysis.tallies()[0].counts(), [1]);
    }

    #[test]
    fn case_sensitive_keeps_punctuation() {
        // Raw tokens are "Security!" and "security", neither equals "Security".
        let corpus = corpus! { "A" => "Security! security" };
        let mut options = Analyzer::builder();
        options.case_sensitive = true;
        let analysis = options.build().analyze(&corpus, &["Security"]).unwrap();
        assert_eq!(analysis.tallies()[0].counts(), [0]);
        assert_eq!(analysis.tallies()[0].total_words, 2);
    }

    #[test]
    fn duplicate_targets_collapse() {
        let corpus = corpus! { "A" => "one two two" };
        let analysis = Analyzer::default()
            .analyze(&corpus, &["two", "Two", "two"])
            .unwrap();
        assert_eq!(analysis.words(), ["two"]);
        assert_eq!(analysis.tallies()[0].counts(), [2]);
    }

    #[test]
    fn empty_source_has_zero_totals() {
        let corpus = corpus! { "empty" => "" };
        let analysis = Analyzer::default().analyze(&corpus, &["word"]).unwrap();
        assert_eq!(analysis.tallies()[0].total_words, 0);
        assert_eq!(analysis.tallies()[0].counts(), [0]);
    }

    #[test]
    fn count_reports_zero_for_absent_words() {
        let tokens: Vec<&str> = tokenize("a b a c").collect();
        let counts = count(tokens, &["a", "d"]);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["d"], 0);
    }

    #[test]
    fn repeated_occurrences_all_count() {
        let tokens: Vec<&str> = tokenize("x x x x x").collect();
        let counts = count(tokens, &["x"]);
        assert_eq!(counts["x"], 5);
    }
}
