use std::fmt;

#[cfg(test)]
macro_rules! corpus {
    ($($name:literal => $text:expr),+ $(,)?) => {{
        let mut corpus = $crate::Corpus::new();
        $(corpus.add_text($name, $text).unwrap();)+
        corpus
    }};
}

pub mod analyzer;
pub mod loader;
pub mod normalize;
pub mod report;

pub use analyzer::{count, Analysis, Analyzer, Options, SourceTally};
pub use normalize::{normalize, tokenize};
pub use report::{Row, WordSummary};

/// A named unit of text: one file, one pasted block, one article.
///
/// Sources are immutable once registered and live until the owning [`Corpus`]
/// is cleared or dropped.
#[derive(Debug, Clone)]
pub struct TextSource {
    pub name: String,
    pub text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The set of sources registered for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    sources: Vec<TextSource>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source. Names must be unique within the corpus; a
    /// duplicate is rejected rather than silently overwritten or counted
    /// twice.
    pub fn add(&mut self, source: TextSource) -> Result<(), Error> {
        if self.sources.iter().any(|s| s.name == source.name) {
            return Err(Error::DuplicateSource(source.name));
        }
        self.sources.push(source);
        Ok(())
    }

    pub fn add_text(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), Error> {
        self.add(TextSource::new(name, text))
    }

    /// Drops every registered source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources in registration order.
    pub fn sources(&self) -> &[TextSource] {
        &self.sources
    }
}

#[derive(Debug)]
pub enum Error {
    /// No sources have been registered.
    EmptySources,
    /// The target word list is empty.
    EmptyTargets,
    /// A source with this name is already registered.
    DuplicateSource(String),
    /// A source's bytes are not valid UTF-8.
    Encoding(String),
    /// The loader could not read a file.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptySources => write!(f, "no text sources to analyze"),
            Error::EmptyTargets => write!(f, "no target words to count"),
            Error::DuplicateSource(name) => {
                write!(f, "a source named '{}' is already registered", name)
            }
            Error::Encoding(name) => write!(f, "source '{}' is not valid UTF-8", name),
            Error::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Corpus, Error};

    #[test]
    fn registration_order_is_kept() {
        let corpus = corpus! {
            "b" => "beta",
            "a" => "alpha",
            "c" => "gamma",
        };
        let names: Vec<_> = corpus.sources().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut corpus = corpus! { "notes" => "first" };
        let err = corpus.add_text("notes", "second").unwrap_err();
        assert!(matches!(err, Error::DuplicateSource(name) if name == "notes"));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.sources()[0].text, "first");
    }

    #[test]
    fn clear_drops_all_sources() {
        let mut corpus = corpus! { "a" => "x", "b" => "y" };
        corpus.clear();
        assert!(corpus.is_empty());
        // the name is free again after clearing
        corpus.add_text("a", "z").unwrap();
        assert_eq!(corpus.len(), 1);
    }
}
