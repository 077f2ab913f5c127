//! Static word lists loaded once at startup

use std::path::Path;
use tracing::{error, info};

/// Languages with a profanity lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Primary lexicon: any match rejects the song
    Polish,
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Polish => "pl",
            Language::English => "en",
        }
    }

    pub fn from_detected(lang: whatlang::Lang) -> Option<Self> {
        match lang {
            whatlang::Lang::Pol => Some(Language::Polish),
            whatlang::Lang::Eng => Some(Language::English),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized (trimmed, lower-cased, non-empty) terms for one language.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub language: Language,
    terms: Vec<String>,
}

impl Lexicon {
    pub fn new<I, S>(language: Language, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language,
            terms: normalize_terms(terms),
        }
    }

    /// Load a lexicon file. A missing or unreadable file yields an empty lexicon.
    pub fn load(language: Language, path: &Path) -> Self {
        let lexicon = Self::new(language, read_lines(path));
        info!(
            "Loaded {} {} terms from {}",
            lexicon.len(),
            language,
            path.display()
        );
        lexicon
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Read one term per line; errors are logged and produce no terms.
pub fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            error!("Failed to read word list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
