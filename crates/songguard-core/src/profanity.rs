//! Lexicon-based profanity classification
//!
//! Text is lower-cased, its language detected, and every lexicon term is
//! located with an Aho-Corasick automaton in a single pass per lexicon. A
//! match only counts when it is not embedded in a longer alphanumeric token,
//! so "ass" never fires inside "class".

use crate::error::ConfigError;
use crate::lexicon::{Language, Lexicon};
use aho_corasick::AhoCorasick;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Code point ranges removed before analysis: emoticons, pictographs,
/// transport and map symbols, regional indicators, dingbats and a few
/// singletons (ZWJ, variation selector, wavy dash...).
const EMOJI_RANGES: [(u32, u32); 16] = [
    (0x1F600, 0x1F64F),
    (0x1F300, 0x1F5FF),
    (0x1F680, 0x1F6FF),
    (0x1F1E0, 0x1F1FF),
    (0x2702, 0x27B0),
    (0x24C2, 0x1F251),
    (0x1F926, 0x1F937),
    (0x10000, 0x10FFFF),
    (0x2640, 0x2642),
    (0x2600, 0x2B55),
    (0x200D, 0x200D),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23E9),
    (0x231A, 0x231A),
    (0xFE0F, 0xFE0F),
    (0x3030, 0x3030),
];

pub const DEFAULT_MAX_MATCHES: usize = 5;

/// Remove emoji and pictographs from `text`.
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let cp = *c as u32;
            !EMOJI_RANGES
                .iter()
                .any(|(start, end)| (*start..=*end).contains(&cp))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfanityVerdict {
    /// Primary-language profanity or too many matches overall
    TooMany,
    /// Proceeds to sentiment classification
    FewOrNone,
    UnsupportedLanguage,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfanityReport {
    pub language: Option<Language>,
    pub matches_by_language: BTreeMap<Language, BTreeMap<String, usize>>,
    /// Matches across both lexicons, a term shared by both counted once
    pub total: usize,
    pub verdict: ProfanityVerdict,
}

impl ProfanityReport {
    pub fn unsupported() -> Self {
        Self {
            language: None,
            matches_by_language: BTreeMap::new(),
            total: 0,
            verdict: ProfanityVerdict::UnsupportedLanguage,
        }
    }
}

struct LexiconMatcher {
    language: Language,
    automaton: AhoCorasick,
    terms: Vec<String>,
}

impl LexiconMatcher {
    fn build(lexicon: &Lexicon) -> Result<Self, ConfigError> {
        let automaton = AhoCorasick::new(lexicon.terms()).map_err(|e| {
            ConfigError::InvalidValue(format!("{} lexicon: {}", lexicon.language, e))
        })?;
        Ok(Self {
            language: lexicon.language,
            automaton,
            terms: lexicon.terms().to_vec(),
        })
    }

    fn count(&self, text: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for m in self.automaton.find_overlapping_iter(text) {
            if is_word_bounded(text, m.start(), m.end()) {
                *counts
                    .entry(self.terms[m.pattern().as_usize()].clone())
                    .or_insert(0) += 1;
            }
        }
        counts
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

pub struct ProfanityClassifier {
    primary: LexiconMatcher,
    secondary: LexiconMatcher,
    max_matches: usize,
}

impl ProfanityClassifier {
    /// `primary` is the Polish lexicon, `secondary` the English one.
    pub fn new(primary: &Lexicon, secondary: &Lexicon, max_matches: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            primary: LexiconMatcher::build(primary)?,
            secondary: LexiconMatcher::build(secondary)?,
            max_matches,
        })
    }

    /// Detect the language of `text` and classify it.
    pub fn classify(&self, text: &str) -> ProfanityReport {
        let lowered = text.to_lowercase();
        let language = whatlang::detect_lang(&lowered).and_then(Language::from_detected);
        self.classify_detected(&lowered, language)
    }

    /// Classify lower-cased text whose language is already known.
    pub fn classify_detected(&self, lowered: &str, language: Option<Language>) -> ProfanityReport {
        let Some(language) = language else {
            info!("Language not supported");
            return ProfanityReport::unsupported();
        };

        let primary = self.primary.count(lowered);
        let secondary = self.secondary.count(lowered);

        let mut combined = primary.clone();
        combined.extend(secondary.iter().map(|(k, v)| (k.clone(), *v)));
        let total: usize = combined.values().sum();

        let verdict = if !primary.is_empty() || total > self.max_matches {
            ProfanityVerdict::TooMany
        } else {
            ProfanityVerdict::FewOrNone
        };

        info!(
            language = %language,
            primary = ?primary,
            secondary = ?secondary,
            total,
            verdict = ?verdict,
            "Profanity check complete"
        );

        let mut matches_by_language = BTreeMap::new();
        matches_by_language.insert(self.primary.language, primary);
        matches_by_language.insert(self.secondary.language, secondary);

        ProfanityReport {
            language: Some(language),
            matches_by_language,
            total,
            verdict,
        }
    }
}
