use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::error::FrontendError;
use crate::phonemes::Phonemes;
use crate::types::{Alphabet, LexWord, PhoneSeq};

static PROBABILITY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*\.\d+$").expect("probability regex is valid"));

/// Exact-match pronunciation dictionary for one language and storage alphabet.
pub struct Lexicon {
    language: String,
    alphabet: Alphabet,
    entries: RwLock<HashMap<String, PhoneSeq>>,
    phonemes: Arc<Phonemes>,
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("language", &self.language)
            .field("alphabet", &self.alphabet)
            .field("entries", &self.len())
            .finish()
    }
}

impl Lexicon {
    pub fn new(
        language: impl Into<String>,
        alphabet: Alphabet,
        phonemes: Arc<Phonemes>,
    ) -> Result<Self, FrontendError> {
        if alphabet == Alphabet::XSampaWithStress {
            return Err(FrontendError::configuration(
                "lexicons must be stored in ipa or x-sampa",
            ));
        }
        Ok(Self {
            language: language.into(),
            alphabet,
            entries: RwLock::new(HashMap::new()),
            phonemes,
        })
    }

    pub fn load(
        path: &Path,
        language: impl Into<String>,
        alphabet: Alphabet,
        phonemes: Arc<Phonemes>,
    ) -> Result<Self, FrontendError> {
        if !path.is_file() {
            return Err(FrontendError::configuration(format!(
                "lexicon file not found: {}",
                path.display()
            )));
        }
        let file = File::open(path).map_err(|e| FrontendError::io("open lexicon", e))?;
        let lexicon = Self::from_reader(BufReader::new(file), language, alphabet, phonemes)?;
        tracing::info!(
            path = %path.display(),
            language = lexicon.language(),
            alphabet = alphabet.as_str(),
            entries = lexicon.len(),
            "lexicon: loaded"
        );
        Ok(lexicon)
    }

    /// Reads `<grapheme> [<probability>] <phone>+` lines.
    ///
    /// Whether the probability column is present is decided once, from the
    /// first entry line.
    pub fn from_reader<R: BufRead>(
        reader: R,
        language: impl Into<String>,
        alphabet: Alphabet,
        phonemes: Arc<Phonemes>,
    ) -> Result<Self, FrontendError> {
        let lexicon = Self::new(language, alphabet, phonemes)?;
        let mut has_probability: Option<bool> = None;
        let mut best: HashMap<String, (f64, PhoneSeq)> = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| FrontendError::io("read lexicon", e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let probabilistic = *has_probability.get_or_insert_with(|| {
                fields.len() > 2 && PROBABILITY_FIELD.is_match(fields[1])
            });

            let (probability, phones) = if probabilistic {
                match fields.get(1).and_then(|p| p.parse::<f64>().ok()) {
                    Some(p) => (p, &fields[2.min(fields.len())..]),
                    None => {
                        tracing::warn!(line = idx + 1, "lexicon: unparsable probability, skipping");
                        continue;
                    }
                }
            } else {
                (1.0, &fields[1..])
            };
            if phones.is_empty() {
                tracing::warn!(line = idx + 1, grapheme = fields[0], "lexicon: entry without phones, skipping");
                continue;
            }

            let phones: PhoneSeq = phones.iter().map(|p| p.to_string()).collect();
            match best.get(fields[0]) {
                Some((kept, _)) if *kept >= probability => {}
                _ => {
                    best.insert(fields[0].to_string(), (probability, phones));
                }
            }
        }

        *lexicon.entries.write() = best
            .into_iter()
            .map(|(grapheme, (_, phones))| (grapheme, phones))
            .collect();
        Ok(lexicon)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Exact-key lookup; a miss is an empty sequence.
    pub fn get(&self, word: &str) -> PhoneSeq {
        self.entries.read().get(word).cloned().unwrap_or_default()
    }

    pub fn get_xsampa(&self, word: &str) -> Result<PhoneSeq, FrontendError> {
        let phones = self.get(word);
        match self.alphabet {
            Alphabet::Ipa => self.phonemes.convert_ipa_to_xsampa(&phones),
            _ => Ok(phones),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.read().contains_key(word)
    }

    /// Adds or replaces the pronunciation of `entry.grapheme`.
    pub fn insert(&self, entry: LexWord) {
        self.entries.write().insert(entry.grapheme, entry.phoneme);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
