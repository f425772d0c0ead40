//! Joint-sequence (graphone) pronunciation model.
//!
//! Each graphone pairs a grapheme chunk with the phones it emits and a log
//! probability. Decoding picks the best-scoring segmentation of the word into
//! known grapheme chunks.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::FrontendError;
use crate::g2p::TranslationFailure;
use crate::pipeline::traits::PhoneticModel;
use crate::types::{Alphabet, PhoneSeq};

/// Phone column value for a grapheme chunk that emits nothing.
const SILENT: &str = "_";

#[derive(Debug, Clone)]
pub struct GraphoneModel {
    alphabet: Alphabet,
    /// Grapheme chunk -> best (phones, log probability).
    graphones: HashMap<String, (PhoneSeq, f64)>,
    max_chunk_chars: usize,
}

impl GraphoneModel {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            graphones: HashMap::new(),
            max_chunk_chars: 0,
        }
    }

    pub fn load(path: &Path, alphabet: Alphabet) -> Result<Self, FrontendError> {
        if !path.is_file() {
            return Err(FrontendError::configuration(format!(
                "g2p model file not found: {}",
                path.display()
            )));
        }
        let file = File::open(path).map_err(|e| FrontendError::io("open g2p model", e))?;
        let model = Self::from_reader(BufReader::new(file), alphabet)?;
        tracing::info!(
            path = %path.display(),
            alphabet = alphabet.as_str(),
            graphones = model.len(),
            "graphone model: loaded"
        );
        Ok(model)
    }

    /// Reads `<graphemes>\t<phones|_>\t<log-prob>` lines.
    pub fn from_reader<R: BufRead>(reader: R, alphabet: Alphabet) -> Result<Self, FrontendError> {
        let mut model = Self::new(alphabet);
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| FrontendError::io("read g2p model", e))?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let parsed = match fields.as_slice() {
                [graphemes, phones, log_prob] => log_prob
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|lp| (graphemes.trim(), phones.trim(), lp)),
                _ => None,
            };
            let Some((graphemes, phones, log_prob)) = parsed else {
                tracing::warn!(line = idx + 1, "graphone model: malformed line, skipping");
                continue;
            };
            let phones = if phones == SILENT {
                Vec::new()
            } else {
                phones.split_whitespace().map(str::to_string).collect()
            };
            model.add(graphemes, phones, log_prob);
        }
        if model.is_empty() {
            return Err(FrontendError::configuration("g2p model has no graphones"));
        }
        Ok(model)
    }

    /// Registers a graphone; a chunk keeps its most probable pronunciation.
    pub fn add(&mut self, graphemes: &str, phones: PhoneSeq, log_prob: f64) {
        if graphemes.is_empty() {
            return;
        }
        match self.graphones.get(graphemes) {
            Some((_, kept)) if *kept >= log_prob => {}
            _ => {
                self.max_chunk_chars = self.max_chunk_chars.max(graphemes.chars().count());
                self.graphones
                    .insert(graphemes.to_string(), (phones, log_prob));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.graphones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphones.is_empty()
    }

    fn decode(&self, word: &str) -> Result<PhoneSeq, TranslationFailure> {
        let bounds: Vec<usize> = word
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(word.len()))
            .collect();
        let n = bounds.len() - 1;
        if n == 0 {
            return Err(TranslationFailure::Undecodable(word.to_string()));
        }

        let mut best = vec![f64::NEG_INFINITY; n + 1];
        let mut back: Vec<Option<usize>> = vec![None; n + 1];
        best[0] = 0.0;

        for end in 1..=n {
            for len in 1..=self.max_chunk_chars.min(end) {
                let start = end - len;
                if best[start] == f64::NEG_INFINITY {
                    continue;
                }
                let Some((_, log_prob)) = self.graphones.get(&word[bounds[start]..bounds[end]])
                else {
                    continue;
                };
                let score = best[start] + log_prob;
                if score > best[end] {
                    best[end] = score;
                    back[end] = Some(start);
                }
            }
        }

        if best[n] == f64::NEG_INFINITY {
            return Err(TranslationFailure::Undecodable(word.to_string()));
        }

        let mut chunks = Vec::new();
        let mut end = n;
        while end > 0 {
            let Some(start) = back[end] else {
                return Err(TranslationFailure::Undecodable(word.to_string()));
            };
            chunks.push(&word[bounds[start]..bounds[end]]);
            end = start;
        }
        chunks.reverse();

        Ok(chunks
            .into_iter()
            .filter_map(|chunk| self.graphones.get(chunk))
            .flat_map(|(phones, _)| phones.iter().cloned())
            .collect())
    }
}

impl PhoneticModel for GraphoneModel {
    fn predict(&self, word: &str) -> Result<PhoneSeq, TranslationFailure> {
        self.decode(word)
    }

    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }
}
